//! Background cron jobs.

pub mod event_reminders;
