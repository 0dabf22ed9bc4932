mod audit_log;
mod event;
mod event_registration;
mod hub;
mod hub_member;
mod join_request;
mod notification;
mod setting;
mod user;
