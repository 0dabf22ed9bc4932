//! Profile and membership queries for the logged-in user.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{
        event_registration::EventRegistrationRepository, hub_member::HubMemberRepository,
        programme_member::ProgrammeMemberRepository, project_member::ProjectMemberRepository,
        user::UserRepository,
    },
    error::AppError,
    model::user::{Memberships, UpdateProfileParam, User},
    util::validate,
};

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and applies profile changes.
    ///
    /// A blank department clears it. Interests replace the stored list.
    pub async fn update_profile(
        &self,
        user_id: i32,
        name: Option<String>,
        department: Option<String>,
        interests: Option<Vec<String>>,
    ) -> Result<User, AppError> {
        let param = UpdateProfileParam {
            name: name
                .map(|n| validate::text("name", &n, 1, 100))
                .transpose()?,
            department: department
                .map(|d| validate::optional_text("department", Some(&d), 100))
                .transpose()?,
            interests: interests.map(validate::interests).transpose()?,
        };

        UserRepository::new(self.db)
            .update_profile(user_id, param)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Collects the user's hubs, projects, programmes and upcoming event registrations.
    pub async fn memberships(&self, user_id: i32) -> Result<Memberships, AppError> {
        let hubs = HubMemberRepository::new(self.db)
            .memberships_for_user(user_id)
            .await?;
        let projects = ProjectMemberRepository::new(self.db)
            .memberships_for_user(user_id)
            .await?;
        let programmes = ProgrammeMemberRepository::new(self.db)
            .memberships_for_user(user_id)
            .await?;
        let events = EventRegistrationRepository::new(self.db)
            .upcoming_for_user(user_id, Utc::now())
            .await?;

        Ok(Memberships {
            hubs,
            projects,
            programmes,
            events,
        })
    }
}
