use serde::Serialize;

use crate::modules::{
    application::schema::ApplicationEntity, recruitment::schema::RecruitmentEntity,
    user::model::UserResponse,
};

/// Messages for the suggestion/search indexer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionEvent {
    CreateRecruitment { data: RecruitmentEntity },
    UpdateRecruitment { data: RecruitmentEntity },
    DeleteRecruitment { id: i64 },
}

/// Messages for the notification sender.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationEvent {
    Approved { data: ApplicationNotice },
    Rejected { data: ApplicationNotice },
}

/// Full context of a reviewed application.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationNotice {
    pub application: ApplicationEntity,
    pub recruitment: RecruitmentEntity,
    pub applicant: UserResponse,
}

#[derive(Debug, Clone)]
pub struct EventConfig {
    pub suggestion_queue: String,
    pub notification_queue: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            suggestion_queue: "suggestion_queue".to_string(),
            notification_queue: "notification_queue".to_string(),
        }
    }
}
