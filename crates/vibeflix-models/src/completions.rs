use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{CompletionId, LessonId, UserId};

/// Marks a lesson as watched by a student; one row per (user, lesson).
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonCompletion {
    pub id: CompletionId,
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub completed_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CompletionResponse {
    pub completion: LessonCompletion,
}
