//! Private student notes, one per (user, lesson).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{CourseId, LessonId, NoteId, UserId};
use crate::serde_helpers::deserialize_optional_id;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentNote {
    pub id: NoteId,
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Note with the lesson and course it belongs to.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteWithLesson {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub note: StudentNote,
    pub lesson_title: String,
    pub course_id: CourseId,
    pub course_title: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub lesson_id: LessonId,
    #[validate(length(min = 1, message = "Conteúdo é obrigatório"))]
    pub content: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteDto {
    #[validate(length(min = 1, message = "Conteúdo é obrigatório"))]
    pub content: String,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NoteListParams {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[param(value_type = Option<String>, format = "uuid")]
    pub lesson_id: Option<LessonId>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct NotesResponse {
    pub notes: Vec<NoteWithLesson>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct NoteResponse {
    pub note: StudentNote,
}
