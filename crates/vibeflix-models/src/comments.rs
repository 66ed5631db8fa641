//! Public lesson comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{CommentId, LessonId, UserId};
use crate::serde_helpers::deserialize_optional_id;
use vibeflix_auth::Role;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

#[derive(FromRow, Debug, Clone)]
pub struct CommentRow {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author_name: String,
    pub author_role: Role,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: CommentAuthor,
}

impl From<CommentRow> for CommentWithAuthor {
    fn from(row: CommentRow) -> Self {
        Self {
            user: CommentAuthor {
                id: row.comment.user_id,
                name: row.author_name,
                role: row.author_role,
            },
            comment: row.comment,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub lesson_id: LessonId,
    #[validate(length(min = 1, message = "Conteúdo é obrigatório"))]
    pub content: String,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CommentListParams {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[param(value_type = Option<String>, format = "uuid")]
    pub lesson_id: Option<LessonId>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CommentsResponse {
    pub comments: Vec<CommentWithAuthor>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CommentResponse {
    pub comment: CommentWithAuthor,
}
