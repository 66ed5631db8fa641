//! Lesson models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::comments::CommentWithAuthor;
use crate::courses::CourseSummary;
use crate::ids::{CourseId, LessonId};
use crate::notes::StudentNote;
use crate::serde_helpers::deserialize_optional_id;
use crate::validation::url_or_empty;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail: Option<String>,
    #[sqlx(rename = "position")]
    pub order: i32,
    /// Length in minutes.
    pub duration: Option<i32>,
    pub is_published: bool,
    pub course_id: CourseId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A lesson annotated with the calling student's completion state.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonWithProgress {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub is_completed: bool,
}

/// `GET /api/lessons/{id}` and the lesson page.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetail {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub course: CourseSummary,
    pub comments: Vec<CommentWithAuthor>,
    /// Player URL derived from `videoUrl`, when the host is recognised.
    pub embed_url: Option<String>,
    /// Only reported to students.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<StudentNote>)]
    pub user_note: Option<Option<StudentNote>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

/// Body of lesson create and replace.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    #[validate(length(min = 1, message = "Título é obrigatório"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(url(message = "URL do vídeo inválida"))]
    pub video_url: String,
    #[validate(custom(function = "url_or_empty"))]
    pub thumbnail: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Ordem deve ser maior ou igual a 0"))]
    pub order: i32,
    #[validate(range(min = 1, message = "Duração deve ser positiva"))]
    pub duration: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
    pub course_id: CourseId,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LessonListParams {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[param(value_type = Option<String>, format = "uuid")]
    pub course_id: Option<CourseId>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct LessonsResponse {
    pub lessons: Vec<Lesson>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct LessonDetailResponse {
    pub lesson: LessonDetail,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct LessonResponse {
    pub lesson: Lesson,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_dto_defaults() {
        let dto: LessonDto = serde_json::from_str(
            r#"{"title": "Boas-vindas", "videoUrl": "https://youtu.be/dQw4w9WgXcQ", "courseId": "6f9619ff-8b86-d011-b42d-00cf4fc964ff"}"#,
        )
        .unwrap();
        assert_eq!(dto.order, 0);
        assert!(!dto.is_published);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_lesson_dto_rejects_negative_order_and_zero_duration() {
        let dto: LessonDto = serde_json::from_str(
            r#"{"title": "Aula", "videoUrl": "https://youtu.be/dQw4w9WgXcQ", "order": -1, "duration": 0, "courseId": "6f9619ff-8b86-d011-b42d-00cf4fc964ff"}"#,
        )
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("order"));
        assert!(errors.field_errors().contains_key("duration"));
    }

    #[test]
    fn test_lesson_dto_requires_video_url() {
        let missing = serde_json::from_str::<LessonDto>(
            r#"{"title": "Aula", "courseId": "6f9619ff-8b86-d011-b42d-00cf4fc964ff"}"#,
        );
        assert!(missing.is_err());

        for video_url in ["", "youtube dQw4w9WgXcQ"] {
            let dto: LessonDto = serde_json::from_value(serde_json::json!({
                "title": "Aula",
                "videoUrl": video_url,
                "courseId": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            }))
            .unwrap();
            let errors = dto.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("video_url"));
        }
    }

    #[test]
    fn test_lesson_serializes_order_key() {
        let now = Utc::now();
        let lesson = Lesson {
            id: LessonId::new(),
            title: "Aula 1".to_string(),
            description: None,
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            thumbnail: None,
            order: 3,
            duration: Some(12),
            is_published: true,
            course_id: CourseId::new(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&lesson).unwrap();
        assert_eq!(json["order"], 3);
        assert_eq!(json["isPublished"], true);
    }
}
