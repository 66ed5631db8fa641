//! Course models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::enrollments::EnrollmentStatus;
use crate::ids::CourseId;
use crate::lesson_plans::LessonPlan;
use crate::lessons::{Lesson, LessonWithProgress};
use crate::serde_helpers::deserialize_flag;
use crate::validation::url_or_empty;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub preview_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: CourseId,
    pub title: String,
}

/// Course row joined with its lesson and enrollment counts.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithCounts {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    pub lesson_count: i64,
    pub enrollment_count: i64,
}

/// Entry of `GET /api/courses`.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseListItem {
    #[serde(flatten)]
    pub course: CourseWithCounts,
    /// Published lessons, present when `includeLessons=true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lessons: Option<Vec<Lesson>>,
    /// The caller's enrollment; only reported to students.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<EnrollmentStatus>)]
    pub enrollment: Option<Option<EnrollmentStatus>>,
}

/// `GET /api/courses/{id}`.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub lesson_plans: Vec<LessonPlan>,
    pub enrollment_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<EnrollmentStatus>,
}

/// Student course page: published lessons with per-lesson completion.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<LessonWithProgress>,
    pub lesson_plans: Vec<LessonPlan>,
    pub completed_count: usize,
}

/// Body of course create and replace.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    #[validate(length(min = 1, message = "Título é obrigatório"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom(function = "url_or_empty"))]
    pub thumbnail: Option<String>,
    #[validate(custom(function = "url_or_empty"))]
    pub preview_image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CourseListParams {
    /// Embed published lessons in each course.
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub include_lessons: bool,
}

/// Body of `GET /api/courses`.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CoursesResponse {
    pub courses: Vec<CourseListItem>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CourseDetailResponse {
    pub course: CourseDetail,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CourseResponse {
    pub course: Course,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_dto_defaults_active() {
        let dto: CourseDto = serde_json::from_str(r#"{"title": "Mentoria VibeCoding"}"#).unwrap();
        assert!(dto.is_active);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_course_dto_rejects_blank_title_and_bad_url() {
        let dto: CourseDto =
            serde_json::from_str(r#"{"title": "", "thumbnail": "not a url"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("thumbnail"));
    }

    #[test]
    fn test_course_dto_allows_empty_image() {
        let dto: CourseDto =
            serde_json::from_str(r#"{"title": "Curso", "previewImage": ""}"#).unwrap();
        assert!(dto.validate().is_ok());
    }
}
