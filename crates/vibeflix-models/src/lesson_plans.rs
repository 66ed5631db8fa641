//! Lesson plan models: the scheduled outline of a course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{CourseId, LessonPlanId};
use crate::serde_helpers::{deserialize_optional_datetime, deserialize_optional_id};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub id: LessonPlanId,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    #[sqlx(rename = "position")]
    pub order: i32,
    pub course_id: CourseId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanDto {
    #[validate(length(min = 1, message = "Título é obrigatório"))]
    pub title: String,
    pub description: Option<String>,
    /// RFC 3339 timestamp; an empty string clears it.
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Ordem deve ser maior ou igual a 0"))]
    pub order: i32,
    pub course_id: CourseId,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LessonPlanListParams {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[param(value_type = Option<String>, format = "uuid")]
    pub course_id: Option<CourseId>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlansResponse {
    pub lesson_plans: Vec<LessonPlan>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanResponse {
    pub lesson_plan: LessonPlan,
}
