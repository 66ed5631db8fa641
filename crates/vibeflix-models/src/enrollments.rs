//! Enrollment models: which student may access which course.
//!
//! There is at most one row per (user, course); creation is an upsert that
//! converges on that row and only ever updates `isActive`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::courses::CourseSummary;
use crate::ids::{CourseId, EnrollmentId, UserId};
use crate::serde_helpers::deserialize_optional_id;
use crate::users::UserSummary;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub is_active: bool,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn status(&self) -> EnrollmentStatus {
        EnrollmentStatus {
            is_active: self.is_active,
            enrolled_at: self.enrolled_at,
        }
    }
}

/// The part of an enrollment a student sees next to a course.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStatus {
    pub is_active: bool,
    pub enrolled_at: DateTime<Utc>,
}

/// Flat join row behind [`EnrollmentDetail`].
#[derive(FromRow, Debug, Clone)]
pub struct EnrollmentRow {
    #[sqlx(flatten)]
    pub enrollment: Enrollment,
    pub user_name: String,
    pub user_email: String,
    pub course_title: String,
}

/// Enrollment with its student and course, as listed by the API.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDetail {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub user: UserSummary,
    pub course: CourseSummary,
}

impl From<EnrollmentRow> for EnrollmentDetail {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            user: UserSummary {
                id: row.enrollment.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            course: CourseSummary {
                id: row.enrollment.course_id,
                title: row.course_title,
            },
            enrollment: row.enrollment,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentDto {
    pub user_id: UserId,
    pub course_id: CourseId,
    /// New enrollments start inactive unless stated otherwise.
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnrollmentDto {
    pub is_active: bool,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EnrollmentListParams {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[param(value_type = Option<String>, format = "uuid")]
    pub user_id: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[param(value_type = Option<String>, format = "uuid")]
    pub course_id: Option<CourseId>,
}

/// Result of the create-or-activate upsert.
#[derive(Debug, Clone)]
pub struct EnrollmentUpsert {
    pub enrollment: Enrollment,
    pub created: bool,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EnrollmentsResponse {
    pub enrollments: Vec<EnrollmentDetail>,
}

/// Body of the upsert: the enrollment with its student and course.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EnrollmentDetailResponse {
    pub enrollment: EnrollmentDetail,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EnrollmentResponse {
    pub enrollment: Enrollment,
}
