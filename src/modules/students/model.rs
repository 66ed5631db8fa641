//! Student administration payloads, re-exported from `vibeflix-models`.

pub use vibeflix_models::users::{
    CreateStudentDto, StudentResponse, StudentWithStats, StudentsResponse, UpdateStudentDto, User,
    UserResponse,
};
