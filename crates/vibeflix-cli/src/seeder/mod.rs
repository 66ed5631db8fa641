//! Development data.
//!
//! [`seed_demo`] can be run repeatedly: accounts are matched by email, the
//! sample course by title and the enrollment by (user, course).

pub mod users;

use sqlx::PgPool;

use vibeflix_core::hash_password;
use vibeflix_models::{CourseId, Role, UserId};

use users::{UserSeed, upsert_user};

pub use users::seed_students;

pub const ADMIN_EMAIL: &str = "admin@vibeflix.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const STUDENT_EMAIL: &str = "aluno@vibeflix.com";
pub const STUDENT_PASSWORD: &str = "student123";
pub const SAMPLE_COURSE_TITLE: &str = "Mentoria VibeCoding";

pub fn hash(password: &str) -> Result<String, Box<dyn std::error::Error>> {
    hash_password(password).map_err(|e| e.to_string().into())
}

pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(db)
        .await?;

    if exists {
        return Err(format!("User with email {} already exists", email).into());
    }

    let id: UserId = sqlx::query_scalar(
        "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(hash(password)?)
    .bind(Role::Admin)
    .fetch_one(db)
    .await?;

    Ok(id)
}

async fn sample_course(db: &PgPool) -> Result<CourseId, Box<dyn std::error::Error>> {
    let existing: Option<CourseId> =
        sqlx::query_scalar("SELECT id FROM courses WHERE title = $1 ORDER BY created_at LIMIT 1")
            .bind(SAMPLE_COURSE_TITLE)
            .fetch_optional(db)
            .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id: CourseId = sqlx::query_scalar(
        r#"
        INSERT INTO courses (title, description, thumbnail, preview_image, is_active)
        VALUES ($1, $2, $3, $4, TRUE)
        RETURNING id
        "#,
    )
    .bind(SAMPLE_COURSE_TITLE)
    .bind("Curso completo de programação e desenvolvimento web")
    .bind("https://via.placeholder.com/300x200")
    .bind("https://via.placeholder.com/1920x1080")
    .fetch_one(db)
    .await?;

    Ok(id)
}

pub async fn seed_demo(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🌱 Seeding demo data...");

    let admin_id = upsert_user(
        db,
        &UserSeed {
            name: "Administrador".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash(ADMIN_PASSWORD)?,
            role: Role::Admin,
        },
    )
    .await?;
    println!("   ✓ Admin {} ({})", ADMIN_EMAIL, admin_id);

    let student_id = upsert_user(
        db,
        &UserSeed {
            name: "Aluno Teste".to_string(),
            email: STUDENT_EMAIL.to_string(),
            password_hash: hash(STUDENT_PASSWORD)?,
            role: Role::Student,
        },
    )
    .await?;
    println!("   ✓ Student {} ({})", STUDENT_EMAIL, student_id);

    let course_id = sample_course(db).await?;
    println!("   ✓ Course {} ({})", SAMPLE_COURSE_TITLE, course_id);

    sqlx::query(
        r#"
        INSERT INTO enrollments (user_id, course_id, is_active)
        VALUES ($1, $2, TRUE)
        ON CONFLICT (user_id, course_id) DO UPDATE SET is_active = TRUE, updated_at = NOW()
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .execute(db)
    .await?;
    println!("   ✓ Enrollment active");

    Ok(())
}
