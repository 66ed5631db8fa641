//! User seeding: named accounts and batches of fake students.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use vibeflix_models::{Role, UserId};

pub struct UserSeed {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Inserts the account or leaves an existing one with that email untouched.
pub async fn upsert_user(db: &PgPool, user: &UserSeed) -> Result<UserId, Box<dyn std::error::Error>> {
    let id: UserId = sqlx::query_scalar(
        r#"
        INSERT INTO users (name, email, password, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING id
        "#,
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .fetch_one(db)
    .await?;

    Ok(id)
}

pub fn generate_students(count: usize, password_hash: &str) -> Vec<UserSeed> {
    let batch = std::process::id();

    (0..count)
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            UserSeed {
                email: format!(
                    "{}.{}+{}{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    batch,
                    idx
                ),
                name: format!("{} {}", first_name, last_name),
                password_hash: password_hash.to_string(),
                role: Role::Student,
            }
        })
        .collect()
}

pub async fn seed_students(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} students...", count);

    let users = generate_students(count, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 4 params per user
    const BATCH_SIZE: usize = 1000;

    let mut all_ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        all_ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (name, email, password, role) VALUES ");

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }

    query.push_str(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_students_unique_emails() {
        let users = generate_students(50, "hash");
        assert_eq!(users.len(), 50);

        let mut emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), 50);

        assert!(users.iter().all(|u| u.role == Role::Student));
        assert!(users.iter().all(|u| u.email.ends_with("@example.com")));
    }
}
