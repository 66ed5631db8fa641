//! # Vibeflix CLI
//!
//! Account bootstrapping and database seeding for development.
//!
//! ```ignore
//! use vibeflix_cli::seeder::seed_demo;
//!
//! seed_demo(&pool).await?;
//! ```

pub mod seeder;
