use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

use vibeflix_cli::seeder::{self, ADMIN_EMAIL, ADMIN_PASSWORD, STUDENT_EMAIL, STUDENT_PASSWORD};

#[derive(Parser)]
#[command(name = "vibeflix-cli")]
#[command(about = "Vibeflix CLI - Administrative tools for Vibeflix", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the demo admin, student, course and enrollment
    Seed,
    /// Insert fake students
    SeedStudents {
        /// Number of students to create
        #[arg(short = 'c', long, default_value = "20")]
        count: usize,

        /// Password shared by the generated students
        #[arg(long, default_value = "student123")]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed => handle_seed(&pool).await,
        Commands::SeedStudents { count, password } => {
            handle_seed_students(&pool, count, &password).await
        }
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Name")
            .interact_text()
            .expect("Failed to read name")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    if password.len() < 6 {
        eprintln!("\n❌ Password must be at least 6 characters");
        std::process::exit(1);
    }

    match seeder::create_admin(pool, &name, &email, &password).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email);
            println!("   Name: {}", name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool) {
    match seeder::seed_demo(pool).await {
        Ok(()) => {
            println!("\n✅ Demo data ready");
            println!("   Admin:   {} / {}", ADMIN_EMAIL, ADMIN_PASSWORD);
            println!("   Student: {} / {}", STUDENT_EMAIL, STUDENT_PASSWORD);
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed_students(pool: &PgPool, count: usize, password: &str) {
    let password_hash = match seeder::hash(password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("\n❌ Error hashing password: {}", e);
            std::process::exit(1);
        }
    };

    match seeder::seed_students(pool, count, &password_hash).await {
        Ok(ids) => println!("✅ Created {} students", ids.len()),
        Err(e) => {
            eprintln!("\n❌ Error seeding students: {}", e);
            std::process::exit(1);
        }
    }
}
