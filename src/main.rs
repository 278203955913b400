use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use papervault::config::{self, Config};
use papervault::routes::colleges::{bulk_import, CollegeInput};
use papervault::routes::create_routes;
use papervault::services::s3::S3Store;
use papervault::state::AppState;
use papervault::{db, telemetry};

#[derive(Parser)]
#[command(name = "papervault", version, about = "Admin API for notes, past papers and colleges")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Prompt for a password and print its argon2 hash for ADMIN_PASSWORD
    HashPassword,
    /// Upsert colleges from a JSON file (an array, or {"colleges": [...]})
    ImportColleges { path: PathBuf },
    /// Roll back every migration, dropping all tables
    ResetDb {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Wrapped { colleges: Vec<CollegeInput> },
    Bare(Vec<CollegeInput>),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    match Cli::parse().command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::HashPassword => hash_password(),
        Command::ImportColleges { path } => import_colleges(path).await,
        Command::ResetDb { yes } => reset_db(yes).await,
    }
}

async fn serve() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    let db = db::connect(&config.database_url).await?;
    db::migrate(&db).await?;

    let storage = S3Store::new(&config.storage);
    if let Err(e) = storage.ensure_bucket_exists().await {
        tracing::warn!("bucket check failed, uploads may fail: {}", e);
    }

    let port = config.port;
    let state = AppState::new(db, Arc::new(storage), config);
    let app = create_routes(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

fn hash_password() -> Result<(), Box<dyn Error>> {
    let password = rpassword::prompt_password("Admin password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        return Err("passwords do not match".into());
    }
    if password.is_empty() {
        return Err("password must not be empty".into());
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("failed to hash password: {}", e))?;
    println!("{}", hash);
    Ok(())
}

async fn import_colleges(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let raw = tokio::fs::read_to_string(&path).await?;
    let colleges = match serde_json::from_str::<ImportFile>(&raw)? {
        ImportFile::Wrapped { colleges } | ImportFile::Bare(colleges) => colleges,
    };

    let db = db::connect(&config::database_url()?).await?;
    db::migrate(&db).await?;

    let summary = bulk_import(&db, &colleges).await;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn reset_db(confirmed: bool) -> Result<(), Box<dyn Error>> {
    if !confirmed {
        return Err("refusing to drop every table without --yes".into());
    }

    let db = db::connect(&config::database_url()?).await?;
    Migrator::reset(&db).await?;
    tracing::info!("database reset");
    Ok(())
}
