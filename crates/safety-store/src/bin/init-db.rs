use clap::Parser;
use tracing::info;

use safety_store::Database;

#[derive(Debug, Parser)]
#[command(name = "init-db")]
#[command(about = "Create the drug safety database and apply migrations")]
struct Args {
    /// Database URL, e.g. sqlite:data/safety.db?mode=rwc
    #[arg(long)]
    db: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let url = args
        .db
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:data/safety.db?mode=rwc".to_string());

    let db = Database::connect(&url).await?;
    db.migrate().await?;
    info!("Database initialized");

    db.close().await;
    Ok(())
}
