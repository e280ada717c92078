use clap::Parser;
use tracing::info;

use safety_store::{drug, safety_data, Database, NewSafetyData};

/// Well-known drugs with manually curated safety data, so a fresh install
/// answers common lookups without touching the external sources.
const COMMON_DRUGS: &[(&str, &str, &str, &str)] = &[
    ("Tylenol", "acetaminophen", "B", "safe"),
    ("Advil", "ibuprofen", "C", "moderate"),
    ("Zoloft", "sertraline", "C", "moderate"),
    ("Amoxicillin", "amoxicillin", "B", "safe"),
    ("Benadryl", "diphenhydramine", "B", "moderate"),
];

#[derive(Debug, Parser)]
#[command(name = "seed")]
#[command(about = "Insert seed safety data for common drugs")]
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

    for &(name, generic, category, bf_safety) in COMMON_DRUGS {
        let record = drug::upsert_drug(db.pool(), name, Some(generic)).await?;

        let pregnancy_safety = if matches!(category, "A" | "B") {
            "safe"
        } else {
            "caution"
        };
        let assessment = NewSafetyData {
            pregnancy_category: Some(category.to_string()),
            pregnancy_text: None,
            breastfeeding_text: None,
            pregnancy_safety: pregnancy_safety.to_string(),
            breastfeeding_safety: bf_safety.to_string(),
            ai_summary: Some(format!(
                "{} is generally considered {} during breastfeeding.",
                name, bf_safety
            )),
            key_warnings: Vec::new(),
            data_source: "manual".to_string(),
            confidence_score: 0.9,
            study_count: 0,
        };
        safety_data::record_safety_data(db.pool(), record.id, &assessment, None).await?;
    }

    info!("Seed data inserted");

    db.close().await;
    Ok(())
}
