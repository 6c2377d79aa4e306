use std::path::PathBuf;

use anyhow::Result;
use content_ops::import::{load_source_file, run_import, ImportConfig};
use content_ops::store::{Db, PgStore};
use content_ops::util::env::{db_url, env_flag, env_opt};

#[tokio::main]
async fn main() -> Result<()> {
    content_ops::util::env::bootstrap_cli("import_influencers");

    let secondary = env_opt("SECONDARY_LOCALE").unwrap_or_else(|| "fr".to_string());
    let cfg = ImportConfig {
        primary_locale: env_opt("PRIMARY_LOCALE").unwrap_or_else(|| "en".to_string()),
        secondary_locale: (!secondary.eq_ignore_ascii_case("none")).then_some(secondary),
        dry_run: env_flag("DRY_RUN", false),
        auto_publish: env_flag("AUTO_PUBLISH", false),
        debug: env_flag("DEBUG", false),
    };
    let file = env_opt("IMPORT_FILE").unwrap_or_else(|| "influencers-data.json".to_string());

    println!("reading influencers data from {file}...");
    let records = load_source_file(&PathBuf::from(&file))?;
    println!("loaded {} influencers\n", records.len());

    let db = Db::connect(&db_url()?, 5).await?;
    let store = PgStore::new(db.clone());
    let result = run_import(&store, &cfg, &records).await;
    // Release the pool whatever happened to the batch.
    db.pool.close().await;

    let stats = result?;
    if stats.failed > 0 {
        println!("\n⚠ completed with {} failed record(s)", stats.failed);
        std::process::exit(1);
    }
    println!("\n✓ import completed successfully");
    Ok(())
}
