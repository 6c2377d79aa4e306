use anyhow::Result;
use content_ops::store::{Db, PgStore};
use content_ops::util::env::{db_url, env_opt};
use content_ops::verify::{run_verify, VerifyConfig};

#[tokio::main]
async fn main() -> Result<()> {
    content_ops::util::env::bootstrap_cli("verify_influencers");

    let cfg = VerifyConfig {
        sample_slug: env_opt("VERIFY_SLUG").unwrap_or_else(|| "unchained".to_string()),
        primary_locale: env_opt("PRIMARY_LOCALE").unwrap_or_else(|| "en".to_string()),
        secondary_locale: env_opt("SECONDARY_LOCALE").unwrap_or_else(|| "fr".to_string()),
    };

    let db = Db::connect(&db_url()?, 5).await?;
    let store = PgStore::new(db.clone());
    let result = run_verify(&store, &cfg).await;
    db.pool.close().await;

    let report = result?;
    if !report.success {
        std::process::exit(1);
    }
    println!("\n✓ all verification checks passed");
    Ok(())
}
