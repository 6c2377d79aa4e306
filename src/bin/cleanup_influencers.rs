use std::io::Write;

use anyhow::Result;
use content_ops::cleanup::{run_cleanup, CleanupConfig, CONFIRM_LITERAL};
use content_ops::store::{Db, PgStore};
use content_ops::util::env::{db_url, env_flag};

#[tokio::main]
async fn main() -> Result<()> {
    content_ops::util::env::bootstrap_cli("cleanup_influencers");

    println!("\n⚠ CLEANUP SCRIPT - DANGER ZONE ⚠\n");
    let cfg = CleanupConfig {
        force: env_flag("FORCE", false),
    };

    let db = Db::connect(&db_url()?, 5).await?;
    let store = PgStore::new(db.clone());
    let result = run_cleanup(&store, &cfg, || {
        print!("This will DELETE ALL influencer entries. Type \"{CONFIRM_LITERAL}\" to confirm: ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        Ok(answer)
    })
    .await;
    db.pool.close().await;

    // Declining the confirmation is a successful no-op, but only a run that
    // actually swept gets the completion banner.
    let outcome = result?;
    if !outcome.aborted {
        println!("✓ cleanup script completed");
    }
    Ok(())
}
