//! Destructive sweep: deletes every record in the influencer collection.
//!
//! Guarded by an explicit confirmation (typed literal or FORCE flag). The
//! confirmation prompt is injected so the guard itself is testable without a
//! terminal.

use anyhow::Result;
use tracing::warn;

use crate::store::ContentStore;

/// Literal the operator must type when FORCE is not set.
pub const CONFIRM_LITERAL: &str = "DELETE";

#[derive(Debug, Clone, Default)]
pub struct CleanupConfig {
    pub force: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    /// Operator declined the confirmation; nothing was touched.
    pub aborted: bool,
    pub total: usize,
    pub deleted: usize,
    pub remaining: i64,
}

/// Delete all influencer rows. `confirm` is only invoked when `force` is
/// unset; any answer other than the exact literal aborts with no deletions
/// (and no error - declining is a valid outcome).
pub async fn run_cleanup<S, F>(store: &S, cfg: &CleanupConfig, confirm: F) -> Result<CleanupOutcome>
where
    S: ContentStore + ?Sized,
    F: FnOnce() -> Result<String>,
{
    if !cfg.force {
        let answer = confirm()?;
        if answer.trim() != CONFIRM_LITERAL {
            println!("aborted. (you must type \"{CONFIRM_LITERAL}\" to confirm)");
            return Ok(CleanupOutcome {
                aborted: true,
                ..Default::default()
            });
        }
    }

    let rows = store.find_all().await?;
    println!("found {} entries to delete", rows.len());
    if rows.is_empty() {
        println!("✓ no entries to delete - collection is already clean");
        return Ok(CleanupOutcome::default());
    }

    let total = rows.len();
    let mut deleted = 0usize;
    for row in &rows {
        match store.delete(row.id).await {
            Ok(()) => {
                deleted += 1;
                println!(
                    "✓ deleted: {} (id: {}, locale: {})",
                    row.name, row.id, row.locale
                );
            }
            Err(err) => {
                // Tolerated: the sweep keeps going and the recount below
                // surfaces whatever is left.
                warn!(id = row.id, error = %err, "failed to delete entry");
                println!("✗ failed to delete id {}: {err}", row.id);
            }
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("cleanup complete: deleted {deleted}/{total} entries");
    println!("{}", "=".repeat(60));

    let remaining = store.count(None).await?;
    if remaining == 0 {
        println!("✓ collection is clean - no influencer entries remain");
    } else {
        warn!(remaining, "entries still remain after cleanup");
        println!("⚠ warning: {remaining} entries still remain");
    }

    Ok(CleanupOutcome {
        aborted: false,
        total,
        deleted,
        remaining,
    })
}
