//! Storage collaborator seam.
//!
//! Every maintenance procedure takes a `ContentStore` handle instead of
//! constructing its own connection, so the batch logic stays unit-testable
//! against an in-memory double while the binaries inject the Postgres store.

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{NewInfluencerRecord, StoredInfluencerRecord};

pub mod db;
#[cfg(test)]
pub mod memory;
pub mod pg;

pub use db::Db;
pub use pg::PgStore;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// First record with this slug in any locale (duplicate detection).
    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredInfluencerRecord>>;

    /// Record addressed by slug + locale (sample inspection).
    async fn find_one(&self, slug: &str, locale: &str) -> Result<Option<StoredInfluencerRecord>>;

    /// Every record in the collection, all locales.
    async fn find_all(&self) -> Result<Vec<StoredInfluencerRecord>>;

    /// Collection count, optionally restricted to one locale.
    async fn count(&self, locale: Option<&str>) -> Result<i64>;

    /// Count of `primary`-locale rows whose document identifier also exists
    /// under `secondary` (the shared-document linkage check).
    async fn count_localized(&self, primary: &str, secondary: &str) -> Result<i64>;

    /// Create one locale row. When `record.document_id` is `None` the store
    /// assigns a fresh document identifier; `Some` is reused verbatim.
    async fn create(&self, record: NewInfluencerRecord) -> Result<StoredInfluencerRecord>;

    /// Delete one row by its storage id.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Locale codes registered in the target system.
    async fn locales(&self) -> Result<Vec<String>>;
}
