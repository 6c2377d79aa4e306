//! In-memory `ContentStore` double for procedure tests.
//!
//! Supports per-slug fault injection so batch-recovery paths (one bad record
//! must never abort the sweep) can be exercised without a database.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{NewInfluencerRecord, StoredInfluencerRecord};
use crate::store::ContentStore;

#[derive(Default)]
struct Inner {
    rows: Vec<StoredInfluencerRecord>,
    next_id: i64,
    fail_create_for: HashSet<(String, String)>,
    fail_delete_ids: HashSet<i64>,
}

#[derive(Default)]
pub struct MemoryStore {
    locales: Vec<String>,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn with_locales(locales: &[&str]) -> Self {
        Self {
            locales: locales.iter().map(|s| s.to_string()).collect(),
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Make `create` fail for this slug + locale combination.
    pub fn fail_create(&self, slug: &str, locale: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_create_for
            .insert((slug.to_string(), locale.to_string()));
    }

    /// Make `delete` fail for this row id.
    pub fn fail_delete(&self, id: i64) {
        self.inner.lock().unwrap().fail_delete_ids.insert(id);
    }

    pub fn rows(&self) -> Vec<StoredInfluencerRecord> {
        self.inner.lock().unwrap().rows.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredInfluencerRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.iter().find(|r| r.slug == slug).cloned())
    }

    async fn find_one(&self, slug: &str, locale: &str) -> Result<Option<StoredInfluencerRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .iter()
            .find(|r| r.slug == slug && r.locale == locale)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<StoredInfluencerRecord>> {
        Ok(self.rows())
    }

    async fn count(&self, locale: Option<&str>) -> Result<i64> {
        let inner = self.inner.lock().unwrap();
        let n = inner
            .rows
            .iter()
            .filter(|r| locale.map_or(true, |code| r.locale == code))
            .count();
        Ok(n as i64)
    }

    async fn count_localized(&self, primary: &str, secondary: &str) -> Result<i64> {
        let inner = self.inner.lock().unwrap();
        let n = inner
            .rows
            .iter()
            .filter(|p| {
                p.locale == primary
                    && inner
                        .rows
                        .iter()
                        .any(|s| s.locale == secondary && s.document_id == p.document_id)
            })
            .count();
        Ok(n as i64)
    }

    async fn create(&self, record: NewInfluencerRecord) -> Result<StoredInfluencerRecord> {
        let mut inner = self.inner.lock().unwrap();
        let key = (record.slug.clone(), record.locale.clone());
        if inner.fail_create_for.contains(&key) {
            bail!("injected create failure for {}/{}", key.0, key.1);
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let stored = StoredInfluencerRecord {
            id,
            document_id: record
                .document_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            locale: record.locale,
            slug: record.slug,
            name: record.name,
            code: record.code,
            percentage: record.percentage,
            short_bio: record.short_bio,
            hero_text: record.hero_text,
            hero_description: record.hero_description,
            link: record.link,
            bullet_points: record.bullet_points,
            metadata: record.metadata,
            published_at: record.published_at,
        };
        inner.rows.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_delete_ids.contains(&id) {
            bail!("injected delete failure for id {id}");
        }
        inner.rows.retain(|r| r.id != id);
        Ok(())
    }

    async fn locales(&self) -> Result<Vec<String>> {
        Ok(self.locales.clone())
    }
}
