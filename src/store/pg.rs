//! Postgres-backed `ContentStore` over the CMS database.
//!
//! `document_id` is assigned here (UUIDv4) when a primary-locale row is
//! created without one; secondary-locale rows pass the primary's identifier
//! through unchanged. Keeping the assignment inside the store preserves the
//! invariant that all locale rows of one influencer share exactly one
//! document identifier, whichever procedure creates them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::model::{NewInfluencerRecord, SeoMetadata, StoredInfluencerRecord};
use crate::store::{ContentStore, Db};

pub struct PgStore {
    db: Db,
}

impl PgStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

const SELECT_COLUMNS: &str = "id, document_id, locale, slug, name, code, percentage, \
     short_bio, hero_text, hero_description, link, \
     bullet_point_1, bullet_point_2, bullet_point_3, bullet_point_4, \
     metadata, published_at";

fn record_from_row(row: &PgRow) -> Result<StoredInfluencerRecord> {
    let metadata: Option<serde_json::Value> = row.try_get("metadata")?;
    let metadata: Option<SeoMetadata> = metadata
        .map(serde_json::from_value)
        .transpose()
        .context("malformed SEO metadata JSON in influencers.metadata")?;
    Ok(StoredInfluencerRecord {
        id: row.try_get("id")?,
        document_id: row.try_get("document_id")?,
        locale: row.try_get("locale")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        code: row.try_get("code")?,
        percentage: row.try_get("percentage")?,
        short_bio: row.try_get("short_bio")?,
        hero_text: row.try_get("hero_text")?,
        hero_description: row.try_get("hero_description")?,
        link: row.try_get("link")?,
        bullet_points: [
            row.try_get("bullet_point_1")?,
            row.try_get("bullet_point_2")?,
            row.try_get("bullet_point_3")?,
            row.try_get("bullet_point_4")?,
        ],
        metadata,
        published_at: row.try_get::<Option<DateTime<Utc>>, _>("published_at")?,
    })
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredInfluencerRecord>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM influencers WHERE slug = $1 LIMIT 1");
        let row = sqlx::query(&sql)
            .persistent(false)
            .bind(slug)
            .fetch_optional(&self.db.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_one(&self, slug: &str, locale: &str) -> Result<Option<StoredInfluencerRecord>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM influencers WHERE slug = $1 AND locale = $2 LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .persistent(false)
            .bind(slug)
            .bind(locale)
            .fetch_optional(&self.db.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<StoredInfluencerRecord>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM influencers ORDER BY id");
        let rows = sqlx::query(&sql)
            .persistent(false)
            .fetch_all(&self.db.pool)
            .await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn count(&self, locale: Option<&str>) -> Result<i64> {
        let n: i64 = match locale {
            Some(code) => {
                sqlx::query_scalar("SELECT count(*) FROM influencers WHERE locale = $1")
                    .persistent(false)
                    .bind(code)
                    .fetch_one(&self.db.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT count(*) FROM influencers")
                    .persistent(false)
                    .fetch_one(&self.db.pool)
                    .await?
            }
        };
        Ok(n)
    }

    async fn count_localized(&self, primary: &str, secondary: &str) -> Result<i64> {
        let n: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM influencers p \
             WHERE p.locale = $1 AND EXISTS ( \
                 SELECT 1 FROM influencers s \
                 WHERE s.locale = $2 AND s.document_id = p.document_id)",
        )
        .persistent(false)
        .bind(primary)
        .bind(secondary)
        .fetch_one(&self.db.pool)
        .await?;
        Ok(n)
    }

    async fn create(&self, record: NewInfluencerRecord) -> Result<StoredInfluencerRecord> {
        let document_id = record
            .document_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let metadata_json = record
            .metadata
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .context("serializing SEO metadata")?;
        let sql = format!(
            "INSERT INTO influencers (document_id, locale, slug, name, code, percentage, \
                 short_bio, hero_text, hero_description, link, \
                 bullet_point_1, bullet_point_2, bullet_point_3, bullet_point_4, \
                 metadata, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {SELECT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .persistent(false)
            .bind(&document_id)
            .bind(&record.locale)
            .bind(&record.slug)
            .bind(&record.name)
            .bind(&record.code)
            .bind(record.percentage)
            .bind(&record.short_bio)
            .bind(&record.hero_text)
            .bind(&record.hero_description)
            .bind(&record.link)
            .bind(&record.bullet_points[0])
            .bind(&record.bullet_points[1])
            .bind(&record.bullet_points[2])
            .bind(&record.bullet_points[3])
            .bind(metadata_json)
            .bind(record.published_at)
            .fetch_one(&self.db.pool)
            .await
            .with_context(|| format!("creating influencer row slug={} locale={}", record.slug, record.locale))?;
        record_from_row(&row)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM influencers WHERE id = $1")
            .persistent(false)
            .bind(id)
            .execute(&self.db.pool)
            .await?;
        Ok(())
    }

    async fn locales(&self) -> Result<Vec<String>> {
        let codes: Vec<String> = sqlx::query_scalar("SELECT code FROM i18n_locales ORDER BY code")
            .persistent(false)
            .fetch_all(&self.db.pool)
            .await
            .context("reading locale registry (i18n_locales)")?;
        Ok(codes)
    }
}
