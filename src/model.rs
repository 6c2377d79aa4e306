//! Data model for the influencer collection.
//!
//! `InfluencerSourceRecord` mirrors the external flat JSON schema
//! (per-locale translation blocks nested under `translations`); the stored
//! shape flattens each translation into one row per locale. All locale rows
//! of one logical influencer share a single `document_id`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of bullet-point slots on the stored record. Extra source items are
/// dropped; missing ones become empty strings.
pub const BULLET_SLOTS: usize = 4;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerSourceRecord {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub metadata: Option<SourceMetadata>,
    /// Locale code -> translation block, e.g. `{"en": {...}, "fr": {...}}`.
    #[serde(default)]
    pub translations: HashMap<String, TranslationBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub percentage: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationBlock {
    #[serde(default)]
    pub short_bio: String,
    #[serde(default)]
    pub hero_text: String,
    #[serde(default)]
    pub hero_description: String,
    #[serde(default)]
    pub influencer_section: Option<InfluencerSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerSection {
    #[serde(default)]
    pub cta_link: String,
    #[serde(default)]
    pub bullet_items: Vec<String>,
}

/// SEO component persisted as JSONB; camelCase keys match the CMS component.
/// `shareImage` needs file upload handling and is intentionally not carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub meta_title: String,
    pub meta_description: String,
}

/// Payload for creating one locale row. `document_id == None` asks the store
/// to assign a fresh identifier; `Some` reuses the primary row's identifier
/// verbatim so both locales stay addressable under one document.
#[derive(Debug, Clone)]
pub struct NewInfluencerRecord {
    pub document_id: Option<String>,
    pub locale: String,
    pub slug: String,
    pub name: String,
    pub code: String,
    pub percentage: i32,
    pub short_bio: String,
    pub hero_text: String,
    pub hero_description: String,
    pub link: String,
    pub bullet_points: [String; BULLET_SLOTS],
    pub metadata: Option<SeoMetadata>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct StoredInfluencerRecord {
    pub id: i64,
    pub document_id: String,
    pub locale: String,
    pub slug: String,
    pub name: String,
    pub code: String,
    pub percentage: i32,
    pub short_bio: String,
    pub hero_text: String,
    pub hero_description: String,
    pub link: String,
    pub bullet_points: [String; BULLET_SLOTS],
    pub metadata: Option<SeoMetadata>,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewInfluencerRecord {
    /// Flatten one translation block of a source record into a locale row.
    ///
    /// Bullet items map positionally into the four fixed slots. SEO metadata
    /// is omitted entirely when the source has no metadata block; otherwise
    /// `metaTitle` falls back to the influencer name and `metaDescription`
    /// to this locale's short bio. An empty string counts as absent for
    /// both fallbacks.
    pub fn from_source(
        source: &InfluencerSourceRecord,
        locale: &str,
        block: &TranslationBlock,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        let section = block.influencer_section.clone().unwrap_or_default();
        let mut bullet_points: [String; BULLET_SLOTS] = Default::default();
        for (slot, item) in bullet_points
            .iter_mut()
            .zip(section.bullet_items.iter().take(BULLET_SLOTS))
        {
            *slot = item.clone();
        }

        let metadata = source.metadata.as_ref().map(|m| SeoMetadata {
            meta_title: m
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| source.name.clone()),
            meta_description: m
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| block.short_bio.clone()),
        });

        let discount = source.discount.clone().unwrap_or_default();

        Self {
            document_id: None,
            locale: locale.to_string(),
            slug: source.slug.clone(),
            name: source.name.clone(),
            code: discount.code,
            percentage: discount.percentage,
            short_bio: block.short_bio.clone(),
            hero_text: block.hero_text.clone(),
            hero_description: block.hero_description.clone(),
            link: section.cta_link,
            bullet_points,
            metadata,
            published_at,
        }
    }

    pub fn with_document_id(mut self, document_id: &str) -> Self {
        self.document_id = Some(document_id.to_string());
        self
    }
}
