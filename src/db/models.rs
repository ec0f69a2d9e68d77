use bson::oid::ObjectId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::models::catalog::{ContentType, Format, Platform};
use crate::models::content::{Content, EngagementMetrics};
use crate::models::validation::ValidContent;

/// A content record as stored in the `contents` collection.
///
/// Field names are camelCase on disk. Timestamps are stored as BSON
/// datetimes so the database sorts them chronologically; BSON keeps
/// milliseconds, so timestamps are truncated to that precision up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub content_type: ContentType,
    pub format: Format,
    pub platform: Platform,
    #[serde(default)]
    pub marketing_patterns: Vec<String>,
    #[serde(default)]
    pub engagement_metrics: EngagementMetrics,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ContentRecord {
    /// A brand-new record with a fresh id, created and updated at `now`.
    pub fn create(valid: ValidContent, now: DateTime<Utc>) -> Self {
        Self::with_id(ObjectId::new(), valid, now, now)
    }

    /// Replace the editable fields, keeping id and creation time.
    pub fn revise(&self, valid: ValidContent, now: DateTime<Utc>) -> Self {
        Self::with_id(self.id, valid, self.created_at, now)
    }

    fn with_id(
        id: ObjectId,
        valid: ValidContent,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: valid.title,
            description: valid.description,
            content: valid.content,
            categories: valid.categories,
            content_type: valid.content_type,
            format: valid.format,
            platform: valid.platform,
            marketing_patterns: valid.marketing_patterns,
            engagement_metrics: valid.engagement_metrics,
            created_at: created_at.trunc_subsecs(3),
            updated_at: updated_at.trunc_subsecs(3),
        }
    }
}

impl From<ContentRecord> for Content {
    fn from(record: ContentRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            title: record.title,
            description: record.description,
            content: record.content,
            categories: record.categories,
            content_type: record.content_type,
            format: record.format,
            platform: record.platform,
            marketing_patterns: record.marketing_patterns,
            engagement_metrics: record.engagement_metrics,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Parse a client-supplied identifier. Malformed ids match nothing.
pub fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id.trim()).ok()
}
