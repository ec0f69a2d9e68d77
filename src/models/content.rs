use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::catalog::{ContentType, Format, Platform};

/// A content record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Database-assigned identifier (ObjectId hex).
    pub id: String,
    pub title: String,
    pub description: String,
    /// The body payload.
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audience engagement counters for a content record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub comments: u64,
    /// Percentage in `[0, 100]`.
    #[serde(default)]
    pub conversion_rate: f64,
}

/// The client-editable fields of a content record.
///
/// Used both as the create payload (absent required fields are violations)
/// and as the update payload (absent fields keep their stored value).
/// Unknown keys, including `id`, `createdAt` and `updatedAt`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Kept as free text so an unknown label is reported as a violation
    /// rather than a parse failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_metrics: Option<EngagementMetricsFields>,
}

/// Partial engagement metrics as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetricsFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<Numeric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<Numeric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<Numeric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Numeric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<Numeric>,
}

/// A metric value as it arrives over the wire.
///
/// HTML number inputs post their values as strings, so both JSON numbers and
/// numeric strings are accepted here and interpreted during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Numeric::Int)
            .unwrap_or(Numeric::Float(value as f64))
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Float(value)
    }
}

impl From<EngagementMetrics> for EngagementMetricsFields {
    fn from(m: EngagementMetrics) -> Self {
        Self {
            views: Some(m.views.into()),
            likes: Some(m.likes.into()),
            shares: Some(m.shares.into()),
            comments: Some(m.comments.into()),
            conversion_rate: Some(m.conversion_rate.into()),
        }
    }
}

impl From<&Content> for ContentFields {
    fn from(c: &Content) -> Self {
        Self {
            title: Some(c.title.clone()),
            description: Some(c.description.clone()),
            content: Some(c.content.clone()),
            categories: Some(c.categories.clone()),
            content_type: Some(c.content_type.label().to_string()),
            format: Some(c.format.label().to_string()),
            platform: Some(c.platform.label().to_string()),
            marketing_patterns: Some(c.marketing_patterns.clone()),
            engagement_metrics: Some(c.engagement_metrics.into()),
        }
    }
}

impl ContentFields {
    /// Overlay `patch` on top of `self`. Nested metrics merge per field; a
    /// field set to `null` is cleared and left for validation to judge.
    pub fn merged_with(self, patch: ContentPatch) -> Self {
        let engagement_metrics = match patch.engagement_metrics {
            None => self.engagement_metrics,
            Some(None) => None,
            Some(Some(overlay)) => Some(
                self.engagement_metrics
                    .unwrap_or_default()
                    .merged_with(overlay),
            ),
        };

        Self {
            title: patch.title.unwrap_or(self.title),
            description: patch.description.unwrap_or(self.description),
            content: patch.content.unwrap_or(self.content),
            categories: patch.categories.unwrap_or(self.categories),
            content_type: patch.content_type.unwrap_or(self.content_type),
            format: patch.format.unwrap_or(self.format),
            platform: patch.platform.unwrap_or(self.platform),
            marketing_patterns: patch.marketing_patterns.unwrap_or(self.marketing_patterns),
            engagement_metrics,
        }
    }
}

/// Present-but-null becomes `Some(None)`; `#[serde(default)]` covers absence.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// An update payload.
///
/// The outer `Option` says whether the client sent the key at all, the inner
/// one whether it sent a value or `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub categories: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub content_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub format: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub platform: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub marketing_patterns: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub engagement_metrics: Option<Option<EngagementMetricsPatch>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetricsPatch {
    #[serde(default, deserialize_with = "present")]
    pub views: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "present")]
    pub likes: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "present")]
    pub shares: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "present")]
    pub comments: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "present")]
    pub conversion_rate: Option<Option<Numeric>>,
}

impl EngagementMetricsFields {
    /// Overlay a metrics patch; a `null` metric falls back to its default.
    pub fn merged_with(self, patch: EngagementMetricsPatch) -> Self {
        Self {
            views: patch.views.unwrap_or(self.views),
            likes: patch.likes.unwrap_or(self.likes),
            shares: patch.shares.unwrap_or(self.shares),
            comments: patch.comments.unwrap_or(self.comments),
            conversion_rate: patch.conversion_rate.unwrap_or(self.conversion_rate),
        }
    }
}

impl From<EngagementMetricsFields> for EngagementMetricsPatch {
    fn from(m: EngagementMetricsFields) -> Self {
        Self {
            views: m.views.map(Some),
            likes: m.likes.map(Some),
            shares: m.shares.map(Some),
            comments: m.comments.map(Some),
            conversion_rate: m.conversion_rate.map(Some),
        }
    }
}

/// A patch that sets exactly the fields present in `fields`.
impl From<ContentFields> for ContentPatch {
    fn from(fields: ContentFields) -> Self {
        Self {
            title: fields.title.map(Some),
            description: fields.description.map(Some),
            content: fields.content.map(Some),
            categories: fields.categories.map(Some),
            content_type: fields.content_type.map(Some),
            format: fields.format.map(Some),
            platform: fields.platform.map(Some),
            marketing_patterns: fields.marketing_patterns.map(Some),
            engagement_metrics: fields
                .engagement_metrics
                .map(|m| Some(EngagementMetricsPatch::from(m))),
        }
    }
}
