use thiserror::Error;

use crate::models::catalog::{ContentType, Format, Platform};
use crate::models::content::{ContentFields, EngagementMetrics, Numeric};
use crate::models::validation::{validate, ValidContent, ValidationErrors};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Expected 'field=value', got '{0}'")]
    InvalidAssignment(String),
}

/// A content record being entered, before it is submitted.
///
/// Starts from the form defaults: empty text, the first option of each
/// enumerated field, no categories or patterns, zero metrics. Categories and
/// marketing patterns are kept unique here even though the store accepts
/// duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDraft {
    fields: ContentFields,
}

impl Default for ContentDraft {
    fn default() -> Self {
        Self {
            fields: ContentFields {
                title: Some(String::new()),
                description: Some(String::new()),
                content: Some(String::new()),
                categories: Some(Vec::new()),
                content_type: Some(ContentType::default().label().to_string()),
                format: Some(Format::default().label().to_string()),
                platform: Some(Platform::default().label().to_string()),
                marketing_patterns: Some(Vec::new()),
                engagement_metrics: Some(EngagementMetrics::default().into()),
            },
        }
    }
}

impl ContentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by its form name. Nested metrics use dotted names such as
    /// `engagementMetrics.views`. List fields are replaced entry by entry, so
    /// blanks and repeats are dropped.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), DraftError> {
        match name {
            "categories" => {
                self.fields.categories = Some(Vec::new());
                for category in value.split(',') {
                    self.add_category(category);
                }
                Ok(())
            }
            "marketingPatterns" => {
                self.fields.marketing_patterns = Some(Vec::new());
                for pattern in value.split(',') {
                    self.add_pattern(pattern);
                }
                Ok(())
            }
            _ => assign(&mut self.fields, name, value),
        }
    }

    /// Add a category unless it is blank or already present.
    /// Returns whether the draft changed.
    pub fn add_category(&mut self, category: &str) -> bool {
        push_unique(self.fields.categories.get_or_insert_with(Vec::new), category)
    }

    pub fn remove_category(&mut self, category: &str) {
        if let Some(categories) = self.fields.categories.as_mut() {
            categories.retain(|c| c != category);
        }
    }

    /// Add a marketing pattern unless it is blank or already present.
    /// Returns whether the draft changed.
    pub fn add_pattern(&mut self, pattern: &str) -> bool {
        push_unique(
            self.fields.marketing_patterns.get_or_insert_with(Vec::new),
            pattern,
        )
    }

    pub fn remove_pattern(&mut self, pattern: &str) {
        if let Some(patterns) = self.fields.marketing_patterns.as_mut() {
            patterns.retain(|p| p != pattern);
        }
    }

    pub fn categories(&self) -> &[String] {
        self.fields.categories.as_deref().unwrap_or_default()
    }

    pub fn marketing_patterns(&self) -> &[String] {
        self.fields.marketing_patterns.as_deref().unwrap_or_default()
    }

    /// Run the same checks the server will run.
    pub fn validate(&self) -> Result<ValidContent, ValidationErrors> {
        validate(&self.fields)
    }

    /// The payload to submit.
    pub fn to_fields(&self) -> ContentFields {
        self.fields.clone()
    }
}

/// Build a partial update from `field=value` assignments.
pub fn patch_from_assignments<'a, I>(assignments: I) -> Result<ContentFields, DraftError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut patch = ContentFields::default();
    for assignment in assignments {
        let (name, value) = split_assignment(assignment)?;
        assign(&mut patch, name, value)?;
    }
    Ok(patch)
}

/// Split `name=value` at the first `=`.
pub fn split_assignment(assignment: &str) -> Result<(&str, &str), DraftError> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(DraftError::InvalidAssignment(assignment.to_string())),
    }
}

fn push_unique(list: &mut Vec<String>, item: &str) -> bool {
    let item = item.trim();
    if item.is_empty() || list.iter().any(|existing| existing == item) {
        return false;
    }
    list.push(item.to_string());
    true
}

/// Comma-separated list entry, as typed on a command line.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn assign(fields: &mut ContentFields, name: &str, value: &str) -> Result<(), DraftError> {
    let text = Some(value.to_string());

    if let Some(child) = name.strip_prefix("engagementMetrics.") {
        let metrics = fields.engagement_metrics.get_or_insert_with(Default::default);
        let slot = match child {
            "views" => &mut metrics.views,
            "likes" => &mut metrics.likes,
            "shares" => &mut metrics.shares,
            "comments" => &mut metrics.comments,
            "conversionRate" => &mut metrics.conversion_rate,
            _ => return Err(DraftError::UnknownField(name.to_string())),
        };
        *slot = Some(Numeric::Text(value.to_string()));
        return Ok(());
    }

    match name {
        "title" => fields.title = text,
        "description" => fields.description = text,
        "content" => fields.content = text,
        "contentType" => fields.content_type = text,
        "format" => fields.format = text,
        "platform" => fields.platform = text,
        "categories" => fields.categories = Some(parse_list(value)),
        "marketingPatterns" => fields.marketing_patterns = Some(parse_list(value)),
        _ => return Err(DraftError::UnknownField(name.to_string())),
    }
    Ok(())
}
