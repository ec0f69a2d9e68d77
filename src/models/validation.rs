//! Content validation, independent of persistence.
//!
//! [`validate`] turns a set of client-supplied [`ContentFields`] into a
//! [`ValidContent`] or reports every rule it breaks at once.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::models::catalog::{ContentType, Format, Platform};
use crate::models::content::{ContentFields, EngagementMetrics, EngagementMetricsFields, Numeric};

/// Largest count MongoDB can hold in a signed 64-bit integer.
const MAX_COUNT: u64 = i64::MAX as u64;

/// A single broken content rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Field is absent or null.
    Required { field: &'static str },

    /// Text field is present but empty or whitespace-only.
    Blank { field: &'static str },

    /// A list contains an empty or whitespace-only entry.
    BlankEntry { field: &'static str, index: usize },

    /// Value is not one of the catalog options.
    InvalidVariant { field: &'static str, value: String },

    /// Value cannot be read as a number.
    NotANumber { field: &'static str, value: String },

    /// A count has a fractional part.
    NotAnInteger { field: &'static str },

    /// Numeric value outside its allowed range.
    OutOfRange { field: &'static str, min: f64, max: f64 },

    /// A count below zero or beyond what a signed 64-bit integer holds.
    CountOutOfRange { field: &'static str },

    /// The request body could not be decoded at all.
    Malformed { reason: String },
}

impl Violation {
    /// Dotted path of the offending field (`"body"` for decode failures).
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::Blank { field }
            | Self::BlankEntry { field, .. }
            | Self::InvalidVariant { field, .. }
            | Self::NotANumber { field, .. }
            | Self::NotAnInteger { field }
            | Self::OutOfRange { field, .. }
            | Self::CountOutOfRange { field } => field,
            Self::Malformed { .. } => "body",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::Blank { field } => write!(f, "{} cannot be empty", field),
            Self::BlankEntry { field, index } => {
                write!(f, "{}[{}] cannot be empty", field, index)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::NotANumber { field, value } => {
                write!(f, "{} must be a number, got '{}'", field, value)
            }
            Self::NotAnInteger { field } => write!(f, "{} must be a whole number", field),
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::CountOutOfRange { field } => {
                write!(f, "{} must be between 0 and {}", field, MAX_COUNT)
            }
            Self::Malformed { reason } => write!(f, "invalid JSON body: {}", reason),
        }
    }
}

/// Every violation found in one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field() == field)
    }

    /// A single decode failure for an unreadable request body.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self(vec![Violation::Malformed {
            reason: reason.into(),
        }])
    }
}

impl From<Vec<Violation>> for ValidationErrors {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Serialized as `{name, message, errors: [{field, message}]}`.
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            field: &'a str,
            message: String,
        }

        let entries: Vec<Entry<'_>> = self
            .0
            .iter()
            .map(|v| Entry {
                field: v.field(),
                message: v.to_string(),
            })
            .collect();

        let mut state = serializer.serialize_struct("ValidationErrors", 3)?;
        state.serialize_field("name", "ValidationError")?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("errors", &entries)?;
        state.end()
    }
}

/// Content that satisfies every rule and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidContent {
    pub title: String,
    pub description: String,
    pub content: String,
    pub categories: Vec<String>,
    pub content_type: ContentType,
    pub format: Format,
    pub platform: Platform,
    pub marketing_patterns: Vec<String>,
    pub engagement_metrics: EngagementMetrics,
}

/// Check `fields` against the content rules.
///
/// Absent lists default to empty and absent metrics to zero; absent text
/// and enumerated fields are violations.
pub fn validate(fields: &ContentFields) -> Result<ValidContent, ValidationErrors> {
    let mut violations = Vec::new();

    let title = required_text("title", fields.title.as_deref(), &mut violations);
    let description = required_text("description", fields.description.as_deref(), &mut violations);
    let content = required_text("content", fields.content.as_deref(), &mut violations);

    let categories = text_list("categories", fields.categories.as_deref(), &mut violations);
    let marketing_patterns = text_list(
        "marketingPatterns",
        fields.marketing_patterns.as_deref(),
        &mut violations,
    );

    let content_type = variant(
        "contentType",
        fields.content_type.as_deref(),
        ContentType::from_label,
        &mut violations,
    );
    let format = variant("format", fields.format.as_deref(), Format::from_label, &mut violations);
    let platform = variant(
        "platform",
        fields.platform.as_deref(),
        Platform::from_label,
        &mut violations,
    );

    let engagement_metrics = metrics(
        fields.engagement_metrics.as_ref().cloned().unwrap_or_default(),
        &mut violations,
    );

    match (title, description, content, content_type, format, platform) {
        (Some(title), Some(description), Some(content), Some(content_type), Some(format), Some(platform))
            if violations.is_empty() =>
        {
            Ok(ValidContent {
                title,
                description,
                content,
                categories,
                content_type,
                format,
                platform,
                marketing_patterns,
                engagement_metrics,
            })
        }
        _ => Err(ValidationErrors(violations)),
    }
}

fn required_text(
    field: &'static str,
    value: Option<&str>,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match value {
        None => {
            violations.push(Violation::Required { field });
            None
        }
        Some(s) if s.trim().is_empty() => {
            violations.push(Violation::Blank { field });
            None
        }
        Some(s) => Some(s.to_string()),
    }
}

fn text_list(
    field: &'static str,
    value: Option<&[String]>,
    violations: &mut Vec<Violation>,
) -> Vec<String> {
    let items = value.unwrap_or_default();
    for (index, item) in items.iter().enumerate() {
        if item.trim().is_empty() {
            violations.push(Violation::BlankEntry { field, index });
        }
    }
    items.to_vec()
}

fn variant<T>(
    field: &'static str,
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    violations: &mut Vec<Violation>,
) -> Option<T> {
    match value {
        None => {
            violations.push(Violation::Required { field });
            None
        }
        Some(s) if s.trim().is_empty() => {
            violations.push(Violation::Required { field });
            None
        }
        Some(s) => {
            let parsed = parse(s);
            if parsed.is_none() {
                violations.push(Violation::InvalidVariant {
                    field,
                    value: s.to_string(),
                });
            }
            parsed
        }
    }
}

fn metrics(fields: EngagementMetricsFields, violations: &mut Vec<Violation>) -> EngagementMetrics {
    let mut count = |field: &'static str, value: Option<Numeric>| match parse_count(field, value) {
        Ok(n) => n,
        Err(v) => {
            violations.push(v);
            0
        }
    };

    let views = count("engagementMetrics.views", fields.views);
    let likes = count("engagementMetrics.likes", fields.likes);
    let shares = count("engagementMetrics.shares", fields.shares);
    let comments = count("engagementMetrics.comments", fields.comments);

    let conversion_rate = match parse_rate("engagementMetrics.conversionRate", fields.conversion_rate) {
        Ok(rate) => rate,
        Err(v) => {
            violations.push(v);
            0.0
        }
    };

    EngagementMetrics {
        views,
        likes,
        shares,
        comments,
        conversion_rate,
    }
}

/// A wire value resolved to a number.
enum Number {
    Int(i64),
    Float(f64),
}

/// Read a wire value as a number. `None` means "not supplied".
fn to_number(field: &'static str, value: Option<Numeric>) -> Result<Option<Number>, Violation> {
    match value {
        None => Ok(None),
        Some(Numeric::Int(n)) => Ok(Some(Number::Int(n))),
        Some(Numeric::Float(f)) => Ok(Some(Number::Float(f))),
        Some(Numeric::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else if let Ok(n) = s.parse::<i64>() {
                Ok(Some(Number::Int(n)))
            } else if let Ok(f) = s.parse::<f64>() {
                Ok(Some(Number::Float(f)))
            } else {
                Err(Violation::NotANumber {
                    field,
                    value: s.to_string(),
                })
            }
        }
    }
}

fn parse_count(field: &'static str, value: Option<Numeric>) -> Result<u64, Violation> {
    let out_of_range = Violation::CountOutOfRange { field };

    match to_number(field, value)? {
        None => Ok(0),
        Some(Number::Int(n)) => u64::try_from(n).map_err(|_| out_of_range),
        Some(Number::Float(f)) => {
            if !f.is_finite() {
                Err(Violation::NotANumber {
                    field,
                    value: f.to_string(),
                })
            } else if f.fract() != 0.0 {
                Err(Violation::NotAnInteger { field })
            } else if f < 0.0 || f >= MAX_COUNT as f64 {
                Err(out_of_range)
            } else {
                Ok(f as u64)
            }
        }
    }
}

fn parse_rate(field: &'static str, value: Option<Numeric>) -> Result<f64, Violation> {
    let rate = match to_number(field, value)? {
        None => return Ok(0.0),
        Some(Number::Int(n)) => n as f64,
        Some(Number::Float(f)) => f,
    };

    if !rate.is_finite() {
        return Err(Violation::NotANumber {
            field,
            value: rate.to_string(),
        });
    }
    if !(0.0..=100.0).contains(&rate) {
        return Err(Violation::OutOfRange {
            field,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(rate)
}
