use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of marketing content.
///
/// Serialized with the exact labels the form offers (e.g. `"Case Study"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Blog,
    Video,
    Podcast,
    Infographic,
    #[serde(rename = "Case Study")]
    CaseStudy,
    Whitepaper,
    #[serde(rename = "Social Media")]
    SocialMedia,
    Email,
}

/// Delivery format of the content body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Article,
    Video,
    Audio,
    Image,
    #[serde(rename = "PDF")]
    Pdf,
    Interactive,
    Text,
}

/// Where the content is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Website,
    Instagram,
    Twitter,
    LinkedIn,
    Facebook,
    YouTube,
    TikTok,
    Email,
    #[serde(rename = "Podcast Platforms")]
    PodcastPlatforms,
}

/// Marketing patterns the form suggests. Records may carry any other label.
pub const MARKETING_PATTERNS: &[&str] = &[
    "Storytelling",
    "Educational",
    "Inspirational",
    "Problem-Solution",
    "Behind-the-Scenes",
    "User-Generated",
    "Seasonal",
    "Trending Topics",
];

/// Implements the label table shared by the three closed option lists.
///
/// The first variant listed is the form default.
macro_rules! labelled {
    ($ty:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants, in form order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }

            /// Parse an exact (case-sensitive) label.
            pub fn from_label(s: &str) -> Option<Self> {
                match s {
                    $($label => Some($ty::$variant),)+
                    _ => None,
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.label()).collect()
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled!(ContentType {
    Blog => "Blog",
    Video => "Video",
    Podcast => "Podcast",
    Infographic => "Infographic",
    CaseStudy => "Case Study",
    Whitepaper => "Whitepaper",
    SocialMedia => "Social Media",
    Email => "Email",
});

labelled!(Format {
    Article => "Article",
    Video => "Video",
    Audio => "Audio",
    Image => "Image",
    Pdf => "PDF",
    Interactive => "Interactive",
    Text => "Text",
});

labelled!(Platform {
    Website => "Website",
    Instagram => "Instagram",
    Twitter => "Twitter",
    LinkedIn => "LinkedIn",
    Facebook => "Facebook",
    YouTube => "YouTube",
    TikTok => "TikTok",
    Email => "Email",
    PodcastPlatforms => "Podcast Platforms",
});

/// The option lists served to clients building a content form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub content_types: Vec<String>,
    pub formats: Vec<String>,
    pub platforms: Vec<String>,
    pub marketing_patterns: Vec<String>,
}

impl Catalog {
    pub fn current() -> Self {
        let owned = |labels: Vec<&'static str>| -> Vec<String> {
            labels.into_iter().map(String::from).collect()
        };
        Self {
            content_types: owned(ContentType::labels()),
            formats: owned(Format::labels()),
            platforms: owned(Platform::labels()),
            marketing_patterns: owned(MARKETING_PATTERNS.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde() {
        for ty in ContentType::ALL {
            let json = serde_json::to_value(ty).unwrap();
            assert_eq!(json.as_str(), Some(ty.label()));
        }
        for format in Format::ALL {
            let json = serde_json::to_value(format).unwrap();
            assert_eq!(json.as_str(), Some(format.label()));
        }
        for platform in Platform::ALL {
            let json = serde_json::to_value(platform).unwrap();
            assert_eq!(json.as_str(), Some(platform.label()));
        }
    }

    #[test]
    fn test_from_label_is_exact() {
        assert_eq!(ContentType::from_label("Case Study"), Some(ContentType::CaseStudy));
        assert_eq!(ContentType::from_label("case study"), None);
        assert_eq!(Format::from_label("PDF"), Some(Format::Pdf));
        assert_eq!(Platform::from_label("Podcast Platforms"), Some(Platform::PodcastPlatforms));
        assert_eq!(Platform::from_label("MySpace"), None);
    }

    #[test]
    fn test_defaults_are_first_options() {
        assert_eq!(ContentType::default(), ContentType::Blog);
        assert_eq!(Format::default(), Format::Article);
        assert_eq!(Platform::default(), Platform::Website);
    }

    #[test]
    fn test_catalog_serialization() {
        let json = serde_json::to_value(Catalog::current()).unwrap();
        assert_eq!(json["contentTypes"].as_array().unwrap().len(), 8);
        assert_eq!(json["formats"].as_array().unwrap().len(), 7);
        assert_eq!(json["platforms"][8], "Podcast Platforms");
        assert_eq!(json["marketingPatterns"][0], "Storytelling");
    }
}
