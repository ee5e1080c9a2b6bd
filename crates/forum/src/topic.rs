use core::str::FromStr;

use serde::{Deserialize, Serialize};

use campusboard_core::{DomainError, ValueObject};

/// Category a post belongs to.
///
/// Serialized and parsed by its display label (e.g. `"Health and Wellness"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Topic {
    /// Preselected in the create-post form.
    #[default]
    #[serde(rename = "Academic Resources")]
    AcademicResources,
    #[serde(rename = "Career Services")]
    CareerServices,
    Campus,
    Culture,
    #[serde(rename = "Local Community Resources")]
    LocalCommunityResources,
    Social,
    Sports,
    #[serde(rename = "Health and Wellness")]
    HealthAndWellness,
    Technology,
    Travel,
    Alumni,
}

impl Topic {
    /// Every storable topic, in menu order.
    pub const ALL: [Topic; 11] = [
        Topic::AcademicResources,
        Topic::CareerServices,
        Topic::Campus,
        Topic::Culture,
        Topic::LocalCommunityResources,
        Topic::Social,
        Topic::Sports,
        Topic::HealthAndWellness,
        Topic::Technology,
        Topic::Travel,
        Topic::Alumni,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::AcademicResources => "Academic Resources",
            Topic::CareerServices => "Career Services",
            Topic::Campus => "Campus",
            Topic::Culture => "Culture",
            Topic::LocalCommunityResources => "Local Community Resources",
            Topic::Social => "Social",
            Topic::Sports => "Sports",
            Topic::HealthAndWellness => "Health and Wellness",
            Topic::Technology => "Technology",
            Topic::Travel => "Travel",
            Topic::Alumni => "Alumni",
        }
    }
}

impl ValueObject for Topic {}

impl core::fmt::Display for Topic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == TopicFilter::ALL_LABEL {
            return Err(DomainError::validation(
                "'All' is a filter, not a topic a post can belong to",
            ));
        }
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown topic '{s}'")))
    }
}

/// Topic selection for listing posts. `All` is filter-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TopicFilter {
    #[default]
    All,
    Only(Topic),
}

impl TopicFilter {
    pub const ALL_LABEL: &'static str = "All";

    /// The 12 filter entries: `All` followed by every topic.
    pub fn options() -> impl Iterator<Item = TopicFilter> {
        core::iter::once(TopicFilter::All).chain(Topic::ALL.into_iter().map(TopicFilter::Only))
    }

    pub fn matches(&self, topic: Topic) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Only(t) => *t == topic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicFilter::All => Self::ALL_LABEL,
            TopicFilter::Only(t) => t.as_str(),
        }
    }
}

impl From<Topic> for TopicFilter {
    fn from(topic: Topic) -> Self {
        TopicFilter::Only(topic)
    }
}

impl core::fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TopicFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ALL_LABEL {
            Ok(TopicFilter::All)
        } else {
            s.parse().map(TopicFilter::Only)
        }
    }
}

impl TryFrom<String> for TopicFilter {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TopicFilter> for String {
    fn from(value: TopicFilter) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_not_a_storable_topic() {
        let err = "All".parse::<Topic>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!("All".parse::<TopicFilter>().unwrap(), TopicFilter::All);
    }

    #[test]
    fn labels_parse_exactly() {
        assert_eq!(
            "Health and Wellness".parse::<Topic>().unwrap(),
            Topic::HealthAndWellness
        );
        assert!("health and wellness".parse::<Topic>().is_err());
        assert!("HealthAndWellness".parse::<Topic>().is_err());
    }

    #[test]
    fn twelve_filter_options_starting_with_all() {
        let options: Vec<_> = TopicFilter::options().map(|f| f.to_string()).collect();
        assert_eq!(options.len(), 12);
        assert_eq!(options[0], "All");
        assert_eq!(options[11], "Alumni");
    }

    #[test]
    fn serde_uses_labels() {
        assert_eq!(
            serde_json::to_string(&Topic::LocalCommunityResources).unwrap(),
            "\"Local Community Resources\""
        );
        assert_eq!(
            serde_json::from_str::<TopicFilter>("\"Sports\"").unwrap(),
            TopicFilter::Only(Topic::Sports)
        );
        assert!(serde_json::from_str::<Topic>("\"All\"").is_err());
    }

    #[test]
    fn filter_matching() {
        assert!(TopicFilter::All.matches(Topic::Travel));
        assert!(TopicFilter::Only(Topic::Travel).matches(Topic::Travel));
        assert!(!TopicFilter::Only(Topic::Travel).matches(Topic::Campus));
    }
}
