use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// The most recently fetched profile document.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileSnapshot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub custom_bio: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: Option<ProfileFields>,
    #[serde(default, rename = "seeds", deserialize_with = "lenient_seq")]
    pub items: Vec<Item>,
    #[serde(default, rename = "contexts", deserialize_with = "lenient_seq")]
    pub expertise: Vec<ExpertiseEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ProfileSnapshot {
    pub fn current_state(&self) -> Option<&CurrentState> {
        self.fields.as_ref().and_then(|f| f.current_state.as_ref())
    }

    pub fn about(&self) -> Option<&About> {
        self.fields.as_ref().and_then(|f| f.about.as_ref())
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.fields.as_ref().and_then(|f| f.identity.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileFields {
    #[serde(default, deserialize_with = "lenient")]
    pub current_state: Option<CurrentState>,
    #[serde(default, deserialize_with = "lenient")]
    pub about: Option<About>,
    #[serde(default, deserialize_with = "lenient")]
    pub identity: Option<Identity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CurrentState {
    #[serde(default, deserialize_with = "lenient")]
    pub focus: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub energy: Option<Energy>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub availability: Option<String>,
}

/// Energy is published either as plain text or as a display string with
/// the time it was last set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Energy {
    Simple(String),
    Detailed {
        display: String,
        #[serde(default, deserialize_with = "lenient")]
        updated_at: Option<DateTime<Utc>>,
    },
}

impl Energy {
    pub fn display(&self) -> &str {
        match self {
            Energy::Simple(text) => text,
            Energy::Detailed { display, .. } => display,
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Energy::Simple(_) => None,
            Energy::Detailed { updated_at, .. } => *updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct About {
    #[serde(default, deserialize_with = "lenient")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub philosophy: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_work: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub expertise_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Identity {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub philosophy: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
    #[default]
    Unknown,
}

impl Priority {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "urgent" => Priority::Urgent,
            "high" => Priority::High,
            "normal" => Priority::Normal,
            "low" => Priority::Low,
            _ => Priority::Unknown,
        }
    }

    /// Sort rank; unknown priorities sort with `low`.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Normal => 2,
            Priority::Low | Priority::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
            Priority::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(label)) => Priority::from_label(&label),
            _ => Priority::Unknown,
        })
    }
}

/// A prioritized active-work entry ("seed" on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
}

impl Item {
    pub fn label(&self) -> &str {
        non_empty(self.text.as_deref())
            .or_else(|| non_empty(self.title.as_deref()))
            .unwrap_or("Untitled")
    }
}

/// A named knowledge block ("context" on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExpertiseEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Decode a field, treating a malformed value as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Decode a sequence, dropping entries that do not match the element shape.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Decode a string field; null or a non-string value becomes empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, String>(deserializer)?.unwrap_or_default())
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Vec<String> = lenient_seq(deserializer)?;
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    Ok(unique)
}
