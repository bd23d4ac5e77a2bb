//! Wire types for the catalogue API.
//!
//! One `PageEnvelope` per requested page; concatenating `results` for pages
//! `1..=pages` reconstructs the full collection in stable order.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::filter::Facets;

/// A catalogue resource served by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Characters,
    Episodes,
    Locations,
}

impl Resource {
    /// Endpoint path segment under the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Characters => "characters",
            Resource::Episodes => "episodes",
            Resource::Locations => "locations",
        }
    }

    /// User-facing noun used in fetch error messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Resource::Characters => "personajes",
            Resource::Episodes => "episodios",
            Resource::Locations => "localizaciones",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "characters" => Ok(Resource::Characters),
            "episodes" => Ok(Resource::Episodes),
            "locations" => Ok(Resource::Locations),
            other => Err(format!(
                "unknown resource {other:?} (expected characters, episodes or locations)"
            )),
        }
    }
}

/// One server response unit: a page of items plus pagination metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total item count across all pages.
    pub count: u64,
    /// Total page count, 1-indexed.
    pub pages: u32,
}

/// Ages arrive as a JSON number, a numeric string, or null. The raw text is
/// kept; the filter engine decides whether it parses.
fn de_number_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected number or string, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "de_number_or_string")]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub portrait_path: Option<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub episode_number: Option<i64>,
    #[serde(default)]
    pub air_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub synopsis: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default, rename = "use")]
    pub usage: Option<String>,
}

impl Facets for Character {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn free_text(&self) -> Option<&str> {
        self.occupation.as_deref()
    }

    fn category(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "gender" => self.gender.as_deref().map(Cow::Borrowed),
            "status" => self.status.as_deref().map(Cow::Borrowed),
            "occupation" => self.occupation.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }

    fn numeric(&self) -> Option<&str> {
        self.age.as_deref()
    }
}

impl Facets for Episode {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn category(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "season" => self.season.map(|s| Cow::Owned(s.to_string())),
            _ => None,
        }
    }
}

impl Facets for Location {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn category(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "town" => self.town.as_deref().map(Cow::Borrowed),
            "use" => self.usage.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl Character {
    /// One-line listing used by the CLI.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(status) = &self.status {
            parts.push(status.clone());
        }
        if let Some(gender) = &self.gender {
            parts.push(gender.clone());
        }
        if let Some(age) = &self.age {
            parts.push(format!("age {age}"));
        }
        if let Some(occupation) = &self.occupation {
            parts.push(occupation.clone());
        }
        if parts.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, parts.join(", "))
        }
    }
}

impl Episode {
    pub fn summary(&self) -> String {
        let code = match (self.season, self.episode_number) {
            (Some(s), Some(e)) => format!("S{s:02}E{e:02} "),
            (Some(s), None) => format!("S{s:02} "),
            _ => String::new(),
        };
        match &self.air_date {
            Some(date) => format!("{code}{} ({date})", self.name),
            None => format!("{code}{}", self.name),
        }
    }
}

impl Location {
    pub fn summary(&self) -> String {
        match (&self.town, &self.usage) {
            (Some(town), Some(usage)) => format!("{} - {town}, {usage}", self.name),
            (Some(town), None) => format!("{} - {town}", self.name),
            (None, Some(usage)) => format!("{} - {usage}", self.name),
            (None, None) => self.name.clone(),
        }
    }
}
