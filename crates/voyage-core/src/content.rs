//! Destination content records as supplied by the content pipeline.
//!
//! The core treats these as opaque display data keyed by slug. The only thing
//! it relies on is that a record's slug resolves in the [`CityRegistry`]; when
//! it does not, the record still displays but selecting it is a no-op.

use crate::city::{CityRegistry, CitySlug};
use crate::error::ContentError;
use crate::geo::Coordinates;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Metric {
    /// "$3.2M", "40%", "12" and so on.
    pub fn display(&self) -> String {
        let value = if self.value.fract() == 0.0 && self.value.abs() < 1e15 {
            format!("{}", self.value as i64)
        } else {
            format!("{}", self.value)
        };
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or(""),
            value,
            self.suffix.as_deref().unwrap_or("")
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Video,
    Image,
    Link,
    Document,
    Demo,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Github,
    Demo,
    Press,
    External,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LinkKind>,
}

/// One work-history stop on the tour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationContent {
    pub slug: String,
    pub city: String,
    pub country: String,
    pub headline: String,
    pub role: String,
    pub timeframe: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soundtrack_playlist_id: Option<String>,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub stack: Vec<String>,
    pub overview: String,
    #[serde(default)]
    pub impact: Vec<String>,
    #[serde(default)]
    pub build_notes: Vec<String>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl DestinationContent {
    pub fn url(&self) -> String {
        format!("/destinations/{}", self.slug)
    }

    /// Registry slug for this record, if the registry knows the city.
    pub fn city_slug(&self, registry: &CityRegistry) -> Option<CitySlug> {
        registry.lookup(&self.slug).map(|r| r.slug())
    }

    pub fn primary_link(&self) -> Option<&Link> {
        self.links.first()
    }
}

/// Destination records ordered by the tour sequence.
#[derive(Clone, Debug, Default)]
pub struct ContentLibrary {
    records: Vec<DestinationContent>,
    index: FnvHashMap<String, usize>,
}

impl ContentLibrary {
    /// Parse a JSON array of records. Records whose slug the registry does not
    /// know sort after the known ones, in source order.
    pub fn from_json(json: &str, registry: &CityRegistry) -> Result<Self, ContentError> {
        let records: Vec<DestinationContent> = serde_json::from_str(json)?;
        Self::from_records(records, registry)
    }

    pub fn from_records(
        mut records: Vec<DestinationContent>,
        registry: &CityRegistry,
    ) -> Result<Self, ContentError> {
        records.sort_by_key(|d| {
            d.slug
                .parse::<CitySlug>()
                .ok()
                .and_then(|s| registry.tour_index(s))
                .unwrap_or(usize::MAX)
        });
        let mut index = FnvHashMap::default();
        for (i, d) in records.iter().enumerate() {
            if index.insert(d.slug.clone(), i).is_some() {
                return Err(ContentError::DuplicateSlug(d.slug.clone()));
            }
            if d.city_slug(registry).is_none() {
                log::warn!(
                    "[content] '{}' has no globe pin; selecting it will do nothing",
                    d.slug
                );
            }
        }
        Ok(Self { records, index })
    }

    pub fn get(&self, slug: &str) -> Option<&DestinationContent> {
        self.index.get(slug).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestinationContent> {
        self.records.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
