use crate::constants::GLOBE_RADIUS;
use crate::error::ParseError;
use crate::geo::{project_to_sphere, Coordinates};
use fnv::FnvHashMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a destination city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CitySlug {
    NewYork,
    Tokyo,
    WashingtonDc,
    LosAngeles,
    Copenhagen,
    MountainView,
}

impl CitySlug {
    pub fn as_str(self) -> &'static str {
        match self {
            CitySlug::NewYork => "new-york",
            CitySlug::Tokyo => "tokyo",
            CitySlug::WashingtonDc => "washington-dc",
            CitySlug::LosAngeles => "los-angeles",
            CitySlug::Copenhagen => "copenhagen",
            CitySlug::MountainView => "mountain-view",
        }
    }
}

impl fmt::Display for CitySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CitySlug {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CITY_TABLE
            .iter()
            .map(|(slug, ..)| *slug)
            .find(|slug| slug.as_str() == s)
            .ok_or_else(|| ParseError::new("city slug", s))
    }
}

// Tour order: the sequence a visitor is walked through in auto mode.
const CITY_TABLE: [(CitySlug, &str, f32, f32); 6] = [
    (CitySlug::NewYork, "New York", 40.7128, -74.0060),
    (CitySlug::WashingtonDc, "Washington DC", 38.9072, -77.0369),
    (CitySlug::MountainView, "Mountain View", 37.4162, -122.0758),
    (CitySlug::LosAngeles, "Los Angeles", 34.0522, -118.2437),
    (CitySlug::Tokyo, "Tokyo", 35.6762, 139.6503),
    (CitySlug::Copenhagen, "Copenhagen", 55.6761, 12.5683),
];

/// A destination pin on the globe. Immutable once the registry is built.
#[derive(Clone, Debug, PartialEq)]
pub struct CityRecord {
    slug: CitySlug,
    name: &'static str,
    coordinates: Coordinates,
    scene_position: Vec3,
}

impl CityRecord {
    #[inline]
    pub fn slug(&self) -> CitySlug {
        self.slug
    }
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
    #[inline]
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
    /// Position on the globe surface, derived from `coordinates`.
    #[inline]
    pub fn scene_position(&self) -> Vec3 {
        self.scene_position
    }
}

/// Read-only registry of every city, with positions projected at one radius.
#[derive(Clone, Debug)]
pub struct CityRegistry {
    radius: f32,
    records: Vec<CityRecord>,
    index: FnvHashMap<CitySlug, usize>,
}

impl Default for CityRegistry {
    fn default() -> Self {
        Self::new(GLOBE_RADIUS)
    }
}

impl CityRegistry {
    /// Build the registry, deriving every `scene_position` at `radius`.
    pub fn new(radius: f32) -> Self {
        let records: Vec<CityRecord> = CITY_TABLE
            .iter()
            .map(|&(slug, name, lat, lng)| {
                let coordinates = Coordinates::new(lat, lng);
                CityRecord {
                    slug,
                    name,
                    coordinates,
                    scene_position: project_to_sphere(lat, lng, radius),
                }
            })
            .collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.slug, i))
            .collect();
        Self {
            radius,
            records,
            index,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, slug: CitySlug) -> Option<&CityRecord> {
        self.index.get(&slug).map(|&i| &self.records[i])
    }

    /// Resolve a free-form slug from content or the DOM. Misses are logged
    /// and treated as "no such city".
    pub fn lookup(&self, slug: &str) -> Option<&CityRecord> {
        match slug.parse::<CitySlug>() {
            Ok(s) => self.get(s),
            Err(e) => {
                log::warn!("[city] {}", e);
                None
            }
        }
    }

    /// Records in tour order.
    pub fn iter(&self) -> impl Iterator<Item = &CityRecord> {
        self.records.iter()
    }

    pub fn first_city(&self) -> Option<CitySlug> {
        self.records.first().map(|r| r.slug)
    }

    pub fn next_city(&self, current: CitySlug) -> Option<CitySlug> {
        let i = *self.index.get(&current)?;
        self.records.get(i + 1).map(|r| r.slug)
    }

    pub fn previous_city(&self, current: CitySlug) -> Option<CitySlug> {
        let i = *self.index.get(&current)?;
        i.checked_sub(1).map(|p| self.records[p].slug)
    }

    /// Position of `slug` in the tour sequence.
    pub fn tour_index(&self, slug: CitySlug) -> Option<usize> {
        self.index.get(&slug).copied()
    }
}
