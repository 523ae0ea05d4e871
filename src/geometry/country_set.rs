//! The loaded set of country outlines plus its bounding-box index.
//!
//! Built once from GeoJSON, then shared read-only by the texture
//! compositor, the lattice sampler and the arc router.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use geojson::{Feature, GeoJson, Value};
use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::polygon::{CountryPolygon, Ring};

/// Errors raised while ingesting country geometry.
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("GeoJSON parse error: {0}")]
    Parse(#[from] geojson::Error),
    #[error("Expected a FeatureCollection or Feature, found a bare geometry")]
    BareGeometry,
}

/// Folds one territory into another at load time.
///
/// `merge_in` rings are appended to `primary` and the `merge_in`
/// feature is removed from the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    pub primary: String,
    pub merge_in: String,
}

impl MergeRule {
    pub fn new(primary: impl Into<String>, merge_in: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            merge_in: merge_in.into(),
        }
    }

    /// The stock merge table.
    pub fn defaults() -> Vec<MergeRule> {
        vec![MergeRule::new("CHN", "TWN")]
    }
}

/// Property keys consulted, in order, for a feature's country code.
const CODE_PROPERTIES: [&str; 3] = ["ISO_A3", "iso_a3", "ADM0_A3"];

/// R-tree entry pointing back into the country list.
#[derive(Debug, Clone)]
struct IndexedBounds {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Immutable country collection with a bounding-box R-tree.
#[derive(Debug, Clone)]
pub struct CountrySet {
    countries: Vec<CountryPolygon>,
    index: RTree<IndexedBounds>,
    revision: u64,
}

impl Default for CountrySet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CountrySet {
    /// Indexes the given countries, keeping their order.
    pub fn new(countries: Vec<CountryPolygon>) -> Self {
        let entries = countries
            .iter()
            .enumerate()
            .map(|(index, c)| {
                let b = c.bounds();
                IndexedBounds {
                    index,
                    envelope: AABB::from_corners([b.min_lng, b.min_lat], [b.max_lng, b.max_lat]),
                }
            })
            .collect();
        let revision = content_revision(&countries);
        Self {
            countries,
            index: RTree::bulk_load(entries),
            revision,
        }
    }

    /// Parses a GeoJSON document and applies the merge table.
    pub fn from_geojson_str(text: &str, rules: &[MergeRule]) -> Result<Self, GeometryError> {
        let geojson: GeoJson = text.parse()?;
        Self::from_geojson(geojson, rules)
    }

    /// Converts parsed GeoJSON into a country set.
    ///
    /// Features without a usable code or polygonal geometry are skipped.
    pub fn from_geojson(geojson: GeoJson, rules: &[MergeRule]) -> Result<Self, GeometryError> {
        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => return Err(GeometryError::BareGeometry),
        };

        let total = features.len();
        let mut countries: Vec<CountryPolygon> = features.iter().filter_map(country_from_feature).collect();
        if countries.len() < total {
            tracing::warn!("Skipped {} of {} features with no usable country geometry", total - countries.len(), total);
        }

        apply_merge_rules(&mut countries, rules);
        tracing::info!("Loaded {} countries", countries.len());
        Ok(Self::new(countries))
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn countries(&self) -> &[CountryPolygon] {
        &self.countries
    }

    /// Content hash of codes and coordinates, stable for identical data.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, code: &str) -> Option<&CountryPolygon> {
        self.countries.iter().find(|c| c.code() == code)
    }

    /// Countries whose bounding box contains the point.
    pub fn candidates_at(&self, lng: f64, lat: f64) -> impl Iterator<Item = &CountryPolygon> + '_ {
        self.index
            .locate_in_envelope_intersecting(&AABB::from_point([lng, lat]))
            .map(move |entry| &self.countries[entry.index])
    }

    /// True if `(lng, lat)` falls inside any ring of any country.
    ///
    /// Only countries passing the bounding-box pre-filter are ray-cast.
    pub fn is_on_land(&self, lng: f64, lat: f64) -> bool {
        self.candidates_at(lng, lat).any(|c| c.contains(lng, lat))
    }
}

fn feature_code(feature: &Feature) -> Option<String> {
    CODE_PROPERTIES
        .iter()
        .filter_map(|key| feature.property(*key))
        .filter_map(|v| v.as_str())
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| match &feature.id {
            Some(geojson::feature::Id::String(s)) => Some(s.clone()),
            Some(geojson::feature::Id::Number(n)) => Some(n.to_string()),
            None => None,
        })
}

/// Keeps the outer ring of each polygon part.
fn country_from_feature(feature: &Feature) -> Option<CountryPolygon> {
    let code = feature_code(feature)?;
    let geometry = feature.geometry.as_ref()?;
    let rings: Vec<Ring> = match &geometry.value {
        Value::Polygon(parts) => parts.first().map(|r| vec![to_ring(r)]).unwrap_or_default(),
        Value::MultiPolygon(polys) => polys.iter().filter_map(|p| p.first()).map(|r| to_ring(r)).collect(),
        _ => {
            tracing::debug!("Feature {} has non-polygonal geometry", code);
            return None;
        }
    };
    CountryPolygon::new(code, rings)
}

fn to_ring(positions: &[Vec<f64>]) -> Ring {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| [p[0], p[1]])
        .collect()
}

/// Applies every rule whose two codes are both present.
pub fn apply_merge_rules(countries: &mut Vec<CountryPolygon>, rules: &[MergeRule]) {
    for rule in rules {
        let Some(src) = countries.iter().position(|c| c.code() == rule.merge_in) else {
            continue;
        };
        if !countries.iter().any(|c| c.code() == rule.primary) || rule.primary == rule.merge_in {
            continue;
        }
        let merged = countries.remove(src);
        if let Some(dst) = countries.iter_mut().find(|c| c.code() == rule.primary) {
            dst.absorb(merged);
            tracing::debug!("Merged {} into {}", rule.merge_in, rule.primary);
        }
    }
}

fn content_revision(countries: &[CountryPolygon]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for c in countries {
        c.code().hash(&mut hasher);
        for ring in c.rings() {
            ring.len().hash(&mut hasher);
            for [x, y] in ring {
                x.to_bits().hash(&mut hasher);
                y.to_bits().hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}
