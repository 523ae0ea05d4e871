//! Top-level scene configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::LoadError;
use crate::arcs::{ArcGroup, ArcStyle, RandomArcConfig};
use crate::effects::PostProcessingConfig;
use crate::extrusion::{BorderConfig, CountryStyle, DEFAULT_LAND_ALTITUDE};
use crate::geometry::{MergeRule, OrbitView};
use crate::lattice::LatticeStratum;
use crate::texture::TextureConfig;

/// Everything needed to derive a globe scene from loaded data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub texture: TextureConfig,
    pub strata: Vec<LatticeStratum>,
    pub countries: Vec<CountryStyle>,
    pub border: BorderConfig,
    pub land_altitude: f64,
    pub random_arcs: RandomArcConfig,
    pub arc_groups: Vec<ArcGroup>,
    pub arc_style: ArcStyle,
    pub merge_rules: Vec<MergeRule>,
    pub post_processing: PostProcessingConfig,
    pub view: OrbitView,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture: TextureConfig::default(),
            strata: Vec::new(),
            countries: vec![CountryStyle::default()],
            border: BorderConfig::default(),
            land_altitude: DEFAULT_LAND_ALTITUDE,
            random_arcs: RandomArcConfig::default(),
            arc_groups: Vec::new(),
            arc_style: ArcStyle::default(),
            merge_rules: MergeRule::defaults(),
            post_processing: PostProcessingConfig::default(),
            view: OrbitView::default(),
        }
    }
}

impl SceneConfig {
    /// A lattice-heavy look: land-only hex grid and a sea dot matrix.
    pub fn lattice_showcase() -> Self {
        let mut sea = LatticeStratum::dots("sea", 4000);
        sea.show_sea = true;
        sea.opacity = 0.3;
        Self {
            strata: vec![LatticeStratum::hex_grid("land", 6000), sea],
            ..Default::default()
        }
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reads a scene config file.
pub fn load_scene_config(path: &Path) -> Result<SceneConfig, LoadError> {
    let text = fs::read_to_string(path)?;
    let config = SceneConfig::from_json(&text)?;
    tracing::info!("Loaded scene config from {}", path.display());
    Ok(config)
}
