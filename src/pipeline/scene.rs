//! Scene inputs and derived products shared by the pipeline stages.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

use crate::arcs::ArcLayer;
use crate::extrusion::ExtrudedCountry;
use crate::geometry::CountrySet;
use crate::lattice::{CellMesh, CellShapeKey, LatticeLayer};
use crate::loader::SceneConfig;
use crate::texture::SatelliteImage;

/// Load state of an external asset.
#[derive(Debug, Clone)]
pub enum LoadState<T> {
    Pending,
    Ready(T),
    /// Loading failed; dependent products degrade instead of waiting.
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Pending
    }
}

impl<T> LoadState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }
}

/// Configuration, loaded assets and everything derived from them.
#[derive(Debug, Default)]
pub struct Scene {
    pub config: SceneConfig,
    pub countries: LoadState<Arc<CountrySet>>,
    pub satellite: LoadState<SatelliteImage>,

    pub texture: Option<Arc<RgbaImage>>,
    pub lattice: Vec<LatticeLayer>,
    pub cell_meshes: HashMap<CellShapeKey, Arc<CellMesh>>,
    pub arcs: Option<ArcLayer>,
    pub extrusions: Vec<ExtrudedCountry>,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Country data once loading has settled; a failed load reads as empty.
    pub(crate) fn settled_countries(&self) -> Option<Arc<CountrySet>> {
        match &self.countries {
            LoadState::Pending => None,
            LoadState::Ready(set) => Some(Arc::clone(set)),
            LoadState::Failed(_) => Some(Arc::new(CountrySet::default())),
        }
    }

    /// Revision of the loaded country set, 0 when there is none.
    pub(crate) fn countries_revision(&self) -> u64 {
        self.countries.ready().map_or(0, |c| c.revision())
    }
}
