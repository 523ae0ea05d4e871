//! Derived-data stages and the memoizing pipeline that runs them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;

use super::key::content_key;
use super::scene::Scene;
use crate::arcs::{route_arcs, ArcGroup, ArcStyle, RandomArcConfig};
use crate::extrusion::{extrude_countries, BorderConfig, CountryStyle, ExtrusionContext};
use crate::lattice::{sample_strata, ShapeCache};
use crate::texture::{SurfaceLayerConfig, TextureCache};

/// Unique identifier for scene stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Sphere color map.
    Texture,
    /// Lattice points for every stratum.
    Lattice,
    /// Connection arcs.
    Arcs,
    /// Extruded country descriptors.
    Extrusion,
}

impl StageId {
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Texture => "texture",
            StageId::Lattice => "lattice",
            StageId::Arcs => "arcs",
            StageId::Extrusion => "extrusion",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// What the pipeline did with a stage on one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Inputs changed and the stage ran.
    Executed,
    /// Inputs match the last execution; the previous product stands.
    Unchanged,
    /// Inputs are still loading.
    Waiting,
}

/// One derived product of the scene.
///
/// A stage declares a content key over everything it reads; the
/// pipeline re-executes it only when that key changes.
pub trait SceneStage: Send + Sync {
    fn id(&self) -> StageId;

    fn name(&self) -> &str;

    /// Stages that must appear earlier in the pipeline.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Key over the stage inputs, or `None` while an input is still pending.
    fn input_key(&self, scene: &Scene) -> Option<u64>;

    /// Recomputes the product and stores it in the scene.
    fn execute(&self, scene: &mut Scene) -> Result<(), PipelineError>;
}

/// Runs scene stages in order, skipping those whose inputs are unchanged.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn SceneStage>>,
    last_keys: HashMap<StageId, u64>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture, lattice, arcs and extrusion stages.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(TextureStage::default())
            .add_stage(LatticeStage::default())
            .add_stage(ArcStage)
            .add_stage(ExtrusionStage);
        pipeline
    }

    pub fn add_stage<S: SceneStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Forgets every memoized key so the next run executes all ready stages.
    pub fn invalidate(&mut self) {
        self.last_keys.clear();
    }

    /// Brings every ready product up to date.
    pub fn run(&mut self, scene: &mut Scene) -> Result<Vec<(StageId, StageOutcome)>, PipelineError> {
        self.run_with_callbacks(scene, |_, _, _| {}, |_, _, _| {})
    }

    /// Like [`Pipeline::run`], reporting each stage that actually executes.
    pub fn run_with_callbacks<F1, F2>(
        &mut self,
        scene: &mut Scene,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<Vec<(StageId, StageOutcome)>, PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut visited: Vec<StageId> = Vec::new();
        let mut outcomes = Vec::with_capacity(total);

        for (i, stage) in self.stages.iter().enumerate() {
            for dep in stage.dependencies() {
                if !visited.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }
            visited.push(stage.id());

            let Some(key) = stage.input_key(scene) else {
                tracing::debug!("Stage '{}' waiting for inputs", stage.name());
                outcomes.push((stage.id(), StageOutcome::Waiting));
                continue;
            };
            if self.last_keys.get(&stage.id()) == Some(&key) {
                outcomes.push((stage.id(), StageOutcome::Unchanged));
                continue;
            }

            on_stage_start(stage.name(), i, total);
            stage.execute(scene)?;
            self.last_keys.insert(stage.id(), key);
            on_stage_complete(stage.name(), i, total);
            outcomes.push((stage.id(), StageOutcome::Executed));
        }

        Ok(outcomes)
    }
}

/// Composites the sphere texture once countries and imagery have settled.
#[derive(Default)]
pub struct TextureStage {
    cache: Mutex<TextureCache>,
}

impl SceneStage for TextureStage {
    fn id(&self) -> StageId {
        StageId::Texture
    }

    fn name(&self) -> &str {
        "Texture Compositing"
    }

    fn input_key(&self, scene: &Scene) -> Option<u64> {
        let countries = scene.countries.ready()?;
        let texture = &scene.config.texture;
        if texture.satellite.show && scene.satellite.is_pending() {
            return None;
        }
        Some(TextureCache::key(texture, countries, scene.satellite.ready()))
    }

    fn execute(&self, scene: &mut Scene) -> Result<(), PipelineError> {
        let countries = scene
            .countries
            .ready()
            .ok_or_else(|| PipelineError::StageFailed(self.name().to_string(), "countries not loaded".to_string()))?;
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let texture = cache.get_or_compose(&scene.config.texture, countries, scene.satellite.ready());
        scene.texture = Some(texture);
        Ok(())
    }
}

/// Samples every stratum, building the cell meshes it references.
#[derive(Default)]
pub struct LatticeStage {
    shapes: Arc<ShapeCache>,
}

impl LatticeStage {
    pub fn with_shapes(shapes: Arc<ShapeCache>) -> Self {
        Self { shapes }
    }

    fn needs_land(scene: &Scene) -> bool {
        scene
            .config
            .strata
            .iter()
            .any(|s| s.is_sampled() && !s.show_sea)
    }
}

impl SceneStage for LatticeStage {
    fn id(&self) -> StageId {
        StageId::Lattice
    }

    fn name(&self) -> &str {
        "Lattice Sampling"
    }

    fn input_key(&self, scene: &Scene) -> Option<u64> {
        if Self::needs_land(scene) && scene.countries.is_pending() {
            return None;
        }
        let strata: Vec<_> = scene.config.strata.iter().map(|s| s.sanitized()).collect();
        Some(content_key(&strata, &[scene.countries_revision()]))
    }

    fn execute(&self, scene: &mut Scene) -> Result<(), PipelineError> {
        let countries = scene.countries.ready().map(Arc::clone);
        let layers = sample_strata(&scene.config.strata, countries.as_deref());
        let mut meshes = HashMap::new();
        for point in layers.iter().flat_map(|l| l.points.iter()) {
            meshes
                .entry(point.shape)
                .or_insert_with(|| self.shapes.get_or_build(&point.shape));
        }
        tracing::info!(
            "Sampled {} lattice points across {} strata",
            layers.iter().map(|l| l.points.len()).sum::<usize>(),
            layers.len()
        );
        scene.lattice = layers;
        scene.cell_meshes = meshes;
        Ok(())
    }
}

#[derive(Serialize)]
struct ArcInputs<'a> {
    random: &'a RandomArcConfig,
    groups: &'a [ArcGroup],
    style: &'a ArcStyle,
}

/// Routes random and explicit arcs between country hubs.
pub struct ArcStage;

impl SceneStage for ArcStage {
    fn id(&self) -> StageId {
        StageId::Arcs
    }

    fn name(&self) -> &str {
        "Arc Routing"
    }

    fn input_key(&self, scene: &Scene) -> Option<u64> {
        if scene.countries.is_pending() {
            return None;
        }
        let c = &scene.config;
        let inputs = ArcInputs {
            random: &c.random_arcs,
            groups: &c.arc_groups,
            style: &c.arc_style,
        };
        Some(content_key(&inputs, &[scene.countries_revision()]))
    }

    fn execute(&self, scene: &mut Scene) -> Result<(), PipelineError> {
        let countries = scene.settled_countries().unwrap_or_default();
        let c = &scene.config;
        let layer = route_arcs(&c.random_arcs, &c.arc_groups, &c.arc_style, &countries);
        tracing::info!("Routed {} arcs", layer.segments.len());
        scene.arcs = Some(layer);
        Ok(())
    }
}

#[derive(Serialize)]
struct ExtrusionInputs<'a> {
    styles: &'a [CountryStyle],
    land: &'a SurfaceLayerConfig,
    border: &'a BorderConfig,
    land_altitude: f64,
}

/// Resolves extruded country colors and heights.
pub struct ExtrusionStage;

impl SceneStage for ExtrusionStage {
    fn id(&self) -> StageId {
        StageId::Extrusion
    }

    fn name(&self) -> &str {
        "Country Extrusion"
    }

    fn input_key(&self, scene: &Scene) -> Option<u64> {
        if scene.countries.is_pending() {
            return None;
        }
        let c = &scene.config;
        let inputs = ExtrusionInputs {
            styles: &c.countries,
            land: &c.texture.land,
            border: &c.border,
            land_altitude: c.land_altitude,
        };
        Some(content_key(&inputs, &[scene.countries_revision()]))
    }

    fn execute(&self, scene: &mut Scene) -> Result<(), PipelineError> {
        let countries = scene.settled_countries().unwrap_or_default();
        let c = &scene.config;
        scene.extrusions = extrude_countries(
            &countries,
            &c.countries,
            ExtrusionContext {
                land: &c.texture.land,
                border: &c.border,
                land_altitude: c.land_altitude,
            },
        );
        Ok(())
    }
}
