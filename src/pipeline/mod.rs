//! Derived-data pipeline.
//!
//! Texture, lattice, arc and extrusion products are recomputed only when
//! the content key over their inputs changes. Long passes can run in the
//! background through a [`JobSlot`], which keeps only the newest result.

mod jobs;
mod key;
mod scene;
mod stage;

pub use jobs::JobSlot;
pub use key::content_key;
pub use scene::{LoadState, Scene};
pub use stage::{
    ArcStage, ExtrusionStage, LatticeStage, Pipeline, PipelineError, SceneStage, StageId, StageOutcome, TextureStage,
};
