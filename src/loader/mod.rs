//! Data loading: country geometry, satellite imagery and scene configs.

mod assets;
mod config;
mod error;
mod progress;

pub use assets::{load_countries, load_satellite};
pub use config::{load_scene_config, SceneConfig};
pub use error::LoadError;
pub use progress::{combined_progress, read_with_progress, LoadPhase};
