//! Globecraft CLI - globe scene builder.
//!
//! Composites sphere textures, samples lattice strata, routes arcs and
//! post-processes captured frames from a JSON scene config.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use globecraft::effects::{EffectsCompositor, PostProcessingConfig};
use globecraft::export::{spawn_export, write_json, write_png, ExportOptions, PngOptions};
use globecraft::loader::{load_countries, load_satellite, load_scene_config, SceneConfig};
use globecraft::pipeline::{JobSlot, LoadState, Pipeline, Scene};

/// Procedural globe scene builder.
#[derive(Parser)]
#[command(name = "globecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite the equirectangular sphere texture.
    Texture {
        /// Scene config JSON; defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Country geometry (GeoJSON FeatureCollection).
        #[arg(long)]
        countries: PathBuf,

        /// Equirectangular satellite image.
        #[arg(long)]
        satellite: Option<PathBuf>,

        /// Override the texture width (height follows at 2:1).
        #[arg(long)]
        width: Option<u32>,

        /// Output PNG path.
        #[arg(short, long, default_value = "./output/texture.png")]
        output: PathBuf,

        /// PNG compression level.
        #[arg(long, default_value = "default")]
        compression: Compression,
    },

    /// Sample lattice strata and write the points as JSON.
    Lattice {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Country geometry; required for land-only strata.
        #[arg(long)]
        countries: Option<PathBuf>,

        /// Use the built-in lattice showcase strata.
        #[arg(long)]
        showcase: bool,

        #[arg(short, long, default_value = "./output/lattice.json")]
        output: PathBuf,
    },

    /// Route random and explicit arcs and write them as JSON.
    Arcs {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        countries: PathBuf,

        #[arg(short, long, default_value = "./output/arcs.json")]
        output: PathBuf,
    },

    /// Resolve extruded country colors and heights as JSON.
    Extrude {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        countries: PathBuf,

        #[arg(short, long, default_value = "./output/countries.json")]
        output: PathBuf,
    },

    /// Apply post-processing to a captured frame.
    Composite {
        /// Captured frame (any common image format).
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use the cinematic effect preset instead of the config's effects.
        #[arg(long)]
        cinematic: bool,

        /// Integer upscale before effects (1-4).
        #[arg(long, default_value = "1")]
        supersample: u32,

        /// Device pixel ratio of the captured frame.
        #[arg(long, default_value = "2.0")]
        pixel_ratio: f32,

        #[arg(short, long, default_value = "./output/still.png")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Compression {
    Fast,
    Default,
    Best,
}

impl Compression {
    fn options(self) -> PngOptions {
        match self {
            Compression::Fast => PngOptions::fast(),
            Compression::Default => PngOptions::default(),
            Compression::Best => PngOptions::best(),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Texture {
            config,
            countries,
            satellite,
            width,
            output,
            compression,
        } => {
            let mut config = scene_config(config.as_deref());
            if let Some(width) = width {
                config.texture.width = width;
                config.texture.height = (width / 2).max(1);
            }
            if satellite.is_none() {
                config.texture.satellite.show = false;
            }
            let scene = build_scene(config, Some(&countries), satellite.as_deref());
            let Some(texture) = scene.texture else {
                fail("No texture was produced; country geometry did not load");
            };
            if let Err(e) = write_png(&texture, &output, &compression.options()) {
                fail(&format!("Error exporting texture: {}", e));
            }
            println!("  Exported {}x{} texture: {}", texture.width(), texture.height(), output.display());
        }

        Commands::Lattice {
            config,
            countries,
            showcase,
            output,
        } => {
            let config = if showcase {
                SceneConfig::lattice_showcase()
            } else {
                scene_config(config.as_deref())
            };
            let scene = build_scene(config, countries.as_deref(), None);
            let total: usize = scene.lattice.iter().map(|l| l.points.len()).sum();
            for layer in &scene.lattice {
                println!("  Stratum '{}': {} points", layer.stratum_id, layer.points.len());
            }
            if let Err(e) = write_json(&scene.lattice, &output) {
                fail(&format!("Error writing lattice: {}", e));
            }
            println!("  Exported {} lattice points: {}", total, output.display());
        }

        Commands::Arcs {
            config,
            countries,
            output,
        } => {
            let scene = build_scene(scene_config(config.as_deref()), Some(&countries), None);
            let Some(arcs) = scene.arcs else {
                fail("No arcs were produced");
            };
            if let Err(e) = write_json(&arcs, &output) {
                fail(&format!("Error writing arcs: {}", e));
            }
            println!("  Exported {} arcs: {}", arcs.segments.len(), output.display());
        }

        Commands::Extrude {
            config,
            countries,
            output,
        } => {
            let scene = build_scene(scene_config(config.as_deref()), Some(&countries), None);
            if let Err(e) = write_json(&scene.extrusions, &output) {
                fail(&format!("Error writing countries: {}", e));
            }
            println!("  Exported {} extruded countries: {}", scene.extrusions.len(), output.display());
        }

        Commands::Composite {
            input,
            config,
            cinematic,
            supersample,
            pixel_ratio,
            output,
        } => {
            let config = scene_config(config.as_deref());
            let effects = if cinematic {
                PostProcessingConfig::cinematic()
            } else {
                config.post_processing.clone()
            };
            let frame = match image::open(&input) {
                Ok(img) => img.to_rgba8(),
                Err(e) => fail(&format!("Error reading frame {}: {}", input.display(), e)),
            };
            println!("Frame: {}x{}", frame.width(), frame.height());
            let active = EffectsCompositor::new().active_names(&effects);
            println!("Effects: {}", if active.is_empty() { "none".to_string() } else { active.join(", ") });

            let start = Instant::now();
            let options = ExportOptions {
                pixel_ratio,
                supersample,
            };
            let slot = Arc::new(JobSlot::new());
            let ticket = spawn_export(&slot, frame, effects, options, Some(config.view));
            let Some(still) = slot.wait(ticket) else {
                fail("Post-processing was superseded");
            };
            println!("Post-processing completed in {:.2?}", start.elapsed());

            if let Err(e) = write_png(&still, &output, &PngOptions::default()) {
                fail(&format!("Error exporting still: {}", e));
            }
            println!("  Exported {}x{} still: {}", still.width(), still.height(), output.display());
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn scene_config(path: Option<&Path>) -> SceneConfig {
    match path {
        Some(path) => load_scene_config(path).unwrap_or_else(|e| fail(&e.to_string())),
        None => SceneConfig::default(),
    }
}

/// Loads the assets into a scene and runs every pipeline stage once.
///
/// Load failures are reported and the scene degrades instead of aborting.
fn build_scene(config: SceneConfig, countries: Option<&Path>, satellite: Option<&Path>) -> Scene {
    let mut scene = Scene::new(config);
    let start = Instant::now();

    if let Some(path) = countries {
        scene.countries = match load_countries(path, &scene.config.merge_rules, |p| print_progress(p)) {
            Ok(set) => {
                println!();
                println!("Countries: {} loaded", set.len());
                LoadState::Ready(Arc::new(set))
            }
            Err(e) => {
                eprintln!("Warning: could not load countries: {}", e);
                LoadState::Failed(e.to_string())
            }
        };
    } else {
        scene.countries = LoadState::Failed("no country file given".to_string());
    }

    scene.satellite = match satellite {
        Some(path) => match load_satellite(path, |p| print_progress(p)) {
            Ok(image) => {
                println!();
                LoadState::Ready(image)
            }
            Err(e) => {
                eprintln!("Warning: could not load satellite image: {}", e);
                LoadState::Failed(e.to_string())
            }
        },
        None => LoadState::Failed("no satellite image given".to_string()),
    };

    println!("Running scene pipeline...");
    let mut pipeline = Pipeline::standard();
    let result = pipeline.run_with_callbacks(
        &mut scene,
        |name, i, total| println!("  [{}/{}] Starting: {}", i + 1, total, name),
        |name, i, total| println!("  [{}/{}] Completed: {}", i + 1, total, name),
    );
    if let Err(e) = result {
        fail(&format!("Error during scene build: {}", e));
    }
    println!("Scene built in {:.2?}", start.elapsed());
    scene
}

fn print_progress(percent: f32) {
    print!("\r  Loading... {:5.1}%", percent);
    std::io::stdout().flush().ok();
}
