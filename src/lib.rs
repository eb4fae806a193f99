pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    engine::SpiralEngine,
    pipeline::GridPipeline,
    spiral::{flatten, flatten_rect, spiral_position, SpiralMap},
};
pub use domain::model::{Grid, LoadOutcome, Shape, ShapePolicy};
pub use utils::error::{Result, SpiralError};
