pub mod codec;
pub mod engine;
pub mod pipeline;
pub mod spiral;

pub use crate::domain::model::{FlattenReport, NamedGrid, SpiralRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
