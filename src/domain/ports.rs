use crate::core::codec::{InputFormat, OutputFormat};
use crate::domain::model::{FlattenReport, LoadOutcome, NamedGrid, ShapePolicy};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Where a pipeline pulls a grid from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridSource {
    File {
        path: String,
        format: Option<InputFormat>,
    },
    Inline {
        name: String,
        rows: Vec<Vec<i64>>,
    },
    Json {
        name: String,
        text: String,
    },
    Demo,
}

pub trait ConfigProvider {
    fn grid_sources(&self) -> Vec<GridSource>;
    fn shape_policy(&self) -> ShapePolicy;
    fn output_path(&self) -> Option<&str>;
    fn output_format(&self) -> OutputFormat;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<NamedGrid>>;
    fn transform(&self, grids: Vec<NamedGrid>) -> Result<FlattenReport>;
    fn load(&self, report: FlattenReport) -> Result<LoadOutcome>;
}
