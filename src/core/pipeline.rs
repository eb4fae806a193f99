use crate::core::codec::{self, InputFormat};
use crate::core::spiral::SpiralMap;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{FlattenReport, Grid, LoadOutcome, NamedGrid, Shape, SpiralRecord};
use crate::domain::ports::GridSource;
use crate::utils::error::{Result, SpiralError};
use std::collections::HashMap;
use std::path::Path;

pub const DEMO_GRID_SIZE: usize = 4;

pub struct GridPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> GridPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn read_source(&self, source: &GridSource) -> Result<Vec<NamedGrid>> {
        match source {
            GridSource::File { path, format } => {
                let format = format
                    .or_else(|| InputFormat::from_path(path))
                    .ok_or_else(|| SpiralError::InvalidConfigValueError {
                        field: "input".to_string(),
                        value: path.clone(),
                        reason: "Cannot detect the grid format from the file extension"
                            .to_string(),
                    })?;
                let data = self.storage.read_file(path)?;
                let name = Path::new(path)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(path.as_str());
                tracing::debug!("Parsing {} as {:?}", path, format);
                codec::parse_grids(name, &data, format)
            }
            GridSource::Json { name, text } => {
                codec::parse_grids(name, text.as_bytes(), InputFormat::Json)
            }
            GridSource::Inline { name, rows } => {
                Ok(vec![NamedGrid::new(name.clone(), Grid::new(rows.clone()))])
            }
            GridSource::Demo => Ok(vec![NamedGrid::new(
                "demo",
                Grid::sequential(DEMO_GRID_SIZE, DEMO_GRID_SIZE),
            )]),
        }
    }

    fn rejection_reason(&self, grid: &Grid) -> Option<String> {
        let rows = grid.rows();
        match grid.shape() {
            _ if rows.is_empty() => Some("grid is empty".to_string()),
            None if rows.iter().any(Vec::is_empty) => Some("grid has empty rows".to_string()),
            None => Some("rows have different lengths".to_string()),
            Some(shape) => self.config.shape_policy().rejection(shape),
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for GridPipeline<S, C> {
    fn extract(&self) -> Result<Vec<NamedGrid>> {
        let sources = self.config.grid_sources();
        if sources.is_empty() {
            return Err(SpiralError::MissingConfigError {
                field: "grids".to_string(),
            });
        }

        let mut grids = Vec::new();
        for source in &sources {
            grids.extend(self.read_source(source)?);
        }
        Ok(grids)
    }

    fn transform(&self, grids: Vec<NamedGrid>) -> Result<FlattenReport> {
        let policy = self.config.shape_policy();
        let mut maps: HashMap<Shape, SpiralMap> = HashMap::new();
        let mut records = Vec::with_capacity(grids.len());

        for NamedGrid { name, grid } in grids {
            let shape = grid.shape();
            let (rows, cols) = shape
                .map(|s| (s.rows, s.cols))
                .unwrap_or_else(|| (grid.rows().len(), grid.rows().first().map_or(0, Vec::len)));

            if let Some(reason) = self.rejection_reason(&grid) {
                tracing::warn!("Skipping grid '{}': {}", name, reason);
                records.push(SpiralRecord {
                    name,
                    rows,
                    cols,
                    values: Vec::new(),
                    rejected: Some(reason),
                });
                continue;
            }

            let shape = shape.ok_or_else(|| SpiralError::ProcessingError {
                message: format!("grid '{}' has no shape", name),
            })?;
            let map = maps.entry(shape).or_insert_with(|| {
                tracing::debug!("Building spiral map for {}", shape);
                SpiralMap::new(shape)
            });
            let values = map
                .apply(grid.rows())
                .ok_or_else(|| SpiralError::ProcessingError {
                    message: format!("spiral map for {} does not fit grid '{}'", shape, name),
                })?;

            records.push(SpiralRecord {
                name,
                rows,
                cols,
                values,
                rejected: None,
            });
        }

        Ok(FlattenReport::new(policy, records))
    }

    fn load(&self, report: FlattenReport) -> Result<LoadOutcome> {
        let rendered = codec::render_report(&report, self.config.output_format())?;

        match self.config.output_path() {
            Some(path) => {
                self.storage.write_file(path, rendered.as_bytes())?;
                Ok(LoadOutcome::Written(path.to_string()))
            }
            None => Ok(LoadOutcome::Rendered(rendered)),
        }
    }
}
