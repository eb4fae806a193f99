pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::codec::{InputFormat, OutputFormat, INPUT_EXTENSIONS};
#[cfg(feature = "cli")]
use crate::domain::{
    model::ShapePolicy,
    ports::{ConfigProvider, GridSource},
};
#[cfg(feature = "cli")]
use crate::utils::{
    error::{Result, SpiralError},
    validation::{self, Validate},
};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "spiral-print")]
#[command(about = "Flatten square integer grids in clockwise spiral order")]
pub struct CliConfig {
    /// Grid file (.json, .csv, .tsv or .txt)
    #[arg(long, short)]
    pub input: Option<String>,

    /// Inline JSON grid, e.g. '[[1,2],[3,4]]'
    #[arg(long, conflicts_with = "input")]
    pub grid: Option<String>,

    /// Override the format detected from the input file extension
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    pub output: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Also accept non-square rectangular grids
    #[arg(long)]
    pub rectangular: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn grid_sources(&self) -> Vec<GridSource> {
        if let Some(path) = &self.input {
            vec![GridSource::File {
                path: path.clone(),
                format: self.input_format,
            }]
        } else if let Some(text) = &self.grid {
            vec![GridSource::Json {
                name: "inline".to_string(),
                text: text.clone(),
            }]
        } else {
            vec![GridSource::Demo]
        }
    }

    fn shape_policy(&self) -> ShapePolicy {
        if self.rectangular {
            ShapePolicy::Rectangular
        } else {
            ShapePolicy::Square
        }
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            validation::validate_path("input", input)?;
            if self.input_format.is_none() {
                validation::validate_file_extensions(
                    "input",
                    std::slice::from_ref(input),
                    INPUT_EXTENSIONS,
                )?;
            }
        }

        if let Some(grid) = &self.grid {
            if grid.trim().is_empty() {
                return Err(SpiralError::InvalidConfigValueError {
                    field: "grid".to_string(),
                    value: grid.clone(),
                    reason: "Inline grid cannot be empty".to_string(),
                });
            }
        }

        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }

        Ok(())
    }
}
