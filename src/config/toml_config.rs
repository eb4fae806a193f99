use crate::core::codec::{InputFormat, OutputFormat, INPUT_EXTENSIONS};
use crate::domain::model::ShapePolicy;
use crate::domain::ports::{ConfigProvider, GridSource};
use crate::utils::error::{Result, SpiralError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub policy: Option<PolicyConfig>,
    #[serde(default)]
    pub grids: Vec<GridEntry>,
    pub output: Option<OutputConfig>,
    /// Directory relative grid and output paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub shape: ShapePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridEntry {
    pub name: Option<String>,
    pub rows: Option<Vec<Vec<i64>>>,
    pub path: Option<String>,
    pub format: Option<InputFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<OutputFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SpiralError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SpiralError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn job_name(&self) -> &str {
        &self.job.name
    }

    fn entry_name(index: usize, entry: &GridEntry) -> String {
        entry
            .name
            .clone()
            .unwrap_or_else(|| format!("grid-{}", index + 1))
    }
}

impl ConfigProvider for TomlConfig {
    fn grid_sources(&self) -> Vec<GridSource> {
        self.grids
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match (&entry.rows, &entry.path) {
                (Some(rows), _) => Some(GridSource::Inline {
                    name: Self::entry_name(i, entry),
                    rows: rows.clone(),
                }),
                (None, Some(path)) => Some(GridSource::File {
                    path: path.clone(),
                    format: entry.format,
                }),
                (None, None) => None,
            })
            .collect()
    }

    fn shape_policy(&self) -> ShapePolicy {
        self.policy.as_ref().map(|p| p.shape).unwrap_or_default()
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }

    fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;

        if self.grids.is_empty() {
            return Err(SpiralError::MissingConfigError {
                field: "grids".to_string(),
            });
        }

        for (i, entry) in self.grids.iter().enumerate() {
            let field = format!("grids[{}]", i);
            match (&entry.rows, &entry.path) {
                (Some(_), Some(_)) => {
                    return Err(SpiralError::ConfigValidationError {
                        field,
                        message: "set either 'rows' or 'path', not both".to_string(),
                    });
                }
                (None, None) => {
                    return Err(SpiralError::ConfigValidationError {
                        field,
                        message: "each grid needs 'rows' or 'path'".to_string(),
                    });
                }
                (None, Some(path)) => {
                    validation::validate_path(&format!("{}.path", field), path)?;
                    if entry.format.is_none() {
                        validation::validate_file_extensions(
                            &format!("{}.path", field),
                            std::slice::from_ref(path),
                            INPUT_EXTENSIONS,
                        )?;
                    }
                }
                (Some(_), None) => {}
            }
        }

        if let Some(path) = self.output_path() {
            validation::validate_path("output.path", path)?;
        }

        Ok(())
    }
}
