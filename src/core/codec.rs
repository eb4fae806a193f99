use crate::domain::model::{FlattenReport, Grid, NamedGrid};
use crate::utils::error::{Result, SpiralError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const INPUT_EXTENSIONS: &[&str] = &["json", "csv", "tsv", "txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum InputFormat {
    Json,
    Csv,
    Tsv,
    #[serde(alias = "text")]
    Txt,
}

impl InputFormat {
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        ext.parse().ok()
    }
}

impl FromStr for InputFormat {
    type Err = SpiralError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            "tsv" => Ok(InputFormat::Tsv),
            "txt" | "text" => Ok(InputFormat::Txt),
            other => Err(SpiralError::InvalidConfigValueError {
                field: "input format".to_string(),
                value: other.to_string(),
                reason: format!("Expected one of: {}", INPUT_EXTENSIONS.join(", ")),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonGrids {
    Single(Vec<Vec<i64>>),
    Named(BTreeMap<String, Vec<Vec<i64>>>),
}

/// Parses every grid contained in `data`. `source_name` names single grids
/// and prefixes generated names.
pub fn parse_grids(source_name: &str, data: &[u8], format: InputFormat) -> Result<Vec<NamedGrid>> {
    match format {
        InputFormat::Json => parse_json(source_name, data),
        InputFormat::Csv => parse_delimited(source_name, data, b','),
        InputFormat::Tsv => parse_delimited(source_name, data, b'\t'),
        InputFormat::Txt => parse_text(source_name, data),
    }
}

/// Stands in for a source with no grid data so it is reported as rejected.
fn empty_grid(source_name: &str) -> Vec<NamedGrid> {
    vec![NamedGrid::new(source_name, Grid::default())]
}

fn parse_json(source_name: &str, data: &[u8]) -> Result<Vec<NamedGrid>> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty_grid(source_name));
    }

    let grids = match serde_json::from_slice::<JsonGrids>(data)? {
        JsonGrids::Single(rows) => vec![NamedGrid::new(source_name, Grid::new(rows))],
        JsonGrids::Named(map) if map.is_empty() => empty_grid(source_name),
        JsonGrids::Named(map) => map
            .into_iter()
            .map(|(name, rows)| NamedGrid::new(name, Grid::new(rows)))
            .collect(),
    };
    Ok(grids)
}

fn parse_delimited(source_name: &str, data: &[u8], delimiter: u8) -> Result<Vec<NamedGrid>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(rows.len() + 1);
        let row = record
            .iter()
            .map(|cell| parse_cell(source_name, line, cell))
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    tracing::debug!("Parsed {} rows from {}", rows.len(), source_name);
    Ok(vec![NamedGrid::new(source_name, Grid::new(rows))])
}

fn parse_text(source_name: &str, data: &[u8]) -> Result<Vec<NamedGrid>> {
    let text = std::str::from_utf8(data).map_err(|e| SpiralError::GridParseError {
        source_name: source_name.to_string(),
        line: 0,
        reason: format!("input is not valid UTF-8: {}", e),
    })?;

    let mut blocks: Vec<Vec<Vec<i64>>> = Vec::new();
    let mut current: Vec<Vec<i64>> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|cell| parse_cell(source_name, idx + 1, cell))
            .collect::<Result<Vec<_>>>()?;
        current.push(row);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    if blocks.len() <= 1 {
        let rows = blocks.pop().unwrap_or_default();
        return Ok(vec![NamedGrid::new(source_name, Grid::new(rows))]);
    }

    Ok(blocks
        .into_iter()
        .enumerate()
        .map(|(i, rows)| NamedGrid::new(format!("{}-{}", source_name, i + 1), Grid::new(rows)))
        .collect())
}

fn parse_cell(source_name: &str, line: usize, cell: &str) -> Result<i64> {
    cell.trim()
        .parse::<i64>()
        .map_err(|_| SpiralError::GridParseError {
            source_name: source_name.to_string(),
            line,
            reason: format!("'{}' is not an integer", cell),
        })
}

pub fn render_report(report: &FlattenReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Csv => render_csv(report),
    }
}

fn render_text(report: &FlattenReport) -> String {
    let mut out = String::new();
    for record in &report.records {
        let values: Vec<String> = record.values.iter().map(|v| v.to_string()).collect();
        out.push_str(&format!("{}: [{}]", record.name, values.join(" ")));
        if let Some(reason) = &record.rejected {
            out.push_str(&format!(" (rejected: {})", reason));
        }
        out.push('\n');
    }
    out
}

fn render_csv(report: &FlattenReport) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for record in &report.records {
        let mut fields = vec![record.name.clone()];
        fields.extend(record.values.iter().map(|v| v.to_string()));
        writer.write_record(&fields)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SpiralError::ProcessingError {
            message: format!("CSV writer flush failed: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| SpiralError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}
