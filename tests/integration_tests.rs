use anyhow::Result;
use clap::Parser;
use spiral_print::{
    flatten, CliConfig, Grid, GridPipeline, LoadOutcome, LocalStorage, SpiralEngine,
};
use tempfile::TempDir;

fn run_cli(args: &[&str], base: &TempDir) -> spiral_print::Result<LoadOutcome> {
    let config = CliConfig::parse_from(std::iter::once("spiral-print").chain(args.iter().copied()));
    let storage = LocalStorage::new(base.path());
    SpiralEngine::new(GridPipeline::new(storage, config)).run()
}

#[test]
fn test_demo_grid_renders_to_text() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outcome = run_cli(&[], &temp_dir)?;

    assert_eq!(
        outcome,
        LoadOutcome::Rendered("demo: [0 1 2 3 7 11 15 14 13 12 8 4 5 6 10 9]\n".to_string())
    );
    Ok(())
}

#[test]
fn test_inline_json_grid() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outcome = run_cli(&["--grid", "[[1,2,3],[4,5,6],[7,8,9]]"], &temp_dir)?;

    assert_eq!(
        outcome,
        LoadOutcome::Rendered("inline: [1 2 3 6 9 8 7 4 5]\n".to_string())
    );
    Ok(())
}

#[test]
fn test_csv_file_to_json_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("square.csv"), "1,2\n3,4\n")?;

    let outcome = run_cli(
        &[
            "--input",
            "square.csv",
            "--output",
            "reports/square.json",
            "--output-format",
            "json",
        ],
        &temp_dir,
    )?;
    assert_eq!(outcome, LoadOutcome::Written("reports/square.json".to_string()));

    let content = std::fs::read_to_string(temp_dir.path().join("reports/square.json"))?;
    let report: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(report["policy"], "square");
    assert_eq!(report["records"][0]["name"], "square");
    assert_eq!(report["records"][0]["values"], serde_json::json!([1, 2, 4, 3]));
    assert!(report["generated_at"].is_string());
    Ok(())
}

#[test]
fn test_non_square_grid_is_reported_not_failed() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let grid = Grid::sequential(4, 6);
    std::fs::write(
        temp_dir.path().join("wide.json"),
        serde_json::to_string(&grid)?,
    )?;

    let outcome = run_cli(&["--input", "wide.json"], &temp_dir)?;
    assert_eq!(
        outcome,
        LoadOutcome::Rendered("wide: [] (rejected: grid is 4x6, not square)\n".to_string())
    );

    let outcome = run_cli(&["--input", "wide.json", "--rectangular"], &temp_dir)?;
    assert_eq!(
        outcome,
        LoadOutcome::Rendered(
            "wide: [0 1 2 3 4 5 11 17 23 22 21 20 19 18 12 6 7 8 9 10 16 15 14 13]\n".to_string()
        )
    );
    Ok(())
}

#[test]
fn test_text_file_with_several_grids_to_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("batch.txt"),
        "5\n\n1 2\n3 4\n\n1 2\n3\n",
    )?;

    let outcome = run_cli(&["--input", "batch.txt", "--output-format", "csv"], &temp_dir)?;
    assert_eq!(
        outcome,
        LoadOutcome::Rendered("batch-1,5\nbatch-2,1,2,4,3\nbatch-3\n".to_string())
    );
    Ok(())
}

#[test]
fn test_bad_cell_is_input_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("bad.tsv"), "1\t2\n3\tx\n")?;

    let err = run_cli(&["--input", "bad.tsv"], &temp_dir).unwrap_err();
    assert_eq!(
        err.category(),
        spiral_print::utils::error::ErrorCategory::Input
    );
    Ok(())
}

#[test]
fn test_missing_input_is_critical() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let err = run_cli(&["--input", "nope.csv"], &temp_dir).unwrap_err();
    assert_eq!(
        err.severity(),
        spiral_print::utils::error::ErrorSeverity::Critical
    );
    Ok(())
}

#[test]
fn test_flatten_preserves_values_for_shuffled_grid() {
    // distinct values not in row-major order
    let grid = vec![
        vec![42, -7, 13, 0],
        vec![99, 5, -1, 8],
        vec![3, 77, 21, -50],
        vec![64, 11, 2, 1000],
    ];
    let out = flatten(&grid);
    assert_eq!(
        out,
        vec![42, -7, 13, 0, 8, -50, 1000, 2, 11, 64, 3, 99, 5, -1, 21, 77]
    );

    let mut sorted_out = out.clone();
    sorted_out.sort_unstable();
    let mut sorted_in: Vec<i64> = grid.into_iter().flatten().collect();
    sorted_in.sort_unstable();
    assert_eq!(sorted_out, sorted_in);
}
