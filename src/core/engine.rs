use crate::core::Pipeline;
use crate::domain::model::LoadOutcome;
use crate::utils::error::Result;
use std::time::Instant;

pub struct SpiralEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SpiralEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<LoadOutcome> {
        let started = Instant::now();
        tracing::info!("Starting spiral flatten run");

        let grids = self.pipeline.extract()?;
        let cells: usize = grids.iter().map(|g| g.grid.cell_count()).sum();
        tracing::info!("Loaded {} grids ({} cells)", grids.len(), cells);

        let report = self.pipeline.transform(grids)?;
        let rejected = report.rejected_count();
        if rejected > 0 {
            tracing::warn!(
                "{} of {} grids rejected under the {} policy",
                rejected,
                report.records.len(),
                report.policy
            );
        }
        tracing::info!("Flattened {} grids", report.records.len() - rejected);

        let outcome = self.pipeline.load(report)?;
        if let LoadOutcome::Written(path) = &outcome {
            tracing::info!("Report saved to: {}", path);
        }
        tracing::debug!("Run finished in {:?}", started.elapsed());

        Ok(outcome)
    }
}
