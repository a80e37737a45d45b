use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct PricingEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PricingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load; returns the paths written.
    pub async fn run(&self) -> Result<Vec<String>> {
        let started = Instant::now();
        tracing::info!("Starting pricing run...");

        let scenarios = self.pipeline.extract().await?;
        tracing::info!("Loaded {} scenarios", scenarios.len());

        let report = self.pipeline.transform(scenarios).await?;
        tracing::info!(
            "Calculated {} scenarios ({} metrics)",
            report.outcomes.len(),
            report.outcomes.iter().map(|o| o.metrics.len()).sum::<usize>()
        );

        let written = self.pipeline.load(report).await?;
        for path in &written {
            tracing::info!("Output saved to: {}", path);
        }

        tracing::debug!("Pricing run finished in {:?}", started.elapsed());
        Ok(written)
    }
}
