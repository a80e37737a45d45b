use crate::domain::model::CalculationReport;
use crate::domain::scenario::Scenario;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn report_name(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress(&self) -> bool;
    fn scenarios(&self) -> &[Scenario];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Scenario>>;
    async fn transform(&self, scenarios: Vec<Scenario>) -> Result<CalculationReport>;
    async fn load(&self, report: CalculationReport) -> Result<Vec<String>>;
}

