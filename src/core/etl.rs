use crate::core::Pipeline;
use crate::domain::model::Table;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// 一次執行的結果：記憶體中的 Table，以及（若有存檔）輸出路徑
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub table: Table,
    pub csv_output: String,
    pub output_path: Option<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("🚀 Starting tweet extraction");
        self.monitor.log_stats("start");

        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Loaded {} records", records.len());
        self.monitor.log_stats("extract");

        let result = self.pipeline.transform(records).await?;
        tracing::info!(
            "🔄 Assembled {} rows x {} columns",
            result.table.len(),
            result.table.columns().len()
        );
        self.monitor.log_stats("transform");

        let output_path = self.pipeline.load(&result).await?;
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(RunOutcome {
            table: result.table,
            csv_output: result.csv_output,
            output_path,
        })
    }
}
