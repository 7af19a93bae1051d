//! Background loading of salary records and world geometry

use std::path::PathBuf;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use sal_core::{DataSource, Record};
use sal_data::{NullConfig, SalaryCsvSource, WorldGeometry};

/// Result of one background load, delivered to the UI thread
pub enum LoadMessage {
    Dataset { source_name: String, records: Vec<Record> },
    World(WorldGeometry),
    Failed { what: String, error: String },
}

/// Owns the tokio runtime. Loads run on the blocking pool; results are
/// picked up by [`Loader::poll`] on the next frame.
pub struct Loader {
    runtime: tokio::runtime::Runtime,
    tx: UnboundedSender<LoadMessage>,
    rx: UnboundedReceiver<LoadMessage>,
    pending: usize,
    null_config: NullConfig,
}

impl Loader {
    pub fn new(null_config: NullConfig) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (tx, rx) = unbounded_channel();
        Ok(Self {
            runtime,
            tx,
            rx,
            pending: 0,
            null_config,
        })
    }

    /// Whether a load is still running
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    pub fn load_salary_csv(&mut self, path: PathBuf, egui_ctx: egui::Context) {
        info!("Opening salary CSV: {:?}", path);
        let source = SalaryCsvSource::new(path).with_null_config(self.null_config.clone());
        self.load_source(Box::new(source), egui_ctx);
    }

    /// Read all records from `source` in the background
    pub fn load_source(&mut self, source: Box<dyn DataSource>, egui_ctx: egui::Context) {
        let tx = self.tx.clone();
        self.pending += 1;

        self.runtime.spawn(async move {
            let source_name = source.source_name().to_string();
            let message = match source.load_records().await {
                Ok(records) => LoadMessage::Dataset { source_name, records },
                Err(e) => {
                    error!("Failed to load {}: {:#}", source_name, e);
                    LoadMessage::Failed {
                        what: format!("Could not load {}", source_name),
                        error: format!("{:#}", e),
                    }
                }
            };
            // The receiver only goes away with the app
            let _ = tx.send(message);
            egui_ctx.request_repaint();
        });
    }

    pub fn load_world(&mut self, path: PathBuf, egui_ctx: egui::Context) {
        info!("Opening world geometry: {:?}", path);
        let tx = self.tx.clone();
        self.pending += 1;

        self.runtime.spawn(async move {
            let message = match WorldGeometry::load(&path).await {
                Ok(world) => LoadMessage::World(world),
                Err(e) => {
                    error!("Failed to open world geometry {:?}: {}", path, e);
                    LoadMessage::Failed {
                        what: format!("Could not load {}", path.display()),
                        error: e.to_string(),
                    }
                }
            };
            let _ = tx.send(message);
            egui_ctx.request_repaint();
        });
    }

    /// Finished loads since the last call
    pub fn poll(&mut self) -> Vec<LoadMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            messages.push(message);
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct UnreachableSource;

    #[async_trait::async_trait]
    impl DataSource for UnreachableSource {
        async fn load_records(&self) -> anyhow::Result<Vec<Record>> {
            anyhow::bail!("connection refused")
        }

        fn source_name(&self) -> &str {
            "salaries-api"
        }
    }

    fn wait_for(loader: &mut Loader) -> LoadMessage {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(message) = loader.poll().pop() {
                return message;
            }
            assert!(Instant::now() < deadline, "load did not finish");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_load_salary_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.csv");
        std::fs::write(
            &path,
            "work_year,experience_level,employment_type,job_title,salary_in_usd,company_location,remote_ratio,company_size\n\
             2021,EN,FT,Data Analyst,50000,US,100,M\n\
             2022,XX,FT,Data Analyst,60000,US,0,M\n",
        )
        .unwrap();

        let mut loader = Loader::new(NullConfig::default()).unwrap();
        loader.load_salary_csv(path, egui::Context::default());
        assert!(loader.is_busy());

        match wait_for(&mut loader) {
            LoadMessage::Dataset { source_name, records } => {
                assert_eq!(source_name, "salaries.csv");
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].salary_in_usd, 50_000.0);
            }
            _ => panic!("expected a dataset"),
        }
        assert!(!loader.is_busy());
    }

    #[test]
    fn test_failing_source_reports_failure() {
        let mut loader = Loader::new(NullConfig::default()).unwrap();
        loader.load_source(Box::new(UnreachableSource), egui::Context::default());

        match wait_for(&mut loader) {
            LoadMessage::Failed { what, error } => {
                assert_eq!(what, "Could not load salaries-api");
                assert!(error.contains("connection refused"));
            }
            _ => panic!("expected a failure"),
        }
        assert!(!loader.is_busy());
    }

    #[test]
    fn test_missing_world_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = Loader::new(NullConfig::default()).unwrap();
        loader.load_world(dir.path().join("absent.geojson"), egui::Context::default());

        match wait_for(&mut loader) {
            LoadMessage::Failed { what, .. } => assert!(what.contains("absent.geojson")),
            _ => panic!("expected a failure"),
        }
    }
}
