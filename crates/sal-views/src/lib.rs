//! View controllers for the salary dashboard

mod dashboard_view;
pub mod drilldown;
pub mod plots;

pub use dashboard_view::{DashboardView, ViewKind};
pub use drilldown::DrilldownModal;
pub use plots::{GlobeView, HistogramView, JobBarsChart, PieChart, PieChartConfig, TrendView};

use std::sync::Arc;

use parking_lot::Mutex;
use sal_core::{Command, DashboardSnapshot};
use sal_data::WorldGeometry;

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    /// Aggregates for this frame
    pub snapshot: Arc<DashboardSnapshot>,

    /// Country outlines for the globe
    pub world: Arc<WorldGeometry>,

    /// Frame clock in milliseconds
    pub frame_time_ms: f64,

    /// Fade-in of the active view in `[0, 1]`
    pub opacity: f32,

    /// Commands emitted by the views this frame
    commands: Arc<Mutex<Vec<Command>>>,
}

impl ViewerContext {
    pub fn new(snapshot: Arc<DashboardSnapshot>, world: Arc<WorldGeometry>, frame_time_ms: f64) -> Self {
        Self {
            snapshot,
            world,
            frame_time_ms,
            opacity: 1.0,
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Queue a command for the dispatcher
    pub fn emit(&self, command: Command) {
        self.commands.lock().push(command);
    }

    /// Drain the queued commands
    pub fn take_commands(&self) -> Vec<Command> {
        std::mem::take(&mut *self.commands.lock())
    }
}
