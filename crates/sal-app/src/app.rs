//! The eframe application: owns the dispatcher and wires views to it

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui::{self, Context};
use tracing::{debug, info};

use sal_core::events::events::{DatasetLoaded, DrilldownClosed, DrilldownOpened, ViewModeChanged};
use sal_core::events::handler_from_fn;
use sal_core::{AppState, Command, DispatchOutcome, Dispatcher, ViewMode};
use sal_data::{DashboardConfig, ThemePreference, WorldGeometry};
use sal_ui::{FilterPanel, MenuAction, Theme, UiState};
use sal_views::{DashboardView, DrilldownModal, GlobeView, HistogramView, TrendView, ViewerContext};

use crate::loader::{LoadMessage, Loader};

/// Seconds for a view to fade in after the toggle
const VIEW_FADE_SECS: f32 = 0.75;

pub struct SalaryAtlasApp {
    dispatcher: Dispatcher,
    world: Arc<WorldGeometry>,

    globe: GlobeView,
    histogram: HistogramView,
    trend: TrendView,
    modal: DrilldownModal,
    filter_panel: FilterPanel,

    ui_state: UiState,
    loader: Loader,
    started: Instant,
    last_frame: Instant,
}

impl SalaryAtlasApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig, loader: Loader) -> Self {
        let theme = match config.theme {
            ThemePreference::Light => Theme::light(),
            ThemePreference::Dark => Theme::dark(),
        };
        sal_ui::apply_theme(&cc.egui_ctx, &theme);

        let dispatcher = Dispatcher::new(AppState::new("", Vec::new()));
        dispatcher.event_bus().subscribe::<DatasetLoaded>(handler_from_fn(|event| {
            if let Some(loaded) = event.as_any().downcast_ref::<DatasetLoaded>() {
                info!(
                    source = %loaded.source_name,
                    rows = loaded.row_count,
                    years = ?loaded.years,
                    "dataset installed"
                );
            }
        }));
        dispatcher.event_bus().subscribe::<ViewModeChanged>(handler_from_fn(|event| {
            if let Some(changed) = event.as_any().downcast_ref::<ViewModeChanged>() {
                debug!(mode = ?changed.mode, "view mode changed");
            }
        }));
        dispatcher.event_bus().subscribe::<DrilldownOpened>(handler_from_fn(|event| {
            if let Some(opened) = event.as_any().downcast_ref::<DrilldownOpened>() {
                debug!(title = %opened.title, records = opened.record_count, "drill-down opened");
            }
        }));
        dispatcher.event_bus().subscribe::<DrilldownClosed>(handler_from_fn(|_| debug!("drill-down closed")));

        let mut app = Self {
            dispatcher,
            world: Arc::new(WorldGeometry::default()),
            globe: GlobeView::new(config.rotation_speed),
            histogram: HistogramView::new(),
            trend: TrendView::new(),
            modal: DrilldownModal::new(),
            filter_panel: FilterPanel::new(),
            ui_state: UiState::new(theme),
            loader,
            started: Instant::now(),
            last_frame: Instant::now(),
        };

        if let Some(path) = config.data_path {
            app.loader.load_salary_csv(path, cc.egui_ctx.clone());
        }
        if let Some(path) = config.world_path {
            app.loader.load_world(path, cc.egui_ctx.clone());
        }
        app
    }

    fn apply_load_results(&mut self) {
        for message in self.loader.poll() {
            match message {
                LoadMessage::Dataset { source_name, records } => {
                    self.ui_state.source_name = Some(source_name.clone());
                    self.dispatcher.dispatch(Command::ReplaceDataset { source_name, records });
                }
                LoadMessage::World(world) => {
                    self.world = Arc::new(world);
                }
                LoadMessage::Failed { what, error } => {
                    self.ui_state.push_error(what, error);
                }
            }
        }
        self.ui_state.loading = self.loader.is_busy();
    }

    fn pick_file(title: &str, filter: &str, extensions: &[&str]) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .add_filter(filter, extensions)
            .pick_file()
    }

    fn handle_menu(&mut self, ctx: &Context) {
        match sal_ui::menu_bar(ctx, &self.ui_state) {
            Some(MenuAction::OpenSalaryCsv) => self.open_salary_csv(ctx),
            Some(MenuAction::OpenWorldGeometry) => {
                if let Some(path) = Self::pick_file("Open world geometry", "GeoJSON", &["geojson", "json"]) {
                    self.loader.load_world(path, ctx.clone());
                }
            }
            Some(MenuAction::ToggleTheme) => {
                let theme = self.ui_state.toggle_theme().clone();
                sal_ui::apply_theme(ctx, &theme);
            }
            Some(MenuAction::Quit) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            None => {}
        }
    }

    fn open_salary_csv(&mut self, ctx: &Context) {
        if let Some(path) = Self::pick_file("Open salary data", "CSV Files", &["csv"]) {
            self.loader.load_salary_csv(path, ctx.clone());
        }
    }

    /// Globe beside the histogram, or the trend chart, faded in after a toggle
    fn show_views(&mut self, ui: &mut egui::Ui, viewer_ctx: &ViewerContext) {
        let trend_shown = ui.ctx().animate_bool_with_time(
            egui::Id::new("view_toggle_fade"),
            viewer_ctx.snapshot.view_mode == ViewMode::Trend,
            VIEW_FADE_SECS,
        );

        match viewer_ctx.snapshot.view_mode {
            ViewMode::MapHistogram => {
                let view_ctx = viewer_ctx.clone().with_opacity(1.0 - trend_shown);
                ui.columns(2, |columns| {
                    self.globe.ui(&view_ctx, &mut columns[0]);
                    self.histogram.ui(&view_ctx, &mut columns[1]);
                });
            }
            ViewMode::Trend => {
                let view_ctx = viewer_ctx.clone().with_opacity(trend_shown);
                self.trend.ui(&view_ctx, ui);
            }
        }
    }
}

impl eframe::App for SalaryAtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.apply_load_results();
        self.handle_menu(ctx);

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        let frame_time_ms = now.duration_since(self.started).as_secs_f64() * 1000.0;

        let snapshot = self.dispatcher.snapshot();
        let has_data = snapshot.total_records > 0;
        let viewer_ctx = ViewerContext::new(snapshot, self.world.clone(), frame_time_ms);

        let spinning = has_data && viewer_ctx.snapshot.view_mode == ViewMode::MapHistogram;
        if spinning {
            self.globe.on_frame_update(&viewer_ctx, dt);
        }

        if has_data {
            egui::TopBottomPanel::top("filters").show(ctx, |ui| {
                ui.add_space(4.0);
                self.filter_panel.ui(ui, &viewer_ctx);
                ui.add_space(4.0);
            });
        }

        let mut open_requested = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            sal_ui::show_error_messages(ui, &mut self.ui_state);
            if has_data {
                self.show_views(ui, &viewer_ctx);
            } else {
                open_requested = sal_ui::show_empty_state(ui, self.ui_state.loading);
            }
        });
        if open_requested {
            self.open_salary_csv(ctx);
        }

        if has_data {
            self.modal.show(ctx, &viewer_ctx);
        }

        if spinning && self.globe.is_animating() {
            ctx.request_repaint();
        }
        if self.dispatcher.dispatch_all(viewer_ctx.take_commands()) == DispatchOutcome::Applied {
            ctx.request_repaint();
        }
    }
}
