//! Dashboard view abstraction - base trait for the view controllers

use egui::Ui;

use crate::ViewerContext;

/// Identifies a view controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Globe,
    Histogram,
    Trend,
}

/// A thin adapter from the current snapshot to pixels. Views never mutate
/// shared state; they emit commands through the [`ViewerContext`].
pub trait DashboardView {
    fn kind(&self) -> ViewKind;

    /// Get the title of this view
    fn title(&self) -> &str;

    /// Draw the UI
    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui);

    /// Called each frame for animations, before [`DashboardView::ui`]
    fn on_frame_update(&mut self, _ctx: &ViewerContext, _dt: f32) {}

    /// Whether the view animates on its own and needs continuous repaints
    fn is_animating(&self) -> bool {
        false
    }
}
