//! Drill-down modal: category breakdowns of a salary bin or a country

use egui::{Align2, Context, RichText, Ui, Vec2};

use sal_core::drilldown::Drilldown;
use sal_core::Command;

use crate::plots::{JobBarsChart, LabelFormat, LegendPosition, PieChart, PieChartConfig};
use crate::ViewerContext;

const MODAL_WIDTH: f32 = 800.0;
const JOB_CHART_HEIGHT: f32 = 200.0;
const COMPACT_PIE_HEIGHT: f32 = 170.0;

/// Pie layout for a modal row of `row_width` pixels. Three bottom-legend pies
/// side by side when they fit, otherwise stacked pies with the legend on the
/// right and shorter labels.
fn pie_config(title: &str, row_width: f32) -> PieChartConfig {
    let config = PieChartConfig::new(title);
    if is_compact(row_width) {
        config
            .with_legend(LegendPosition::Right)
            .with_label(LabelFormat::Percent)
            .with_size(Vec2::new(row_width, COMPACT_PIE_HEIGHT))
    } else {
        config
    }
}

fn is_compact(row_width: f32) -> bool {
    row_width < 3.0 * PieChartConfig::default().size.x
}

/// Floating window over the dashboard. Closing it emits [`Command::CloseDrilldown`].
pub struct DrilldownModal {
    jobs: JobBarsChart,
}

impl Default for DrilldownModal {
    fn default() -> Self {
        Self::new()
    }
}

impl DrilldownModal {
    pub fn new() -> Self {
        Self {
            jobs: JobBarsChart::new(JOB_CHART_HEIGHT),
        }
    }

    /// Show the modal for the snapshot's open drill-down, if any
    pub fn show(&self, egui_ctx: &Context, ctx: &ViewerContext) {
        let Some(drilldown) = ctx.snapshot.drilldown.clone() else {
            return;
        };

        let mut open = true;
        egui::Window::new(drilldown.title())
            .id(egui::Id::new("drilldown_modal"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .fixed_size(Vec2::new(MODAL_WIDTH, 0.0))
            .show(egui_ctx, |ui| self.contents(ui, &drilldown, ctx.opacity));

        if !open {
            ctx.emit(Command::CloseDrilldown);
        }
    }

    fn contents(&self, ui: &mut egui::Ui, drilldown: &Drilldown, opacity: f32) {
        let summary = &drilldown.summary;

        if summary.record_count == 0 {
            ui.label(RichText::new("No records in this selection").weak());
            return;
        }
        ui.label(RichText::new(format!("{} records", summary.record_count)).weak());

        let row_width = ui.available_width();
        let draw_pies = |ui: &mut Ui| {
            for breakdown in &summary.breakdowns {
                PieChart::new(pie_config(breakdown.title, row_width)).ui(ui, &breakdown.shares, breakdown.field, opacity);
            }
        };
        if is_compact(row_width) {
            ui.vertical(draw_pies);
        } else {
            ui.horizontal(draw_pies);
        }

        if let Some(job_chart) = &summary.job_chart {
            ui.separator();
            self.jobs.ui(ui, job_chart, opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_config_by_width() {
        let wide = pie_config("Remote Work Distribution", MODAL_WIDTH);
        assert_eq!(wide, PieChartConfig::new("Remote Work Distribution"));

        let narrow = pie_config("Company Size Distribution", 400.0);
        assert_eq!(narrow.legend, LegendPosition::Right);
        assert_eq!(narrow.label, LabelFormat::Percent);
        assert_eq!(narrow.size, Vec2::new(400.0, COMPACT_PIE_HEIGHT));
        assert_eq!(narrow.title, "Company Size Distribution");
    }
}
