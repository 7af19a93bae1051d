//! Salary histogram, stacked by experience level

use egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use sal_core::aggregate::{self, SalaryBin, BIN_COUNT, BIN_WIDTH, HISTOGRAM_MAX};
use sal_core::record::ExperienceLevel;
use sal_core::Command;

use super::utils::{format_currency, format_k, format_percent, level_color};
use crate::{DashboardView, ViewKind, ViewerContext};

/// Bars leave a small gap between bins
const BAR_FILL: f64 = 0.9;

/// Horizontal stacked bars: salary bins on the vertical axis, employee counts
/// along the horizontal axis
pub struct HistogramView {
    title: String,
}

impl Default for HistogramView {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramView {
    pub fn new() -> Self {
        Self {
            title: "Salary Distribution by Experience Level".to_string(),
        }
    }

    /// One stacked chart per level, entry level at the base
    fn level_charts(bins: &[SalaryBin], opacity: f32) -> Vec<BarChart> {
        let mut charts: Vec<BarChart> = Vec::with_capacity(ExperienceLevel::ALL.len());

        for level in ExperienceLevel::ALL {
            let color = level_color(level).gamma_multiply(opacity);
            let bars = bins
                .iter()
                .map(|bin| {
                    Bar::new((bin.y0 + bin.y1) / 2.0, bin.count(level) as f64)
                        .width(BIN_WIDTH * BAR_FILL)
                        .fill(color)
                })
                .collect();

            let tooltip_bins = bins.to_vec();
            let chart = BarChart::new(bars)
                .horizontal()
                .color(color)
                .name(level.label())
                .element_formatter(Box::new(move |bar, _chart| {
                    aggregate::bin_index(bar.argument)
                        .and_then(|idx| tooltip_bins.get(idx))
                        .map(bin_tooltip)
                        .unwrap_or_default()
                }));

            let others: Vec<&BarChart> = charts.iter().collect();
            let chart = chart.stack_on(&others);
            charts.push(chart);
        }

        charts
    }
}

/// Tooltip text of one bin: range, total and per-level share
pub fn bin_tooltip(bin: &SalaryBin) -> String {
    let mut text = format!(
        "Salary Range: {} - {}\n\nTotal Count: {}\n",
        format_currency(bin.y0),
        format_currency(bin.y1),
        bin.total()
    );
    for level in ExperienceLevel::ALL {
        text.push_str(&format!(
            "\n{}: {} ({}%)",
            level.label(),
            bin.count(level),
            format_percent(bin.share(level))
        ));
    }
    text
}

/// Bin under a plot coordinate, if the pointer is over a drawn bar
fn bin_at(bins: &[SalaryBin], count: f64, salary: f64) -> Option<usize> {
    let idx = aggregate::bin_index(salary)?;
    let total = bins.get(idx)?.total() as f64;
    (count >= 0.0 && count <= total).then_some(idx)
}

impl DashboardView for HistogramView {
    fn kind(&self) -> ViewKind {
        ViewKind::Histogram
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let snapshot = &ctx.snapshot;
        ui.label(RichText::new(&self.title).strong());

        let plot = Plot::new("salary_histogram")
            .legend(Legend::default())
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(0.0)
            .include_x(snapshot.max_bin_total() as f64)
            .include_y(0.0)
            .include_y(HISTOGRAM_MAX)
            .x_axis_label("Number of Employees")
            .y_axis_label("Salary (USD)")
            .y_axis_formatter(|val, _max_chars, _range| {
                if val < 0.0 || val > HISTOGRAM_MAX { String::new() } else { format_k(val) }
            })
            .label_formatter(|_name, _value| String::new());

        let charts = Self::level_charts(&snapshot.bins, ctx.opacity);
        let response = plot.show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            plot_ui.pointer_coordinate()
        });

        if response.response.clicked() {
            if let Some(idx) = response.inner.and_then(|p| bin_at(&snapshot.bins, p.x, p.y)) {
                debug_assert!(idx < BIN_COUNT);
                ctx.emit(Command::OpenBinDrilldown(idx));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sal_core::record::Record;

    fn bins() -> Vec<SalaryBin> {
        aggregate::histogram_bins(&[
            Record::new(50_000.0, 2021, ExperienceLevel::Entry, "US"),
            Record::new(55_000.0, 2021, ExperienceLevel::Senior, "US"),
            Record::new(150_000.0, 2021, ExperienceLevel::Senior, "US"),
        ])
    }

    #[test]
    fn test_bin_tooltip() {
        let bins = bins();
        let text = bin_tooltip(&bins[2]);
        assert!(text.starts_with("Salary Range: $40,000 - $60,000"));
        assert!(text.contains("Total Count: 2"));
        assert!(text.contains("Entry Level: 1 (50.0%)"));
        assert!(text.contains("Executive: 0 (0.0%)"));
    }

    #[test]
    fn test_bin_at() {
        let bins = bins();
        assert_eq!(bin_at(&bins, 1.5, 45_000.0), Some(2));
        assert_eq!(bin_at(&bins, 2.5, 45_000.0), None);
        assert_eq!(bin_at(&bins, 0.5, 470_000.0), None);
        assert_eq!(bin_at(&bins, -1.0, 150_000.0), None);
    }

    #[test]
    fn test_level_charts_cover_every_level() {
        assert_eq!(HistogramView::level_charts(&bins(), 1.0).len(), 4);
    }
}
