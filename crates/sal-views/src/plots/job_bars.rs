//! Horizontal bars of the best paid job titles

use egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text};

use sal_core::drilldown::JobChart;

use super::utils::format_currency;

/// Bar fill (`steelblue`)
const BAR_COLOR: Color32 = Color32::from_rgb(0x46, 0x82, 0xb4);

/// Job titles are listed top-down; the plot's vertical axis grows upwards
fn bar_position(index: usize, count: usize) -> f64 {
    (count - 1 - index) as f64
}

/// Title shown next to a bar position, if any
fn title_at(titles: &[String], position: f64) -> Option<&str> {
    if position < 0.0 || position.fract() != 0.0 {
        return None;
    }
    let from_bottom = position as usize;
    titles.len().checked_sub(from_bottom + 1).and_then(|idx| titles.get(idx)).map(String::as_str)
}

/// Job salary chart of a country drill-down
pub struct JobBarsChart {
    pub height: f32,
}

impl JobBarsChart {
    pub fn new(height: f32) -> Self {
        Self { height }
    }

    pub fn ui(&self, ui: &mut Ui, chart: &JobChart, opacity: f32) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(chart.title).strong().size(14.0));
        });

        if chart.jobs.is_empty() {
            return;
        }

        let count = chart.jobs.len();
        let titles: Vec<String> = chart.jobs.iter().map(|j| j.title.clone()).collect();
        let max_salary = chart.jobs.iter().map(|j| j.avg_salary).fold(0.0, f64::max);
        let color = BAR_COLOR.gamma_multiply(opacity);

        let bars = chart
            .jobs
            .iter()
            .enumerate()
            .map(|(idx, job)| {
                Bar::new(bar_position(idx, count), job.avg_salary)
                    .width(0.8)
                    .fill(color)
                    .name(&job.title)
            })
            .collect();

        let plot = Plot::new("job_salary_bars")
            .height(self.height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_grid(false)
            .include_x(0.0)
            .include_x(max_salary * 1.25)
            .x_axis_formatter(|val, _max_chars, _range| if val < 0.0 { String::new() } else { format_currency(val) })
            .y_axis_formatter(move |val, _max_chars, _range| title_at(&titles, val).unwrap_or_default().to_string())
            .y_axis_width(12)
            .label_formatter(|_name, _value| String::new());

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .color(color)
                    .element_formatter(Box::new(|bar, _chart| {
                        format!("{}\n{}", bar.name, format_currency(bar.value))
                    })),
            );

            for (idx, job) in chart.jobs.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(job.avg_salary + max_salary * 0.01, bar_position(idx, count)),
                        format_currency(job.avg_salary),
                    )
                    .anchor(Align2::LEFT_CENTER),
                );
            }
        });
    }
}
