//! Salary trend lines per experience level

use egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, PlotPoints, Points, Plot};

use sal_core::aggregate::YearPoint;
use sal_core::record::ExperienceLevel;

use super::utils::{format_currency, level_color, ALL_LEVELS_COLOR};
use crate::{DashboardView, ViewKind, ViewerContext};

const LINE_WIDTH: f32 = 2.0;
const ALL_LINE_WIDTH: f32 = 3.0;
const POINT_RADIUS: f32 = 4.0;

/// One line of the trend chart
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub name: &'static str,
    pub color: Color32,
    pub width: f32,
    pub points: Vec<[f64; 2]>,
}

/// Build the five series (four levels plus the all-levels average) from a year series
pub fn trend_series(years: &[YearPoint]) -> Vec<TrendSeries> {
    let mut series: Vec<TrendSeries> = ExperienceLevel::ALL
        .iter()
        .map(|&level| TrendSeries {
            name: level.label(),
            color: level_color(level),
            width: LINE_WIDTH,
            points: years.iter().map(|p| [p.year as f64, p.level(level)]).collect(),
        })
        .collect();

    series.push(TrendSeries {
        name: "Average",
        color: ALL_LEVELS_COLOR,
        width: ALL_LINE_WIDTH,
        points: years.iter().map(|p| [p.year as f64, p.all]).collect(),
    });

    series
}

/// Average salary per year and experience level
pub struct TrendView {
    title: String,
}

impl Default for TrendView {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendView {
    pub fn new() -> Self {
        Self {
            title: "Global Average Salary Trends by Experience Level".to_string(),
        }
    }
}

impl DashboardView for TrendView {
    fn kind(&self) -> ViewKind {
        ViewKind::Trend
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let years = &ctx.snapshot.year_series;
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&self.title).strong().size(16.0));
        });

        if years.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No data to display");
            });
            return;
        }

        let y_max = years.iter().map(YearPoint::max_level).fold(0.0, f64::max);
        let plot = Plot::new("salary_trend")
            .legend(Legend::default())
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .include_y(y_max)
            .x_axis_label("Year")
            .y_axis_label("Average Salary (USD)")
            .x_axis_formatter(|val, _max_chars, _range| {
                if val.fract() == 0.0 { format!("{}", val as i64) } else { String::new() }
            })
            .y_axis_formatter(|val, _max_chars, _range| if val < 0.0 { String::new() } else { format_currency(val) })
            .label_formatter(|name, value| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{}\n{}: {}", name, value.x.round(), format_currency(value.y))
                }
            });

        let opacity = ctx.opacity;
        plot.show(ui, |plot_ui| {
            for series in trend_series(years) {
                let color = series.color.gamma_multiply(opacity);
                plot_ui.line(
                    Line::new(PlotPoints::new(series.points.clone()))
                        .color(color)
                        .width(series.width)
                        .name(series.name),
                );
                plot_ui.points(
                    Points::new(series.points)
                        .color(color)
                        .radius(POINT_RADIUS)
                        .name(series.name),
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sal_core::aggregate::year_series;
    use sal_core::record::Record;

    #[test]
    fn test_trend_series() {
        let years = year_series(&[
            Record::new(50_000.0, 2021, ExperienceLevel::Entry, "US"),
            Record::new(150_000.0, 2021, ExperienceLevel::Senior, "US"),
            Record::new(90_000.0, 2022, ExperienceLevel::Mid, "DE"),
        ]);
        let series = trend_series(&years);

        assert_eq!(series.len(), 5);
        assert_eq!(series[0].name, "Entry Level");
        assert_eq!(series[0].points, vec![[2021.0, 50_000.0], [2022.0, 0.0]]);
        assert_eq!(series[4].name, "Average");
        assert_eq!(series[4].points, vec![[2021.0, 100_000.0], [2022.0, 90_000.0]]);
        assert!(series[4].width > series[0].width);
        assert_eq!(series[4].color, ALL_LEVELS_COLOR);
    }
}
