//! Donut chart of a categorical breakdown

use std::f32::consts::TAU;

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};

use sal_core::aggregate::CategoryShare;
use sal_core::record::CategoryField;
use sal_core::reference::label_for;

use super::utils::{category_color, format_percent};

/// Where the legend goes relative to the donut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    Bottom,
    Right,
}

/// How a legend row is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// `Remote: 12 (40.0%)`
    CountAndPercent,
    /// `Remote (40.0%)`
    Percent,
}

impl LabelFormat {
    pub fn format(self, label: &str, count: usize, ratio: f64) -> String {
        match self {
            LabelFormat::CountAndPercent => format!("{}: {} ({}%)", label, count, format_percent(ratio)),
            LabelFormat::Percent => format!("{} ({}%)", label, format_percent(ratio)),
        }
    }
}

/// Layout and text of a pie chart
#[derive(Debug, Clone, PartialEq)]
pub struct PieChartConfig {
    /// Outer size of the chart including title and legend
    pub size: Vec2,
    pub legend: LegendPosition,
    pub label: LabelFormat,
    pub title: String,
    /// Inner radius as a fraction of the outer radius
    pub inner_ratio: f32,
}

impl Default for PieChartConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(220.0, 300.0),
            legend: LegendPosition::Bottom,
            label: LabelFormat::CountAndPercent,
            title: String::new(),
            inner_ratio: 0.6,
        }
    }
}

impl PieChartConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_legend(mut self, legend: LegendPosition) -> Self {
        self.legend = legend;
        self
    }

    pub fn with_label(mut self, label: LabelFormat) -> Self {
        self.label = label;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }
}

/// One slice, angles in radians clockwise from twelve o'clock
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub ratio: f64,
    pub start: f32,
    pub end: f32,
    pub color: Color32,
}

/// Lay out slices in the order of the breakdown
pub fn pie_slices(shares: &[CategoryShare], field: CategoryField) -> Vec<PieSlice> {
    let total: usize = shares.iter().map(|s| s.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut angle = 0.0f32;
    shares
        .iter()
        .enumerate()
        .map(|(idx, share)| {
            let sweep = TAU * share.count as f32 / total as f32;
            let slice = PieSlice {
                label: label_for(field, &share.key).into_owned(),
                count: share.count,
                ratio: share.ratio,
                start: angle,
                end: angle + sweep,
                color: category_color(idx),
            };
            angle += sweep;
            slice
        })
        .collect()
}

/// Parameterized donut chart
pub struct PieChart {
    pub config: PieChartConfig,
}

const TITLE_HEIGHT: f32 = 30.0;
const LEGEND_ROW: f32 = 20.0;
const LEGEND_BOTTOM_SPACE: f32 = 100.0;

impl PieChart {
    pub fn new(config: PieChartConfig) -> Self {
        Self { config }
    }

    fn radius(&self) -> f32 {
        let size = self.config.size;
        match self.config.legend {
            LegendPosition::Bottom => size.x.min(size.y - TITLE_HEIGHT - LEGEND_BOTTOM_SPACE) / 2.0 - 5.0,
            LegendPosition::Right => (size.x * 0.5).min(size.y - TITLE_HEIGHT) / 2.0 - 5.0,
        }
        .max(10.0)
    }

    /// Draw the chart for one breakdown
    pub fn ui(&self, ui: &mut Ui, shares: &[CategoryShare], field: CategoryField, opacity: f32) {
        let (rect, response) = ui.allocate_exact_size(self.config.size, Sense::hover());
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color().gamma_multiply(opacity);

        painter.text(
            Pos2::new(rect.center().x, rect.top() + TITLE_HEIGHT / 2.0),
            Align2::CENTER_CENTER,
            &self.config.title,
            FontId::proportional(14.0),
            text_color,
        );

        let slices = pie_slices(shares, field);
        let radius = self.radius();
        let center = match self.config.legend {
            LegendPosition::Bottom => Pos2::new(rect.center().x, rect.top() + TITLE_HEIGHT + radius + 10.0),
            LegendPosition::Right => Pos2::new(rect.left() + radius + 10.0, rect.top() + TITLE_HEIGHT + radius + 10.0),
        };
        let inner = radius * self.config.inner_ratio;

        let hovered = response.hover_pos().and_then(|pos| slice_at(&slices, center, inner, radius, pos));

        for (idx, slice) in slices.iter().enumerate() {
            let mut color = slice.color.gamma_multiply(opacity);
            if hovered == Some(idx) {
                color = brighten(color);
            }
            draw_arc(&painter, center, inner, radius, slice.start, slice.end, color);
        }

        let legend_origin = match self.config.legend {
            LegendPosition::Bottom => Pos2::new(rect.center().x - 60.0, rect.bottom() - LEGEND_BOTTOM_SPACE + 10.0),
            LegendPosition::Right => Pos2::new(center.x + radius + 20.0, center.y - radius),
        };
        for (idx, slice) in slices.iter().enumerate() {
            let row = legend_origin + Vec2::new(0.0, idx as f32 * LEGEND_ROW);
            painter.rect_filled(
                Rect::from_min_size(row, Vec2::splat(10.0)),
                Rounding::ZERO,
                slice.color.gamma_multiply(opacity),
            );
            painter.text(
                row + Vec2::new(15.0, 5.0),
                Align2::LEFT_CENTER,
                self.config.label.format(&slice.label, slice.count, slice.ratio),
                FontId::proportional(10.0),
                text_color,
            );
        }

        if let Some(slice) = hovered.and_then(|idx| slices.get(idx)) {
            response.on_hover_text_at_pointer(LabelFormat::CountAndPercent.format(&slice.label, slice.count, slice.ratio));
        }
    }
}

/// Slice under a screen position
fn slice_at(slices: &[PieSlice], center: Pos2, inner: f32, outer: f32, pos: Pos2) -> Option<usize> {
    let offset = pos - center;
    let distance = offset.length();
    if distance < inner || distance > outer {
        return None;
    }
    // Clockwise from twelve o'clock
    let angle = offset.x.atan2(-offset.y).rem_euclid(TAU);
    slices.iter().position(|s| angle >= s.start && angle < s.end)
}

fn draw_arc(painter: &egui::Painter, center: Pos2, inner: f32, outer: f32, start: f32, end: f32, color: Color32) {
    let segments = ((end - start).to_degrees() / 2.0).ceil().max(1.0) as usize;
    let point = |angle: f32, radius: f32| center + Vec2::new(angle.sin(), -angle.cos()) * radius;

    for i in 0..segments {
        let a0 = start + (end - start) * i as f32 / segments as f32;
        let a1 = start + (end - start) * (i + 1) as f32 / segments as f32;
        painter.add(Shape::convex_polygon(
            vec![point(a0, inner), point(a0, outer), point(a1, outer), point(a1, inner)],
            color,
            Stroke::NONE,
        ));
    }

    // Slice separators
    let separator = Stroke::new(1.0, Color32::WHITE);
    painter.line_segment([point(start, inner), point(start, outer)], separator);
}

fn brighten(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r().saturating_add(30),
        color.g().saturating_add(30),
        color.b().saturating_add(30),
        color.a(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shares() -> Vec<CategoryShare> {
        vec![
            CategoryShare { key: "100".into(), count: 3, ratio: 0.75 },
            CategoryShare { key: "0".into(), count: 1, ratio: 0.25 },
        ]
    }

    #[test]
    fn test_pie_slices_cover_circle() {
        let slices = pie_slices(&shares(), CategoryField::RemoteRatio);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Remote");
        assert_eq!(slices[1].label, "No Remote");
        assert_eq!(slices[0].start, 0.0);
        assert!((slices[0].end - 0.75 * TAU).abs() < 1e-5);
        assert!((slices[1].end - TAU).abs() < 1e-5);
        assert_ne!(slices[0].color, slices[1].color);
        assert!(pie_slices(&[], CategoryField::CompanySize).is_empty());
    }

    #[test]
    fn test_label_format() {
        assert_eq!(LabelFormat::CountAndPercent.format("Remote", 3, 0.75), "Remote: 3 (75.0%)");
        assert_eq!(LabelFormat::Percent.format("Remote", 3, 0.75), "Remote (75.0%)");
    }

    #[test]
    fn test_default_layout() {
        let chart = PieChart::new(PieChartConfig::new("Remote Work Distribution"));
        assert_eq!(chart.config.legend, LegendPosition::Bottom);
        assert_eq!(chart.radius(), 80.0);
        assert_eq!(chart.config.inner_ratio, 0.6);
    }

    #[test]
    fn test_slice_at() {
        let slices = pie_slices(&shares(), CategoryField::RemoteRatio);
        let center = Pos2::new(100.0, 100.0);
        // Right of center is a quarter turn, inside the first slice
        assert_eq!(slice_at(&slices, center, 48.0, 80.0, Pos2::new(160.0, 100.0)), Some(0));
        // Left of center is three quarters, the start of the second slice
        assert_eq!(slice_at(&slices, center, 48.0, 80.0, Pos2::new(39.0, 99.0)), Some(1));
        // The hole
        assert_eq!(slice_at(&slices, center, 48.0, 80.0, Pos2::new(110.0, 100.0)), None);
    }
}
