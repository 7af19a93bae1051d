//! Color utilities for plots

use egui::Color32;
use sal_core::record::ExperienceLevel;

/// Fill of countries without records (`#ccc`)
pub const NO_DATA_COLOR: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

/// Trend line of the all-levels average (`#9467bd`)
pub const ALL_LEVELS_COLOR: Color32 = Color32::from_rgb(0x94, 0x67, 0xbd);

fn to_color32(color: colorous::Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

/// Categorical color from the category10 palette
pub fn category_color(index: usize) -> Color32 {
    to_color32(colorous::CATEGORY10[index % colorous::CATEGORY10.len()])
}

/// Color of an experience level in stacks, lines and legends
pub fn level_color(level: ExperienceLevel) -> Color32 {
    category_color(level.index())
}

/// Viridis color map
pub fn viridis_color(t: f32) -> Color32 {
    to_color32(colorous::VIRIDIS.eval_continuous(t.clamp(0.0, 1.0) as f64))
}

/// Sequential viridis scale over `extent`, clamped. A degenerate extent maps
/// to the middle of the scale.
pub fn salary_color(value: f64, extent: (f64, f64)) -> Color32 {
    let (min, max) = extent;
    let t = if max > min { (value - min) / (max - min) } else { 0.5 };
    viridis_color(t as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_colors_follow_category10() {
        assert_eq!(level_color(ExperienceLevel::Entry), Color32::from_rgb(0x1f, 0x77, 0xb4));
        assert_eq!(level_color(ExperienceLevel::Mid), Color32::from_rgb(0xff, 0x7f, 0x0e));
        assert_eq!(level_color(ExperienceLevel::Senior), Color32::from_rgb(0x2c, 0xa0, 0x2c));
        assert_eq!(level_color(ExperienceLevel::Executive), Color32::from_rgb(0xd6, 0x27, 0x28));
        assert_eq!(category_color(4), ALL_LEVELS_COLOR);
        assert_eq!(category_color(10), category_color(0));
    }

    #[test]
    fn test_salary_color_clamps() {
        let extent = (50_000.0, 150_000.0);
        assert_eq!(salary_color(10_000.0, extent), viridis_color(0.0));
        assert_eq!(salary_color(500_000.0, extent), viridis_color(1.0));
        assert_eq!(salary_color(90_000.0, (90_000.0, 90_000.0)), viridis_color(0.5));
        assert_ne!(viridis_color(0.0), viridis_color(1.0));
    }
}
