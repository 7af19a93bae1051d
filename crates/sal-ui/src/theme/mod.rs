use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "Atlas Light".to_string(),
            dark_mode: false,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "Atlas Dark".to_string(),
            dark_mode: true,
        }
    }
}

struct Palette {
    bg: Color32,
    panel_bg: Color32,
    widget_bg: Color32,
    hover: Color32,
    active: Color32,
    border: Color32,
    text: Color32,
}

const LIGHT: Palette = Palette {
    bg: Color32::from_rgb(250, 250, 250),
    panel_bg: Color32::from_rgb(255, 255, 255),
    widget_bg: Color32::from_rgb(240, 240, 240),
    hover: Color32::from_rgb(228, 228, 228),
    active: Color32::from_rgb(215, 215, 215),
    border: Color32::from_rgb(204, 204, 204),
    text: Color32::from_rgb(33, 33, 33),
};

const DARK: Palette = Palette {
    bg: Color32::from_rgb(23, 23, 23),
    panel_bg: Color32::from_rgb(31, 31, 31),
    widget_bg: Color32::from_rgb(40, 40, 40),
    hover: Color32::from_rgb(50, 50, 50),
    active: Color32::from_rgb(60, 60, 60),
    border: Color32::from_rgb(70, 70, 70),
    text: Color32::from_rgb(220, 220, 220),
};

/// Apply the dashboard theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let (mut visuals, palette) = if theme.dark_mode {
        (Visuals::dark(), &DARK)
    } else {
        (Visuals::light(), &LIGHT)
    };
    let accent = accent_color();

    visuals.window_fill = palette.panel_bg;
    visuals.panel_fill = palette.panel_bg;
    visuals.extreme_bg_color = palette.bg;
    visuals.faint_bg_color = palette.widget_bg;

    for (widget, fill) in [
        (&mut visuals.widgets.noninteractive, palette.widget_bg),
        (&mut visuals.widgets.inactive, palette.widget_bg),
        (&mut visuals.widgets.hovered, palette.hover),
        (&mut visuals.widgets.active, palette.active),
    ] {
        widget.bg_fill = fill;
        widget.bg_stroke = Stroke::new(1.0, palette.border);
        widget.fg_stroke = Stroke::new(1.0, palette.text);
        widget.rounding = Rounding::same(5.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    visuals.window_shadow.extrusion = 10.0;
    visuals.popup_shadow.extrusion = 4.0;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);
    // Wide enough for the salary sliders
    style.spacing.slider_width = 260.0;

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(10.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    style.visuals = visuals;
    ctx.set_style(style);
}

/// Steel blue, shared with the job bars
pub fn accent_color() -> Color32 {
    Color32::from_rgb(70, 130, 180)
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(230, 80, 80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_theme_switches_mode() {
        let ctx = Context::default();
        apply_theme(&ctx, &Theme::dark());
        assert!(ctx.style().visuals.dark_mode);
        assert_eq!(ctx.style().visuals.panel_fill, DARK.panel_bg);

        apply_theme(&ctx, &Theme::default());
        assert!(!ctx.style().visuals.dark_mode);
        assert_eq!(ctx.style().visuals.widgets.active.bg_stroke.color, accent_color());
    }
}
