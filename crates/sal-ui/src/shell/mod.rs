use egui::{Context, RichText, TopBottomPanel};

use crate::{ErrorMessage, UiState};

/// What the user picked from the menu bar this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    OpenSalaryCsv,
    OpenWorldGeometry,
    ToggleTheme,
    Quit,
}

/// Render the main menu bar
pub fn menu_bar(ctx: &Context, ui_state: &UiState) -> Option<MenuAction> {
    let mut action = None;

    TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open salary CSV...").clicked() {
                    action = Some(MenuAction::OpenSalaryCsv);
                    ui.close_menu();
                }
                if ui.button("Open world GeoJSON...").clicked() {
                    action = Some(MenuAction::OpenWorldGeometry);
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Exit").clicked() {
                    action = Some(MenuAction::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                let label = if ui_state.theme.dark_mode { "Light theme" } else { "Dark theme" };
                if ui.button(label).clicked() {
                    action = Some(MenuAction::ToggleTheme);
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui_state.loading {
                    ui.spinner();
                    ui.label("Loading...");
                } else if let Some(source) = &ui_state.source_name {
                    ui.label(RichText::new(source).weak());
                }
            });
        });
    });

    action
}

/// Show error messages, dropping those older than ten seconds
pub fn show_error_messages(ui: &mut egui::Ui, ui_state: &mut UiState) {
    let now = std::time::Instant::now();
    ui_state
        .error_messages
        .retain(|msg: &ErrorMessage| now.duration_since(msg.timestamp).as_secs() < 10);

    for msg in &ui_state.error_messages {
        egui::Frame::none()
            .fill(crate::theme::error_color().linear_multiply(0.2))
            .stroke(egui::Stroke::new(1.0, crate::theme::error_color()))
            .rounding(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").color(crate::theme::error_color()));
                    ui.label(&msg.title);
                    ui.separator();
                    ui.label(&msg.message);
                });
            });
    }
}

/// Placeholder while no dataset is loaded
pub fn show_empty_state(ui: &mut egui::Ui, loading: bool) -> bool {
    let mut open_requested = false;
    ui.vertical_centered(|ui| {
        ui.add_space(100.0);
        ui.heading("Salary Atlas");
        ui.add_space(20.0);

        if loading {
            ui.spinner();
            ui.label("Loading salary data...");
        } else {
            ui.label("Open a salary CSV to begin");
            ui.add_space(20.0);
            open_requested = ui.button("Open salary CSV...").clicked();
        }
    });
    open_requested
}
