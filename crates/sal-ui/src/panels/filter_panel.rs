//! Salary range sliders, year checkboxes and the view toggle

use egui::{RichText, Slider, Ui};
use tracing::trace;

use sal_core::drilldown::group_thousands;
use sal_core::filter::{FilterState, SALARY_DOMAIN_MAX, SALARY_DOMAIN_MIN, SALARY_STEP};
use sal_core::{Command, ViewMode};
use sal_views::ViewerContext;

/// Seconds for the year checkboxes to fade when the view changes
const YEAR_FADE_SECS: f32 = 0.85;

/// `Salary range: $5,000 - $450,000`, whatever order the handles are in
pub fn range_label(a: f64, b: f64) -> String {
    format!(
        "Salary range: ${} - ${}",
        group_thousands(a.min(b)),
        group_thousands(a.max(b))
    )
}

/// Two independent slider handles over the salary domain. The handles may
/// cross; the store orders the pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPanel {
    low: f64,
    high: f64,
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self {
            low: SALARY_DOMAIN_MIN,
            high: SALARY_DOMAIN_MAX,
        }
    }
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handles(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// Follow the store after changes made elsewhere (reset, new dataset).
    /// Crossed handles that already describe the stored range stay put.
    pub fn sync(&mut self, filter: &FilterState) {
        let ordered = (self.low.min(self.high), self.high.max(self.low));
        if ordered != (filter.min_salary, filter.max_salary) {
            self.low = filter.min_salary;
            self.high = filter.max_salary;
        }
    }

    /// Move the handles, returning the command to send if anything changed
    pub fn set_handles(&mut self, low: f64, high: f64) -> Option<Command> {
        if (low, high) == (self.low, self.high) {
            return None;
        }
        self.low = low;
        self.high = high;
        Some(Command::SetSalaryRange { min: low, max: high })
    }

    pub fn ui(&mut self, ui: &mut Ui, ctx: &ViewerContext) {
        let snapshot = &ctx.snapshot;
        self.sync(&snapshot.filter);

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                let (mut low, mut high) = (self.low, self.high);
                let domain = SALARY_DOMAIN_MIN..=SALARY_DOMAIN_MAX;
                ui.add(Slider::new(&mut low, domain.clone()).step_by(SALARY_STEP).show_value(false));
                ui.add(Slider::new(&mut high, domain).step_by(SALARY_STEP).show_value(false));
                if let Some(command) = self.set_handles(low, high) {
                    trace!(low, high, "salary handles moved");
                    ctx.emit(command);
                }
                ui.label(range_label(self.low, self.high));
            });

            ui.separator();
            year_checkboxes(ui, ctx);
            ui.separator();

            ui.vertical(|ui| {
                if ui.button(snapshot.view_mode.toggle_label()).clicked() {
                    ctx.emit(Command::ToggleView);
                }
                if ui.button("Reset filters").clicked() {
                    ctx.emit(Command::ResetFilters);
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!(
                        "{} of {} records",
                        snapshot.filtered.len(),
                        snapshot.total_records
                    ))
                    .weak(),
                );
            });
        });
    }
}

/// Fades out while the trend view is shown
fn year_checkboxes(ui: &mut Ui, ctx: &ViewerContext) {
    let snapshot = &ctx.snapshot;
    let visible = ui.ctx().animate_bool_with_time(
        egui::Id::new("year_filter_fade"),
        snapshot.view_mode == ViewMode::MapHistogram,
        YEAR_FADE_SECS,
    );
    if visible <= 0.0 {
        return;
    }

    ui.vertical(|ui| {
        ui.set_enabled(visible >= 1.0);
        let faded = ui.visuals().text_color().gamma_multiply(visible);
        ui.visuals_mut().override_text_color = Some(faded);
        ui.horizontal(|ui| {
            ui.label("Work year");
            if ui.small_button("All").clicked() {
                ctx.emit(Command::SetYears(snapshot.available_years.clone()));
            }
            if ui.small_button("None").clicked() {
                ctx.emit(Command::SetYears(Vec::new()));
            }
        });
        ui.horizontal_wrapped(|ui| {
            for &year in &snapshot.available_years {
                let mut checked = snapshot.filter.is_year_selected(year);
                if ui.checkbox(&mut checked, year.to_string()).changed() {
                    ctx.emit(Command::ToggleYear(year));
                }
            }
        });
    });
}
