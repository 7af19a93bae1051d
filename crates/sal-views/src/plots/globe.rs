//! Globe choropleth of average salary per country

use std::sync::Arc;

use egui::{Align2, Color32, FontId, Mesh, Pos2, Rect, Response, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use geo::TriangulateEarcut;
use tracing::debug;

use sal_core::aggregate::CountryStats;
use sal_core::rotation::GlobeRotation;
use sal_core::Command;
use sal_data::WorldGeometry;

use super::projection::Orthographic;
use super::utils::{format_currency, format_k, salary_color, NO_DATA_COLOR};
use crate::{DashboardView, ViewKind, ViewerContext};

/// Globe radius relative to the view height at zoom 1
const GLOBE_FILL: f32 = 1.0 / 2.2;
const OCEAN_CENTER: Color32 = Color32::from_rgb(0x00, 0x20, 0x4b);
const OCEAN_EDGE: Color32 = Color32::BLACK;
const OCEAN_STEPS: usize = 12;
const LEGEND_STOPS: usize = 20;

/// Country outline prepared for drawing: triangles for the fill, rings for the border
struct CountryMesh {
    id: String,
    triangles: Vec<[(f64, f64); 3]>,
    rings: Vec<Vec<(f64, f64)>>,
}

impl CountryMesh {
    fn build(world: &WorldGeometry) -> Vec<Self> {
        world
            .countries()
            .iter()
            .map(|country| {
                let mut triangles = Vec::new();
                let mut rings = Vec::new();

                for polygon in &country.geometry.0 {
                    triangles.extend(polygon.earcut_triangles().into_iter().map(|t| {
                        let [a, b, c] = t.to_array();
                        [(a.x, a.y), (b.x, b.y), (c.x, c.y)]
                    }));

                    rings.push(polygon.exterior().coords().map(|c| (c.x, c.y)).collect());
                    for interior in polygon.interiors() {
                        rings.push(interior.coords().map(|c| (c.x, c.y)).collect());
                    }
                }

                CountryMesh {
                    id: country.id.clone(),
                    triangles,
                    rings,
                }
            })
            .collect()
    }
}

/// Rotating orthographic globe, colored by the filtered country statistics
pub struct GlobeView {
    title: String,
    rotation: GlobeRotation,
    world: Option<Arc<WorldGeometry>>,
    meshes: Vec<CountryMesh>,
    hovered: Option<(String, String)>,
}

impl GlobeView {
    pub fn new(spin: f64) -> Self {
        Self {
            title: "Average Salary by Country".to_string(),
            rotation: GlobeRotation::new(spin),
            world: None,
            meshes: Vec::new(),
            hovered: None,
        }
    }

    /// Re-triangulate when a different world was loaded
    fn sync_world(&mut self, world: &Arc<WorldGeometry>) {
        let current = self.world.as_ref().map_or(false, |w| Arc::ptr_eq(w, world));
        if !current {
            self.meshes = CountryMesh::build(world);
            self.world = Some(world.clone());
            debug!(countries = self.meshes.len(), "triangulated world geometry");
        }
    }

    fn projection(&self, rect: Rect) -> Orthographic {
        let scale = rect.height().min(rect.width()) * GLOBE_FILL * self.rotation.zoom as f32;
        Orthographic::new(rect.center(), scale, self.rotation.rotate)
    }

    fn fill_color(stats: &CountryStats, extent: Option<(f64, f64)>, id: &str) -> Color32 {
        match (stats.get(id), extent) {
            (Some(stat), Some(extent)) if stat.avg_salary > 0.0 => salary_color(stat.avg_salary, extent),
            _ => NO_DATA_COLOR,
        }
    }

    fn draw_globe(&self, ctx: &ViewerContext, painter: &egui::Painter, projection: &Orthographic) {
        let fade = |color: Color32| color.gamma_multiply(ctx.opacity);

        // Ocean, approximating a radial gradient with concentric discs
        for step in (1..=OCEAN_STEPS).rev() {
            let t = step as f32 / OCEAN_STEPS as f32;
            painter.circle_filled(projection.center, projection.scale * t, fade(lerp_color(OCEAN_CENTER, OCEAN_EDGE, t)));
        }

        let stats = &ctx.snapshot.country_stats;
        let extent = stats.salary_extent();
        let mut mesh = Mesh::default();

        for country in &self.meshes {
            let color = fade(Self::fill_color(stats, extent, &country.id));

            for triangle in &country.triangles {
                let projected = triangle.map(|(lon, lat)| projection.project(lon, lat));
                if projected.iter().all(|p| !p.visible) {
                    continue;
                }
                let base = mesh.vertices.len() as u32;
                for p in &projected {
                    mesh.colored_vertex(p.pos, color);
                }
                mesh.add_triangle(base, base + 1, base + 2);
            }
        }
        painter.add(Shape::mesh(mesh));

        let hovered_id = self.hovered.as_ref().map(|(id, _)| id.as_str());
        for country in &self.meshes {
            let stroke = if Some(country.id.as_str()) == hovered_id {
                Stroke::new(2.0, fade(Color32::WHITE))
            } else {
                Stroke::new(0.5, fade(Color32::from_gray(0x99)))
            };
            for ring in &country.rings {
                draw_ring(painter, projection, ring, stroke);
            }
        }

        painter.circle_stroke(projection.center, projection.scale, Stroke::new(0.2, fade(Color32::from_gray(0x33))));
    }

    fn draw_legend(&self, ctx: &ViewerContext, painter: &egui::Painter, rect: Rect) {
        let Some((min, max)) = ctx.snapshot.country_stats.salary_extent() else {
            return;
        };
        let fade = |color: Color32| color.gamma_multiply(ctx.opacity);
        let text_color = fade(Color32::from_gray(20));

        let frame = Rect::from_min_size(rect.left_bottom() + Vec2::new(20.0, -270.0), Vec2::new(110.0, 250.0));
        painter.rect_filled(frame, Rounding::same(4.0), fade(Color32::from_rgba_unmultiplied(255, 255, 255, 230)));

        let origin = frame.min + Vec2::new(10.0, 10.0);
        painter.text(origin, Align2::LEFT_TOP, "Average", FontId::proportional(12.0), text_color);
        painter.text(origin + Vec2::new(0.0, 15.0), Align2::LEFT_TOP, "Salary (USD)", FontId::proportional(12.0), text_color);

        // Vertical gradient, stops spaced logarithmically between min and max
        let bar = Rect::from_min_size(origin + Vec2::new(10.0, 35.0), Vec2::new(20.0, 150.0));
        let step_height = bar.height() / LEGEND_STOPS as f32;
        for i in 0..LEGEND_STOPS {
            let t = (i as f64 + 0.5) / LEGEND_STOPS as f64;
            let value = (min.ln() * (1.0 - t) + max.ln() * t).exp();
            let stop = Rect::from_min_size(
                Pos2::new(bar.left(), bar.bottom() - step_height * (i as f32 + 1.0)),
                Vec2::new(bar.width(), step_height + 0.5),
            );
            painter.rect_filled(stop, Rounding::ZERO, fade(salary_color(value, (min, max))));
        }
        painter.text(bar.right_top() + Vec2::new(5.0, 0.0), Align2::LEFT_CENTER, format_k(max), FontId::proportional(10.0), text_color);
        painter.text(bar.right_bottom() + Vec2::new(5.0, 0.0), Align2::LEFT_CENTER, format_k(min), FontId::proportional(10.0), text_color);

        let swatch = Rect::from_min_size(Pos2::new(bar.left(), bar.bottom() + 20.0), Vec2::splat(20.0));
        painter.rect_filled(swatch, Rounding::ZERO, fade(NO_DATA_COLOR));
        painter.text(swatch.right_center() + Vec2::new(5.0, 0.0), Align2::LEFT_CENTER, "No data", FontId::proportional(10.0), text_color);
    }

    fn handle_interaction(&mut self, ctx: &ViewerContext, ui: &Ui, response: &Response, projection: &Orthographic) {
        if response.drag_started() {
            self.rotation.begin_drag(ctx.frame_time_ms);
        }
        if response.dragged() {
            let delta = response.drag_delta();
            self.rotation.drag(delta.x as f64, delta.y as f64);
        }
        if response.drag_released() {
            self.rotation.end_drag();
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.scroll_delta.y);
            if scroll != 0.0 {
                self.rotation.zoom_by((scroll as f64 * 0.002).exp());
            }
        }

        self.hovered = response
            .hover_pos()
            .and_then(|pos| projection.invert(pos))
            .and_then(|(lon, lat)| ctx.world.country_at(lon, lat))
            .map(|country| (country.id.clone(), country.name.clone()));

        let Some((id, name)) = self.hovered.clone() else {
            return;
        };
        let stat = ctx.snapshot.country_stats.get(&id).copied();

        response.clone().on_hover_ui_at_pointer(|ui| {
            ui.strong(&name);
            match stat {
                Some(stat) => {
                    ui.label(format!("Average Salary: {}", format_currency(stat.avg_salary)));
                    ui.label(format!("Sample Size: {}", stat.count));
                }
                None => {
                    ui.label("No data available");
                }
            }
        });

        if response.clicked() && stat.map_or(false, |s| s.count > 0) {
            ctx.emit(Command::OpenCountryDrilldown { code: id, name });
        }
    }
}

impl DashboardView for GlobeView {
    fn kind(&self) -> ViewKind {
        ViewKind::Globe
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        self.sync_world(&ctx.world);

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let projection = self.projection(rect);
        self.handle_interaction(ctx, ui, &response, &projection);

        // Drag and zoom may have changed the projection
        let projection = self.projection(rect);
        let painter = ui.painter_at(rect);
        self.draw_globe(ctx, &painter, &projection);
        self.draw_legend(ctx, &painter, rect);

        if ctx.world.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No world geometry loaded",
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
        }
    }

    fn on_frame_update(&mut self, ctx: &ViewerContext, _dt: f32) {
        self.rotation.tick(ctx.frame_time_ms);
    }

    fn is_animating(&self) -> bool {
        true
    }
}

/// Stroke the visible runs of a ring
fn draw_ring(painter: &egui::Painter, projection: &Orthographic, ring: &[(f64, f64)], stroke: Stroke) {
    let mut run: Vec<Pos2> = Vec::new();
    for &(lon, lat) in ring {
        let p = projection.project(lon, lat);
        if p.visible {
            run.push(p.pos);
        } else if run.len() > 1 {
            painter.add(Shape::line(std::mem::take(&mut run), stroke));
        } else {
            run.clear();
        }
    }
    if run.len() > 1 {
        painter.add(Shape::line(run, stroke));
    }
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, MultiPolygon};
    use sal_core::aggregate::country_stats;
    use sal_core::record::{ExperienceLevel, Record};
    use sal_core::reference::CountryCodeMap;
    use sal_data::CountryShape;

    fn world() -> WorldGeometry {
        WorldGeometry::new(vec![CountryShape {
            id: "840".into(),
            name: "United States".into(),
            geometry: MultiPolygon(vec![polygon![
                (x: -120.0, y: 30.0),
                (x: -70.0, y: 30.0),
                (x: -70.0, y: 48.0),
                (x: -120.0, y: 48.0),
            ]]),
        }])
    }

    #[test]
    fn test_mesh_build() {
        let meshes = CountryMesh::build(&world());
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].triangles.len(), 2);
        assert_eq!(meshes[0].rings.len(), 1);
    }

    #[test]
    fn test_fill_color() {
        let records = vec![
            Record::new(50_000.0, 2021, ExperienceLevel::Entry, "US"),
            Record::new(90_000.0, 2022, ExperienceLevel::Mid, "DE"),
        ];
        let stats = country_stats(&records, CountryCodeMap::builtin());
        let extent = stats.salary_extent();

        assert_eq!(GlobeView::fill_color(&stats, extent, "840"), salary_color(50_000.0, (50_000.0, 90_000.0)));
        assert_eq!(GlobeView::fill_color(&stats, extent, "250"), NO_DATA_COLOR);
    }

    #[test]
    fn test_sync_world_caches_by_identity() {
        let mut view = GlobeView::new(0.02);
        let world = Arc::new(world());
        view.sync_world(&world);
        assert_eq!(view.meshes.len(), 1);

        view.sync_world(&Arc::new(WorldGeometry::default()));
        assert!(view.meshes.is_empty());
    }

    #[test]
    fn test_lerp_color() {
        assert_eq!(lerp_color(OCEAN_CENTER, OCEAN_EDGE, 0.0), OCEAN_CENTER);
        assert_eq!(lerp_color(OCEAN_CENTER, OCEAN_EDGE, 1.0), OCEAN_EDGE);
    }
}
