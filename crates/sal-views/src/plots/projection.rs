//! Rotated orthographic projection
//!
//! Rotation follows the usual `[lambda, phi, gamma]` convention: longitude is
//! shifted by lambda first, then the sphere is tilted by phi and rolled by gamma.

use egui::{Pos2, Vec2};

/// Maps longitude/latitude degrees onto a disc of radius `scale` around `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orthographic {
    pub center: Pos2,
    pub scale: f32,
    rotate: [f64; 3],
}

/// A projected point. Points on the far hemisphere are pushed onto the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub pos: Pos2,
    pub visible: bool,
}

impl Orthographic {
    pub fn new(center: Pos2, scale: f32, rotate: [f64; 3]) -> Self {
        Self { center, scale, rotate }
    }

    pub fn project(&self, lon: f64, lat: f64) -> Projected {
        let (lambda, phi) = self.rotate_forward(lon.to_radians(), lat.to_radians());
        let cos_phi = phi.cos();
        let x = cos_phi * lambda.sin();
        let y = phi.sin();
        let visible = cos_phi * lambda.cos() > 0.0;

        let offset = if visible {
            Vec2::new(x as f32, -y as f32)
        } else {
            // Clamp to the horizon along the same direction
            let len = (x * x + y * y).sqrt().max(f64::EPSILON);
            Vec2::new((x / len) as f32, (-y / len) as f32)
        };

        Projected {
            pos: self.center + offset * self.scale,
            visible,
        }
    }

    /// Longitude/latitude in degrees under a screen position, if it is on the globe
    pub fn invert(&self, pos: Pos2) -> Option<(f64, f64)> {
        let x = ((pos.x - self.center.x) / self.scale) as f64;
        let y = (-(pos.y - self.center.y) / self.scale) as f64;
        let rho2 = x * x + y * y;
        if rho2 > 1.0 {
            return None;
        }

        let lambda = x.atan2((1.0 - rho2).sqrt());
        let phi = y.clamp(-1.0, 1.0).asin();
        let (lon, lat) = self.rotate_inverse(lambda, phi);
        Some((wrap_longitude(lon.to_degrees()), lat.to_degrees()))
    }

    fn rotate_forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let [d_lambda, d_phi, d_gamma] = self.radians();
        let lon = lon + d_lambda;

        let cos_lat = lat.cos();
        let x = lon.cos() * cos_lat;
        let y = lon.sin() * cos_lat;
        let z = lat.sin();
        let k = z * d_phi.cos() + x * d_phi.sin();

        (
            (y * d_gamma.cos() - k * d_gamma.sin()).atan2(x * d_phi.cos() - z * d_phi.sin()),
            (k * d_gamma.cos() + y * d_gamma.sin()).clamp(-1.0, 1.0).asin(),
        )
    }

    fn rotate_inverse(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let [d_lambda, d_phi, d_gamma] = self.radians();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * d_gamma.cos() - y * d_gamma.sin();

        let lon = (y * d_gamma.cos() + z * d_gamma.sin()).atan2(x * d_phi.cos() + k * d_phi.sin());
        let lat = (k * d_phi.cos() - x * d_phi.sin()).clamp(-1.0, 1.0).asin();
        (lon - d_lambda, lat)
    }

    fn radians(&self) -> [f64; 3] {
        self.rotate.map(f64::to_radians)
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
