//! Globe rotation state
//!
//! The globe spins on its own while idle and follows the pointer while it is
//! dragged. Only the UI thread mutates this state, once per frame or per drag
//! event, so two mutations never overlap.

use serde::{Deserialize, Serialize};

/// Default idle spin, degrees of longitude per frame
pub const DEFAULT_SPIN: f64 = 0.02;
/// Frames further apart than this do not advance the spin
pub const MAX_TICK_GAP_MS: f64 = 100.0;
/// Pixels of drag per degree of rotation
pub const DRAG_SENSITIVITY: f64 = 8.0;
/// Allowed zoom factors
pub const ZOOM_EXTENT: (f64, f64) = (0.8, 5.0);

/// Drag phase of the globe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationPhase {
    Idle,
    Dragging,
}

/// Rotation angles, spin velocity and zoom of the globe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeRotation {
    /// `[lambda, phi, gamma]` in degrees
    pub rotate: [f64; 3],
    /// Degrees applied per idle frame (`[lambda, phi, gamma]`)
    pub velocity: [f64; 3],
    pub phase: RotationPhase,
    /// Zoom factor within [`ZOOM_EXTENT`]
    pub zoom: f64,
    last_tick_ms: Option<f64>,
}

impl Default for GlobeRotation {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN)
    }
}

impl GlobeRotation {
    pub fn new(spin: f64) -> Self {
        Self {
            rotate: [0.0, 0.0, 0.0],
            velocity: [spin, 0.0, 0.0],
            phase: RotationPhase::Idle,
            zoom: 1.0,
            last_tick_ms: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == RotationPhase::Dragging
    }

    /// Frame callback. Advances longitude by the spin velocity while idle.
    /// Returns whether the rotation changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.is_dragging() {
            return false;
        }

        let gap = self.last_tick_ms.map(|last| now_ms - last);
        self.last_tick_ms = Some(now_ms);

        match gap {
            Some(gap) if gap < MAX_TICK_GAP_MS && self.velocity[0] != 0.0 => {
                self.rotate[0] = wrap_degrees(self.rotate[0] + self.velocity[0]);
                true
            }
            _ => false,
        }
    }

    pub fn begin_drag(&mut self, now_ms: f64) {
        self.phase = RotationPhase::Dragging;
        self.velocity = [0.0, 0.0, 0.0];
        self.last_tick_ms = Some(now_ms);
    }

    /// Apply a pointer delta in pixels. The delta also becomes the spin velocity,
    /// so the globe keeps turning after release.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        // A held pointer reports empty deltas; those must not zero the spin
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.velocity = [dx / DRAG_SENSITIVITY, -dy / DRAG_SENSITIVITY, 0.0];
        self.rotate[0] = wrap_degrees(self.rotate[0] + self.velocity[0]);
        self.rotate[1] = (self.rotate[1] + self.velocity[1]).clamp(-90.0, 90.0);
    }

    pub fn end_drag(&mut self) {
        self.phase = RotationPhase::Idle;
    }

    /// Multiply the zoom factor, clamped to [`ZOOM_EXTENT`]
    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(ZOOM_EXTENT.0, ZOOM_EXTENT.1);
        }
    }
}

fn wrap_degrees(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_tick_advances() {
        let mut rotation = GlobeRotation::default();
        assert!(!rotation.tick(0.0));
        assert!(rotation.tick(16.0));
        assert!((rotation.rotate[0] - DEFAULT_SPIN).abs() < 1e-12);
    }

    #[test]
    fn test_long_gap_does_not_advance() {
        let mut rotation = GlobeRotation::default();
        rotation.tick(0.0);
        assert!(!rotation.tick(500.0));
        assert_eq!(rotation.rotate[0], 0.0);
        assert!(rotation.tick(510.0));
    }

    #[test]
    fn test_drag_suspends_spin() {
        let mut rotation = GlobeRotation::default();
        rotation.tick(0.0);
        rotation.begin_drag(5.0);
        rotation.drag(16.0, 8.0);
        assert_eq!(rotation.rotate, [2.0, -1.0, 0.0]);
        assert!(!rotation.tick(10.0));
        assert_eq!(rotation.rotate, [2.0, -1.0, 0.0]);

        rotation.end_drag();
        rotation.tick(20.0);
        // Last drag velocity carries on as spin
        assert!((rotation.rotate[0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_still_pointer_keeps_drag_velocity() {
        let mut rotation = GlobeRotation::default();
        rotation.begin_drag(0.0);
        rotation.drag(16.0, 0.0);
        // Pointer held still for a frame before release
        rotation.drag(0.0, 0.0);
        assert_eq!(rotation.velocity, [2.0, 0.0, 0.0]);
        assert_eq!(rotation.rotate, [2.0, 0.0, 0.0]);

        rotation.end_drag();
        assert!(rotation.tick(10.0));
        assert!((rotation.rotate[0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut rotation = GlobeRotation::default();
        rotation.zoom_by(100.0);
        assert_eq!(rotation.zoom, ZOOM_EXTENT.1);
        rotation.zoom_by(0.0001);
        assert_eq!(rotation.zoom, ZOOM_EXTENT.0);
        rotation.zoom_by(f64::NAN);
        assert_eq!(rotation.zoom, ZOOM_EXTENT.0);
    }

    #[test]
    fn test_longitude_wraps() {
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(45.0), 45.0);
    }
}
