use nodeweave_engine::coords::Vec2;

/// Multiplicative zoom step per wheel notch.
pub const ZOOM_IN_FACTOR: f32 = 1.1;
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

/// 2D pan/zoom transform between world and screen space.
///
/// `(x, y)` is the world point shown at the screen's top-left corner and
/// `scale` is screen pixels per world unit.
///
/// Invariant: `scale > 0` and finite. Constructors replace anything else by `1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

impl Camera {
    pub fn new(x: f32, y: f32, scale: f32) -> Self {
        let scale = if scale > 0.0 && scale.is_finite() {
            scale
        } else {
            log::warn!("camera scale {scale} is not positive; using 1.0");
            1.0
        };
        Self { x, y, scale }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn screen_to_world(&self, s: Vec2) -> Vec2 {
        s / self.scale + self.origin()
    }

    #[inline]
    pub fn world_to_screen(&self, w: Vec2) -> Vec2 {
        (w - self.origin()) * self.scale
    }

    /// Moves the view so content follows a pointer that moved `delta` screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.x -= delta.x / self.scale;
        self.y -= delta.y / self.scale;
    }

    /// Zooms one step toward `pointer` (screen space).
    ///
    /// Positive `direction` zooms in, negative zooms out, zero does nothing.
    /// The world point under `pointer` is unchanged. Returns whether the
    /// camera changed.
    pub fn zoom_at(&mut self, pointer: Vec2, direction: f32) -> bool {
        let factor = if direction > 0.0 {
            ZOOM_IN_FACTOR
        } else if direction < 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            return false;
        };

        let new_scale = self.scale * factor;
        if !(new_scale > 0.0 && new_scale.is_finite()) {
            return false;
        }

        let before = self.screen_to_world(pointer);
        self.scale = new_scale;
        let after = self.screen_to_world(pointer);

        self.x += before.x - after.x;
        self.y += before.y - after.y;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec2, b: Vec2) {
        let tol = 1e-3 * (1.0 + a.x.abs().max(a.y.abs()));
        assert!((a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol, "{a:?} != {b:?}");
    }

    #[test]
    fn transforms_round_trip() {
        let cams = [
            Camera::new(0.0, 0.0, 1.0),
            Camera::new(-250.0, 40.5, 0.35),
            Camera::new(1000.0, -3000.0, 7.0),
        ];
        let points = [Vec2::new(0.0, 0.0), Vec2::new(123.4, -56.7), Vec2::new(800.0, 600.0)];

        for cam in cams {
            for p in points {
                assert_close(cam.world_to_screen(cam.screen_to_world(p)), p);
                assert_close(cam.screen_to_world(cam.world_to_screen(p)), p);
            }
        }
    }

    #[test]
    fn non_positive_scale_is_replaced() {
        assert_eq!(Camera::new(1.0, 2.0, 0.0).scale(), 1.0);
        assert_eq!(Camera::new(1.0, 2.0, -4.0).scale(), 1.0);
        assert_eq!(Camera::new(1.0, 2.0, f32::NAN).scale(), 1.0);
    }

    #[test]
    fn pan_moves_opposite_to_drag_in_world_units() {
        let mut cam = Camera::new(10.0, 10.0, 2.0);
        cam.pan(Vec2::new(20.0, -8.0));
        assert_eq!(cam.origin(), Vec2::new(0.0, 14.0));
    }

    #[test]
    fn wheel_up_at_pointer_zooms_in_around_it() {
        let mut cam = Camera::default();
        let p = Vec2::new(100.0, 100.0);
        let before = cam.screen_to_world(p);

        assert!(cam.zoom_at(p, 1.0));
        assert!((cam.scale() - 1.1).abs() < 1e-6);
        assert_close(cam.screen_to_world(p), before);
    }

    #[test]
    fn zoom_keeps_pointer_world_point_for_any_scale() {
        for scale in [0.05, 0.5, 1.0, 3.0, 40.0] {
            for dir in [1.0, -1.0, 3.0, -0.25] {
                let mut cam = Camera::new(-120.0, 75.0, scale);
                let p = Vec2::new(333.0, 21.0);
                let before = cam.screen_to_world(p);
                cam.zoom_at(p, dir);
                assert_close(cam.screen_to_world(p), before);
            }
        }
    }

    #[test]
    fn zero_wheel_delta_does_not_zoom() {
        let mut cam = Camera::new(5.0, 5.0, 2.0);
        assert!(!cam.zoom_at(Vec2::new(50.0, 50.0), 0.0));
        assert_eq!(cam, Camera::new(5.0, 5.0, 2.0));
    }
}
