//! Camera fitting and animation.
//!
//! Fitting computes the web-mercator zoom at which a bounding box fills
//! the padded viewport, then eases the camera to it over a fixed
//! duration. Frame times come from the egui clock, so tests can drive
//! the animation with plain numbers.

use egui::Vec2;
use propmap_core::{Bounds, LngLat};

const TILE_SIZE: f64 = 256.0;
const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 19.0;
// Web Mercator latitude limit.
const MAX_LAT: f64 = 85.0511;

/// Options for a camera fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Viewport inset in pixels on every side.
    pub padding: f32,
    /// Transition time in milliseconds; zero jumps immediately.
    pub duration_ms: u64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: 80.0,
            duration_ms: 800,
        }
    }
}

/// Normalized web-mercator projection of a position, both axes in
/// `[0, 1]`, y growing southward.
fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LAT, MAX_LAT);
    let x = (lon + 180.0) / 360.0;
    let sin = lat.to_radians().sin();
    let y = 0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * std::f64::consts::PI);
    (x, y)
}

fn unproject_lat(y: f64) -> f64 {
    let n = std::f64::consts::PI * (1.0 - 2.0 * y);
    n.sinh().atan().to_degrees()
}

/// The camera pose (center, zoom) that fits `bounds` into `viewport`
/// with `padding` pixels of inset.
pub fn camera_for_bounds(bounds: &Bounds, viewport: Vec2, padding: f32) -> (LngLat, f64) {
    let (x0, y0) = mercator(bounds.west, bounds.north);
    let (x1, y1) = mercator(bounds.east, bounds.south);
    let dx = (x1 - x0).abs().max(1e-9);
    let dy = (y1 - y0).abs().max(1e-9);

    let usable_w = (viewport.x as f64 - 2.0 * padding as f64).max(1.0);
    let usable_h = (viewport.y as f64 - 2.0 * padding as f64).max(1.0);

    let zoom_x = (usable_w / (TILE_SIZE * dx)).log2();
    let zoom_y = (usable_h / (TILE_SIZE * dy)).log2();
    let zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);

    let center_lat = unproject_lat((y0 + y1) / 2.0);
    let center = LngLat::new((bounds.west + bounds.east) / 2.0, center_lat);
    (center, zoom)
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: LngLat,
    from_zoom: f64,
    to: LngLat,
    to_zoom: f64,
    start: f64,
    duration: f64,
}

/// Eases the camera between poses across frames.
#[derive(Debug, Default)]
pub struct CameraAnimator {
    current: Option<Animation>,
}

impl CameraAnimator {
    pub fn start(
        &mut self,
        from: (LngLat, f64),
        to: (LngLat, f64),
        duration_ms: u64,
        now: f64,
    ) {
        self.current = Some(Animation {
            from: from.0,
            from_zoom: from.1,
            to: to.0,
            to_zoom: to.1,
            start: now,
            duration: duration_ms as f64 / 1000.0,
        });
    }

    /// Advance the animation; returns the pose to apply this frame, or
    /// `None` when idle.
    pub fn tick(&mut self, now: f64) -> Option<(LngLat, f64)> {
        let anim = self.current?;
        let t = if anim.duration <= 0.0 {
            1.0
        } else {
            ((now - anim.start) / anim.duration).clamp(0.0, 1.0)
        };

        if t >= 1.0 {
            self.current = None;
            return Some((anim.to, anim.to_zoom));
        }

        let k = smoothstep(t);
        let center = LngLat::new(
            lerp(anim.from.lon, anim.to.lon, k),
            lerp(anim.from.lat, anim.to.lat, k),
        );
        let zoom = lerp(anim.from_zoom, anim.to_zoom, k);
        Some((center, zoom))
    }

    pub fn is_animating(&self) -> bool {
        self.current.is_some()
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(west: f64, south: f64, east: f64, north: f64) -> Bounds {
        let mut b = Bounds::empty();
        b.extend(west, south);
        b.extend(east, north);
        b
    }

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_zoom_shrinks_as_the_box_grows() {
        let (_, small) = camera_for_bounds(&bounds(-76.6, 39.1, -76.4, 39.3), VIEWPORT, 80.0);
        let (_, large) = camera_for_bounds(&bounds(-78.0, 38.0, -75.0, 40.0), VIEWPORT, 80.0);
        assert!(large < small);
    }

    #[test]
    fn test_fitted_center_is_the_midpoint() {
        let (center, _) = camera_for_bounds(&bounds(-77.0, 39.0, -76.0, 39.5), VIEWPORT, 80.0);
        assert!((center.lon - -76.5).abs() < 1e-9);
        // Mercator midpoint stays inside the box and near the linear midpoint.
        assert!(center.lat > 39.0 && center.lat < 39.5);
        assert!((center.lat - 39.25).abs() < 0.05);
    }

    #[test]
    fn test_more_padding_means_less_zoom() {
        let b = bounds(-76.9, 39.1, -76.2, 39.6);
        let (_, tight) = camera_for_bounds(&b, VIEWPORT, 0.0);
        let (_, padded) = camera_for_bounds(&b, VIEWPORT, 200.0);
        assert!(padded < tight);
    }

    #[test]
    fn test_animation_reaches_the_target_and_stops() {
        let mut animator = CameraAnimator::default();
        animator.start(
            (LngLat::new(0.0, 0.0), 4.0),
            (LngLat::new(10.0, 10.0), 8.0),
            800,
            100.0,
        );

        let (mid, mid_zoom) = animator.tick(100.4).unwrap();
        assert!(mid.lon > 0.0 && mid.lon < 10.0);
        assert!(mid_zoom > 4.0 && mid_zoom < 8.0);
        assert!(animator.is_animating());

        let (end, end_zoom) = animator.tick(101.0).unwrap();
        assert_eq!(end, LngLat::new(10.0, 10.0));
        assert_eq!(end_zoom, 8.0);
        assert!(!animator.is_animating());
        assert!(animator.tick(102.0).is_none());
    }

    #[test]
    fn test_zero_duration_jumps_immediately() {
        let mut animator = CameraAnimator::default();
        animator.start((LngLat::new(0.0, 0.0), 4.0), (LngLat::new(1.0, 1.0), 6.0), 0, 5.0);
        let (end, zoom) = animator.tick(5.0).unwrap();
        assert_eq!(end, LngLat::new(1.0, 1.0));
        assert_eq!(zoom, 6.0);
    }
}
