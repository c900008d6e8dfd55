//! Pan/zoom viewport eased toward a target framing
//!
//! The camera maps world coordinates to the screen as
//! `screen = (world - camera.xy) * scale + viewport_center`. User drags and
//! zooms move both the current and the target camera, so they never animate.

use std::time::Duration;

use super::layout::Bounds;

/// Smoothing factor per reference frame
pub const CAMERA_LERP: f64 = 0.15;
/// Frame length the smoothing factor is calibrated for
pub const REFERENCE_FRAME: Duration = Duration::from_micros(16_667);
pub const FRAME_PADDING: f64 = 50.0;
pub const MAX_FIT_SCALE: f64 = 1.5;
pub const MAX_FOCUS_SCALE: f64 = 1.8;
pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 3.0;

const SNAP_DISTANCE: f64 = 0.5;
const SNAP_SCALE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

/// Screen size in virtual pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

impl Camera {
    /// Fit `bounds` inside the viewport with padding, never magnifying past
    /// [`MAX_FIT_SCALE`]
    pub fn frame(bounds: Bounds, viewport: Viewport) -> Self {
        let (cx, cy) = bounds.center();
        let (w, h) = (bounds.width(), bounds.height());
        if w <= 0.0 || h <= 0.0 {
            return Camera {
                x: cx,
                y: cy,
                scale: 1.0,
            };
        }
        let sx = (viewport.width - 2.0 * FRAME_PADDING) / w;
        let sy = (viewport.height - 2.0 * FRAME_PADDING) / h;
        Camera {
            x: cx,
            y: cy,
            scale: sx.min(sy).min(MAX_FIT_SCALE),
        }
    }

    /// Centre on a node, zooming in further for deeper nodes
    pub fn focus(cx: f64, cy: f64, depth: usize) -> Self {
        Camera {
            x: cx,
            y: cy,
            scale: (0.9 + depth as f64 * 0.15).min(MAX_FOCUS_SCALE),
        }
    }

    pub fn to_screen(&self, viewport: Viewport, wx: f64, wy: f64) -> (f64, f64) {
        (
            (wx - self.x) * self.scale + viewport.width / 2.0,
            (wy - self.y) * self.scale + viewport.height / 2.0,
        )
    }

    /// World-space rectangle visible through `viewport`
    pub fn visible(&self, viewport: Viewport) -> Bounds {
        let half_w = viewport.width / (2.0 * self.scale);
        let half_h = viewport.height / (2.0 * self.scale);
        Bounds {
            min_x: self.x - half_w,
            max_x: self.x + half_w,
            min_y: self.y - half_h,
            max_y: self.y + half_h,
        }
    }
}

/// Current and target camera plus the easing flag
#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    current: Camera,
    target: Camera,
    animating: bool,
}

impl CameraRig {
    pub fn new(camera: Camera) -> Self {
        CameraRig {
            current: camera,
            target: camera,
            animating: false,
        }
    }

    pub fn current(&self) -> Camera {
        self.current
    }

    pub fn target(&self) -> Camera {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Start easing toward `target`
    pub fn retarget(&mut self, target: Camera) {
        self.target = target;
        self.animating = self.current != target;
    }

    /// Jump straight to `camera`
    pub fn snap(&mut self, camera: Camera) {
        self.current = camera;
        self.target = camera;
        self.animating = false;
    }

    /// Advance the exponential smoothing by `dt`
    pub fn tick(&mut self, dt: Duration) {
        if !self.animating {
            return;
        }
        let frames = dt.as_secs_f64() / REFERENCE_FRAME.as_secs_f64();
        let k = 1.0 - (1.0 - CAMERA_LERP).powf(frames);
        let (cur, tgt) = (&mut self.current, self.target);
        cur.x += (tgt.x - cur.x) * k;
        cur.y += (tgt.y - cur.y) * k;
        cur.scale += (tgt.scale - cur.scale) * k;

        if (tgt.x - cur.x).abs() <= SNAP_DISTANCE
            && (tgt.y - cur.y).abs() <= SNAP_DISTANCE
            && (tgt.scale - cur.scale).abs() <= SNAP_SCALE
        {
            self.current = tgt;
            self.animating = false;
        }
    }

    /// Drag by a screen-space delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.current.x -= dx / self.current.scale;
        self.current.y -= dy / self.current.scale;
        self.target.x = self.current.x;
        self.target.y = self.current.y;
    }

    /// Multiply the scale, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub fn zoom(&mut self, factor: f64) {
        let scale = (self.current.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.current.scale = scale;
        self.target.scale = scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Bounds {
        Bounds {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    #[test]
    fn test_frame_fits_with_padding_and_caps_scale() {
        let cam = Camera::frame(bounds(-100.0, 100.0, 0.0, 50.0), Viewport::new(300.0, 400.0));
        assert_eq!((cam.x, cam.y), (0.0, 25.0));
        assert!((cam.scale - 1.0).abs() < 1e-12);

        let tiny = Camera::frame(bounds(0.0, 10.0, 0.0, 10.0), Viewport::new(800.0, 600.0));
        assert_eq!(tiny.scale, MAX_FIT_SCALE);
    }

    #[test]
    fn test_focus_zoom_grows_with_depth_then_caps() {
        assert!((Camera::focus(0.0, 0.0, 0).scale - 0.9).abs() < 1e-12);
        assert!((Camera::focus(0.0, 0.0, 2).scale - 1.2).abs() < 1e-12);
        assert_eq!(Camera::focus(0.0, 0.0, 10).scale, MAX_FOCUS_SCALE);
    }

    #[test]
    fn test_one_reference_frame_moves_fifteen_percent() {
        let mut rig = CameraRig::new(Camera::default());
        rig.retarget(Camera {
            x: 100.0,
            y: 0.0,
            scale: 1.0,
        });
        rig.tick(REFERENCE_FRAME);
        assert!((rig.current().x - 15.0).abs() < 1e-6);
        assert!(rig.is_animating());
    }

    #[test]
    fn test_rig_snaps_when_close() {
        let mut rig = CameraRig::new(Camera::default());
        rig.retarget(Camera {
            x: 40.0,
            y: -20.0,
            scale: 1.4,
        });
        for _ in 0..200 {
            rig.tick(Duration::from_millis(16));
        }
        assert!(!rig.is_animating());
        assert_eq!(rig.current(), rig.target());
    }

    #[test]
    fn test_pan_and_zoom_are_immediate() {
        let mut rig = CameraRig::new(Camera::default());
        rig.zoom(2.0);
        rig.pan(10.0, 0.0);
        assert_eq!(rig.current(), rig.target());
        assert_eq!(rig.current().x, -5.0);
        rig.zoom(100.0);
        assert_eq!(rig.current().scale, MAX_ZOOM);
    }
}
