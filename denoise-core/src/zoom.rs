/// Length of the zoom window in seconds.
pub const ZOOM_LEN_S: f64 = 1.0;

/// Duration used to map taps to time when the sample length is unknown
/// (the backend may report `duration_ms: 0`).
pub const ASSUMED_DURATION_S: f64 = 20.0;

/// A fixed-length slice of the sample shown in the zoomed spectrograms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomWindow {
    pub start_s: f64,
    pub len_s: f64,
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self { start_s: 0.0, len_s: ZOOM_LEN_S }
    }
}

impl ZoomWindow {
    pub fn at(start_s: f64) -> Self {
        Self { start_s: start_s.max(0.0), len_s: ZOOM_LEN_S }
    }

    pub fn end_s(&self) -> f64 {
        self.start_s + self.len_s
    }
}

/// Pick the duration the long spectrogram spans: the reported one when it
/// is known, otherwise [`ASSUMED_DURATION_S`]. Backends that report
/// `duration_ms: 0` therefore keep the fixed 20 s tap mapping.
pub fn effective_duration_s(reported_s: Option<f64>) -> f64 {
    match reported_s {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => ASSUMED_DURATION_S,
    }
}

/// Map a click on the long spectrogram to a zoom start time.
///
/// `client_x` and `rect_left` are viewport pixels; the x offset is clamped
/// into the image before it is scaled. A zero-width image maps to 0.
pub fn tap_to_zoom_start(client_x: f64, rect_left: f64, rect_width: f64, duration_s: f64) -> f64 {
    let width = rect_width.max(0.0);
    let x = (client_x - rect_left).clamp(0.0, width);
    let rel = if width > 0.0 { x / width } else { 0.0 };
    (rel * duration_s).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let w = ZoomWindow::default();
        assert_eq!(w.start_s, 0.0);
        assert_eq!(w.len_s, 1.0);
        assert_eq!(w.end_s(), 1.0);
    }

    #[test]
    fn test_window_never_negative() {
        assert_eq!(ZoomWindow::at(-3.0).start_s, 0.0);
    }

    #[test]
    fn test_tap_maps_linearly() {
        // Middle of a 400px-wide image at x=100..500
        let s = tap_to_zoom_start(300.0, 100.0, 400.0, ASSUMED_DURATION_S);
        assert!((s - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_tap_clamps_outside_image() {
        assert_eq!(tap_to_zoom_start(50.0, 100.0, 400.0, 20.0), 0.0);
        assert_eq!(tap_to_zoom_start(900.0, 100.0, 400.0, 20.0), 20.0);
    }

    #[test]
    fn test_tap_zero_width() {
        assert_eq!(tap_to_zoom_start(120.0, 100.0, 0.0, 20.0), 0.0);
    }

    #[test]
    fn test_tap_with_unreported_duration_uses_20s() {
        let d = effective_duration_s(None);
        assert_eq!(tap_to_zoom_start(250.0, 0.0, 1000.0, d), 5.0);
        let d = effective_duration_s(Some(0.0));
        assert_eq!(tap_to_zoom_start(1000.0, 0.0, 1000.0, d), 20.0);
    }

    #[test]
    fn test_effective_duration() {
        assert_eq!(effective_duration_s(None), 20.0);
        assert_eq!(effective_duration_s(Some(0.0)), 20.0);
        assert_eq!(effective_duration_s(Some(f64::NAN)), 20.0);
        assert_eq!(effective_duration_s(Some(7.5)), 7.5);
    }
}
