use crate::coords::Vec2;

use super::Color;

/// A single gradient stop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientStop {
    pub t: f32,
    pub color: Color,
}

impl GradientStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient definition in logical pixel space.
///
/// Stops are a mapping from position to color: they are kept sorted by `t`,
/// and setting a color at a position that already has one replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Sets the color at position `t`.
    ///
    /// Positions outside [0, 1] (or non-finite) are ignored and `false` is
    /// returned. A stop already at exactly `t` is overwritten; `-0.0` and
    /// `0.0` are the same position.
    pub fn set_color_at(&mut self, t: f32, color: Color) -> bool {
        if !(0.0..=1.0).contains(&t) {
            log::debug!("gradient stop at {t} ignored; positions must be in [0, 1]");
            return false;
        }
        let t = t + 0.0;

        match self.stops.binary_search_by(|s| s.t.total_cmp(&t)) {
            Ok(i) => self.stops[i].color = color,
            Err(i) => self.stops.insert(i, GradientStop::new(t, color)),
        }
        true
    }

    /// Stops in ascending position order.
    #[inline]
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Returns true when the definition is usable for a blend.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.len() >= 2
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }

    /// Projects `p` onto the gradient axis, returning the unbounded parameter.
    ///
    /// A zero-length axis maps every point to `0.0`.
    pub fn project(&self, p: Vec2) -> f32 {
        let d = self.end - self.start;
        let len2 = d.x * d.x + d.y * d.y;
        if len2 <= f32::EPSILON {
            return 0.0;
        }
        let v = p - self.start;
        (v.x * d.x + v.y * d.y) / len2
    }

    /// Color at gradient parameter `t`, padded with the end stops outside
    /// [0, 1].
    ///
    /// No stops yields transparent; a single stop is a solid fill.
    #[inline]
    pub fn color_at(&self, t: f32) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        sample_stops(&self.stops, t)
    }

    /// Samples `len` evenly spaced colors over t ∈ [0, 1].
    ///
    /// Renderers clamp `t` into [0, 1] before lookup.
    pub fn bake_ramp(&self, len: usize) -> Vec<Color> {
        match len {
            0 => Vec::new(),
            1 => vec![sample_stops(&self.stops, 0.0)],
            n => (0..n)
                .map(|i| sample_stops(&self.stops, i as f32 / (n - 1) as f32))
                .collect(),
        }
    }
}

/// Piecewise-linear lookup over stops sorted by position, padded at both ends.
fn sample_stops(stops: &[GradientStop], t: f32) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };

    if t <= first.t {
        return first.color;
    }
    if t >= last.t {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.t {
            let span = (b.t - a.t).max(1.0e-6);
            return a.color.lerp(b.color, (t - a.t) / span);
        }
    }
    last.color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal() -> LinearGradient {
        LinearGradient::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0))
    }

    // ── set_color_at ──────────────────────────────────────────────────────

    #[test]
    fn stops_are_kept_sorted() {
        let mut g = horizontal();
        g.set_color_at(0.75, Color::BLACK);
        g.set_color_at(0.25, Color::WHITE);
        g.set_color_at(0.5, Color::CYAN);
        let ts: Vec<f32> = g.stops().iter().map(|s| s.t).collect();
        assert_eq!(ts, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn duplicate_position_last_write_wins() {
        let mut g = horizontal();
        g.set_color_at(0.5, Color::WHITE);
        g.set_color_at(0.5, Color::BLACK);
        assert_eq!(g.stops().len(), 1);
        assert_eq!(g.stops()[0].color, Color::BLACK);
    }

    #[test]
    fn negative_zero_is_the_same_position_as_zero() {
        let mut g = horizontal();
        g.set_color_at(-0.0, Color::WHITE);
        g.set_color_at(0.0, Color::CYAN);
        assert_eq!(g.stops().len(), 1);
        assert_eq!(g.color_at(0.0), Color::CYAN);
        assert!(g.stops()[0].t.is_sign_positive());
    }

    #[test]
    fn out_of_range_position_is_ignored() {
        let mut g = horizontal();
        assert!(!g.set_color_at(1.5, Color::WHITE));
        assert!(!g.set_color_at(f32::NAN, Color::WHITE));
        assert!(g.stops().is_empty());
    }

    // ── sampling ──────────────────────────────────────────────────────────

    #[test]
    fn empty_gradient_is_transparent() {
        assert_eq!(horizontal().color_at(0.3), Color::TRANSPARENT);
    }

    #[test]
    fn single_stop_is_solid() {
        let mut g = horizontal();
        g.set_color_at(0.4, Color::CYAN);
        assert_eq!(g.color_at(0.0), Color::CYAN);
        assert_eq!(g.color_at(1.0), Color::CYAN);
        assert!(!g.is_valid());
    }

    #[test]
    fn pads_beyond_end_stops() {
        let mut g = horizontal();
        g.set_color_at(0.2, Color::WHITE);
        g.set_color_at(0.8, Color::BLACK);
        assert_eq!(g.color_at(0.0), Color::WHITE);
        assert_eq!(g.color_at(-3.0), Color::WHITE);
        assert_eq!(g.color_at(0.9), Color::BLACK);
        let mid = g.color_at(0.5);
        assert!((mid.r - 0.5).abs() < 1e-5);
    }

    #[test]
    fn non_finite_parameter_samples_first_stop() {
        let mut g = horizontal();
        g.set_color_at(0.0, Color::WHITE);
        g.set_color_at(1.0, Color::BLACK);
        assert_eq!(g.color_at(f32::NAN), Color::WHITE);
        assert_eq!(g.color_at(f32::INFINITY), Color::WHITE);
    }

    #[test]
    fn project_along_axis() {
        let g = horizontal();
        assert_eq!(g.project(Vec2::new(50.0, 30.0)), 0.5);
        let degenerate = LinearGradient::new(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        assert_eq!(degenerate.project(Vec2::new(80.0, 0.0)), 0.0);
    }

    #[test]
    fn baked_ramp_hits_end_stops() {
        let mut g = horizontal();
        g.set_color_at(0.0, Color::WHITE);
        g.set_color_at(1.0, Color::BLACK);
        let ramp = g.bake_ramp(256);
        assert_eq!(ramp.len(), 256);
        assert_eq!(ramp[0], Color::WHITE);
        assert_eq!(ramp[255], Color::BLACK);
    }
}
