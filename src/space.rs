use crate::config::EditorSettings;
use crate::panel::{Point, Rectangle};

/// Smallest duration the mapper divides by; a curve whose last keyframe
/// sits at time 0 would otherwise collapse the time axis.
const MIN_DURATION: f32 = 1.0e-6;

/// Pure bidirectional mapping between curve space (time, value) and
/// Y-up screen space (pixels) for one panel rectangle.
///
/// A mapper is a small `Copy` value rebuilt every tick from the current
/// panel, settings and curve duration, so its geometry can never go
/// stale while the panel moves. None of its functions allocate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceMapper {
    rect: Rectangle,
    value_min: f32,
    value_max: f32,
    increment: f32,
    duration: f32,
}

impl SpaceMapper {
    pub fn new(rect: Rectangle, settings: &EditorSettings, duration: f32) -> Self {
        Self {
            rect,
            value_min: settings.value_min,
            value_max: settings.value_max,
            increment: settings.grid_increment,
            duration: duration.max(MIN_DURATION),
        }
    }

    /// The panel rectangle this mapper projects into.
    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    /// Screen height of one grid increment.
    pub fn increment_px(&self) -> f32 {
        (self.increment / (self.value_max - self.value_min)) * self.rect.height
    }

    /// Screen x for a curve time.
    pub fn screen_x(&self, time: f32) -> f32 {
        self.rect.x + (time / self.duration) * self.rect.width
    }

    /// Screen y for a curve value.
    pub fn screen_y(&self, value: f32) -> f32 {
        self.rect.y + ((value - self.value_min) / self.increment) * self.increment_px()
    }

    /// Screen point for a (time, value) pair.
    pub fn screen_point(&self, time: f32, value: f32) -> Point {
        Point::new(self.screen_x(time), self.screen_y(value))
    }

    /// Curve time for a screen x; exact inverse of [`Self::screen_x`].
    pub fn time_at(&self, x: f32) -> f32 {
        ((x - self.rect.x) / self.rect.width) * self.duration
    }

    /// Curve value for a screen y; exact inverse of [`Self::screen_y`].
    pub fn value_at(&self, y: f32) -> f32 {
        self.value_min + ((y - self.rect.y) / self.increment_px()) * self.increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn mapper() -> SpaceMapper {
        let settings = EditorSettings::with_range(0.0, 4.0, 0.5);
        SpaceMapper::new(Rectangle::new(200.0, 100.0, 500.0, 400.0), &settings, 2.0)
    }

    #[test]
    fn test_screen_x_spans_panel_width() {
        let m = mapper();
        assert_relative_eq!(m.screen_x(0.0), 200.0);
        assert_relative_eq!(m.screen_x(2.0), 700.0);
        assert_relative_eq!(m.screen_x(1.0), 450.0);
    }

    #[test]
    fn test_screen_y_follows_grid_increments() {
        let m = mapper();
        // 8 increments over 400px -> 50px each
        assert_relative_eq!(m.increment_px(), 50.0);
        assert_relative_eq!(m.screen_y(0.0), 100.0);
        assert_relative_eq!(m.screen_y(4.0), 500.0);
        assert_relative_eq!(m.screen_y(2.0), 300.0);
    }

    #[test]
    fn test_zero_duration_does_not_divide_by_zero() {
        let settings = EditorSettings::with_range(0.0, 1.0, 0.5);
        let m = SpaceMapper::new(Rectangle::new(0.0, 0.0, 100.0, 100.0), &settings, 0.0);
        assert!(m.screen_x(0.0).is_finite());
        assert!(m.time_at(50.0).is_finite());
    }

    proptest! {
        #[test]
        fn prop_time_round_trip(time in 0.0f32..2.0, x in -50.0f32..1200.0,
                                y in -50.0f32..900.0, w in 60.0f32..1000.0, h in 60.0f32..800.0) {
            let settings = EditorSettings::with_range(-1.0, 3.0, 0.5);
            let m = SpaceMapper::new(Rectangle::new(x, y, w, h), &settings, 2.0);
            prop_assert!((m.time_at(m.screen_x(time)) - time).abs() < 1e-3);
        }

        #[test]
        fn prop_value_round_trip(value in -1.0f32..3.0, y in -50.0f32..900.0,
                                 h in 60.0f32..800.0) {
            let settings = EditorSettings::with_range(-1.0, 3.0, 0.5);
            let m = SpaceMapper::new(Rectangle::new(0.0, y, 500.0, h), &settings, 1.0);
            prop_assert!((m.value_at(m.screen_y(value)) - value).abs() < 1e-3);
        }
    }
}
