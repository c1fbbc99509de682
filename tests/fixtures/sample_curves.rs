// Helper functions to build editors over known curves and panel layouts

use curve_editor::{
    Curve, CurveEditor, EditorSettings, Keyframe, Point, PointerButton, PointerEvent,
    PointerSample, Rectangle,
};

/// Panel used by every fixture: 500x400 at the screen origin. Over a
/// one-second curve with the default -0.5..1.5 range this maps time
/// linearly over x (1s = 500px) and gives 100px per 0.5 value increment.
pub fn fixture_rect() -> Rectangle {
    Rectangle::new(0.0, 0.0, 500.0, 400.0)
}

/// A linear ramp from (0, 0) to (1, 1) with auto-derived display range.
pub fn linear_editor() -> CurveEditor {
    let curve = Curve::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)]).unwrap();
    CurveEditor::with_auto_range(curve, fixture_rect()).unwrap()
}

/// An ease curve with flat tangents at both ends.
pub fn ease_editor() -> CurveEditor {
    let curve = Curve::new(vec![
        Keyframe::with_tangents(0.0, 0.0, 0.0, 0.0),
        Keyframe::with_tangents(1.0, 1.0, 0.0, 0.0),
    ])
    .unwrap();
    CurveEditor::with_auto_range(curve, fixture_rect()).unwrap()
}

/// A linear ramp displayed with the unweighted tangent model.
pub fn unweighted_editor() -> CurveEditor {
    let curve = Curve::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)]).unwrap();
    let settings = EditorSettings {
        weighted_tangents: false,
        ..EditorSettings::fit_to_curve(&curve)
    };
    CurveEditor::new(curve, fixture_rect(), settings).unwrap()
}

/// One pointer sample in Y-up screen space.
pub fn sample(
    x: f32,
    y: f32,
    event: PointerEvent,
    button: Option<PointerButton>,
) -> PointerSample {
    PointerSample::new(Point::new(x, y), event, button)
}

/// A primary-button drag sample.
pub fn drag(x: f32, y: f32) -> PointerSample {
    sample(x, y, PointerEvent::Drag, Some(PointerButton::Primary))
}

/// A pointer release.
pub fn release(x: f32, y: f32) -> PointerSample {
    sample(x, y, PointerEvent::Up, None)
}

/// A middle-button press.
pub fn middle_click(x: f32, y: f32) -> PointerSample {
    sample(x, y, PointerEvent::Down, Some(PointerButton::Middle))
}
