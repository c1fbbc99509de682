use curve_editor::{Curve, CurveEditor, CurveEditorApp, Keyframe, Rectangle};
use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let curve = Curve::new(vec![
        Keyframe::new(0.0, 0.0),
        Keyframe::with_tangents(0.5, 1.0, 0.0, 0.0),
        Keyframe::new(1.0, 0.25),
    ])
    .expect("demo curve has at least two keyframes");
    let editor = CurveEditor::with_auto_range(curve, Rectangle::new(100.0, 150.0, 500.0, 400.0))
        .expect("editor settings derived from the curve are valid");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("Curve Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "Curve Editor",
        options,
        Box::new(|_cc| Ok(Box::new(CurveEditorApp::new(editor)))),
    )
}
