use curve_editor::{
    Curve, CurveEditor, Keyframe, PointerButton, PointerEvent, PointerSample, Point, Rectangle,
};

fn sample(x: f32, y: f32, event: PointerEvent, button: Option<PointerButton>) -> PointerSample {
    PointerSample::new(Point::new(x, y), event, button)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Curve Editor - Interaction Engine Demo");
    println!("======================================\n");

    // Build a simple ease curve and an editor over a 500x400 panel
    let curve = Curve::new(vec![
        Keyframe::new(0.0, 0.0),
        Keyframe::with_tangents(1.0, 1.0, 0.0, 0.0),
    ])?;
    let mut editor = CurveEditor::with_auto_range(curve, Rectangle::new(0.0, 0.0, 500.0, 400.0))?;

    println!("✓ Created editor");
    println!("  Keyframes: {}", editor.curve().keyframe_count());
    println!(
        "  Value range: {} .. {}",
        editor.settings().value_min,
        editor.settings().value_max
    );

    // Middle-click the panel center: a keyframe appears there
    editor.tick(sample(
        250.0,
        200.0,
        PointerEvent::Down,
        Some(PointerButton::Middle),
    ));
    editor.tick(sample(250.0, 200.0, PointerEvent::Up, None));

    println!("\n✓ Middle-clicked the panel center");
    println!("  Keyframes: {}", editor.curve().keyframe_count());
    let key = editor.curve().get(1)?;
    println!("  New key: t={:.3} v={:.3}", key.time, key.value);

    // Drag the new key upward
    editor.tick(sample(
        250.0,
        205.0,
        PointerEvent::Drag,
        Some(PointerButton::Primary),
    ));
    editor.tick(sample(
        250.0,
        300.0,
        PointerEvent::Drag,
        Some(PointerButton::Primary),
    ));
    editor.tick(sample(250.0, 300.0, PointerEvent::Up, None));

    let key = editor.curve().get(1)?;
    println!("\n✓ Dragged the key upward");
    println!("  Key now: t={:.3} v={:.3}", key.time, key.value);

    // Right-drag away from the key to spawn its out-tangent
    editor.tick(sample(
        252.0,
        300.0,
        PointerEvent::Drag,
        Some(PointerButton::Secondary),
    ));
    editor.tick(sample(
        300.0,
        330.0,
        PointerEvent::Drag,
        Some(PointerButton::Secondary),
    ));
    editor.tick(sample(300.0, 330.0, PointerEvent::Up, None));

    let key = editor.curve().get(1)?;
    println!("\n✓ Spawned an out-tangent by right-dragging");
    println!(
        "  Out tangent: slope={:.3} weight={:.3}",
        key.out_tangent, key.out_weight
    );

    // Sample the edited curve
    println!("\n📈 Curve samples:");
    let duration = editor.curve().duration()?;
    for i in 0..=8 {
        let t = duration * (i as f32 / 8.0);
        println!("  f({:.3}) = {:.4}", t, editor.curve().evaluate(t));
    }

    println!("\n✅ Demo complete. Run the `gui` binary for the interactive editor.\n");
    Ok(())
}
