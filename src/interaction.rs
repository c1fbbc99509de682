use crate::config::EditorSettings;
use crate::curve::{Curve, KeyId, Keyframe};
use crate::handles::{HandleGeometry, HandleKind, HandleRef};
use crate::panel::{PanelFrame, Point};
use crate::space::SpaceMapper;
use log::debug;

/// Discrete classification of one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Move,
    Drag,
    Down,
    Up,
}

/// Pointer button carried by a sample, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// One pointer sample per host frame tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Point,
    pub event: PointerEvent,
    pub button: Option<PointerButton>,
}

impl PointerSample {
    pub fn new(position: Point, event: PointerEvent, button: Option<PointerButton>) -> Self {
        Self {
            position,
            event,
            button,
        }
    }
}

/// The single element currently being dragged, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// Moving the whole panel by its header
    Window,
    /// Resizing the panel by its bottom-right corner
    Resize,
    /// Dragging a key or tangent handle
    Handle(HandleRef),
}

/// The handle currently under the pointer, reported for tooltip drawing.
/// Produced fresh by hit-testing every tick, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleHover {
    pub key: KeyId,
    pub kind: HandleKind,
}

/// Per-tick result consumed by the host and the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutput {
    /// The host should suppress further propagation of this pointer event
    pub consumed_input: bool,

    /// Handle under the pointer, for tooltip rendering
    pub hover: Option<HandleHover>,

    /// The resize corner is hovered or actively dragged
    pub resize_affordance: bool,
}

/// The drag/hover state machine turning raw pointer samples into curve
/// and panel mutations.
///
/// Exactly one element can be dragged at a time; every mutation the
/// model rejects is absorbed as a silent no-op for that tick, so a
/// transient invalid gesture can never crash the editor.
#[derive(Debug, Default)]
pub struct InteractionController {
    /// Active drag target; `None` is the idle state
    drag: Option<DragTarget>,

    /// Pointer offset from the panel origin, captured when a window
    /// drag starts
    drag_anchor: Option<Point>,

    /// Set after a middle-click removed a key or reset a tangent, so the
    /// same click does not also insert a keyframe; cleared on pointer-up
    suppress_add: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active drag target, if any.
    pub fn drag_target(&self) -> Option<DragTarget> {
        self.drag
    }

    /// Advance the state machine by one pointer sample.
    ///
    /// The per-tick priority order is fixed: release handling, window
    /// drag, handle hit-tests (ascending keyframe index), active handle
    /// drag, middle-click insert, resize, input eating. Iteration is by
    /// ascending index so the outcome is deterministic.
    pub fn tick(
        &mut self,
        curve: &mut Curve,
        panel: &mut PanelFrame,
        settings: &EditorSettings,
        sample: PointerSample,
    ) -> TickOutput {
        let mut output = TickOutput::default();
        let pointer = sample.position;

        // 1. pointer-up unconditionally returns to idle
        if sample.event == PointerEvent::Up {
            if self.drag.is_some() {
                debug!("drag released, back to idle");
            }
            self.drag = None;
            self.drag_anchor = None;
            self.suppress_add = false;
        }

        // 2. header drag starts a window move, anchored to the grab point
        if self.drag.is_none()
            && panel.header_rect().contains(pointer)
            && sample.event == PointerEvent::Drag
            && sample.button == Some(PointerButton::Primary)
        {
            self.drag_anchor = Some(pointer - panel.rect().position());
            self.drag = Some(DragTarget::Window);
            debug!("window drag started");
        }

        // 3. live window drag
        if self.drag == Some(DragTarget::Window) {
            if let Some(anchor) = self.drag_anchor {
                panel.set_position(pointer - anchor);
            }
        }

        // geometry for this tick, rebuilt so it can never be stale
        let duration = curve.duration().unwrap_or(0.0);
        let mapper = SpaceMapper::new(panel.rect(), settings, duration);
        let geometry = HandleGeometry::new(mapper, settings.handle_radius);

        // 4. handle hit-tests: drag capture latches on the first
        // qualifying match, while the hover follows the last match in
        // iteration order
        self.hit_test_handles(curve, &geometry, sample, &mut output);

        // 5./6. active handle drag
        if let Some(DragTarget::Handle(handle)) = self.drag {
            self.drive_handle_drag(curve, &geometry, handle, sample);
        }

        // 7. middle-click on the bare panel inserts a keyframe
        if sample.event == PointerEvent::Down
            && sample.button == Some(PointerButton::Middle)
            && panel.rect().contains(pointer)
            && !self.suppress_add
        {
            let key = Keyframe::new(mapper.time_at(pointer.x), mapper.value_at(pointer.y));
            match curve.insert(key) {
                Ok(index) => debug!("inserted keyframe at index {index}"),
                Err(err) => debug!("insert rejected: {err}"),
            }
        }

        // 8. resize corner: affordance on hover, drag reshapes the rect
        // around the fixed top-left anchor
        let over_corner = panel.resize_corner_rect().contains(pointer);
        if over_corner
            && self.drag.is_none()
            && sample.event == PointerEvent::Drag
            && sample.button == Some(PointerButton::Primary)
        {
            self.drag = Some(DragTarget::Resize);
            debug!("resize drag started");
        }
        if self.drag == Some(DragTarget::Resize) {
            panel.resize_to(pointer);
        }
        output.resize_affordance = over_corner || self.drag == Some(DragTarget::Resize);

        // 9. input eating
        output.consumed_input = panel.eat_rect().contains(pointer);
        output
    }

    /// Hit-test every handle in ascending keyframe index order.
    fn hit_test_handles(
        &mut self,
        curve: &mut Curve,
        geometry: &HandleGeometry,
        sample: PointerSample,
        output: &mut TickOutput,
    ) {
        let pointer = sample.position;
        let grabbing = sample.event == PointerEvent::Drag
            && matches!(
                sample.button,
                Some(PointerButton::Primary) | Some(PointerButton::Secondary)
            );
        let middle_down = sample.event == PointerEvent::Down
            && sample.button == Some(PointerButton::Middle);

        for index in 0..curve.keyframe_count() {
            let id = curve.keys()[index].id;

            if geometry
                .key_hit_rect(curve, index)
                .is_some_and(|r| r.contains(pointer))
            {
                output.hover = Some(HandleHover {
                    key: id,
                    kind: HandleKind::Key,
                });
                if grabbing && self.drag.is_none() {
                    self.capture_handle(id, HandleKind::Key);
                }
                if middle_down {
                    // later indices are invalidated by the removal, so
                    // this tick's hit-testing stops here
                    match curve.remove(index) {
                        Ok(_) => debug!("removed keyframe at index {index}"),
                        Err(err) => debug!("removal rejected: {err}"),
                    }
                    self.suppress_add = true;
                    break;
                }
            } else if geometry
                .in_hit_rect(curve, index)
                .is_some_and(|r| r.contains(pointer))
            {
                output.hover = Some(HandleHover {
                    key: id,
                    kind: HandleKind::InTangent,
                });
                if grabbing && self.drag.is_none() {
                    self.capture_handle(id, HandleKind::InTangent);
                }
                if middle_down {
                    geometry.reset_in(curve, index);
                    self.suppress_add = true;
                }
            } else if geometry
                .out_hit_rect(curve, index)
                .is_some_and(|r| r.contains(pointer))
            {
                output.hover = Some(HandleHover {
                    key: id,
                    kind: HandleKind::OutTangent,
                });
                if grabbing && self.drag.is_none() {
                    self.capture_handle(id, HandleKind::OutTangent);
                }
                if middle_down {
                    geometry.reset_out(curve, index);
                    self.suppress_add = true;
                }
            }
        }
    }

    fn capture_handle(&mut self, key: KeyId, kind: HandleKind) {
        self.drag = Some(DragTarget::Handle(HandleRef { key, kind }));
        debug!("handle drag started: {kind:?}");
    }

    /// Route the active handle drag to the matching inverse edit.
    ///
    /// A key drag moves the key with the primary button; with the
    /// secondary button it spawns or adjusts the in- or out-tangent,
    /// picked by which side of the key the pointer is on. Tangent drags
    /// stay latched and follow the pointer regardless of the held button.
    fn drive_handle_drag(
        &mut self,
        curve: &mut Curve,
        geometry: &HandleGeometry,
        handle: HandleRef,
        sample: PointerSample,
    ) {
        let Some(index) = curve.index_of(handle.key) else {
            // the keyframe vanished mid-drag; drop the stale target
            debug!("drag target disappeared, dropping drag");
            self.drag = None;
            self.drag_anchor = None;
            return;
        };
        let pointer = sample.position;

        match handle.kind {
            HandleKind::Key => match sample.button {
                Some(PointerButton::Primary) => {
                    geometry.apply_key_drag(curve, index, pointer);
                }
                Some(PointerButton::Secondary) => {
                    if let Some(anchor) = geometry.key_position(curve, index) {
                        if pointer.x < anchor.x {
                            geometry.apply_in_drag(curve, index, pointer);
                        } else if pointer.x > anchor.x {
                            geometry.apply_out_drag(curve, index, pointer);
                        }
                    }
                }
                _ => {}
            },
            HandleKind::InTangent => geometry.apply_in_drag(curve, index, pointer),
            HandleKind::OutTangent => geometry.apply_out_drag(curve, index, pointer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Rectangle;
    use approx::assert_relative_eq;

    fn setup() -> (Curve, PanelFrame, EditorSettings, InteractionController) {
        let curve = Curve::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)]).unwrap();
        let panel = PanelFrame::new(Rectangle::new(0.0, 0.0, 500.0, 400.0));
        let settings = EditorSettings::with_range(0.0, 4.0, 0.5);
        (curve, panel, settings, InteractionController::new())
    }

    fn sample(x: f32, y: f32, event: PointerEvent, button: Option<PointerButton>) -> PointerSample {
        PointerSample::new(Point::new(x, y), event, button)
    }

    #[test]
    fn test_middle_click_inserts_keyframe() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        // panel is 500x400 over duration 1 and values 0..4:
        // x=250 -> time 0.5, y=200 -> value 2.0
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(250.0, 200.0, PointerEvent::Down, Some(PointerButton::Middle)),
        );

        assert_eq!(curve.keyframe_count(), 3);
        let key = curve.get(1).unwrap();
        assert_relative_eq!(key.time, 0.5);
        assert_relative_eq!(key.value, 2.0);
    }

    #[test]
    fn test_middle_click_on_key_removes_it() {
        let (mut curve, mut panel, settings, mut controller) = setup();
        curve.insert(Keyframe::new(0.5, 2.0)).unwrap();
        assert_eq!(curve.keyframe_count(), 3);

        // the middle key sits at screen (250, 200)
        let out = controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(250.0, 200.0, PointerEvent::Down, Some(PointerButton::Middle)),
        );

        assert_eq!(curve.keyframe_count(), 2);
        // the same click never doubles as an insert
        assert!(out.consumed_input);
    }

    #[test]
    fn test_remove_blocked_at_two_keyframes() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        // first key sits at screen (0, 0)
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(0.0, 0.0, PointerEvent::Down, Some(PointerButton::Middle)),
        );

        // removal rejected, and the suppression flag still blocks an insert
        assert_eq!(curve.keyframe_count(), 2);
    }

    #[test]
    fn test_suppression_clears_on_release() {
        let (mut curve, mut panel, settings, mut controller) = setup();
        curve.insert(Keyframe::new(0.5, 2.0)).unwrap();

        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(250.0, 200.0, PointerEvent::Down, Some(PointerButton::Middle)),
        );
        assert_eq!(curve.keyframe_count(), 2);

        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(250.0, 200.0, PointerEvent::Up, None),
        );

        // a fresh middle-click inserts again
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(250.0, 200.0, PointerEvent::Down, Some(PointerButton::Middle)),
        );
        assert_eq!(curve.keyframe_count(), 3);
    }

    #[test]
    fn test_key_drag_moves_value() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        // grab the first key at (0, 0)
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(5.0, 5.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        assert!(matches!(
            controller.drag_target(),
            Some(DragTarget::Handle(HandleRef {
                kind: HandleKind::Key,
                ..
            }))
        ));

        // pull it up to value 2; its time stays pinned at 0
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(100.0, 200.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        let key = curve.get(0).unwrap();
        assert_eq!(key.time, 0.0);
        assert_relative_eq!(key.value, 2.0);
    }

    #[test]
    fn test_secondary_drag_from_key_spawns_out_tangent() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        // grab the first key with the secondary button
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(2.0, 2.0, PointerEvent::Drag, Some(PointerButton::Secondary)),
        );
        // drag to the right of the key: the out-tangent appears
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(50.0, 50.0, PointerEvent::Drag, Some(PointerButton::Secondary)),
        );

        let key = curve.get(0).unwrap();
        assert!(key.out_weight > 0.0);
        assert_relative_eq!(key.out_tangent, 1.0);
        assert_eq!(key.in_weight, 0.0);
    }

    #[test]
    fn test_window_drag_moves_panel() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        // header spans y in [410, 435]
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(100.0, 420.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        assert_eq!(controller.drag_target(), Some(DragTarget::Window));

        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(150.0, 470.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        assert_eq!(panel.rect().position(), Point::new(50.0, 50.0));

        // release returns to idle
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(150.0, 470.0, PointerEvent::Up, None),
        );
        assert_eq!(controller.drag_target(), None);
    }

    #[test]
    fn test_resize_drag_reshapes_panel() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        // resize corner is centered on the bottom-right corner (500, 0)
        let out = controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(500.0, 0.0, PointerEvent::Move, None),
        );
        assert!(out.resize_affordance);

        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(498.0, 2.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        assert_eq!(controller.drag_target(), Some(DragTarget::Resize));

        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(600.0, -50.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        assert_eq!(panel.top_left(), Point::new(0.0, 400.0));
        assert_relative_eq!(panel.rect().width, 600.0);
        assert_relative_eq!(panel.rect().height, 450.0);
    }

    #[test]
    fn test_only_one_drag_target_at_a_time() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        // start a window drag
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(100.0, 420.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        assert_eq!(controller.drag_target(), Some(DragTarget::Window));

        // move over a key while still dragging: the window drag stays latched
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(420.0, 740.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        assert_eq!(controller.drag_target(), Some(DragTarget::Window));
    }

    #[test]
    fn test_eat_zone_reports_consumed_input() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        let inside = controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(250.0, 200.0, PointerEvent::Move, None),
        );
        assert!(inside.consumed_input);

        // just outside the margin
        let outside = controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(-20.0, 200.0, PointerEvent::Move, None),
        );
        assert!(!outside.consumed_input);
    }

    #[test]
    fn test_hover_reports_handle_under_pointer() {
        let (mut curve, mut panel, settings, mut controller) = setup();

        let out = controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(3.0, 3.0, PointerEvent::Move, None),
        );
        let hover = out.hover.unwrap();
        assert_eq!(hover.kind, HandleKind::Key);
        assert_eq!(hover.key, curve.keys()[0].id);

        let out = controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(250.0, 350.0, PointerEvent::Move, None),
        );
        assert!(out.hover.is_none());
    }

    #[test]
    fn test_stale_drag_target_is_dropped() {
        let (mut curve, mut panel, settings, mut controller) = setup();
        curve.insert(Keyframe::new(0.5, 2.0)).unwrap();

        // grab the middle key at (250, 200)
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(250.0, 200.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        let target = controller.drag_target();
        assert!(matches!(target, Some(DragTarget::Handle(_))));

        // the keyframe disappears out from under the drag
        curve.remove(1).unwrap();
        controller.tick(
            &mut curve,
            &mut panel,
            &settings,
            sample(260.0, 210.0, PointerEvent::Drag, Some(PointerButton::Primary)),
        );
        assert_eq!(controller.drag_target(), None);
        assert_eq!(curve.keyframe_count(), 2);
    }
}
