use crate::editor::CurveEditor;
use crate::error::CurveError;
use crate::handles::HandleKind;
use crate::interaction::{PointerButton, PointerEvent, PointerSample};
use crate::panel::{Point, Rectangle};
use egui::{pos2, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};

/// Colors of one editor instance; side-by-side editors can be themed
/// independently.
#[derive(Debug, Clone, Copy)]
pub struct EditorTheme {
    pub background: Color32,
    pub header: Color32,
    pub graph: Color32,
    pub reference_lines: Color32,
    pub key_handle: Color32,
    pub tangent_line: Color32,
    pub tangent_handle: Color32,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            header: Color32::GRAY,
            graph: Color32::GREEN,
            reference_lines: Color32::GRAY,
            key_handle: Color32::BLUE,
            tangent_line: Color32::BLACK,
            tangent_handle: Color32::RED,
        }
    }
}

/// Main application state
pub struct CurveEditorApp {
    /// The interaction engine driving curve, panel and drag state
    editor: CurveEditor,

    /// Colors used by the renderer
    theme: EditorTheme,

    /// Numeric entry field: time of the keyframe to add
    input_time: f32,

    /// Numeric entry field: value of the keyframe to add
    input_value: f32,

    /// Status message
    status_message: String,
}

impl CurveEditorApp {
    pub fn new(editor: CurveEditor) -> Self {
        Self {
            editor,
            theme: EditorTheme::default(),
            input_time: 0.0,
            input_value: 0.0,
            status_message: "Middle-click adds a key; middle-click a key removes it".to_string(),
        }
    }

    pub fn editor(&self) -> &CurveEditor {
        &self.editor
    }

    /// Classify this frame's pointer state into one engine sample. The
    /// engine works in Y-up screen space, so the y axis is flipped here.
    fn pointer_sample(ctx: &egui::Context, screen_height: f32) -> PointerSample {
        ctx.input(|i| {
            let pos = i.pointer.latest_pos().unwrap_or(Pos2::ZERO);
            let position = Point::new(pos.x, screen_height - pos.y);

            let (event, button) = if i.pointer.any_released() {
                (PointerEvent::Up, None)
            } else if i.pointer.button_pressed(egui::PointerButton::Middle) {
                (PointerEvent::Down, Some(PointerButton::Middle))
            } else if i.pointer.button_pressed(egui::PointerButton::Primary) {
                (PointerEvent::Down, Some(PointerButton::Primary))
            } else if i.pointer.button_pressed(egui::PointerButton::Secondary) {
                (PointerEvent::Down, Some(PointerButton::Secondary))
            } else if i.pointer.is_decidedly_dragging() {
                let held = if i.pointer.button_down(egui::PointerButton::Primary) {
                    Some(PointerButton::Primary)
                } else if i.pointer.button_down(egui::PointerButton::Secondary) {
                    Some(PointerButton::Secondary)
                } else if i.pointer.button_down(egui::PointerButton::Middle) {
                    Some(PointerButton::Middle)
                } else {
                    None
                };
                (PointerEvent::Drag, held)
            } else {
                (PointerEvent::Move, None)
            };

            PointerSample::new(position, event, button)
        })
    }

    // ========== Y-up to egui coordinate conversion ==========

    fn flip_point(p: Point, screen_height: f32) -> Pos2 {
        pos2(p.x, screen_height - p.y)
    }

    fn flip_rect(r: Rectangle, screen_height: f32) -> Rect {
        Rect::from_min_max(
            pos2(r.x, screen_height - r.top()),
            pos2(r.right(), screen_height - r.y),
        )
    }

    /// Diamond marker used for interior keys and tangent handles.
    fn diamond(center: Pos2, radius: f32, color: Color32) -> Shape {
        Shape::convex_polygon(
            vec![
                pos2(center.x - radius, center.y),
                pos2(center.x, center.y - radius),
                pos2(center.x + radius, center.y),
                pos2(center.x, center.y + radius),
            ],
            color,
            Stroke::NONE,
        )
    }

    // ========== Rendering ==========

    fn render_editor(&mut self, ui: &mut egui::Ui, screen_height: f32) {
        let (_response, painter) =
            ui.allocate_painter(ui.available_size(), Sense::click_and_drag());

        let panel = *self.editor.panel();
        let settings = *self.editor.settings();
        let theme = self.theme;
        let h = screen_height;

        // header bar and title
        let header = Self::flip_rect(panel.header_rect(), h);
        painter.rect_filled(header, 0.0, theme.header);
        painter.text(
            header.left_center() + egui::vec2(5.0, 0.0),
            Align2::LEFT_CENTER,
            "Curve Editor",
            FontId::proportional(13.0),
            Color32::BLACK,
        );

        // panel background
        painter.rect_filled(Self::flip_rect(panel.rect(), h), 0.0, theme.background);

        // horizontal reference lines, one per grid increment, with value
        // labels along the right edge
        let mapper = self.editor.mapper();
        let a = panel.bottom_left();
        let d = panel.bottom_right();
        for i in 0..=settings.grid_line_count() {
            let y = a.y + mapper.increment_px() * i as f32;
            if i > 0 && i < settings.grid_line_count() {
                painter.line_segment(
                    [
                        Self::flip_point(Point::new(a.x, y), h),
                        Self::flip_point(Point::new(d.x, y), h),
                    ],
                    Stroke::new(1.0, theme.reference_lines),
                );
            }
            let value = settings.value_min + settings.grid_increment * i as f32;
            painter.text(
                Self::flip_point(Point::new(d.x + 3.0, y), h),
                Align2::LEFT_CENTER,
                format!("{value:.3}"),
                FontId::proportional(10.0),
                Color32::WHITE,
            );
        }

        // curve silhouette
        let silhouette: Vec<Pos2> = self
            .editor
            .silhouette()
            .into_iter()
            .map(|p| Self::flip_point(p, h))
            .collect();
        painter.add(Shape::line(silhouette, Stroke::new(3.0, theme.graph)));

        // curve duration at the bottom-right corner
        let duration = self.editor.curve().duration().unwrap_or(0.0);
        painter.text(
            Self::flip_point(Point::new(d.x - 5.0, d.y + 5.0), h),
            Align2::RIGHT_BOTTOM,
            format!("{duration:.4}"),
            FontId::proportional(12.0),
            Color32::BLACK,
        );

        self.render_handles(&painter, h);
        self.render_resize_marker(&painter, h);
        self.render_tooltip(&painter, h);
    }

    fn render_handles(&self, painter: &egui::Painter, h: f32) {
        let theme = self.theme;
        let geometry = self.editor.geometry();
        let curve = self.editor.curve();
        let radius = self.editor.settings().handle_radius;
        let count = curve.keyframe_count();

        for index in 0..count {
            let Some(key_pos) = geometry.key_position(curve, index) else {
                continue;
            };
            let center = Self::flip_point(key_pos, h);
            let in_pos = geometry
                .in_position(curve, index)
                .map(|p| Self::flip_point(p, h));
            let out_pos = geometry
                .out_position(curve, index)
                .map(|p| Self::flip_point(p, h));

            // tangent connection lines go under the handles
            for tangent in [in_pos, out_pos].into_iter().flatten() {
                painter.line_segment([center, tangent], Stroke::new(1.0, theme.tangent_line));
            }

            // endpoints get half-diamonds pointing into the curve
            let shape = if index == 0 {
                Shape::convex_polygon(
                    vec![
                        pos2(center.x, center.y + radius),
                        pos2(center.x, center.y - radius),
                        pos2(center.x + radius, center.y),
                    ],
                    theme.key_handle,
                    Stroke::NONE,
                )
            } else if index + 1 == count {
                Shape::convex_polygon(
                    vec![
                        pos2(center.x, center.y + radius),
                        pos2(center.x - radius, center.y),
                        pos2(center.x, center.y - radius),
                    ],
                    theme.key_handle,
                    Stroke::NONE,
                )
            } else {
                Self::diamond(center, radius, theme.key_handle)
            };
            painter.add(shape);

            for tangent in [in_pos, out_pos].into_iter().flatten() {
                painter.add(Self::diamond(tangent, radius, theme.tangent_handle));
            }
        }
    }

    fn render_resize_marker(&self, painter: &egui::Painter, h: f32) {
        if !self.editor.last_tick().resize_affordance {
            return;
        }
        let corner = Self::flip_rect(self.editor.panel().resize_corner_rect(), h);
        painter.line_segment(
            [corner.left_top(), corner.right_bottom()],
            Stroke::new(6.0, self.theme.header),
        );
    }

    fn render_tooltip(&self, painter: &egui::Painter, h: f32) {
        let Some(hover) = self.editor.hover() else {
            return;
        };
        let curve = self.editor.curve();
        let geometry = self.editor.geometry();
        let Some(index) = curve.index_of(hover.key) else {
            return;
        };
        let Ok(key) = curve.get(index) else {
            return;
        };

        let weight_line = |weight: f32| {
            if curve.weighted_tangents() {
                format!("Weight: {weight:.3}")
            } else {
                "Weight: N/A".to_string()
            }
        };
        let (anchor, lines) = match hover.kind {
            HandleKind::Key => (
                geometry.key_position(curve, index),
                [
                    format!("Time: {:.3}", key.time),
                    format!("Value: {:.3}", key.value),
                ],
            ),
            HandleKind::InTangent => (
                geometry.in_position(curve, index),
                [
                    format!("Slope: {:.3}", key.in_tangent),
                    weight_line(key.in_weight),
                ],
            ),
            HandleKind::OutTangent => (
                geometry.out_position(curve, index),
                [
                    format!("Slope: {:.3}", key.out_tangent),
                    weight_line(key.out_weight),
                ],
            ),
        };
        let Some(anchor) = anchor else {
            return;
        };

        let base = Self::flip_point(anchor, h);
        for (i, line) in lines.iter().enumerate() {
            painter.text(
                pos2(base.x - 15.0, base.y - 30.0 + 20.0 * i as f32),
                Align2::RIGHT_CENTER,
                line,
                FontId::proportional(11.0),
                Color32::YELLOW,
            );
        }
    }

    /// Numeric time/value entry with an "Add Keyframe" button, placed
    /// just below the panel.
    fn render_entry_row(&mut self, ctx: &egui::Context, screen_height: f32) {
        let a = self.editor.panel().bottom_left();
        let pos = pos2(a.x, screen_height - a.y + 12.0);

        egui::Area::new(egui::Id::new("curve_entry_row"))
            .fixed_pos(pos)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Time:");
                    ui.add(egui::DragValue::new(&mut self.input_time).speed(0.01));
                    ui.label("Value:");
                    ui.add(egui::DragValue::new(&mut self.input_value).speed(0.01));
                    if ui.button("Add Keyframe").clicked() {
                        match self.editor.add_keyframe(self.input_time, self.input_value) {
                            Ok(()) => {
                                self.status_message =
                                    format!("Added keyframe at t={:.3}", self.input_time);
                            }
                            Err(CurveError::DuplicateTime { time }) => {
                                self.status_message =
                                    format!("A keyframe already exists at t={time:.3}");
                            }
                            Err(err) => self.status_message = format!("Rejected: {err}"),
                        }
                    }
                });
                ui.label(&self.status_message);
            });
    }
}

impl eframe::App for CurveEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let screen_height = ctx.screen_rect().height();

        let sample = Self::pointer_sample(ctx, screen_height);
        let out = self.editor.tick(sample);

        // cursor feedback doubles as the consumed-input signal in a
        // single-window host
        ctx.set_cursor_icon(if out.resize_affordance {
            egui::CursorIcon::ResizeNwSe
        } else if out.consumed_input {
            egui::CursorIcon::Crosshair
        } else {
            egui::CursorIcon::Default
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_rgb(30, 30, 35)))
            .show(ctx, |ui| {
                self.render_editor(ui, screen_height);
            });

        self.render_entry_row(ctx, screen_height);

        // a drag may be in flight; keep sampling the pointer every frame
        ctx.request_repaint();
    }
}
