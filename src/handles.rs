use crate::curve::{Curve, KeyId, Keyframe};
use crate::panel::{Point, Rectangle};
use crate::space::SpaceMapper;

/// Smallest time gap kept between a dragged keyframe and its neighbors.
const MIN_TIME_GAP: f32 = 1.0e-4;

/// The three interactive elements a keyframe exposes on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Key,
    InTangent,
    OutTangent,
}

/// A handle reference that stays valid across reorders: the owning
/// keyframe is identified by its stable id, not by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleRef {
    pub key: KeyId,
    pub kind: HandleKind,
}

/// Screen geometry of keyframe and tangent handles, and the inverse
/// edits that turn a dragged screen position back into keyframe fields.
///
/// Built fresh from the current mapper each tick; positions are always
/// computed on demand and never cached across panel movement.
#[derive(Debug, Clone, Copy)]
pub struct HandleGeometry {
    mapper: SpaceMapper,
    handle_radius: f32,
}

impl HandleGeometry {
    pub fn new(mapper: SpaceMapper, handle_radius: f32) -> Self {
        Self {
            mapper,
            handle_radius,
        }
    }

    /// Handle length basis: a fixed fraction of the panel width, so
    /// handles stay visually bounded regardless of slope magnitude.
    pub fn tangent_length_basis(&self) -> f32 {
        self.mapper.rect().width / 2.0
    }

    // ========== Positions ==========

    /// Screen position of the key handle.
    pub fn key_position(&self, curve: &Curve, index: usize) -> Option<Point> {
        let key = curve.get(index).ok()?;
        Some(self.mapper.screen_point(key.time, key.value))
    }

    /// Screen position of the in-tangent handle.
    ///
    /// `None` for the first keyframe, and in the weighted model for a
    /// zero in-weight (the handle is hidden until a right-drag from the
    /// key gives it a weight).
    pub fn in_position(&self, curve: &Curve, index: usize) -> Option<Point> {
        if index == 0 {
            return None;
        }
        let key = curve.get(index).ok()?;
        let length = if curve.weighted_tangents() {
            if key.in_weight == 0.0 {
                return None;
            }
            self.tangent_length_basis() * key.in_weight
        } else {
            self.tangent_length_basis()
        };
        let dir = tangent_direction(key.in_tangent);
        let anchor = self.mapper.screen_point(key.time, key.value);
        Some(Point::new(
            anchor.x - dir.x * length,
            anchor.y - dir.y * length,
        ))
    }

    /// Screen position of the out-tangent handle; symmetric to
    /// [`Self::in_position`], added instead of subtracted.
    pub fn out_position(&self, curve: &Curve, index: usize) -> Option<Point> {
        if index + 1 == curve.keyframe_count() {
            return None;
        }
        let key = curve.get(index).ok()?;
        let length = if curve.weighted_tangents() {
            if key.out_weight == 0.0 {
                return None;
            }
            self.tangent_length_basis() * key.out_weight
        } else {
            self.tangent_length_basis()
        };
        let dir = tangent_direction(key.out_tangent);
        let anchor = self.mapper.screen_point(key.time, key.value);
        Some(Point::new(
            anchor.x + dir.x * length,
            anchor.y + dir.y * length,
        ))
    }

    // ========== Hit rectangles ==========

    /// Hit-rectangle of the key handle.
    pub fn key_hit_rect(&self, curve: &Curve, index: usize) -> Option<Rectangle> {
        Some(Rectangle::centered(
            self.key_position(curve, index)?,
            self.handle_radius,
        ))
    }

    /// Hit-rectangle of the in-tangent handle, if visible.
    pub fn in_hit_rect(&self, curve: &Curve, index: usize) -> Option<Rectangle> {
        Some(Rectangle::centered(
            self.in_position(curve, index)?,
            self.handle_radius,
        ))
    }

    /// Hit-rectangle of the out-tangent handle, if visible.
    pub fn out_hit_rect(&self, curve: &Curve, index: usize) -> Option<Rectangle> {
        Some(Rectangle::centered(
            self.out_position(curve, index)?,
            self.handle_radius,
        ))
    }

    // ========== Inverse edits ==========

    /// Move a key handle to a screen position.
    ///
    /// Outside the panel the drag is silently rejected, defining a hard
    /// boundary for keyframes. The first and last keyframe only change
    /// value, never time; interior keyframes clamp their new time to the
    /// open interval between their neighbors.
    pub fn apply_key_drag(&self, curve: &mut Curve, index: usize, pos: Point) {
        if !self.mapper.rect().contains(pos) {
            return;
        }
        let Ok(key) = curve.get(index) else {
            return;
        };
        let mut time = key.time;
        let interior = index != 0 && index + 1 != curve.keyframe_count();
        if interior {
            let prev = curve.get(index - 1).map(|k| k.time).unwrap_or(key.time);
            let next = curve.get(index + 1).map(|k| k.time).unwrap_or(key.time);
            let lo = prev + MIN_TIME_GAP;
            let hi = next - MIN_TIME_GAP;
            if lo <= hi {
                time = self.mapper.time_at(pos.x).clamp(lo, hi);
            }
        }
        let value = self.mapper.value_at(pos.y);
        let _ = curve.replace(index, Keyframe { time, value, ..key });
    }

    /// Drag the in-tangent handle: the vector from the key to the
    /// pointer becomes slope `dy/dx` (±∞ for a vertical vector) and, in
    /// the weighted model, weight `|v| / basis` clamped to [0, 1].
    pub fn apply_in_drag(&self, curve: &mut Curve, index: usize, pos: Point) {
        if index == 0 {
            return;
        }
        let Ok(key) = curve.get(index) else {
            return;
        };
        let Some(anchor) = self.key_position(curve, index) else {
            return;
        };
        let v = pos - anchor;
        let in_tangent = v.y / v.x;
        let in_weight = if curve.weighted_tangents() {
            (v.length() / self.tangent_length_basis()).clamp(0.0, 1.0)
        } else {
            key.in_weight
        };
        let _ = curve.replace(
            index,
            Keyframe {
                in_tangent,
                in_weight,
                ..key
            },
        );
    }

    /// Drag the out-tangent handle; symmetric to [`Self::apply_in_drag`].
    pub fn apply_out_drag(&self, curve: &mut Curve, index: usize, pos: Point) {
        if index + 1 == curve.keyframe_count() {
            return;
        }
        let Ok(key) = curve.get(index) else {
            return;
        };
        let Some(anchor) = self.key_position(curve, index) else {
            return;
        };
        let v = pos - anchor;
        let out_tangent = v.y / v.x;
        let out_weight = if curve.weighted_tangents() {
            (v.length() / self.tangent_length_basis()).clamp(0.0, 1.0)
        } else {
            key.out_weight
        };
        let _ = curve.replace(
            index,
            Keyframe {
                out_tangent,
                out_weight,
                ..key
            },
        );
    }

    /// Zero the in-weight, hiding the handle; the slope is untouched.
    /// A no-op in the unweighted model.
    pub fn reset_in(&self, curve: &mut Curve, index: usize) {
        if !curve.weighted_tangents() {
            return;
        }
        let Ok(key) = curve.get(index) else {
            return;
        };
        let _ = curve.replace(
            index,
            Keyframe {
                in_weight: 0.0,
                ..key
            },
        );
    }

    /// Zero the out-weight; see [`Self::reset_in`].
    pub fn reset_out(&self, curve: &mut Curve, index: usize) {
        if !curve.weighted_tangents() {
            return;
        }
        let Ok(key) = curve.get(index) else {
            return;
        };
        let _ = curve.replace(
            index,
            Keyframe {
                out_weight: 0.0,
                ..key
            },
        );
    }
}

/// Unit direction of a tangent with the given slope. A non-finite slope
/// is a vertical handle: straight up for +∞ (or NaN), down for -∞.
fn tangent_direction(slope: f32) -> Point {
    if slope.is_finite() {
        let length = (1.0 + slope * slope).sqrt();
        Point::new(1.0 / length, slope / length)
    } else if slope == f32::NEG_INFINITY {
        Point::new(0.0, -1.0)
    } else {
        Point::new(0.0, 1.0)
    }
}
