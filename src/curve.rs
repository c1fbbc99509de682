use crate::error::CurveError;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Stable identity of a keyframe, assigned once at insert.
///
/// Cross-tick references (active drag target, hover) hold a `KeyId` and
/// resolve it to a current index each tick, so a reorder caused by a
/// time edit never leaves a stale index behind.
pub type KeyId = Ulid;

/// Slope substituted for a non-finite tangent during evaluation.
/// A vertical handle vector yields an infinite slope; it stays stored
/// as-is but interpolates as a very steep finite segment.
const STEEP_SLOPE: f32 = 1.0e6;

/// Default bezier control spacing used when a tangent weight is zero.
const DEFAULT_WEIGHT: f32 = 1.0 / 3.0;

/// A single anchor point of the curve: time, value and the slopes and
/// weights of the incoming and outgoing tangents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    /// Unique identifier (sortable, timestamp-based)
    pub id: KeyId,

    /// Position on the time axis; keys stay strictly ascending by time
    pub time: f32,

    /// Curve value at `time`
    pub value: f32,

    /// Slope of the incoming tangent (may be infinite for a vertical handle)
    pub in_tangent: f32,

    /// Slope of the outgoing tangent
    pub out_tangent: f32,

    /// Incoming tangent weight in [0, 1]; 0 hides the handle in weighted mode
    pub in_weight: f32,

    /// Outgoing tangent weight in [0, 1]
    pub out_weight: f32,
}

impl Keyframe {
    /// Create a flat keyframe: zero tangents, zero weights.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            id: Ulid::new(),
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
            in_weight: 0.0,
            out_weight: 0.0,
        }
    }

    /// Create a keyframe with explicit tangent slopes.
    pub fn with_tangents(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            in_tangent,
            out_tangent,
            ..Self::new(time, value)
        }
    }
}

/// The ordered keyframe list and its invariants.
///
/// Keys are sorted strictly ascending by time and there are always at
/// least two of them. All mutations that would break either invariant
/// are rejected with a [`CurveError`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Curve {
    /// Keyframes, sorted strictly ascending by time
    keys: Vec<Keyframe>,

    /// Tangent model: weighted handles extend by `weight * basis`,
    /// unweighted handles always extend by the full basis length
    weighted_tangents: bool,
}

impl Curve {
    /// Create a curve from a keyframe list.
    ///
    /// The list is sorted by time; fewer than two keyframes fails with
    /// `InvalidCurve`, an exact time collision with `DuplicateTime`.
    pub fn new(mut keys: Vec<Keyframe>) -> Result<Self, CurveError> {
        if keys.len() < 2 {
            return Err(CurveError::InvalidCurve { count: keys.len() });
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        if let Some(w) = keys.windows(2).find(|w| w[0].time == w[1].time) {
            return Err(CurveError::DuplicateTime { time: w[1].time });
        }
        Ok(Self {
            keys,
            weighted_tangents: true,
        })
    }

    /// Select the weighted or unweighted tangent model.
    pub fn set_weighted_tangents(&mut self, weighted: bool) {
        self.weighted_tangents = weighted;
    }

    /// True when tangent handles honor per-key weights.
    pub fn weighted_tangents(&self) -> bool {
        self.weighted_tangents
    }

    // ========== Queries ==========

    /// Number of keyframes.
    pub fn keyframe_count(&self) -> usize {
        self.keys.len()
    }

    /// All keyframes in ascending time order.
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Get a keyframe by index.
    pub fn get(&self, index: usize) -> Result<Keyframe, CurveError> {
        self.keys
            .get(index)
            .copied()
            .ok_or(CurveError::IndexOutOfRange {
                index,
                count: self.keys.len(),
            })
    }

    /// Resolve a stable keyframe id to its current index.
    pub fn index_of(&self, id: KeyId) -> Option<usize> {
        self.keys.iter().position(|k| k.id == id)
    }

    /// Time of the last keyframe.
    pub fn duration(&self) -> Result<f32, CurveError> {
        self.keys
            .last()
            .map(|k| k.time)
            .ok_or(CurveError::EmptyCurve)
    }

    // ========== Mutations ==========

    /// Insert a keyframe, preserving time order.
    ///
    /// An exact time collision with an existing keyframe is rejected
    /// with `DuplicateTime`. Returns the insertion index.
    pub fn insert(&mut self, key: Keyframe) -> Result<usize, CurveError> {
        if self.keys.iter().any(|k| k.time == key.time) {
            return Err(CurveError::DuplicateTime { time: key.time });
        }
        let index = self.keys.partition_point(|k| k.time < key.time);
        self.keys.insert(index, key);
        Ok(index)
    }

    /// Remove the keyframe at `index`.
    ///
    /// Rejected with `MinimumKeyframesViolated` if the curve would drop
    /// below two keyframes.
    pub fn remove(&mut self, index: usize) -> Result<Keyframe, CurveError> {
        if index >= self.keys.len() {
            return Err(CurveError::IndexOutOfRange {
                index,
                count: self.keys.len(),
            });
        }
        if self.keys.len() <= 2 {
            return Err(CurveError::MinimumKeyframesViolated);
        }
        Ok(self.keys.remove(index))
    }

    /// Replace the keyframe at `index` in place.
    ///
    /// Used for all position and tangent edits. If the new time crosses
    /// a neighbor, the list is re-sorted; the keyframe keeps its stable
    /// id through the reorder. A time collision with another keyframe
    /// is rejected with `DuplicateTime`.
    pub fn replace(&mut self, index: usize, key: Keyframe) -> Result<(), CurveError> {
        if index >= self.keys.len() {
            return Err(CurveError::IndexOutOfRange {
                index,
                count: self.keys.len(),
            });
        }
        if self
            .keys
            .iter()
            .enumerate()
            .any(|(i, k)| i != index && k.time == key.time)
        {
            return Err(CurveError::DuplicateTime { time: key.time });
        }
        self.keys[index] = key;
        self.keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(())
    }

    // ========== Evaluation ==========

    /// Evaluate the curve at `time`.
    ///
    /// Hermite interpolation between the bracketing keyframes; outside
    /// `[first.time, last.time]` the first/last value is returned.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // index of the first key with key.time > time; >= 1 by the guards above
        let hi = self.keys.partition_point(|k| k.time <= time);
        let k0 = &self.keys[hi - 1];
        let k1 = &self.keys[hi];

        if self.weighted_tangents {
            eval_weighted(k0, k1, time)
        } else {
            eval_hermite(k0, k1, time)
        }
    }
}

/// Replace a non-finite slope by a steep finite one (NaN becomes flat).
fn finite_slope(slope: f32) -> f32 {
    if slope.is_finite() {
        slope
    } else if slope.is_nan() {
        0.0
    } else {
        STEEP_SLOPE.copysign(slope)
    }
}

/// Cubic Hermite segment between two keyframes, tangents scaled by the
/// segment length.
fn eval_hermite(k0: &Keyframe, k1: &Keyframe, time: f32) -> f32 {
    let dt = k1.time - k0.time;
    let u = (time - k0.time) / dt;
    let u2 = u * u;
    let u3 = u2 * u;

    let m0 = finite_slope(k0.out_tangent) * dt;
    let m1 = finite_slope(k1.in_tangent) * dt;

    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;

    h00 * k0.value + h10 * m0 + h01 * k1.value + h11 * m1
}

/// Weighted segment: a cubic bezier in (time, value) whose inner control
/// points sit at `weight * dt` from each end along the tangent. A zero
/// weight falls back to the default 1/3 spacing, which reproduces the
/// plain Hermite shape.
fn eval_weighted(k0: &Keyframe, k1: &Keyframe, time: f32) -> f32 {
    let dt = k1.time - k0.time;
    let w0 = if k0.out_weight > 0.0 {
        k0.out_weight
    } else {
        DEFAULT_WEIGHT
    };
    let w1 = if k1.in_weight > 0.0 {
        k1.in_weight
    } else {
        DEFAULT_WEIGHT
    };

    let x = [
        k0.time,
        k0.time + dt * w0,
        k1.time - dt * w1,
        k1.time,
    ];
    let y = [
        k0.value,
        k0.value + finite_slope(k0.out_tangent) * dt * w0,
        k1.value - finite_slope(k1.in_tangent) * dt * w1,
        k1.value,
    ];

    // invert x(u) = time by bisection; x is continuous with
    // x(0) = k0.time <= time <= k1.time = x(1)
    let bez = |p: &[f32; 4], u: f32| {
        let v = 1.0 - u;
        v * v * v * p[0] + 3.0 * v * v * u * p[1] + 3.0 * v * u * u * p[2] + u * u * u * p[3]
    };
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    for _ in 0..32 {
        let mid = 0.5 * (lo + hi);
        if bez(&x, mid) < time {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bez(&y, 0.5 * (lo + hi))
}
