use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Height of the draggable header bar above the panel.
pub const HEADER_HEIGHT: f32 = 25.0;

/// Gap between the panel's top edge and the header bar.
pub const HEADER_GAP: f32 = 10.0;

/// Half-side of the square resize region anchored at the bottom-right corner.
pub const RESIZE_CORNER_HALF: f32 = 10.0;

/// Margin by which the input-eating region exceeds the panel rect.
pub const EAT_MARGIN: f32 = 10.0;

/// Extra input-eating height above the panel, covering the header bar.
pub const EAT_TOP_EXTRA: f32 = 40.0;

/// Smallest edge length a resize drag can shrink the panel to.
pub const MIN_PANEL_SIZE: f32 = 60.0;

/// A point in Y-up screen space (origin at the window's bottom-left).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle in Y-up screen space; `(x, y)` is the
/// bottom-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge (Y-up)
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Bottom-left corner
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if this rectangle contains a point
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.top()
    }

    /// Rectangle of side `2 * radius` centered on `center`.
    pub fn centered(center: Point, radius: f32) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            2.0 * radius,
            2.0 * radius,
        )
    }
}

/// The movable, resizable rectangle hosting the curve view.
///
/// Corner anchors (curve-editor convention, Y-up):
/// ```text
/// B C
/// A D
/// ```
/// Mutated only by window drags and resize drags, never by curve edits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PanelFrame {
    rect: Rectangle,
}

impl PanelFrame {
    pub fn new(rect: Rectangle) -> Self {
        Self { rect }
    }

    /// The panel rectangle.
    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    // ========== Corner anchors ==========

    /// Bottom-left corner (A)
    pub fn bottom_left(&self) -> Point {
        self.rect.position()
    }

    /// Top-left corner (B)
    pub fn top_left(&self) -> Point {
        Point::new(self.rect.x, self.rect.top())
    }

    /// Top-right corner (C)
    pub fn top_right(&self) -> Point {
        Point::new(self.rect.right(), self.rect.top())
    }

    /// Bottom-right corner (D)
    pub fn bottom_right(&self) -> Point {
        Point::new(self.rect.right(), self.rect.y)
    }

    // ========== Derived regions ==========

    /// Header bar sitting just above the panel; dragging it with the
    /// primary button moves the whole window.
    pub fn header_rect(&self) -> Rectangle {
        let b = self.top_left();
        Rectangle::new(b.x, b.y + HEADER_GAP, self.rect.width, HEADER_HEIGHT)
    }

    /// Square region around the bottom-right corner that starts a resize drag.
    pub fn resize_corner_rect(&self) -> Rectangle {
        Rectangle::centered(self.bottom_right(), RESIZE_CORNER_HALF)
    }

    /// Region slightly larger than the panel (including the header) inside
    /// which pointer input is reported as consumed.
    pub fn eat_rect(&self) -> Rectangle {
        let a = self.bottom_left();
        Rectangle::new(
            a.x - EAT_MARGIN,
            a.y - EAT_MARGIN,
            self.rect.width + 2.0 * EAT_MARGIN,
            self.rect.height + EAT_MARGIN + EAT_TOP_EXTRA + HEADER_GAP,
        )
    }

    // ========== Mutations ==========

    /// Move the panel so its bottom-left corner lands on `position`.
    pub fn set_position(&mut self, position: Point) {
        self.rect.x = position.x;
        self.rect.y = position.y;
    }

    /// Recompute the rect from a resize drag: the top-left corner stays
    /// fixed while the bottom-right corner follows the pointer. The size
    /// is clamped so the panel never degenerates.
    pub fn resize_to(&mut self, pointer: Point) {
        let b = self.top_left();
        let width = (pointer.x - b.x).max(MIN_PANEL_SIZE);
        let height = (b.y - pointer.y).max(MIN_PANEL_SIZE);
        self.rect = Rectangle::new(b.x, b.y - height, width, height);
    }
}
