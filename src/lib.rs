// Curve Editor - Core Library

pub mod config;
pub mod curve;
pub mod editor;
pub mod error;
pub mod handles;
pub mod interaction;
pub mod panel;
pub mod space;
pub mod ui;

// Re-export main types for convenience
pub use config::EditorSettings;
pub use curve::{Curve, KeyId, Keyframe};
pub use editor::CurveEditor;
pub use error::CurveError;
pub use handles::{HandleGeometry, HandleKind, HandleRef};
pub use interaction::{
    DragTarget, HandleHover, InteractionController, PointerButton, PointerEvent, PointerSample,
    TickOutput,
};
pub use panel::{PanelFrame, Point, Rectangle};
pub use space::SpaceMapper;
pub use ui::{CurveEditorApp, EditorTheme};
