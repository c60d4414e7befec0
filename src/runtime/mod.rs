//! Editing session runtime: the read loop and prompt-line rendering.

pub mod editor;
pub mod render;

pub use editor::Editor;
pub use render::LineRenderer;
