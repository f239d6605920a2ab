//! Rendering collaborators
//!
//! The session loop hands a read-only `FrameView` to a `Renderer` once per
//! frame callback. Renderers never mutate gameplay state.

pub mod text;

pub use text::TextRenderer;

use crate::platform::Assets;
use crate::sim::GameState;

/// Everything a renderer may look at for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub state: &'a GameState,
    /// Fraction of a step left in the accumulator, in `[0, 1)`
    pub alpha: f64,
    pub assets: &'a Assets,
}

/// Draws a frame
pub trait Renderer {
    fn render(&mut self, frame: &FrameView<'_>);
}
