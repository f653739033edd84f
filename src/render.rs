//! Render bindings: apply a computed [`RenderState`] to some output.
//!
//! The mapper and driver only produce values. Writing them onto a concrete
//! target (style rules, a raster, a scene graph) happens behind
//! [`RenderTarget`].

pub mod preview;
pub mod style;

use crate::{driver::RenderState, foundation::error::ScrollyResult};

pub use preview::{FrameRGBA, PreviewTarget};
pub use style::{SegmentStyle, StyleSheet, StyleSheetTarget, Visibility};

pub trait RenderTarget {
    fn apply(&mut self, state: &RenderState) -> ScrollyResult<()>;
}
