#![forbid(unsafe_code)]

pub mod audio;
pub mod config;
pub mod driver;
pub mod ease;
pub mod foundation;
pub mod input;
pub mod mapper;
pub mod render;
pub mod signals;
pub mod story;

pub use audio::{AudioBackend, AudioController, DEFAULT_VOLUME};
pub use config::MapperConfig;
pub use driver::{Cue, FrameDriver, RenderState};
pub use ease::{envelope, smoothstep};
pub use foundation::core::{Canvas, Point, Rgb, ScrollFraction, Vec2};
pub use foundation::error::{ScrollyError, ScrollyResult};
pub use input::{FixedScroll, PointerFollower, ScrollSource};
pub use mapper::{
    ScrollProgressMapper, ScrollState, SegmentState, compute_active_index, compute_opacity,
    compute_parallax,
};
pub use render::{
    FrameRGBA, PreviewTarget, RenderTarget, SegmentStyle, StyleSheet, StyleSheetTarget,
    Visibility,
};
pub use signals::{LayerWeight, SceneLayer, VisualSignals};
pub use story::{SceneTag, StorySegment, StoryTable};
