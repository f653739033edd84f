use std::fmt::Write as _;

use serde::Serialize;

use crate::{driver::RenderState, foundation::error::ScrollyResult, render::RenderTarget};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Style values for one text card.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStyle {
    pub index: usize,
    pub opacity: f64,
    pub visibility: Visibility,
    /// Vertical shift in px; the negated parallax offset.
    pub translate_y: f64,
}

impl SegmentStyle {
    pub fn transform(&self) -> String {
        format!("translateY({:.2}px)", self.translate_y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSheet {
    pub background: String,
    /// Progress bar width in percent.
    pub progress_width: f64,
    pub active_index: usize,
    pub show_terminal: bool,
    pub segments: Vec<SegmentStyle>,
}

impl StyleSheet {
    pub fn from_state(state: &RenderState) -> Self {
        let segments = state
            .scroll
            .segments
            .iter()
            .map(|s| SegmentStyle {
                index: s.index,
                opacity: s.opacity,
                visibility: if s.visible {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                },
                // + 0.0 folds -0.0 into 0.0 so a centered card prints "0.00px".
                translate_y: -s.parallax_offset + 0.0,
            })
            .collect();

        Self {
            background: state.background.to_hex(),
            progress_width: state.scroll.scroll_fraction * 100.0,
            active_index: state.scroll.active_index,
            show_terminal: state.show_terminal,
            segments,
        }
    }

    /// CSS rules keyed by `data-segment` attributes.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, ":root {{ --scene-bg: {}; }}", self.background);
        let _ = writeln!(
            out,
            "[data-progress] {{ width: {:.2}%; }}",
            self.progress_width
        );
        for s in &self.segments {
            let _ = writeln!(
                out,
                "[data-segment=\"{}\"] {{ opacity: {:.4}; visibility: {}; transform: {}; }}",
                s.index,
                s.opacity,
                s.visibility.as_str(),
                s.transform()
            );
        }
        out
    }
}

/// Keeps the style sheet of the most recent frame.
#[derive(Clone, Debug, Default)]
pub struct StyleSheetTarget {
    current: Option<StyleSheet>,
    applied: u64,
}

impl StyleSheetTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&StyleSheet> {
        self.current.as_ref()
    }

    pub fn frames_applied(&self) -> u64 {
        self.applied
    }
}

impl RenderTarget for StyleSheetTarget {
    fn apply(&mut self, state: &RenderState) -> ScrollyResult<()> {
        self.current = Some(StyleSheet::from_state(state));
        self.applied += 1;
        Ok(())
    }
}
