//! Scroll fraction to per-segment visibility and parallax.
//!
//! Everything here is a pure function of the scroll fraction and the story
//! table. Frame history (color smoothing, scene-change cues) lives in
//! [`crate::driver::FrameDriver`].

use serde::Serialize;

use crate::{
    config::MapperConfig,
    foundation::{core::ScrollFraction, error::ScrollyResult},
    story::{StorySegment, StoryTable},
};

/// Index of the segment that owns `scroll_fraction`.
///
/// Selects `i` with `segments[i].scroll_start <= f < segments[i + 1].scroll_start`,
/// or the last segment once `f` reaches its start. A fraction sitting exactly
/// on a boundary belongs to the segment that starts there. Fractions below the
/// first start map to 0.
///
/// # Panics
///
/// Panics if `segments` is empty.
pub fn compute_active_index(scroll_fraction: f64, segments: &[StorySegment]) -> usize {
    assert!(
        !segments.is_empty(),
        "compute_active_index requires at least one segment"
    );
    segments
        .partition_point(|s| s.scroll_start <= scroll_fraction)
        .saturating_sub(1)
}

/// Trapezoidal fade: 0 outside `[start - m, end + m]`, linear ramps of width
/// `2m` centered on each bound, 1 in between.
pub fn compute_opacity(scroll_fraction: f64, segment: &StorySegment, fade_margin: f64) -> f64 {
    let f = scroll_fraction;
    let margin = fade_margin;
    let fade_in_start = segment.scroll_start - margin;
    let fade_in_end = segment.scroll_start + margin;
    let fade_out_start = segment.scroll_end - margin;
    let fade_out_end = segment.scroll_end + margin;

    if f < fade_in_start || f > fade_out_end {
        return 0.0;
    }
    if margin <= 0.0 {
        return 1.0;
    }

    let opacity = if f < fade_in_end {
        (f - fade_in_start) / (fade_in_end - fade_in_start)
    } else if f > fade_out_start {
        1.0 - (f - fade_out_start) / (fade_out_end - fade_out_start)
    } else {
        1.0
    };
    opacity.clamp(0.0, 1.0)
}

/// Parallax offset: signed distance from the segment center scaled by `strength`.
///
/// Positive once the scroll has passed the center; the binding layer
/// translates content by the negated value.
pub fn compute_parallax(scroll_fraction: f64, segment: &StorySegment, strength: f64) -> f64 {
    (scroll_fraction - segment.center()) * strength
}

/// Visibility and parallax of one segment for one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentState {
    pub index: usize,
    pub opacity: f64,
    pub parallax_offset: f64,
    pub visible: bool,
}

/// Snapshot of the whole table at one scroll fraction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    pub scroll_fraction: f64,
    pub active_index: usize,
    pub progress_percent: u32,
    pub segments: Vec<SegmentState>,
}

impl ScrollState {
    /// Segment with the highest opacity; ties go to the later segment.
    pub fn dominant_index(&self) -> usize {
        self.segments
            .iter()
            .max_by(|a, b| a.opacity.total_cmp(&b.opacity))
            .map(|s| s.index)
            .unwrap_or(self.active_index)
    }

    pub fn segment(&self, index: usize) -> Option<&SegmentState> {
        self.segments.get(index)
    }

    pub fn visible_count(&self) -> usize {
        self.segments.iter().filter(|s| s.visible).count()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScrollProgressMapper {
    config: MapperConfig,
}

impl ScrollProgressMapper {
    pub fn new(config: MapperConfig) -> ScrollyResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn active_index(&self, scroll_fraction: f64, table: &StoryTable) -> usize {
        compute_active_index(scroll_fraction, table.segments())
    }

    /// Fade-window opacity plus the edge policy: the first segment is held
    /// visible near the top and the last one is forced in near the bottom, so
    /// neither end of the page ever shows an empty frame.
    pub fn opacity(&self, scroll_fraction: f64, table: &StoryTable, index: usize) -> f64 {
        let Some(segment) = table.get(index) else {
            return 0.0;
        };
        let cfg = &self.config;
        let mut opacity = compute_opacity(scroll_fraction, segment, cfg.fade_margin);

        if index == 0 && scroll_fraction < cfg.head_hold {
            opacity = opacity.max(1.0 - scroll_fraction / cfg.head_hold);
        }
        if index == table.last_index() && scroll_fraction > cfg.tail_start {
            opacity = opacity.max((scroll_fraction - cfg.tail_start) / cfg.tail_ramp);
        }

        opacity.clamp(0.0, 1.0)
    }

    pub fn parallax(&self, scroll_fraction: f64, segment: &StorySegment) -> f64 {
        compute_parallax(scroll_fraction, segment, self.config.parallax_strength)
    }

    pub fn evaluate(&self, scroll_fraction: ScrollFraction, table: &StoryTable) -> ScrollState {
        let f = scroll_fraction.get();
        let segments = table
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                let opacity = self.opacity(f, table, i);
                SegmentState {
                    index: i,
                    opacity,
                    parallax_offset: self.parallax(f, seg),
                    visible: opacity > self.config.visibility_threshold,
                }
            })
            .collect();

        ScrollState {
            scroll_fraction: f,
            active_index: self.active_index(f, table),
            progress_percent: scroll_fraction.percent(),
            segments,
        }
    }
}
