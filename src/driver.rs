use std::sync::Arc;

use serde::Serialize;

use crate::{
    config::MapperConfig,
    foundation::{
        core::{Rgb, ScrollFraction},
        error::ScrollyResult,
    },
    input::ScrollSource,
    mapper::{ScrollProgressMapper, ScrollState},
    signals::{self, VisualSignals},
    story::{SceneTag, StoryTable},
};

/// One-shot events raised on the frame they happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "scene")]
pub enum Cue {
    /// The active segment changed to one with this tag.
    EnterScene(SceneTag),
    /// Entered the glitch scene from a different scene; play the noise burst.
    GlitchBurst,
}

/// Everything a render binding needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    pub frame: u64,
    pub scroll: ScrollState,
    pub active_scene: SceneTag,
    /// Smoothed; lags `signals.background_target` by the low-pass filter.
    pub background: Rgb,
    pub signals: VisualSignals,
    pub glitch_active: bool,
    pub typewriter: bool,
    pub show_terminal: bool,
    pub cues: Vec<Cue>,
}

/// Owns the cross-frame state of the presentation and turns a sampled scroll
/// fraction into a [`RenderState`].
///
/// The caller drives it once per display frame. Nothing here is shared; all
/// mutation goes through `&mut self`.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    mapper: ScrollProgressMapper,
    story: Arc<StoryTable>,
    seed: u64,
    frame: u64,
    background: Rgb,
    previous_scene: Option<SceneTag>,
    previous_index: Option<usize>,
    last_fraction: ScrollFraction,
    typewriter: bool,
}

impl FrameDriver {
    pub fn new(config: MapperConfig, story: Arc<StoryTable>, seed: u64) -> ScrollyResult<Self> {
        Ok(Self {
            mapper: ScrollProgressMapper::new(config)?,
            story,
            seed,
            frame: 0,
            background: signals::VOID,
            previous_scene: None,
            previous_index: None,
            last_fraction: ScrollFraction::START,
            typewriter: true,
        })
    }

    pub fn mapper(&self) -> &ScrollProgressMapper {
        &self.mapper
    }

    pub fn story(&self) -> &StoryTable {
        &self.story
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn typewriter_enabled(&self) -> bool {
        self.typewriter
    }

    /// Target fraction for the skip shortcut.
    pub fn skip_target(&self) -> ScrollFraction {
        ScrollFraction::new(self.mapper.config().skip_target).unwrap_or(ScrollFraction::START)
    }

    /// Drop all frame history, as if the presentation had just started.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.background = signals::VOID;
        self.previous_scene = None;
        self.previous_index = None;
        self.last_fraction = ScrollFraction::START;
        self.typewriter = true;
    }

    /// Sample `source` and advance one frame.
    pub fn tick<S: ScrollSource + ?Sized>(&mut self, source: &S) -> RenderState {
        self.update(source.scroll_fraction())
    }

    /// Advance one frame.
    ///
    /// Non-finite samples are replaced by the last good fraction; the scroll
    /// tracker is a cosmetic input and a bad sample should not stall the loop.
    pub fn update(&mut self, scroll_fraction: f64) -> RenderState {
        let fraction = match ScrollFraction::new(scroll_fraction) {
            Ok(f) => f,
            Err(err) => {
                tracing::warn!(%err, "ignoring scroll sample");
                self.last_fraction
            }
        };
        self.last_fraction = fraction;

        let cfg = self.mapper.config();
        let scroll = self.mapper.evaluate(fraction, &self.story);
        let visuals = VisualSignals::at(fraction.get());
        self.background =
            signals::smooth_color(self.background, visuals.background_target, cfg.color_smoothing);

        let active_scene = self
            .story
            .get(scroll.active_index)
            .map(|s| s.scene_tag)
            .unwrap_or(SceneTag::Landing);

        let mut cues = Vec::new();
        if self.previous_scene != Some(active_scene) {
            tracing::debug!(
                frame = self.frame,
                index = scroll.active_index,
                scene = %active_scene,
                "scene change"
            );
            cues.push(Cue::EnterScene(active_scene));
            if active_scene == SceneTag::Glitch {
                cues.push(Cue::GlitchBurst);
            }
        }

        if self.previous_index.is_some_and(|i| i != scroll.active_index)
            && scroll.progress_percent > cfg.typewriter_cutoff_percent
            && self.typewriter
        {
            tracing::debug!(frame = self.frame, "typewriter disabled");
            self.typewriter = false;
        }

        let glitch_active = visuals.glitch_fires(unit_sample(self.seed, self.frame));
        let show_terminal = scroll.active_index == self.story.last_index();

        self.previous_scene = Some(active_scene);
        self.previous_index = Some(scroll.active_index);

        let state = RenderState {
            frame: self.frame,
            scroll,
            active_scene,
            background: self.background,
            signals: visuals,
            glitch_active,
            typewriter: self.typewriter,
            show_terminal,
            cues,
        };
        self.frame += 1;
        state
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic uniform sample in `[0, 1)` for `(seed, frame)`.
pub(crate) fn unit_sample(seed: u64, frame: u64) -> f64 {
    let bits = splitmix64(seed ^ splitmix64(frame));
    // Top 53 bits fill the f64 mantissa exactly.
    (bits >> 11) as f64 / (1u64 << 53) as f64
}
