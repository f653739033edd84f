//! Cosmetic parameters derived from the scroll fraction: background color
//! bands, post-processing levels and the fade envelopes of the 3D layers.

use serde::Serialize;

use crate::{
    ease::{envelope, smoothstep},
    foundation::core::Rgb,
};

pub const VOID: Rgb = Rgb::new(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0); // #0a0a0a
pub const BLUE_VOID: Rgb = Rgb::new(10.0 / 255.0, 10.0 / 255.0, 18.0 / 255.0); // #0a0a12
pub const BLOOD: Rgb = Rgb::new(26.0 / 255.0, 5.0 / 255.0, 8.0 / 255.0); // #1a0508
pub const DEEP_SEA: Rgb = Rgb::new(5.0 / 255.0, 17.0 / 255.0, 24.0 / 255.0); // #051118
pub const DAWN: Rgb = Rgb::new(1.0, 241.0 / 255.0, 230.0 / 255.0); // #fff1e6

/// Layers below this weight are not drawn.
pub const LAYER_CUTOFF: f64 = 0.01;

/// Background color the smoothing filter chases at fraction `f`.
///
/// Five bands, one per narrative act; each band interpolates linearly inside itself.
pub fn background_target(f: f64) -> Rgb {
    if f < 0.15 {
        VOID
    } else if f < 0.40 {
        VOID.lerp(BLUE_VOID, (f - 0.15) * 4.0)
    } else if f < 0.70 {
        VOID.lerp(BLOOD, (f - 0.40) * 3.33)
    } else if f < 0.92 {
        DEEP_SEA
    } else {
        DEEP_SEA.lerp(DAWN, ((f - 0.92) * 12.5).min(1.0))
    }
}

/// One step of the background low-pass filter.
pub fn smooth_color(current: Rgb, target: Rgb, factor: f64) -> Rgb {
    current.lerp(target, factor)
}

/// The five 3D layers drawn behind the text cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneLayer {
    Grid,
    Shards,
    Choir,
    Rain,
    Reboot,
}

impl SceneLayer {
    pub const ALL: [SceneLayer; 5] = [
        SceneLayer::Grid,
        SceneLayer::Shards,
        SceneLayer::Choir,
        SceneLayer::Rain,
        SceneLayer::Reboot,
    ];

    /// Fade envelope of this layer at fraction `f`.
    pub fn weight(self, f: f64) -> f64 {
        match self {
            Self::Grid => envelope(f, 0.0, 0.05, 0.12, 0.18),
            Self::Shards => envelope(f, 0.12, 0.18, 0.38, 0.45),
            Self::Choir => envelope(f, 0.38, 0.45, 0.68, 0.75),
            Self::Rain => envelope(f, 0.68, 0.75, 0.90, 0.95),
            Self::Reboot => smoothstep(f, 0.90, 0.95),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerWeight {
    pub layer: SceneLayer,
    pub weight: f64,
    pub visible: bool,
}

/// Scroll-derived post-processing and layer parameters for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualSignals {
    pub background_target: Rgb,
    /// 0..1, ramps in across the glitch scene.
    pub glitch_intensity: f64,
    pub in_glitch_section: bool,
    /// Uniform samples above this fire a glitch burst; 1.0 outside the section.
    pub glitch_threshold: f64,
    pub chromatic_offset: f64,
    /// 1.5..4.5
    pub bloom_intensity: f64,
    pub noise_opacity: f64,
    /// How far the shards have melted, 0..1.
    pub shard_phase: f64,
    /// Choir vibration amount, 0..1.
    pub choir_intensity: f64,
    pub layers: Vec<LayerWeight>,
}

impl VisualSignals {
    pub fn at(f: f64) -> Self {
        let glitch_intensity = smoothstep(f, 0.45, 0.55);
        let in_glitch_section = f > 0.40 && f < 0.70;
        let glitch_threshold = if in_glitch_section {
            0.95 - glitch_intensity * 0.2
        } else {
            1.0
        };
        let noise_opacity = if f > 0.70 && f < 0.92 { 0.25 } else { 0.15 };

        let layers = SceneLayer::ALL
            .iter()
            .map(|&layer| {
                let weight = layer.weight(f);
                LayerWeight {
                    layer,
                    weight,
                    visible: weight > LAYER_CUTOFF,
                }
            })
            .collect();

        Self {
            background_target: background_target(f),
            glitch_intensity,
            in_glitch_section,
            glitch_threshold,
            chromatic_offset: 0.001 + glitch_intensity * 0.008,
            bloom_intensity: 1.5 + smoothstep(f, 0.90, 0.98) * 3.0,
            noise_opacity,
            shard_phase: smoothstep(f, 0.15, 0.40),
            choir_intensity: smoothstep(f, 0.45, 0.60),
            layers,
        }
    }

    /// Whether a uniform sample in `[0, 1)` fires a glitch burst this frame.
    pub fn glitch_fires(&self, sample: f64) -> bool {
        self.in_glitch_section && sample > self.glitch_threshold
    }

    pub fn layer(&self, layer: SceneLayer) -> Option<&LayerWeight> {
        self.layers.iter().find(|l| l.layer == layer)
    }
}
