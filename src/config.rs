use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ScrollyError, ScrollyResult};

/// Tunables for scroll mapping and per-frame smoothing.
///
/// Every field is optional in JSON; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MapperConfig {
    /// Half-width of the fade window around each segment boundary.
    pub fade_margin: f64,
    /// Parallax scale in render units.
    pub parallax_strength: f64,
    /// The first segment stays visible for fractions below this.
    pub head_hold: f64,
    /// The last segment is forced visible above this fraction...
    pub tail_start: f64,
    /// ...reaching full opacity after this much further scroll.
    pub tail_ramp: f64,
    /// Opacity at or below which a segment is hidden.
    pub visibility_threshold: f64,
    /// Per-frame low-pass factor for the background color.
    pub color_smoothing: f64,
    /// Scene changes past this progress permanently disable the typewriter reveal.
    pub typewriter_cutoff_percent: u32,
    /// Fraction the skip shortcut jumps to.
    pub skip_target: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            fade_margin: 0.04,
            parallax_strength: 150.0,
            head_hold: 0.08,
            tail_start: 0.90,
            tail_ramp: 0.05,
            visibility_threshold: 0.01,
            color_smoothing: 0.05,
            typewriter_cutoff_percent: 10,
            skip_target: 0.40,
        }
    }
}

impl MapperConfig {
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> ScrollyResult<Self> {
        let f = File::open(path)?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> ScrollyResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ScrollyResult<()> {
        let finite = [
            ("fadeMargin", self.fade_margin),
            ("parallaxStrength", self.parallax_strength),
            ("headHold", self.head_hold),
            ("tailStart", self.tail_start),
            ("tailRamp", self.tail_ramp),
            ("visibilityThreshold", self.visibility_threshold),
            ("colorSmoothing", self.color_smoothing),
            ("skipTarget", self.skip_target),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(ScrollyError::validation(format!("{name} must be finite")));
            }
        }

        if self.fade_margin < 0.0 {
            return Err(ScrollyError::validation("fadeMargin must be >= 0"));
        }
        if self.head_hold <= 0.0 {
            return Err(ScrollyError::validation("headHold must be > 0"));
        }
        if self.tail_ramp <= 0.0 {
            return Err(ScrollyError::validation("tailRamp must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.tail_start) {
            return Err(ScrollyError::validation("tailStart must be in [0, 1]"));
        }
        if !(0.0..1.0).contains(&self.visibility_threshold) {
            return Err(ScrollyError::validation(
                "visibilityThreshold must be in [0, 1)",
            ));
        }
        if self.color_smoothing <= 0.0 || self.color_smoothing > 1.0 {
            return Err(ScrollyError::validation("colorSmoothing must be in (0, 1]"));
        }
        if self.typewriter_cutoff_percent > 100 {
            return Err(ScrollyError::validation(
                "typewriterCutoffPercent must be <= 100",
            ));
        }
        if !(0.0..=1.0).contains(&self.skip_target) {
            return Err(ScrollyError::validation("skipTarget must be in [0, 1]"));
        }
        Ok(())
    }
}
