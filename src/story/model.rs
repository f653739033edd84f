use serde::{Deserialize, Serialize};

/// Visual treatment selected by a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneTag {
    Landing,
    Architecture,
    Chaos,
    Glitch,
    Screaming,
    Shared,
    Rain,
    Reboot,
}

impl SceneTag {
    pub const ALL: [SceneTag; 8] = [
        SceneTag::Landing,
        SceneTag::Architecture,
        SceneTag::Chaos,
        SceneTag::Glitch,
        SceneTag::Screaming,
        SceneTag::Shared,
        SceneTag::Rain,
        SceneTag::Reboot,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Architecture => "architecture",
            Self::Chaos => "chaos",
            Self::Glitch => "glitch",
            Self::Screaming => "screaming",
            Self::Shared => "shared",
            Self::Rain => "rain",
            Self::Reboot => "reboot",
        }
    }
}

impl std::fmt::Display for SceneTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One authored narrative beat and the scroll range it owns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySegment {
    pub index: usize,
    pub scene_tag: SceneTag,
    pub scroll_start: f64,
    pub scroll_end: f64, // exclusive except on the last segment
    pub title: String,
    pub subtitle: String,
    pub body_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_lines: Option<Vec<String>>,
}

impl StorySegment {
    /// Midpoint of `[scroll_start, scroll_end]`, the zero point for parallax.
    pub fn center(&self) -> f64 {
        (self.scroll_start + self.scroll_end) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.scroll_end - self.scroll_start
    }

    /// Half-open containment test; the caller handles the closed end of the last segment.
    pub fn contains(&self, f: f64) -> bool {
        self.scroll_start <= f && f < self.scroll_end
    }

    pub fn has_terminal(&self) -> bool {
        self.terminal_lines.as_ref().is_some_and(|l| !l.is_empty())
    }
}
