use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{ScrollyError, ScrollyResult},
    story::model::StorySegment,
};

const BUILTIN_STORY: &str = include_str!("../../data/story.json");

/// Gap/overlap tolerance when checking that neighbouring segments touch.
const CONTIGUITY_EPS: f64 = 1e-9;

#[derive(Deserialize)]
struct RawTable {
    segments: Vec<StorySegment>,
}

/// Validated, ordered story table.
///
/// Segments partition `[0, 1]`: the first starts at 0, the last ends at 1 and
/// each segment starts where the previous one ends. Every constructor checks
/// this, so holders of a `StoryTable` never see an empty or broken table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct StoryTable {
    segments: Vec<StorySegment>,
}

impl TryFrom<RawTable> for StoryTable {
    type Error = ScrollyError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Self::new(raw.segments)
    }
}

impl StoryTable {
    pub fn new(segments: Vec<StorySegment>) -> ScrollyResult<Self> {
        let table = Self { segments };
        table.validate()?;
        Ok(table)
    }

    /// The table bundled with the crate.
    pub fn builtin() -> ScrollyResult<Self> {
        Self::from_json_str(BUILTIN_STORY)
    }

    pub fn from_json_str(s: &str) -> ScrollyResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    #[tracing::instrument]
    pub fn from_path(path: &Path) -> ScrollyResult<Self> {
        let f = File::open(path)?;
        let table: Self = serde_json::from_reader(BufReader::new(f))?;
        tracing::debug!(segments = table.len(), "loaded story table");
        Ok(table)
    }

    pub fn validate(&self) -> ScrollyResult<()> {
        let Some(first) = self.segments.first() else {
            return Err(ScrollyError::validation(
                "story table must have at least one segment",
            ));
        };

        for (pos, seg) in self.segments.iter().enumerate() {
            if seg.index != pos {
                return Err(ScrollyError::validation(format!(
                    "segment at position {pos} has index {}",
                    seg.index
                )));
            }
            if !seg.scroll_start.is_finite() || !seg.scroll_end.is_finite() {
                return Err(ScrollyError::validation(format!(
                    "segment {pos} has non-finite scroll bounds"
                )));
            }
            if !(0.0..=1.0).contains(&seg.scroll_start) || !(0.0..=1.0).contains(&seg.scroll_end) {
                return Err(ScrollyError::validation(format!(
                    "segment {pos} scroll bounds must lie in [0, 1]"
                )));
            }
            if seg.scroll_start >= seg.scroll_end {
                return Err(ScrollyError::validation(format!(
                    "segment {pos} must have scrollStart < scrollEnd"
                )));
            }
        }

        if first.scroll_start != 0.0 {
            return Err(ScrollyError::validation("first segment must start at 0"));
        }
        if let Some(last) = self.segments.last()
            && last.scroll_end != 1.0
        {
            return Err(ScrollyError::validation("last segment must end at 1"));
        }

        for w in self.segments.windows(2) {
            let (prev, next) = (&w[0], &w[1]);
            if (next.scroll_start - prev.scroll_end).abs() > CONTIGUITY_EPS {
                let what = if next.scroll_start > prev.scroll_end {
                    "gap"
                } else {
                    "overlap"
                };
                return Err(ScrollyError::validation(format!(
                    "{what} between segment {} and segment {}",
                    prev.index, next.index
                )));
            }
        }

        Ok(())
    }

    pub fn segments(&self) -> &[StorySegment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StorySegment> {
        self.segments.iter()
    }

    pub fn get(&self, index: usize) -> Option<&StorySegment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false` for a validated table; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}

impl<'a> IntoIterator for &'a StoryTable {
    type Item = &'a StorySegment;
    type IntoIter = std::slice::Iter<'a, StorySegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::model::SceneTag;

    fn seg(index: usize, tag: SceneTag, start: f64, end: f64) -> StorySegment {
        StorySegment {
            index,
            scene_tag: tag,
            scroll_start: start,
            scroll_end: end,
            title: format!("title {index}"),
            subtitle: String::new(),
            body_text: String::new(),
            system_note: None,
            terminal_lines: None,
        }
    }

    fn three() -> Vec<StorySegment> {
        vec![
            seg(0, SceneTag::Landing, 0.0, 0.3),
            seg(1, SceneTag::Glitch, 0.3, 0.7),
            seg(2, SceneTag::Reboot, 0.7, 1.0),
        ]
    }

    #[test]
    fn builtin_table_is_valid() {
        let t = StoryTable::builtin().unwrap();
        assert_eq!(t.len(), 8);
        assert_eq!(t.get(0).unwrap().scene_tag, SceneTag::Landing);
        assert_eq!(t.get(t.last_index()).unwrap().scene_tag, SceneTag::Reboot);
        assert!(t.get(t.last_index()).unwrap().has_terminal());
    }

    #[test]
    fn accepts_contiguous_partition() {
        assert!(StoryTable::new(three()).is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(StoryTable::new(vec![]).is_err());
    }

    #[test]
    fn rejects_gap() {
        let mut s = three();
        s[1].scroll_start = 0.35;
        let err = StoryTable::new(s).unwrap_err();
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn rejects_overlap() {
        let mut s = three();
        s[2].scroll_start = 0.6;
        let err = StoryTable::new(s).unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn rejects_open_ends() {
        let mut s = three();
        s[0].scroll_start = 0.1;
        assert!(StoryTable::new(s).is_err());

        let mut s = three();
        s[2].scroll_end = 0.95;
        assert!(StoryTable::new(s).is_err());
    }

    #[test]
    fn rejects_inverted_and_out_of_range_bounds() {
        let mut s = three();
        s[1].scroll_end = 0.3;
        assert!(StoryTable::new(s).is_err());

        let mut s = three();
        s[2].scroll_end = 1.5;
        assert!(StoryTable::new(s).is_err());

        let mut s = three();
        s[1].scroll_start = f64::NAN;
        assert!(StoryTable::new(s).is_err());
    }

    #[test]
    fn rejects_misnumbered_index() {
        let mut s = three();
        s[1].index = 5;
        assert!(StoryTable::new(s).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let bad = r#"{"segments": [{"index": 0, "sceneTag": "landing", "scrollStart": 0.0,
            "scrollEnd": 0.5, "title": "", "subtitle": "", "bodyText": ""}]}"#;
        let err = StoryTable::from_json_str(bad).unwrap_err();
        assert!(err.to_string().contains("last segment must end at 1"));
    }

    #[test]
    fn serializes_back_to_camel_case() {
        let t = StoryTable::new(three()).unwrap();
        let s = serde_json::to_string(&t).unwrap();
        assert!(s.contains("\"scrollStart\""));
        assert_eq!(StoryTable::from_json_str(&s).unwrap(), t);
    }
}
