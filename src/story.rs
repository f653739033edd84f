pub mod model;
pub mod table;

pub use model::{SceneTag, StorySegment};
pub use table::StoryTable;
