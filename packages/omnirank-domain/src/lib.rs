pub mod command;
pub mod frecency;
pub mod item;
pub mod merge;
pub mod sessions;
pub mod state;
pub mod tabs;
pub mod time_serde;

mod error;

pub use error::{Error, Result};
pub use item::{Origin, RawItem, ScoredCandidate, SearchShortcut};
pub use state::{OptionState, SectionState};
