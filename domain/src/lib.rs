pub mod generation;
pub mod history;
pub mod ports;
pub mod session;
pub mod story;

pub use generation::{GenerationFailure, StoryGenerator};
pub use history::{HistoryList, HISTORY_CAPACITY};
pub use ports::{ClipboardSink, StorySaver};
pub use session::{SessionState, SessionStatus};
pub use story::{Story, StoryId, StoryIdSource, StoryPrompt, MAX_PROMPT_CHARS};
