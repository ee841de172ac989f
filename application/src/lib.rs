pub mod story_session;

pub use story_session::{GenerationTicket, StorySessionController, DEFAULT_GENERATION_TIMEOUT};
