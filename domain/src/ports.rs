use shared::types::Result;
use std::path::PathBuf;

/// Places text on the system clipboard.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Saves a plain-text file and reports where it ended up.
pub trait StorySaver {
    fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}
