//! In-memory collaborators for driving a story session end to end.

use domain::{ClipboardSink, GenerationFailure, StoryGenerator, StorySaver};
use shared::types::Result;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted reply for one call to [`ScriptedGenerator`].
#[derive(Debug, Clone)]
pub enum Reply {
    Story(String),
    Fail(Option<String>),
    Hang,
}

/// Generator that answers from a queue; an empty queue echoes the prompt.
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let generator = Self::new();
        generator.replies.lock().unwrap().extend(replies);
        generator
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl StoryGenerator for ScriptedGenerator {
    async fn generate_story(&self, prompt: &str) -> std::result::Result<String, GenerationFailure> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Story(text)) => Ok(text),
            Some(Reply::Fail(Some(message))) => Err(GenerationFailure::new(message)),
            Some(Reply::Fail(None)) => Err(GenerationFailure::unknown()),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(GenerationFailure::unknown())
            }
            None => Ok(format!("Story about {prompt}")),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingClipboard {
    copied: Arc<Mutex<Vec<String>>>,
}

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Keeps saved files in memory as (file name, contents).
#[derive(Clone, Default)]
pub struct MemorySaver {
    files: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemorySaver {
    pub fn files(&self) -> Vec<(String, String)> {
        self.files.lock().unwrap().clone()
    }
}

impl StorySaver for MemorySaver {
    fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        self.files
            .lock()
            .unwrap()
            .push((file_name.to_string(), contents.to_string()));
        Ok(PathBuf::from("memory").join(file_name))
    }
}
