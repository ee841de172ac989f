use chrono::{DateTime, Utc};
use shared::utils::{reading_minutes, truncate_chars, word_count};
use std::fmt;

/// Longest prompt the input field accepts, in characters.
pub const MAX_PROMPT_CHARS: usize = 200;

/// A story idea, trimmed and capped at [`MAX_PROMPT_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPrompt(String);

impl StoryPrompt {
    /// Returns `None` when nothing but whitespace was typed.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let capped = truncate_chars(trimmed, MAX_PROMPT_CHARS).trim_end();
        Some(Self(capped.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Time-derived identifier: milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoryId(u64);

impl StoryId {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out strictly increasing ids even when the clock stalls or steps back.
#[derive(Debug, Default)]
pub struct StoryIdSource {
    last: Option<u64>,
}

impl StoryIdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> StoryId {
        let clock = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let next = match self.last {
            Some(last) if clock <= last => last + 1,
            _ => clock,
        };
        self.last = Some(next);
        StoryId(next)
    }
}

/// One generation result. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    id: StoryId,
    prompt: StoryPrompt,
    content: String,
    created_at: DateTime<Utc>,
}

impl Story {
    pub fn new(id: StoryId, prompt: StoryPrompt, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            prompt,
            content,
            created_at,
        }
    }

    pub fn id(&self) -> StoryId {
        self.id
    }

    pub fn prompt(&self) -> &StoryPrompt {
        &self.prompt
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn reading_minutes(&self) -> usize {
        reading_minutes(&self.content)
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Name used when the story is saved as plain text.
    pub fn file_name(&self) -> String {
        format!("story-{}.txt", self.id)
    }
}
