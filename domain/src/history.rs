use crate::story::{Story, StoryId};
use std::collections::VecDeque;

/// Number of stories kept per session.
pub const HISTORY_CAPACITY: usize = 10;

/// Most-recent-first list of generated stories, bounded by [`HISTORY_CAPACITY`].
#[derive(Debug, Clone)]
pub struct HistoryList {
    entries: VecDeque<Story>,
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryList {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Puts `story` at the front and returns the entry evicted to stay within capacity.
    pub fn push_front(&mut self, story: Story) -> Option<Story> {
        self.entries.push_front(story);
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_back()
        } else {
            None
        }
    }

    pub fn get(&self, id: StoryId) -> Option<&Story> {
        self.entries.iter().find(|story| story.id() == id)
    }

    pub fn latest(&self) -> Option<&Story> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Story> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
