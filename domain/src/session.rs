use crate::story::Story;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Generating,
    Ready,
    Failed,
}

/// Lifecycle status plus the active story or error.
#[derive(Debug, Clone)]
pub struct SessionState {
    status: SessionStatus,
    current_story: Option<Story>,
    error_message: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            current_story: None,
            error_message: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_story(&self) -> Option<&Story> {
        self.current_story.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.status == SessionStatus::Generating
    }

    pub fn start_generating(&mut self) {
        self.status = SessionStatus::Generating;
        self.current_story = None;
        self.error_message = None;
    }

    pub fn succeed(&mut self, story: Story) {
        self.status = SessionStatus::Ready;
        self.current_story = Some(story);
        self.error_message = None;
    }

    pub fn fail(&mut self, message: String) {
        self.status = SessionStatus::Failed;
        self.current_story = None;
        self.error_message = Some(message);
    }

    /// Swaps the displayed story without touching the status.
    pub fn show(&mut self, story: Story) {
        self.current_story = Some(story);
    }
}
