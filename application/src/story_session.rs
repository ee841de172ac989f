//! Story session controller: drives one generation at a time, keeps the
//! bounded history, and exposes copy / download / select on the current story.

use chrono::Utc;
use domain::{
    ClipboardSink, GenerationFailure, HistoryList, SessionState, SessionStatus, Story,
    StoryGenerator, StoryId, StoryIdSource, StoryPrompt, StorySaver,
};
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Proof that a generation was started. Completing with a stale ticket is a no-op.
#[derive(Debug)]
pub struct GenerationTicket {
    seq: u64,
    prompt: StoryPrompt,
}

impl GenerationTicket {
    pub fn prompt(&self) -> &StoryPrompt {
        &self.prompt
    }
}

pub struct StorySessionController<G> {
    generator: G,
    clipboard: Box<dyn ClipboardSink>,
    saver: Box<dyn StorySaver>,
    state: SessionState,
    history: HistoryList,
    ids: StoryIdSource,
    timeout: Duration,
    next_seq: u64,
    in_flight: Option<u64>,
}

impl<G: StoryGenerator> StorySessionController<G> {
    pub fn new(
        generator: G,
        clipboard: Box<dyn ClipboardSink>,
        saver: Box<dyn StorySaver>,
    ) -> Self {
        Self {
            generator,
            clipboard,
            saver,
            state: SessionState::new(),
            history: HistoryList::new(),
            ids: StoryIdSource::new(),
            timeout: DEFAULT_GENERATION_TIMEOUT,
            next_seq: 0,
            in_flight: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    /// Starts a generation for `raw_prompt`.
    ///
    /// Blank prompts and requests made while another generation is running
    /// are ignored and leave the session untouched.
    pub fn begin_generation(&mut self, raw_prompt: &str) -> Option<GenerationTicket> {
        let prompt = StoryPrompt::parse(raw_prompt)?;
        if self.in_flight.is_some() {
            warn!("generation already in flight, ignoring new request");
            return None;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight = Some(seq);
        self.state.start_generating();
        info!(seq, prompt = prompt.as_str(), "generation started");

        Some(GenerationTicket { seq, prompt })
    }

    /// Awaits the generator for `ticket`, bounded by the configured timeout.
    pub async fn run_ticket(
        &self,
        ticket: &GenerationTicket,
    ) -> std::result::Result<String, GenerationFailure> {
        let timer = Telemetry::start("generate_story");
        let outcome = tokio::time::timeout(
            self.timeout,
            self.generator.generate_story(ticket.prompt.as_str()),
        )
        .await
        .unwrap_or_else(|_| {
            warn!(seq = ticket.seq, timeout_secs = self.timeout.as_secs(), "generation timed out");
            Err(GenerationFailure::timed_out(self.timeout))
        });
        timer.finish();
        outcome
    }

    /// Applies the generator's outcome. Returns `false` when the ticket is stale.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        outcome: std::result::Result<String, GenerationFailure>,
    ) -> bool {
        if self.in_flight != Some(ticket.seq) {
            debug!(seq = ticket.seq, "discarding stale generation result");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(content) => {
                let now = Utc::now();
                let story = Story::new(self.ids.next_id(now), ticket.prompt, content, now);
                info!(id = %story.id(), words = story.word_count(), "generation succeeded");
                if let Some(evicted) = self.history.push_front(story.clone()) {
                    debug!(id = %evicted.id(), "evicted oldest story from history");
                }
                self.state.succeed(story);
            }
            Err(failure) => {
                warn!(error = %failure, "generation failed");
                self.state.fail(failure.user_message().to_string());
            }
        }
        true
    }

    /// Abandons the in-flight generation, if any.
    pub fn cancel_generation(&mut self) -> bool {
        let Some(seq) = self.in_flight.take() else {
            return false;
        };
        info!(seq, "generation cancelled");
        self.state.fail(GenerationFailure::cancelled().user_message().to_string());
        true
    }

    /// Runs a whole generation cycle and returns the settled status.
    pub async fn request_generation(&mut self, raw_prompt: &str) -> SessionStatus {
        let Some(ticket) = self.begin_generation(raw_prompt) else {
            return self.state.status();
        };
        let outcome = self.run_ticket(&ticket).await;
        self.complete_generation(ticket, outcome);
        self.state.status()
    }

    /// Shows a story from the history. Unknown ids are ignored.
    pub fn select_from_history(&mut self, id: StoryId) -> bool {
        match self.history.get(id) {
            Some(story) => {
                let story = story.clone();
                debug!(id = %id, "selected story from history");
                self.state.show(story);
                true
            }
            None => false,
        }
    }

    /// Copies the current story's text. Returns `false` when there is nothing to copy.
    pub fn copy_current_story(&mut self) -> Result<bool> {
        let Some(story) = self.state.current_story() else {
            return Ok(false);
        };
        self.clipboard.set_text(story.content())?;
        info!(id = %story.id(), "copied story to clipboard");
        Ok(true)
    }

    /// Saves the current story as `story-<id>.txt` and returns where it went.
    pub fn download_current_story(&self) -> Result<Option<PathBuf>> {
        let Some(story) = self.state.current_story() else {
            return Ok(None);
        };
        let path = self.saver.save(&story.file_name(), story.content())?;
        info!(id = %story.id(), path = %path.display(), "saved story");
        Ok(Some(path))
    }
}
