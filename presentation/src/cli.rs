use crate::clipboard::SystemClipboard;
use crate::prompt_editor::read_prompt;
use crate::render;
use anyhow::anyhow;
use application::StorySessionController;
use clap::{ArgAction, Parser};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Select};
use domain::{HistoryList, SessionState, SessionStatus};
use infrastructure::config::Config;
use infrastructure::ollama_client::OllamaClient;
use infrastructure::story_files::DirectorySaver;
use shared::confirmation::ask_confirmation;
use shared::types::Result;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

const SPINNER_FRAMES: [&str; 4] = ["🪔  ", "🪔✨ ", "🪔✨✨", "🪔 ✨"];

/// Story Genie: turn a one-line wish into a short story.
#[derive(Parser, Debug)]
#[command(name = "story_genie")]
#[command(about = "Turn a one-line wish into a short story via a local Ollama model", long_about = None)]
pub struct Cli {
    /// Ollama model to use (overrides OLLAMA_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Ollama server address (overrides OLLAMA_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seconds to wait for a story before giving up
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Directory where downloaded stories are written
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Copy the generated story to the clipboard (one-shot mode)
    #[arg(long, action = ArgAction::SetTrue)]
    pub copy: bool,

    /// Save the generated story as a text file (one-shot mode)
    #[arg(long, action = ArgAction::SetTrue)]
    pub download: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Inline wish for one-shot mode (if empty, starts an interactive session)
    #[arg(value_name = "WISH")]
    pub prompt: Vec<String>,
}

impl Cli {
    /// Flags win over the environment.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(model) = &self.model {
            config.ollama_model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.ollama_base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = self.timeout {
            config.generation_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = &self.output_dir {
            config.download_dir = dir.clone();
        }
        config
    }

    pub fn one_shot_prompt(&self) -> Option<String> {
        let joined = self.prompt.join(" ");
        (!joined.trim().is_empty()).then_some(joined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Wish,
    Copy,
    Download,
    Collection,
    Quit,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Wish => "Make a wish",
            MenuAction::Copy => "Copy story",
            MenuAction::Download => "Download story",
            MenuAction::Collection => "Story collection",
            MenuAction::Quit => "Quit",
        }
    }

    /// Actions that make sense right now; copy and download need a story on screen.
    pub fn available(state: &SessionState, history: &HistoryList) -> Vec<MenuAction> {
        let mut actions = vec![MenuAction::Wish];
        if state.current_story().is_some() {
            actions.push(MenuAction::Copy);
            actions.push(MenuAction::Download);
        }
        if !history.is_empty() {
            actions.push(MenuAction::Collection);
        }
        actions.push(MenuAction::Quit);
        actions
    }
}

pub struct CliApp {
    controller: StorySessionController<OllamaClient>,
}

impl CliApp {
    pub fn new(config: &Config) -> Self {
        let controller = StorySessionController::new(
            OllamaClient::from_config(config),
            Box::new(SystemClipboard::new()),
            Box::new(DirectorySaver::new(config.download_dir.clone())),
        )
        .with_timeout(config.generation_timeout);
        Self { controller }
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        match cli.one_shot_prompt() {
            Some(prompt) => self.handle_one_shot(&prompt, cli.copy, cli.download).await,
            None => self.handle_session().await,
        }
    }

    async fn handle_one_shot(&mut self, prompt: &str, copy: bool, download: bool) -> Result<()> {
        self.generate_with_indicator(prompt).await?;

        let state = self.controller.state();
        if state.status() == SessionStatus::Failed {
            let message = state.error_message().unwrap_or_default().to_string();
            return Err(anyhow!(message));
        }
        if let Some(story) = state.current_story() {
            print!("{}", render::story_card(story));
        }
        if copy {
            self.handle_copy();
        }
        if download {
            self.handle_download();
        }
        Ok(())
    }

    async fn handle_session(&mut self) -> Result<()> {
        println!("{}", render::banner());

        loop {
            if let Some(summary) = render::session_summary(self.controller.state()) {
                println!("{}\n", summary);
            }

            let actions = MenuAction::available(self.controller.state(), self.controller.history());
            let labels: Vec<&str> = actions.iter().map(MenuAction::label).collect();
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("What is your wish?")
                .items(&labels)
                .default(0)
                .interact()?;

            match actions[choice] {
                MenuAction::Wish => {
                    if let Some(prompt) = read_prompt()? {
                        self.generate_with_indicator(&prompt).await?;
                        self.show_current();
                    }
                }
                MenuAction::Copy => self.handle_copy(),
                MenuAction::Download => self.handle_download(),
                MenuAction::Collection => self.handle_collection()?,
                MenuAction::Quit => {
                    let kept = self.controller.history().len();
                    if kept == 0 {
                        break;
                    }
                    let noun = if kept == 1 { "story" } else { "stories" };
                    let question = format!("Leave the genie? {kept} {noun} will be forgotten");
                    if ask_confirmation(&question, true)? {
                        break;
                    }
                }
            }
        }

        println!("{}", "✨ Until your next wish ✨".yellow());
        Ok(())
    }

    /// Drives one generation while animating a lamp; Ctrl-C cancels it.
    async fn generate_with_indicator(&mut self, prompt: &str) -> Result<()> {
        let Some(ticket) = self.controller.begin_generation(prompt) else {
            println!("{}", "Nothing to wish for yet. Type an idea first.".yellow());
            return Ok(());
        };

        let outcome = {
            let work = self.controller.run_ticket(&ticket);
            tokio::pin!(work);
            let cancel = tokio::signal::ctrl_c();
            tokio::pin!(cancel);
            let mut ticker = tokio::time::interval(Duration::from_millis(150));
            let mut frame = 0usize;
            let mut stderr = std::io::stderr();

            let outcome = loop {
                tokio::select! {
                    outcome = &mut work => break Some(outcome),
                    _ = &mut cancel => break None,
                    _ = ticker.tick() => {
                        let lamp = SPINNER_FRAMES[frame % SPINNER_FRAMES.len()];
                        let _ = write!(stderr, "\r{} {}", lamp, "Granting your wish... (Ctrl-C to cancel)".cyan());
                        let _ = stderr.flush();
                        frame += 1;
                    }
                }
            };
            let _ = write!(stderr, "\r{}\r", " ".repeat(60));
            let _ = stderr.flush();
            outcome
        };

        match outcome {
            Some(result) => {
                self.controller.complete_generation(ticket, result);
            }
            None => {
                info!("generation cancelled from keyboard");
                self.controller.cancel_generation();
            }
        }
        Ok(())
    }

    fn show_current(&self) {
        if let Some(story) = self.controller.state().current_story() {
            print!("{}", render::story_card(story));
        }
    }

    fn handle_copy(&mut self) {
        match self.controller.copy_current_story() {
            Ok(true) => println!("{}", "Copied to clipboard.".green()),
            Ok(false) => println!("{}", "No story to copy yet.".yellow()),
            Err(err) => eprintln!("{} {:#}", "Clipboard copy failed:".red(), err),
        }
    }

    fn handle_download(&self) {
        match self.controller.download_current_story() {
            Ok(Some(path)) => println!("{} {}", "Story saved to".green(), path.display()),
            Ok(None) => println!("{}", "No story to download yet.".yellow()),
            Err(err) => eprintln!("{} {:#}", "Download failed:".red(), err),
        }
    }

    fn handle_collection(&mut self) -> Result<()> {
        let history = self.controller.history();
        if history.is_empty() {
            return Ok(());
        }
        let ids: Vec<_> = history.iter().map(|story| story.id()).collect();
        let rows = render::history_rows(history);

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("📖 Story Collection")
            .items(&rows)
            .default(0)
            .interact_opt()?;

        if let Some(index) = choice {
            self.controller.select_from_history(ids[index]);
            self.show_current();
        }
        Ok(())
    }
}
