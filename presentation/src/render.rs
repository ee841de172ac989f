use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use domain::{HistoryList, SessionState, Story};
use shared::utils::preview;

const RULE_WIDTH: usize = 60;
const ROW_PREVIEW_CHARS: usize = 48;

fn local(at: DateTime<Utc>) -> DateTime<Local> {
    at.with_timezone(&Local)
}

fn rule() -> String {
    "─".repeat(RULE_WIDTH).yellow().to_string()
}

pub fn banner() -> String {
    format!(
        "{}\n{}\n",
        "🪔 Story Genie AI".green().bold(),
        "✨ Your Wish is My Command ✨".yellow()
    )
}

/// Full story card: the wish, stats, paragraphs, and footer.
pub fn story_card(story: &Story) -> String {
    let created = local(story.created_at());
    let mut out = String::new();

    out.push_str(&format!("{}\n", "✨ Your Magical Story".green().bold()));
    out.push_str(&format!("{}\n", rule()));
    out.push_str(&format!(
        "{} {}\n",
        "Your original wish:".cyan().bold(),
        story.prompt().as_str().bold()
    ));
    out.push_str(&format!(
        "{}\n",
        format!(
            "{} • {} words • {} min",
            created.format("%Y-%m-%d"),
            story.word_count(),
            story.reading_minutes()
        )
        .dimmed()
    ));
    out.push_str(&format!("{}\n", rule()));

    for paragraph in story.paragraphs() {
        out.push_str(paragraph);
        out.push_str("\n\n");
    }

    out.push_str(&format!("{}\n", rule()));
    out.push_str(&format!(
        "{}\n",
        format!(
            "Crafted by Story Genie AI • Tale ID: {} • Granted on {}",
            story.id(),
            created.format("%Y-%m-%d %H:%M:%S")
        )
        .dimmed()
    ));
    out
}

/// One line per history entry, for the selection menu.
pub fn history_row(story: &Story) -> String {
    format!(
        "{}  ({})",
        preview(story.prompt().as_str(), ROW_PREVIEW_CHARS),
        local(story.created_at()).format("%Y-%m-%d %H:%M")
    )
}

pub fn history_rows(history: &HistoryList) -> Vec<String> {
    history.iter().map(history_row).collect()
}

/// What to show above the menu for the current state.
pub fn session_summary(state: &SessionState) -> Option<String> {
    if let Some(message) = state.error_message() {
        return Some(format!("{} {}", "✗".red().bold(), message.red()));
    }
    if state.current_story().is_none() {
        return Some(format!(
            "{}\n{}",
            "The Genie Awaits Your Wish".green().bold(),
            "Share your idea and let the magic begin".dimmed()
        ));
    }
    None
}
