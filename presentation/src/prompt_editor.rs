//! Single-prompt line editor.
//!
//! Enter submits, while Enter held with Shift, Alt or Ctrl inserts a line
//! break. Shift+Enter is only distinguishable when the terminal supports
//! keyboard enhancement; Alt+Enter and Ctrl+J work everywhere.
//! Input stops growing at [`MAX_PROMPT_CHARS`].

use colored::Colorize;
use crossterm::cursor::{RestorePosition, SavePosition};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use domain::MAX_PROMPT_CHARS;
use shared::types::Result;
use std::io::{self, BufRead, IsTerminal, Write};

#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Submit(String),
    Cancel,
}

#[derive(Debug, Default)]
pub struct PromptBuffer {
    text: String,
}

impl PromptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn push(&mut self, c: char) {
        if self.char_count() < MAX_PROMPT_CHARS {
            self.text.push(c);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter if key.modifiers.is_empty() => {
                let trimmed = self.text.trim();
                if trimmed.is_empty() {
                    KeyOutcome::Continue
                } else {
                    KeyOutcome::Submit(trimmed.to_string())
                }
            }
            KeyCode::Enter => {
                self.push('\n');
                KeyOutcome::Continue
            }
            // many terminals report Ctrl+Enter as Ctrl+J
            KeyCode::Char('j') if ctrl => {
                self.push('\n');
                KeyOutcome::Continue
            }
            KeyCode::Char('c') if ctrl => KeyOutcome::Cancel,
            KeyCode::Char('d') if ctrl && self.text.is_empty() => KeyOutcome::Cancel,
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                KeyOutcome::Continue
            }
            KeyCode::Esc => KeyOutcome::Cancel,
            KeyCode::Backspace => {
                self.text.pop();
                KeyOutcome::Continue
            }
            KeyCode::Char(c) if !ctrl => {
                self.push(c);
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }
}

/// Raw mode plus, when available, disambiguated key reporting so that
/// Shift+Enter arrives with its modifier instead of as a bare `\r`.
struct RawModeGuard {
    enhanced: bool,
}

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { enhanced: false };
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )?;
            guard.enhanced = true;
        }
        Ok(guard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
    }
}

/// Key help shown above the editor; only advertises Shift+Enter when it can be told apart.
fn key_hint(enhanced: bool) -> &'static str {
    if enhanced {
        "(Enter to submit, Shift+Enter or Alt+Enter for a new line, Esc to go back)"
    } else {
        "(Enter to submit, Alt+Enter or Ctrl+J for a new line, Esc to go back)"
    }
}

fn header(enhanced: bool) -> String {
    format!(
        "{} {}",
        "Whisper your story idea to the genie...".cyan().bold(),
        key_hint(enhanced).dimmed()
    )
}

/// Reads one story idea. `Ok(None)` means the user backed out.
pub fn read_prompt() -> Result<Option<String>> {
    if !io::stdin().is_terminal() {
        println!("{}", header(false));
        return read_piped_line();
    }

    let mut stdout = io::stdout();
    let raw = RawModeGuard::enable()?;
    write!(stdout, "{}\r\n", header(raw.enhanced))?;
    let mut buffer = PromptBuffer::new();
    execute!(stdout, SavePosition)?;
    redraw(&mut stdout, &buffer)?;

    loop {
        if let Event::Key(key) = event::read()? {
            match buffer.handle_key(key) {
                KeyOutcome::Continue => redraw(&mut stdout, &buffer)?,
                KeyOutcome::Submit(prompt) => {
                    write!(stdout, "\r\n")?;
                    stdout.flush()?;
                    return Ok(Some(prompt));
                }
                KeyOutcome::Cancel => {
                    write!(stdout, "\r\n")?;
                    stdout.flush()?;
                    return Ok(None);
                }
            }
        }
    }
}

fn redraw(stdout: &mut io::Stdout, buffer: &PromptBuffer) -> Result<()> {
    queue!(stdout, RestorePosition, Clear(ClearType::FromCursorDown))?;
    let body = buffer.text().replace('\n', "\r\n  ");
    write!(
        stdout,
        "{} {}  {}",
        ">".yellow().bold(),
        body,
        format!("[{}/{}]", buffer.char_count(), MAX_PROMPT_CHARS).dimmed()
    )?;
    stdout.flush()?;
    Ok(())
}

fn read_piped_line() -> Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
