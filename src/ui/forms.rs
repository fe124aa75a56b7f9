use crossterm::event::KeyCode;

use crate::models::Joke;

/// What a key press did to the draft input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DraftAction {
    Edited,
    Submit,
    Leave,
    Ignored,
}

/// Apply a key press to the draft text. Control characters never enter the
/// draft; Enter asks to add the joke and Esc/Tab leaves the input line.
pub(crate) fn edit_draft(draft: &mut String, code: KeyCode) -> DraftAction {
    match code {
        KeyCode::Enter => DraftAction::Submit,
        KeyCode::Esc | KeyCode::Tab => DraftAction::Leave,
        KeyCode::Backspace => {
            if draft.pop().is_some() {
                DraftAction::Edited
            } else {
                DraftAction::Ignored
            }
        }
        KeyCode::Char(ch) if !ch.is_control() => {
            draft.push(ch);
            DraftAction::Edited
        }
        _ => DraftAction::Ignored,
    }
}

/// Pending removal awaiting a Y/N answer.
#[derive(Debug, Clone)]
pub(crate) struct ConfirmJokeRemove {
    pub(crate) joke: Joke,
}

impl From<Joke> for ConfirmJokeRemove {
    fn from(joke: Joke) -> Self {
        Self { joke }
    }
}

impl ConfirmJokeRemove {
    /// Prompt text, shortening long jokes so the dialog stays one screen wide.
    pub(crate) fn prompt(&self, max_chars: usize) -> String {
        let text = self.joke.text.trim();
        if text.chars().count() <= max_chars {
            format!("Remove \"{text}\"?")
        } else {
            let shortened: String = text.chars().take(max_chars.saturating_sub(3)).collect();
            format!("Remove \"{shortened}...\"?")
        }
    }
}
