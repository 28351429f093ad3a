use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Song;

/// Input state for the new-profile dialog.
#[derive(Default, Clone)]
pub(crate) struct ProfileForm {
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl ProfileForm {
    /// Append a character to the name, rejecting control input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    /// Remove the last character from the name.
    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    /// Validate the input and return the trimmed profile name.
    pub(crate) fn parse_input(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Profile name is required."));
        }
        Ok(name.to_string())
    }

    /// Render the single input line for the dialog.
    pub(crate) fn build_line(&self) -> Line<'static> {
        let display = if self.name.is_empty() {
            "<required>".to_string()
        } else {
            self.name.clone()
        };

        let style = if self.name.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow)
        };

        Line::from(vec![Span::raw("Name: "), Span::styled(display, style)])
    }

    /// Character count of the name, used to place the cursor.
    pub(crate) fn value_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// State for confirming permanent song deletion.
pub(crate) struct ConfirmDeleteSong {
    pub(crate) song: Song,
}
