use std::cmp::min;
use std::mem;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::editor::SongEditor;
use crate::models::{Account, UNTITLED_SONG};
use crate::store::SqliteStore;

use super::forms::{ConfirmDeleteSong, ProfileForm};
use super::helpers::{centered_rect, ellipsize};
use super::screens::{EditorScreen, Focus, SignInScreen, SuggestionBanner};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per song card in the sidebar list.
const SONG_CARD_HEIGHT: u16 = 5;
/// Height of the tip banner, including its border.
const BANNER_HEIGHT: u16 = 3;

/// High-level navigation states. Exactly one screen owns the store at any
/// moment, which is why transitions route through [`Screen::Handoff`].
enum Screen {
    SignIn(SignInScreen),
    Editor(EditorScreen),
    /// Transient placeholder while the store moves between the other two.
    Handoff,
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    CreatingProfile(ProfileForm),
    ConfirmDeleteSong(ConfirmDeleteSong),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Start at the profile picker with nobody signed in.
    pub fn signed_out(store: SqliteStore) -> Self {
        let mut status = None;
        let accounts = match store.list_accounts() {
            Ok(accounts) => accounts,
            Err(err) => {
                status = Some(StatusMessage {
                    text: err.to_string(),
                    kind: StatusKind::Error,
                });
                Vec::new()
            }
        };

        Self {
            screen: Screen::SignIn(SignInScreen::new(store, accounts)),
            mode: Mode::Normal,
            status,
        }
    }

    /// Resume the editing workspace for an already signed-in writer.
    pub fn signed_in(store: SqliteStore, account: Account) -> Self {
        let mut editor = SongEditor::new(store, account);
        let status = match editor.reload() {
            Ok(()) => None,
            Err(err) => Some(StatusMessage {
                text: err.to_string(),
                kind: StatusKind::Error,
            }),
        };

        Self {
            screen: Screen::Editor(EditorScreen::new(editor)),
            mode: Mode::Normal,
            status,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::CreatingProfile(form) => self.handle_create_profile(code, form)?,
            Mode::ConfirmDeleteSong(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Housekeeping between input events; expires the tip banner.
    pub fn on_tick(&mut self) {
        if let Screen::Editor(ref mut screen) = self.screen {
            screen.expire_stale_banner();
        }
    }

    /// Save shortcut that works from any editor pane, including text fields.
    pub fn handle_ctrl_s(&mut self) -> Result<()> {
        let mut status_to_set = None;
        if matches!(self.mode, Mode::Normal) {
            if let Screen::Editor(ref mut screen) = self.screen {
                status_to_set = Some(Self::save_session(screen));
            }
        }

        if let Some((text, kind)) = status_to_set {
            self.set_status(text, kind);
        }
        Ok(())
    }

    /// Writing-tip shortcut that works from any editor pane.
    pub fn handle_ctrl_t(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Normal) {
            if let Screen::Editor(ref mut screen) = self.screen {
                if screen.editor.selected_song().is_some() {
                    let tip = screen.editor.suggest();
                    screen.show_tip(tip);
                }
            }
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::SignIn(_) => self.handle_sign_in_key(code, exit),
            Screen::Editor(_) => self.handle_editor_key(code, exit),
            Screen::Handoff => Ok(Mode::Normal),
        }
    }

    fn handle_sign_in_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let mut status_to_set: Option<(String, StatusKind)> = None;
        let mut sign_in_requested = false;

        if let Screen::SignIn(ref mut signin) = self.screen {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    *exit = true;
                }
                KeyCode::Up => signin.move_selection(-1),
                KeyCode::Down => signin.move_selection(1),
                KeyCode::Char('+') | KeyCode::Char('n') => {
                    return Ok(Mode::CreatingProfile(ProfileForm::default()));
                }
                KeyCode::Char('r') => match signin.refresh(None) {
                    Ok(()) => {
                        status_to_set = Some(("Profiles reloaded.".to_string(), StatusKind::Info));
                    }
                    Err(err) => {
                        status_to_set = Some((err.to_string(), StatusKind::Error));
                    }
                },
                KeyCode::Enter => sign_in_requested = true,
                _ => {}
            }
        }

        if let Some((text, kind)) = status_to_set {
            self.set_status(text, kind);
        }
        if sign_in_requested {
            self.sign_in_current();
        }
        Ok(Mode::Normal)
    }

    fn handle_editor_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let focus = match self.screen {
            Screen::Editor(ref screen) => screen.focus,
            _ => return Ok(Mode::Normal),
        };

        match focus {
            Focus::Sidebar => self.handle_sidebar_key(code, exit),
            Focus::Title | Focus::Lyrics => self.handle_text_key(code, focus),
            Focus::Genre | Focus::Mood => self.handle_selector_key(code, focus),
        }
    }

    fn handle_sidebar_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let mut status_to_set: Option<(String, StatusKind)> = None;
        let mut sign_out_requested = false;

        if let Screen::Editor(ref mut screen) = self.screen {
            match code {
                KeyCode::Char('q') => {
                    *exit = true;
                }
                KeyCode::Esc => screen.banner = None,
                KeyCode::Up => screen.move_cursor(-1),
                KeyCode::Down => screen.move_cursor(1),
                KeyCode::Home => screen.cursor_first(),
                KeyCode::End => screen.cursor_last(),
                KeyCode::Tab => {
                    if screen.editor.selected_song().is_some() {
                        screen.focus = screen.focus.next();
                    }
                }
                KeyCode::BackTab => {
                    if screen.editor.selected_song().is_some() {
                        screen.focus = screen.focus.previous();
                    }
                }
                KeyCode::Enter => {
                    if let Some(song) = screen.cursor_song() {
                        let id = song.id;
                        let title = song.title.clone();
                        screen.editor.select(id);
                        status_to_set = Some((format!("Opened \"{title}\"."), StatusKind::Info));
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('+') => {
                    match screen.editor.create_song() {
                        Ok(song) => {
                            screen.sync_cursor_to_selection();
                            screen.focus = Focus::Title;
                            status_to_set =
                                Some((format!("Created \"{}\".", song.title), StatusKind::Info));
                        }
                        Err(err) => {
                            status_to_set = Some((err.to_string(), StatusKind::Error));
                        }
                    }
                }
                KeyCode::Char('d') | KeyCode::Char('-') => {
                    if let Some(song) = screen.cursor_song() {
                        return Ok(Mode::ConfirmDeleteSong(ConfirmDeleteSong {
                            song: song.clone(),
                        }));
                    }
                }
                KeyCode::Char('s') => {
                    status_to_set = Some(Self::save_session(screen));
                }
                KeyCode::Char('t') => {
                    if screen.editor.selected_song().is_some() {
                        let tip = screen.editor.suggest();
                        screen.show_tip(tip);
                    } else {
                        status_to_set =
                            Some(("No song is selected.".to_string(), StatusKind::Error));
                    }
                }
                KeyCode::Char('r') => match screen.editor.reload() {
                    Ok(()) => {
                        screen.ensure_in_bounds();
                        screen.normalize_focus();
                        status_to_set = Some(("Songs reloaded.".to_string(), StatusKind::Info));
                    }
                    Err(err) => {
                        status_to_set = Some((err.to_string(), StatusKind::Error));
                    }
                },
                KeyCode::Char('p') => sign_out_requested = true,
                _ => {}
            }
        }

        if let Some((text, kind)) = status_to_set {
            self.set_status(text, kind);
        }
        if sign_out_requested {
            self.sign_out();
        }
        Ok(Mode::Normal)
    }

    fn handle_text_key(&mut self, code: KeyCode, focus: Focus) -> Result<Mode> {
        if let Screen::Editor(ref mut screen) = self.screen {
            match code {
                KeyCode::Esc => screen.focus = Focus::Sidebar,
                KeyCode::Tab => screen.focus = screen.focus.next(),
                KeyCode::BackTab => screen.focus = screen.focus.previous(),
                KeyCode::Enter => {
                    if focus == Focus::Lyrics {
                        screen.editor.draft_mut().lyrics.push('\n');
                    } else {
                        screen.focus = Focus::Lyrics;
                    }
                }
                KeyCode::Backspace => {
                    let draft = screen.editor.draft_mut();
                    if focus == Focus::Title {
                        draft.title.pop();
                    } else {
                        draft.lyrics.pop();
                    }
                }
                KeyCode::Char(ch) => {
                    if !ch.is_control() {
                        let draft = screen.editor.draft_mut();
                        if focus == Focus::Title {
                            draft.title.push(ch);
                        } else {
                            draft.lyrics.push(ch);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(Mode::Normal)
    }

    fn handle_selector_key(&mut self, code: KeyCode, focus: Focus) -> Result<Mode> {
        if let Screen::Editor(ref mut screen) = self.screen {
            match code {
                KeyCode::Esc => screen.focus = Focus::Sidebar,
                KeyCode::Tab | KeyCode::Enter => screen.focus = screen.focus.next(),
                KeyCode::BackTab => screen.focus = screen.focus.previous(),
                KeyCode::Left | KeyCode::Up => {
                    let draft = screen.editor.draft_mut();
                    if focus == Focus::Genre {
                        draft.genre = draft.genre.previous();
                    } else {
                        draft.mood = draft.mood.previous();
                    }
                }
                KeyCode::Right | KeyCode::Down => {
                    let draft = screen.editor.draft_mut();
                    if focus == Focus::Genre {
                        draft.genre = draft.genre.next();
                    } else {
                        draft.mood = draft.mood.next();
                    }
                }
                _ => {}
            }
        }
        Ok(Mode::Normal)
    }

    fn handle_create_profile(&mut self, code: KeyCode, mut form: ProfileForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Profile creation cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_profile(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::CreatingProfile(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDeleteSong) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if self.perform_delete(&confirm) {
                    Ok(Mode::Normal)
                } else {
                    Ok(Mode::ConfirmDeleteSong(confirm))
                }
            }
            _ => Ok(Mode::ConfirmDeleteSong(confirm)),
        }
    }

    /// Delete the song named by the dialog. Returns false when the dialog
    /// should stay open for a retry.
    fn perform_delete(&mut self, confirm: &ConfirmDeleteSong) -> bool {
        let mut status_to_set: Option<(String, StatusKind)> = None;
        let mut close = true;

        if let Screen::Editor(ref mut screen) = self.screen {
            match screen.editor.delete_song(confirm.song.id) {
                Ok(()) => {
                    screen.ensure_in_bounds();
                    screen.normalize_focus();
                    status_to_set = Some((
                        format!("Deleted \"{}\".", confirm.song.title),
                        StatusKind::Info,
                    ));
                }
                Err(err) if err.is_not_found() => {
                    let refreshed = screen.editor.reload();
                    screen.ensure_in_bounds();
                    screen.normalize_focus();
                    status_to_set = Some(match refreshed {
                        Ok(()) => (
                            "That song was already deleted; the list has been refreshed."
                                .to_string(),
                            StatusKind::Error,
                        ),
                        Err(err) => (err.to_string(), StatusKind::Error),
                    });
                }
                Err(err) => {
                    close = false;
                    status_to_set = Some((err.to_string(), StatusKind::Error));
                }
            }
        }

        if let Some((text, kind)) = status_to_set {
            self.set_status(text, kind);
        }
        close
    }

    /// Persist the draft, refresh the cache, and describe the outcome.
    /// A cleared-out title goes to the store as [`UNTITLED_SONG`] so no
    /// persisted song ever has a blank one.
    fn save_session(screen: &mut EditorScreen) -> (String, StatusKind) {
        let draft = screen.editor.draft_mut();
        if draft.title.trim().is_empty() {
            draft.title = UNTITLED_SONG.to_string();
        }

        match screen.editor.save() {
            Ok(song) => {
                screen.sync_cursor_to_selection();
                (format!("Saved \"{}\".", song.title), StatusKind::Info)
            }
            Err(err) if err.is_not_found() => {
                let refreshed = screen.editor.reload();
                screen.ensure_in_bounds();
                screen.normalize_focus();
                match refreshed {
                    Ok(()) => (
                        "That song no longer exists; the list has been refreshed.".to_string(),
                        StatusKind::Error,
                    ),
                    Err(err) => (err.to_string(), StatusKind::Error),
                }
            }
            Err(err) => (err.to_string(), StatusKind::Error),
        }
    }

    /// Sign the highlighted profile in, then hand the store to the editor.
    fn sign_in_current(&mut self) {
        let mut outcome: Option<Result<Account, String>> = None;

        if let Screen::SignIn(ref mut signin) = self.screen {
            if let Some(account) = signin.current_account().cloned() {
                outcome = Some(match signin.store.sign_in(account.id) {
                    Ok(()) => Ok(account),
                    Err(err) => Err(err.to_string()),
                });
            }
        }

        match outcome {
            Some(Ok(account)) => self.enter_editor(account),
            Some(Err(message)) => self.set_status(message, StatusKind::Error),
            None => {}
        }
    }

    fn enter_editor(&mut self, account: Account) {
        match mem::replace(&mut self.screen, Screen::Handoff) {
            Screen::SignIn(signin) => {
                let name = account.name.clone();
                let mut editor = SongEditor::new(signin.store, account);
                let load = editor.reload();
                self.screen = Screen::Editor(EditorScreen::new(editor));
                match load {
                    Ok(()) => self.set_status(format!("Signed in as {name}."), StatusKind::Info),
                    Err(err) => self.set_status(err.to_string(), StatusKind::Error),
                }
            }
            other => self.screen = other,
        }
    }

    /// Close the editing session and return to the profile picker.
    fn sign_out(&mut self) {
        match mem::replace(&mut self.screen, Screen::Handoff) {
            Screen::Editor(screen) => {
                let store = screen.editor.into_store();
                let mut problem = store.sign_out().err().map(|err| err.to_string());
                let accounts = match store.list_accounts() {
                    Ok(accounts) => accounts,
                    Err(err) => {
                        problem.get_or_insert(err.to_string());
                        Vec::new()
                    }
                };
                self.screen = Screen::SignIn(SignInScreen::new(store, accounts));
                match problem {
                    Some(message) => self.set_status(message, StatusKind::Error),
                    None => self.set_status("Signed out.", StatusKind::Info),
                }
            }
            other => self.screen = other,
        }
    }

    fn save_new_profile(&mut self, form: &ProfileForm) -> Result<()> {
        let name = form.parse_input()?;

        if let Screen::SignIn(ref mut signin) = self.screen {
            if signin
                .accounts
                .iter()
                .any(|account| account.name.eq_ignore_ascii_case(&name))
            {
                return Err(anyhow!("A profile named \"{name}\" already exists."));
            }
            let account = signin.store.create_account(&name)?;
            signin.refresh(Some(account.id))?;
        }

        self.set_status(format!("Created profile {name}."), StatusKind::Info);
        Ok(())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        let text = text.into();
        if matches!(kind, StatusKind::Error) {
            warn!(message = %text, "surfaced error to the footer");
        }
        self.status = Some(StatusMessage { text, kind });
    }

    pub fn draw(&self, frame: &mut Frame) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)])
            .split(size);

        match &self.screen {
            Screen::SignIn(signin) => self.draw_sign_in(frame, chunks[0], signin),
            Screen::Editor(screen) => self.draw_editor(frame, chunks[0], screen),
            Screen::Handoff => {}
        }

        self.draw_footer(frame, chunks[1]);

        match &self.mode {
            Mode::Normal => {}
            Mode::CreatingProfile(form) => self.draw_profile_form(frame, chunks[0], form),
            Mode::ConfirmDeleteSong(confirm) => self.draw_confirm_delete(frame, chunks[0], confirm),
        }
    }

    fn draw_sign_in(&self, frame: &mut Frame, area: Rect, signin: &SignInScreen) {
        let panel = centered_rect(50, 60, area);
        let block = Block::default().title("Songsmith").borders(Borders::ALL);
        frame.render_widget(block.clone(), panel);
        let inner = block.inner(panel);

        if signin.accounts.is_empty() {
            let message = Paragraph::new("No profiles yet. Press '+' to create one.")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, inner);
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(
                "Who is writing today?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (idx, account) in signin.accounts.iter().enumerate() {
            let pointer = if idx == signin.selected { "▶ " } else { "  " };
            let style = if idx == signin.selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{pointer}{}", account.name), style),
                Span::styled(
                    format!("  since {}", account.created_date()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }

    fn draw_editor(&self, frame: &mut Frame, area: Rect, screen: &EditorScreen) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
            .split(area);

        self.draw_sidebar(frame, columns[0], screen);
        self.draw_detail(frame, columns[1], screen);
    }

    fn draw_sidebar(&self, frame: &mut Frame, area: Rect, screen: &EditorScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                screen.editor.account().name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  •  {} songs", screen.editor.songs().len())),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Library"));
        frame.render_widget(header, chunks[0]);

        if screen.editor.songs().is_empty() {
            let message = Paragraph::new("No songs yet. Press 'n' to start one.")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        self.render_song_cards(frame, chunks[1], screen);
    }

    fn render_song_cards(&self, frame: &mut Frame, area: Rect, screen: &EditorScreen) {
        let songs = screen.editor.songs();
        if songs.is_empty() || area.height == 0 {
            return;
        }

        let card_height = SONG_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = songs.len();
        let mut start = if screen.cursor >= capacity {
            screen.cursor + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(SONG_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let open_id = screen.editor.session().selected();
        let sidebar_active = screen.focus == Focus::Sidebar;

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let song_index = start + idx;
            if song_index >= len {
                break;
            }

            let song = &songs[song_index];
            let is_cursor = song_index == screen.cursor;

            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if is_cursor && sidebar_active {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }
            if open_id == Some(song.id) {
                block = block.title("editing");
            }

            let width = chunk.width.saturating_sub(4) as usize;
            let pointer = if is_cursor { "▶ " } else { "  " };

            let lines = vec![
                Line::from(Span::styled(
                    format!("{pointer}{}", ellipsize(&song.title, width)),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    song.byline(),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    format!("updated {}", song.updated_date()),
                    Style::default().fg(Color::DarkGray),
                )),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, screen: &EditorScreen) {
        if screen.editor.selected_song().is_none() {
            let message = Paragraph::new(
                "No song selected. Press 'n' to start one or Enter to open the highlighted song.",
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Workspace"));
            frame.render_widget(message, area);
            return;
        }

        let banner_height = if screen.banner.is_some() {
            BANNER_HEIGHT
        } else {
            0
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(banner_height),
            ])
            .split(area);

        self.draw_title_field(frame, chunks[0], screen);
        self.draw_selectors(frame, chunks[1], screen);
        self.draw_lyrics(frame, chunks[2], screen);
        if let Some(banner) = &screen.banner {
            self.draw_banner(frame, chunks[3], banner);
        }
    }

    fn draw_title_field(&self, frame: &mut Frame, area: Rect, screen: &EditorScreen) {
        let active = screen.focus == Focus::Title;
        let draft = screen.editor.draft();

        let caption = if screen.has_unsaved_changes() {
            "Title (unsaved)"
        } else {
            "Title"
        };
        let mut block = Block::default().borders(Borders::ALL).title(caption);
        if active {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        let paragraph = Paragraph::new(draft.title.clone()).block(block.clone());
        frame.render_widget(paragraph, area);

        if active {
            let inner = block.inner(area);
            if inner.width > 0 && inner.height > 0 {
                let max_x = inner.x + inner.width.saturating_sub(1);
                let cursor_x = inner.x + draft.title.chars().count() as u16;
                frame.set_cursor_position((cursor_x.min(max_x), inner.y));
            }
        }
    }

    fn draw_selectors(&self, frame: &mut Frame, area: Rect, screen: &EditorScreen) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let draft = screen.editor.draft();
        self.draw_selector(
            frame,
            halves[0],
            "Genre",
            &draft.genre.to_string(),
            screen.focus == Focus::Genre,
        );
        self.draw_selector(
            frame,
            halves[1],
            "Mood",
            &draft.mood.to_string(),
            screen.focus == Focus::Mood,
        );
    }

    fn draw_selector(&self, frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
        let mut block = Block::default().borders(Borders::ALL).title(label);
        if active {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        let text = if active {
            format!("◀ {value} ▶")
        } else {
            value.to_string()
        };
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let paragraph = Paragraph::new(Span::styled(text, style)).block(block);
        frame.render_widget(paragraph, area);
    }

    fn draw_lyrics(&self, frame: &mut Frame, area: Rect, screen: &EditorScreen) {
        let active = screen.focus == Focus::Lyrics;
        let draft = screen.editor.draft();

        let mut block = Block::default().borders(Borders::ALL).title("Lyrics");
        if active {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        let inner = block.inner(area);

        // Rows are split on raw newlines so the trailing empty line after a
        // newline still counts; `str::lines` would drop it.
        let rows: Vec<&str> = draft.lyrics.split('\n').collect();
        let total = rows.len();
        let visible = inner.height.max(1) as usize;
        let scroll = total.saturating_sub(visible) as u16;

        let paragraph = Paragraph::new(draft.lyrics.clone())
            .block(block)
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);

        if active && inner.width > 0 && inner.height > 0 {
            let row_on_screen = (total as u16).saturating_sub(1).saturating_sub(scroll);
            let col = rows.last().map(|row| row.chars().count()).unwrap_or(0) as u16;
            let max_x = inner.x + inner.width.saturating_sub(1);
            let max_y = inner.y + inner.height.saturating_sub(1);
            frame.set_cursor_position((
                (inner.x + col).min(max_x),
                (inner.y + row_on_screen).min(max_y),
            ));
        }
    }

    fn draw_banner(&self, frame: &mut Frame, area: Rect, banner: &SuggestionBanner) {
        if area.height == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Tip")
            .border_style(Style::default().fg(Color::Cyan));
        let paragraph = Paragraph::new(Span::styled(
            banner.text.clone(),
            Style::default().fg(Color::Cyan),
        ))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::CreatingProfile(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Create   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmDeleteSong(_)) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Keep"),
            ]),
            (Screen::SignIn(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Sign In   "),
                Span::styled("[+]", key_style),
                Span::raw(" New Profile   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reload   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Editor(screen), _) => match screen.focus {
                Focus::Sidebar => Line::from(vec![
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Move   "),
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Open   "),
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Edit Fields   "),
                    Span::styled("[n]", key_style),
                    Span::raw(" New   "),
                    Span::styled("[d]", key_style),
                    Span::raw(" Delete   "),
                    Span::styled("[s]", key_style),
                    Span::raw(" Save   "),
                    Span::styled("[t]", key_style),
                    Span::raw(" Tip   "),
                    Span::styled("[r]", key_style),
                    Span::raw(" Reload   "),
                    Span::styled("[p]", key_style),
                    Span::raw(" Profiles   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]),
                Focus::Genre | Focus::Mood => Line::from(vec![
                    Span::styled("[←→]", key_style),
                    Span::raw(" Change   "),
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Next Field   "),
                    Span::styled("[Ctrl+S]", key_style),
                    Span::raw(" Save   "),
                    Span::styled("[Esc]", key_style),
                    Span::raw(" Back to List"),
                ]),
                Focus::Title | Focus::Lyrics => Line::from(vec![
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Next Field   "),
                    Span::styled("[Ctrl+S]", key_style),
                    Span::raw(" Save   "),
                    Span::styled("[Ctrl+T]", key_style),
                    Span::raw(" Tip   "),
                    Span::styled("[Esc]", key_style),
                    Span::raw(" Back to List"),
                ]),
            },
            (Screen::Handoff, _) => Line::from(""),
        }
    }

    fn draw_profile_form(&self, frame: &mut Frame, area: Rect, form: &ProfileForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("New Profile").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(), Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to create • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Name: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDeleteSong) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Song").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete \"{}\" permanently?", confirm.song.title)),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
