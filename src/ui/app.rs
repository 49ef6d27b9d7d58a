use std::cmp::min;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info, warn};

use crate::catalog::{BlankRatingFilter, Catalog};
use crate::config::Settings;
use crate::models::{seed_movies, MovieRecord};

use super::forms::{EntryField, EntryForm, FilterChange, FilterField, FilterPanel};
use super::helpers::{build_card_lines, centered_rect, display_width, surface_error};
use super::screens::ListingView;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Title banner at the top of the screen.
const HEADER_HEIGHT: u16 = 3;
/// Bordered filter bar below the banner.
const FILTER_HEIGHT: u16 = 3;
/// Height of one movie card: border plus four lines of content.
const CARD_HEIGHT: u16 = 6;

/// What keystrokes currently drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Arrow keys move through the cards.
    Browsing,
    /// Keystrokes edit the filter panel.
    Filtering,
    /// The entry form popup is open.
    Adding,
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

/// Central application state. The catalog is the only owner of movie data;
/// the filter panel and entry form feed it, the listing renders from it.
pub struct App {
    catalog: Catalog,
    filter: FilterPanel,
    form: EntryForm,
    listing: ListingView,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app and seed the catalog. Seeding happens here and nowhere
    /// else, so it runs once per app.
    pub fn new(blank_rating: BlankRatingFilter, seed: Vec<MovieRecord>) -> Self {
        let mut catalog = Catalog::new(blank_rating);
        catalog.initialize(seed);
        Self {
            catalog,
            filter: FilterPanel::default(),
            form: EntryForm::default(),
            listing: ListingView::default(),
            mode: Mode::Browsing,
            status: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let seed = if settings.seed_examples {
            seed_movies()
        } else {
            Vec::new()
        };
        Self::new(settings.blank_rating, seed)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn draft(&self) -> &EntryForm {
        &self.form
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected(&self) -> usize {
        self.listing.selected
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Dispatch one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        self.mode = match self.mode {
            Mode::Browsing => self.handle_browse_key(code, &mut exit)?,
            Mode::Filtering => self.handle_filter_key(code),
            Mode::Adding => self.handle_form_key(code),
        };
        Ok(exit)
    }

    fn handle_browse_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let len = self.catalog.displayed().len();
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Up => self.listing.move_selection(-1, len),
            KeyCode::Down => self.listing.move_selection(1, len),
            KeyCode::PageUp => self.listing.move_selection(-5, len),
            KeyCode::PageDown => self.listing.move_selection(5, len),
            KeyCode::Home => self.listing.select_first(),
            KeyCode::End => self.listing.select_last(len),
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                self.filter.active = FilterField::Title;
                return Ok(Mode::Filtering);
            }
            KeyCode::Char('a') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::Adding);
            }
            KeyCode::Enter => self.open_selected_poster(),
            _ => {}
        }
        Ok(Mode::Browsing)
    }

    fn handle_filter_key(&mut self, code: KeyCode) -> Mode {
        let len = self.catalog.displayed().len();
        let change = match code {
            KeyCode::Esc | KeyCode::Enter => return Mode::Browsing,
            KeyCode::Tab | KeyCode::BackTab => {
                self.filter.toggle_field();
                None
            }
            KeyCode::Up => {
                self.listing.move_selection(-1, len);
                None
            }
            KeyCode::Down => {
                self.listing.move_selection(1, len);
                None
            }
            KeyCode::Backspace => self.filter.backspace(),
            KeyCode::Char(ch) => self.filter.push_char(ch),
            _ => None,
        };

        if let Some(change) = change {
            self.apply_filter_change(change);
        }
        Mode::Filtering
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Entry form hidden; drafts kept.", StatusKind::Info);
                return Mode::Browsing;
            }
            KeyCode::Tab => self.form.next_field(),
            KeyCode::BackTab => self.form.previous_field(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(ch) => {
                self.form.push_char(ch);
            }
            _ => {}
        }
        Mode::Adding
    }

    /// Route a filter panel event into the catalog.
    pub(crate) fn apply_filter_change(&mut self, change: FilterChange) {
        match change {
            FilterChange::Title(value) => self.catalog.set_title_filter(value),
            FilterChange::Rating(value) => self.catalog.set_rating_filter(value),
        }
        self.listing.ensure_in_bounds(self.catalog.displayed().len());
    }

    fn submit_form(&mut self) {
        let movie = self.form.submit();
        let title = movie.title.clone();
        self.catalog.add_movie(movie);
        self.listing.ensure_in_bounds(self.catalog.displayed().len());
        let label = if title.trim().is_empty() {
            "untitled movie".to_string()
        } else {
            title
        };
        self.set_status(format!("Added {label}."), StatusKind::Info);
    }

    fn open_selected_poster(&mut self) {
        let Some(movie) = self.catalog.displayed().get(self.listing.selected).cloned() else {
            self.set_status("No movie selected.", StatusKind::Error);
            return;
        };
        let url = movie.poster_url.trim().to_string();
        if url.is_empty() {
            self.set_status("This movie does not have a poster URL.", StatusKind::Error);
            return;
        }
        match open_link(&url).with_context(|| format!("failed to open {url}")) {
            Ok(()) => {
                info!(%url, "opened poster");
                self.set_status(format!("Opened poster for {}.", movie.title), StatusKind::Info);
            }
            Err(err) => {
                warn!(%url, error = %err, "could not open poster");
                self.set_status(
                    format!("Failed to open poster: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(FILTER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_filter_panel(frame, chunks[1]);
        self.draw_listing(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if self.mode == Mode::Adding {
            self.draw_entry_form(frame, area);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let counts = format!(
            "{} of {} movies",
            self.catalog.displayed().len(),
            self.catalog.movies().len()
        );
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "My Movie App",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(counts, Style::default().fg(Color::Gray)),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn draw_filter_panel(&self, frame: &mut Frame, area: Rect) {
        let focused = self.mode == Mode::Filtering;
        let mut block = Block::default().borders(Borders::ALL).title("Filter");
        if focused {
            block = block.style(Style::default().fg(Color::Yellow));
        }
        let inner = block.inner(area);

        let mut spans = self.filter.build_spans(FilterField::Title, focused);
        spans.push(Span::raw("    "));
        let rating_offset: usize = spans.iter().map(|span| span.width()).sum();
        spans.extend(self.filter.build_spans(FilterField::Rating, focused));

        let paragraph = Paragraph::new(Line::from(spans)).block(block);
        frame.render_widget(paragraph, area);

        if focused && inner.height > 0 {
            let cursor_x = match self.filter.active {
                FilterField::Title => "Title: ".len() + display_width(&self.filter.title),
                FilterField::Rating => {
                    rating_offset + "Min rating: ".len() + display_width(&self.filter.rating)
                }
            };
            frame.set_cursor_position((inner.x + cursor_x as u16, inner.y));
        }
    }

    fn draw_listing(&self, frame: &mut Frame, area: Rect) {
        let movies = self.catalog.displayed();
        if movies.is_empty() {
            let message = if self.catalog.movies().is_empty() {
                "No movies yet. Press 'a' to add one."
            } else {
                "No movies match the current filter."
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(paragraph, area);
            return;
        }
        if area.height == 0 {
            return;
        }

        let capacity = ((area.height / CARD_HEIGHT) as usize).max(1);
        let len = movies.len();
        let start = self.listing.window_start(capacity, len);
        let end = min(start + capacity, len);

        let constraints: Vec<Constraint> = (start..end)
            .map(|_| Constraint::Length(CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (offset, chunk) in rows.iter().enumerate() {
            let index = start + offset;
            if chunk.height == 0 || index >= len {
                continue;
            }
            let selected = index == self.listing.selected;
            let mut block = Block::default().borders(Borders::ALL);
            if selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }
            let inner_width = chunk.width.saturating_sub(2) as usize;
            let card = Paragraph::new(build_card_lines(&movies[index], selected, inner_width))
                .block(block);
            frame.render_widget(card, *chunk);
        }
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

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&'static str, &'static str)] = match self.mode {
            Mode::Browsing => &[
                ("[↑↓]", " Navigate   "),
                ("[f]", " Filter   "),
                ("[a]", " Add movie   "),
                ("[Enter]", " Open poster   "),
                ("[q]", " Quit"),
            ],
            Mode::Filtering => &[
                ("[Tab]", " Title/Rating   "),
                ("[↑↓]", " Navigate   "),
                ("[Esc]", " Done"),
            ],
            Mode::Adding => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Add movie   "),
                ("[Esc]", " Hide form"),
            ],
        };
        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, text)| [Span::styled(*key, key_style), Span::raw(*text)])
            .collect();
        Line::from(spans)
    }

    fn draw_entry_form(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Movie").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let row_width = inner.width as usize;
        let mut lines: Vec<Line> = EntryField::ALL
            .iter()
            .map(|field| self.form.build_line(*field, row_width))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to add • Tab to switch • Esc to hide",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let row = EntryField::ALL
            .iter()
            .position(|field| *field == self.form.active)
            .unwrap_or(0) as u16;
        if row < inner.height {
            let cursor_x = inner.x + self.form.cursor_column(row_width) as u16;
            frame.set_cursor_position((cursor_x, inner.y + row));
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        let text = text.into();
        debug!(status = %text, "status updated");
        self.status = Some(StatusMessage { text, kind });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_app() -> App {
        App::new(BlankRatingFilter::MatchNone, seed_movies())
    }

    fn type_keys(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).expect("key");
        }
    }

    fn displayed_titles(app: &App) -> Vec<String> {
        app.catalog()
            .displayed()
            .iter()
            .map(|movie| movie.title.clone())
            .collect()
    }

    #[test]
    fn starts_browsing_the_seed() {
        let app = seeded_app();
        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(
            displayed_titles(&app),
            ["Inception", "The Shawshank Redemption"]
        );
    }

    #[test]
    fn filter_keystrokes_update_view() {
        let mut app = seeded_app();
        app.handle_key(KeyCode::Char('f')).expect("key");
        assert_eq!(app.mode(), Mode::Filtering);

        app.handle_key(KeyCode::Tab).expect("key");
        type_keys(&mut app, "9");
        assert_eq!(displayed_titles(&app), ["The Shawshank Redemption"]);

        app.handle_key(KeyCode::BackTab).expect("key");
        type_keys(&mut app, "the");
        assert_eq!(displayed_titles(&app), ["The Shawshank Redemption"]);
        assert_eq!(app.catalog().title_filter(), "the");

        app.handle_key(KeyCode::Esc).expect("key");
        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(app.catalog().rating_filter(), "9");
    }

    #[test]
    fn clearing_rating_filter_empties_view() {
        let mut app = seeded_app();
        app.handle_key(KeyCode::Char('/')).expect("key");
        app.handle_key(KeyCode::Tab).expect("key");
        type_keys(&mut app, "8");
        assert_eq!(displayed_titles(&app).len(), 2);
        app.handle_key(KeyCode::Backspace).expect("key");
        assert!(displayed_titles(&app).is_empty());
    }

    #[test]
    fn form_submit_appends_and_resets() {
        let mut app = seeded_app();
        app.handle_key(KeyCode::Char('a')).expect("key");
        assert_eq!(app.mode(), Mode::Adding);

        type_keys(&mut app, "Dune");
        app.handle_key(KeyCode::Tab).expect("key");
        app.handle_key(KeyCode::Tab).expect("key");
        app.handle_key(KeyCode::Tab).expect("key");
        type_keys(&mut app, "7.5");
        app.handle_key(KeyCode::Enter).expect("key");

        let movies = app.catalog().movies();
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[2].title, "Dune");
        assert_eq!(movies[2].rating, 7.5);
        assert!(app.draft().is_empty());
        assert_eq!(app.mode(), Mode::Adding);
        assert_eq!(app.status_text(), Some("Added Dune."));
        // Untouched filters: the blank rating filter hides everything once
        // the view is recomputed.
        assert!(displayed_titles(&app).is_empty());
    }

    #[test]
    fn form_submit_respects_active_rating_filter() {
        let mut app = seeded_app();
        app.handle_key(KeyCode::Char('f')).expect("key");
        app.handle_key(KeyCode::Tab).expect("key");
        type_keys(&mut app, "7.5");
        app.handle_key(KeyCode::Esc).expect("key");

        app.handle_key(KeyCode::Char('a')).expect("key");
        type_keys(&mut app, "Dune");
        app.handle_key(KeyCode::BackTab).expect("key");
        type_keys(&mut app, "7.5");
        app.handle_key(KeyCode::Enter).expect("key");

        app.handle_key(KeyCode::Tab).expect("key");
        app.handle_key(KeyCode::Tab).expect("key");
        app.handle_key(KeyCode::Tab).expect("key");
        type_keys(&mut app, "3");
        app.handle_key(KeyCode::Enter).expect("key");

        assert_eq!(app.catalog().movies().len(), 4);
        assert_eq!(
            displayed_titles(&app),
            ["Inception", "The Shawshank Redemption", "Dune"]
        );
    }

    #[test]
    fn hiding_form_keeps_drafts() {
        let mut app = seeded_app();
        app.handle_key(KeyCode::Char('+')).expect("key");
        type_keys(&mut app, "Heat");
        app.handle_key(KeyCode::Esc).expect("key");
        assert_eq!(app.mode(), Mode::Browsing);
        assert_eq!(app.draft().title, "Heat");
        assert_eq!(app.catalog().movies().len(), 2);

        app.handle_key(KeyCode::Char('a')).expect("key");
        type_keys(&mut app, "!");
        assert_eq!(app.draft().title, "Heat!");
    }

    #[test]
    fn q_in_form_is_text_not_quit() {
        let mut app = seeded_app();
        app.handle_key(KeyCode::Char('a')).expect("key");
        let exit = app.handle_key(KeyCode::Char('q')).expect("key");
        assert!(!exit);
        assert_eq!(app.draft().title, "q");
    }

    #[test]
    fn quit_from_browsing() {
        let mut app = seeded_app();
        assert!(app.handle_key(KeyCode::Char('q')).expect("key"));
    }

    #[test]
    fn escape_never_quits() {
        let mut app = seeded_app();
        app.handle_key(KeyCode::Char('a')).expect("key");
        type_keys(&mut app, "Heat");
        app.handle_key(KeyCode::Enter).expect("key");
        assert!(!app.handle_key(KeyCode::Esc).expect("key"));
        assert_eq!(app.mode(), Mode::Browsing);
        assert!(!app.handle_key(KeyCode::Esc).expect("key"));
        assert_eq!(app.catalog().movies().len(), 3);
    }

    #[test]
    fn selection_clamps_after_filtering() {
        let mut app = seeded_app();
        app.handle_key(KeyCode::Down).expect("key");
        assert_eq!(app.selected(), 1);
        app.handle_key(KeyCode::Char('f')).expect("key");
        type_keys(&mut app, "incep");
        // Blank rating filter hides everything, so the cursor resets.
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn blank_poster_reports_error() {
        let mut app = App::new(
            BlankRatingFilter::MatchNone,
            vec![MovieRecord::new("Untitled", "", "", 5.0)],
        );
        app.handle_key(KeyCode::Enter).expect("key");
        assert_eq!(
            app.status_text(),
            Some("This movie does not have a poster URL.")
        );
    }

    #[test]
    fn no_seed_setting_starts_empty() {
        let settings = Settings {
            seed_examples: false,
            ..Settings::default()
        };
        let app = App::from_settings(&settings);
        assert!(app.catalog().is_initialized());
        assert!(app.catalog().movies().is_empty());
    }
}
