use std::mem;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{parse_rating, MovieRecord};

use super::helpers::{display_width, tail_to_width, truncate_to_width};

/// Draft values for a new movie. The form owns its drafts until submit, when
/// they are handed over and replaced with an empty form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EntryForm {
    pub title: String,
    pub description: String,
    pub poster_url: String,
    pub rating: String,
    pub active: EntryField,
}

/// Fields available within the entry form, in focus order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum EntryField {
    #[default]
    Title,
    Description,
    PosterUrl,
    Rating,
}

impl EntryField {
    pub(crate) const ALL: [EntryField; 4] = [
        EntryField::Title,
        EntryField::Description,
        EntryField::PosterUrl,
        EntryField::Rating,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            EntryField::Title => "Title",
            EntryField::Description => "Description",
            EntryField::PosterUrl => "Poster URL",
            EntryField::Rating => "Rating",
        }
    }

    fn index(self) -> usize {
        match self {
            EntryField::Title => 0,
            EntryField::Description => 1,
            EntryField::PosterUrl => 2,
            EntryField::Rating => 3,
        }
    }
}

impl EntryForm {
    /// Move focus forward, wrapping from Rating back to Title.
    pub(crate) fn next_field(&mut self) {
        let next = (self.active.index() + 1) % EntryField::ALL.len();
        self.active = EntryField::ALL[next];
    }

    /// Move focus backward, wrapping from Title to Rating.
    pub(crate) fn previous_field(&mut self) {
        let len = EntryField::ALL.len();
        let previous = (self.active.index() + len - 1) % len;
        self.active = EntryField::ALL[previous];
    }

    fn value_mut(&mut self, field: EntryField) -> &mut String {
        match field {
            EntryField::Title => &mut self.title,
            EntryField::Description => &mut self.description,
            EntryField::PosterUrl => &mut self.poster_url,
            EntryField::Rating => &mut self.rating,
        }
    }

    pub(crate) fn value(&self, field: EntryField) -> &str {
        match field {
            EntryField::Title => &self.title,
            EntryField::Description => &self.description,
            EntryField::PosterUrl => &self.poster_url,
            EntryField::Rating => &self.rating,
        }
    }

    /// Append a character to the active field. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Turn the drafts into a record and reset every field to empty. Nothing
    /// is required: an untouched form yields empty text and a NaN rating.
    pub fn submit(&mut self) -> MovieRecord {
        let draft = mem::take(self);
        MovieRecord {
            title: draft.title,
            description: draft.description,
            poster_url: draft.poster_url,
            rating: parse_rating(&draft.rating),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntryField::ALL
            .iter()
            .all(|field| self.value(*field).is_empty())
    }

    /// Columns taken by the `Label: ` prefix of a row.
    pub(crate) fn prefix_width(field: EntryField) -> usize {
        display_width(field.label()) + 2
    }

    /// The part of a draft that fits on its row, keeping the end of the value
    /// where the cursor sits. One column stays free for the cursor.
    pub(crate) fn visible_value(&self, field: EntryField, row_width: usize) -> &str {
        let room = row_width.saturating_sub(Self::prefix_width(field) + 1);
        tail_to_width(self.value(field), room)
    }

    /// Render a single row of the form widget, never wider than `row_width`.
    pub(crate) fn build_line(&self, field: EntryField, row_width: usize) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            let room = row_width.saturating_sub(Self::prefix_width(field));
            truncate_to_width(&format!("<{}>", field.label().to_lowercase()), room)
        } else {
            self.visible_value(field, row_width).to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Column just after the visible part of the active draft, relative to the
    /// start of its row.
    pub(crate) fn cursor_column(&self, row_width: usize) -> usize {
        let field = self.active;
        Self::prefix_width(field) + display_width(self.visible_value(field, row_width))
    }
}

/// Which filter input has focus.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FilterField {
    #[default]
    Title,
    Rating,
}

/// Change raised by the filter panel on every edit. It carries the complete
/// raw text of the edited input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Title(String),
    Rating(String),
}

/// Text held by the two filter inputs. It keeps nothing beyond what the
/// inputs display.
#[derive(Debug, Default, Clone)]
pub struct FilterPanel {
    pub title: String,
    pub rating: String,
    pub active: FilterField,
}

impl FilterPanel {
    /// Swap focus between the title and rating inputs.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            FilterField::Title => FilterField::Rating,
            FilterField::Rating => FilterField::Title,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> Option<FilterChange> {
        if ch.is_control() {
            return None;
        }
        match self.active {
            FilterField::Title => {
                self.title.push(ch);
                Some(FilterChange::Title(self.title.clone()))
            }
            FilterField::Rating => {
                self.rating.push(ch);
                Some(FilterChange::Rating(self.rating.clone()))
            }
        }
    }

    /// Delete the last character. An input that is already empty does not
    /// change, so no event is raised.
    pub(crate) fn backspace(&mut self) -> Option<FilterChange> {
        match self.active {
            FilterField::Title => self
                .title
                .pop()
                .map(|_| FilterChange::Title(self.title.clone())),
            FilterField::Rating => self
                .rating
                .pop()
                .map(|_| FilterChange::Rating(self.rating.clone())),
        }
    }

    /// Spans for one input: label, then either the value or a greyed hint.
    pub(crate) fn build_spans(&self, field: FilterField, focused: bool) -> Vec<Span<'static>> {
        let (label, value, placeholder) = match field {
            FilterField::Title => ("Title: ", &self.title, "Filter by title"),
            FilterField::Rating => ("Min rating: ", &self.rating, "Filter by rating"),
        };
        let is_active = focused && self.active == field;

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let shown = if value.is_empty() && !is_active {
            placeholder.to_string()
        } else {
            value.clone()
        };

        vec![Span::raw(label), Span::styled(shown, style)]
    }
}
