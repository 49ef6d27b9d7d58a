use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::MovieRecord;

const ELLIPSIS: char = '…';

/// Terminal columns taken by `text`.
pub(crate) fn display_width(text: &str) -> usize {
    text.width()
}

/// Cut `text` to at most `width` columns, marking the cut with an ellipsis.
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

/// The trailing part of `text` that fits in `width` columns. Used for inputs
/// whose cursor sits at the end of the value.
pub(crate) fn tail_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

/// Build the text of one movie card: title, description, poster reference and
/// rating, one row each. Every row is cut to `width` so the card never needs
/// more than four rows.
pub(crate) fn build_card_lines(
    movie: &MovieRecord,
    selected: bool,
    width: usize,
) -> Vec<Line<'static>> {
    let title = if selected {
        format!("▶ {}", movie.title)
    } else {
        movie.title.clone()
    };

    let mut lines = vec![Line::from(Span::styled(
        truncate_to_width(&title, width),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    lines.push(Line::from(Span::styled(
        truncate_to_width(&movie.description, width),
        Style::default().fg(Color::Gray),
    )));

    let poster = movie.poster_url.trim();
    if poster.is_empty() {
        lines.push(Line::from(Span::styled(
            "No poster",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            truncate_to_width(&format!("Poster: {poster}"), width),
            Style::default().fg(Color::Cyan),
        )));
    }

    lines.push(Line::from(vec![
        Span::raw("Rating: "),
        Span::styled(movie.rating_label(), Style::default().fg(Color::Green)),
    ]));

    lines
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_movies;
    use anyhow::{anyhow, Context};

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn card_shows_every_field() {
        let movie = MovieRecord::new("Dune", "Spice", "https://example.com/dune.jpg", 7.5);
        let lines = build_card_lines(&movie, false, 80);
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            text,
            [
                "Dune",
                "Spice",
                "Poster: https://example.com/dune.jpg",
                "Rating: 7.5"
            ]
        );
    }

    #[test]
    fn selected_card_is_marked_and_nan_prints() {
        let movie = MovieRecord::new("", "", "", f64::NAN);
        let lines = build_card_lines(&movie, true, 80);
        assert_eq!(plain(&lines[0]), "▶ ");
        assert_eq!(plain(&lines[2]), "No poster");
        assert_eq!(plain(&lines[3]), "Rating: NaN");
    }

    #[test]
    fn long_fields_are_cut_to_one_row() {
        let movie = seed_movies().remove(0);
        let lines = build_card_lines(&movie, false, 40);
        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert!(line.width() <= 40, "{:?} is wider than 40", plain(line));
        }
        assert!(plain(&lines[1]).ends_with('…'));
        assert_eq!(plain(&lines[3]), "Rating: 8.8");
    }

    #[test]
    fn truncation_counts_columns_not_chars() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("日本語です", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn tail_keeps_the_end_of_the_value() {
        assert_eq!(tail_to_width("abcdef", 3), "def");
        assert_eq!(tail_to_width("abc", 10), "abc");
        assert_eq!(tail_to_width("日本語", 4), "本語");
        assert_eq!(display_width("日本語"), 6);
    }

    #[test]
    fn surface_error_reports_root_cause() {
        let err = Err::<(), _>(anyhow!("no handler"))
            .context("failed to open link")
            .expect_err("error");
        assert_eq!(surface_error(&err), "no handler");
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }
}
