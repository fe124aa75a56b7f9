use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::models::{Rating, RatingFilter};

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

    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1])[1]
}

/// Innermost cause of a chained error; context layers read poorly in a
/// one-line footer.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Colored label for the active filter in the header.
pub(crate) fn filter_badge(filter: RatingFilter) -> Span<'static> {
    let color = match filter {
        RatingFilter::Only(Rating::Liked) => Color::Green,
        RatingFilter::Only(Rating::Disliked) => Color::Red,
        RatingFilter::Only(Rating::Unrated) => Color::Yellow,
        RatingFilter::ShowAll => Color::Cyan,
    };
    Span::styled(
        format!(" {} ", filter.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}
