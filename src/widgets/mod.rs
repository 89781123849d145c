pub mod legend;
pub mod map;
pub mod status;
pub mod summary;

use ratatui::{prelude::*, widgets::Block, widgets::Borders};

use crate::palette::{self, Rgb};

/// Bordered panel with the bold white on black title every block uses.
fn panel(title: &str) -> Block<'_> {
    Block::new().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default()
            .fg(Color::White)
            .bg(Color::Black)
            .add_modifier(Modifier::BOLD),
    ))
}

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

/// Terminal colour of a `#rrggbb` bank colour, grey when malformed.
fn bank_colour(hex: &str) -> Color {
    rgb(palette::from_hex(hex).unwrap_or(palette::MUTED))
}
