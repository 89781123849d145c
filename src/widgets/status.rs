use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use super::panel;

/// Shown instead of the dashboard when the asset could not be loaded.
pub struct ErrorBlock {
    message: String,
}

impl ErrorBlock {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Widget for ErrorBlock {
    fn render(self, area: Rect, buf: &mut ratatui::prelude::Buffer)
    where
        Self: Sized,
    {
        let lines = vec![
            Line::from("Could not load the dashboard data").red().bold(),
            Line::from(""),
            Line::from(self.message),
            Line::from(""),
            Line::from("Run `branchscope analyze` first, then press q to quit.").dark_gray(),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel("ERROR"))
            .render(area, buf);
    }
}
