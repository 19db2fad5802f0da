use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};

use super::Component;
use crate::{action::Action, config::Config, mode::Mode, tui::Frame};

/// Bottom two lines: current mode with its key hints, and the most recent
/// message (validation errors, storage errors, confirmations).
#[derive(Default)]
pub struct StatusBar {
    config: Config,
    mode: Mode,
    message: Option<String>,
    is_error: bool,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    fn hints(&self) -> &'static str {
        match self.mode {
            Mode::Tickets => "n new  j/k move  s status  u update  d delete  r reload  q quit",
            Mode::Form => "tab next field  ctrl-s save  esc cancel",
            Mode::ConfirmDelete => "y confirm  n cancel",
        }
    }

    fn style(&self, key: &str) -> Style {
        self.config
            .styles
            .get(&Mode::Tickets)
            .and_then(|styles| styles.get(key))
            .copied()
            .unwrap_or_default()
    }
}

impl Component for StatusBar {
    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::SwitchMode(mode) => self.mode = mode,
            Action::SystemMessage(message) => {
                self.message = Some(message);
                self.is_error = false;
            }
            Action::Error(message) => {
                self.message = Some(message);
                self.is_error = true;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let layout = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
        f.render_widget(Clear, layout[1]);
        f.render_widget(Clear, layout[2]);

        let mode_line = Paragraph::new(Line::from(vec![
            Span::styled(format!(" {:?} ", self.mode), Style::default().reversed()),
            Span::raw(" "),
            Span::styled(self.hints(), self.style("message")),
        ]));
        f.render_widget(mode_line, layout[1]);

        let style = if self.is_error {
            self.style("error")
        } else {
            self.style("message")
        };
        let message_line = Paragraph::new(self.message.clone().unwrap_or_default()).style(style);
        f.render_widget(message_line, layout[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn remembers_the_latest_message_and_its_severity() {
        let mut bar = StatusBar::new();
        bar.update(Action::SystemMessage("Created ticket #1".into()))
            .unwrap();
        assert_eq!(bar.message.as_deref(), Some("Created ticket #1"));
        assert!(!bar.is_error);

        bar.update(Action::Error("Title and Description are required.".into()))
            .unwrap();
        assert!(bar.is_error);
    }

    #[test]
    fn tracks_mode_switches() {
        let mut bar = StatusBar::new();
        bar.update(Action::SwitchMode(Mode::Form)).unwrap();
        assert_eq!(bar.mode, Mode::Form);
    }
}
