use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;
use tui_textarea::TextArea;

use super::Component;
use crate::{
    action::Action,
    config::Config,
    mode::Mode,
    ticket::{Category, Priority, TicketDraft},
    tui::Frame,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Field {
    #[default]
    Title,
    Description,
    Category,
    Priority,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Category,
            Self::Category => Self::Priority,
            Self::Priority => Self::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Title => Self::Priority,
            Self::Description => Self::Title,
            Self::Category => Self::Description,
            Self::Priority => Self::Category,
        }
    }
}

/// The create-ticket form. Holds transient field values; cleared only after
/// a successful create. Owns raw key input while the app is in `Form` mode.
#[derive(Default)]
pub struct Form {
    command_tx: Option<UnboundedSender<Action>>,
    config: Config,
    active: bool,
    focus: Field,
    title: TextArea<'static>,
    description: TextArea<'static>,
    category: Category,
    priority: Priority,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&self, action: Action) -> Result<()> {
        if let Some(tx) = &self.command_tx {
            tx.send(action)?;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.title = TextArea::default();
        self.description = TextArea::default();
        self.category = Category::default();
        self.priority = Priority::default();
        self.focus = Field::default();
    }

    /// The draft as currently typed, whitespace-trimmed. `None` when title
    /// or description is empty after trimming.
    fn draft(&self) -> Option<TicketDraft> {
        let title = self.title.lines().join(" ").trim().to_string();
        let description = self.description.lines().join("\n").trim().to_string();
        if title.is_empty() || description.is_empty() {
            return None;
        }
        Some(TicketDraft {
            title,
            description,
            category: self.category,
            priority: self.priority,
        })
    }

    fn submit(&mut self) -> Result<()> {
        match self.draft() {
            Some(draft) => self.send(Action::CreateTicket(draft)),
            None => self.send(Action::Error(
                "Title and Description are required.".to_string(),
            )),
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            Field::Category => {
                self.category = if forward {
                    self.category.next()
                } else {
                    self.category.prev()
                };
            }
            Field::Priority => {
                self.priority = if forward {
                    self.priority.next()
                } else {
                    self.priority.prev()
                };
            }
            _ => {}
        }
    }

    fn field_style(&self, field: Field) -> Style {
        let key = if self.focus == field { "focused" } else { "blurred" };
        self.config
            .styles
            .get(&Mode::Form)
            .and_then(|styles| styles.get(key))
            .copied()
            .unwrap_or_default()
    }
}

impl Component for Form {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.command_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if !self.active {
            return Ok(None);
        }
        // Esc and ctrl-modified keys belong to the keymap, not the fields.
        if key.code == KeyCode::Esc || key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => match self.focus {
                Field::Title => {
                    // Title stays a single line.
                    if key.code != KeyCode::Enter {
                        self.title.input(key);
                    }
                }
                Field::Description => {
                    self.description.input(key);
                }
                Field::Category | Field::Priority => match key.code {
                    KeyCode::Left | KeyCode::Char('h') | KeyCode::Up => self.cycle_choice(false),
                    KeyCode::Right | KeyCode::Char('l') | KeyCode::Down => self.cycle_choice(true),
                    _ => {}
                },
            },
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::SwitchMode(mode) => {
                self.active = mode == Mode::Form;
            }
            Action::SubmitTicket if self.active => {
                self.submit()?;
            }
            Action::TicketCreated(_) => {
                self.clear();
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        let popup = popup_rect(area);
        f.render_widget(Clear, popup);
        let outer = Block::default()
            .borders(Borders::ALL)
            .title("Create Ticket (ctrl-s saves, esc cancels)");
        let inner = outer.inner(popup);
        f.render_widget(outer, popup);

        let layout = Layout::vertical([
            Constraint::Length(3), // title
            Constraint::Min(4),    // description
            Constraint::Length(1), // category
            Constraint::Length(1), // priority
        ])
        .split(inner);

        self.title.set_cursor_line_style(Style::default());
        self.title.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title("Title")
                .border_style(self.field_style(Field::Title)),
        );
        f.render_widget(&self.title, layout[0]);

        self.description.set_cursor_line_style(Style::default());
        self.description.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title("Description")
                .border_style(self.field_style(Field::Description)),
        );
        f.render_widget(&self.description, layout[1]);

        let category = Paragraph::new(format!("Category:  ⟨ {} ⟩", self.category))
            .style(self.field_style(Field::Category));
        f.render_widget(category, layout[2]);

        let priority = Paragraph::new(format!("Priority:  ⟨ {} ⟩", self.priority))
            .style(self.field_style(Field::Priority));
        f.render_widget(priority, layout[3]);

        Ok(())
    }
}

fn popup_rect(area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage(15),
        Constraint::Percentage(70),
        Constraint::Percentage(15),
    ])
    .split(area);
    Layout::horizontal([
        Constraint::Percentage(20),
        Constraint::Percentage(60),
        Constraint::Percentage(20),
    ])
    .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;

    fn active_form() -> (Form, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut form = Form::new();
        form.register_action_handler(tx).unwrap();
        form.update(Action::SwitchMode(Mode::Form)).unwrap();
        (form, rx)
    }

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty());
            form.handle_key_events(key).unwrap();
        }
    }

    fn press(form: &mut Form, code: KeyCode) {
        form.handle_key_events(KeyEvent::new(code, KeyModifiers::empty()))
            .unwrap();
    }

    #[test]
    fn empty_fields_are_rejected_without_a_storage_action() {
        let (mut form, mut rx) = active_form();
        form.update(Action::SubmitTicket).unwrap();
        assert!(matches!(rx.try_recv().unwrap(), Action::Error(_)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn whitespace_only_fields_are_rejected() {
        let (mut form, mut rx) = active_form();
        type_str(&mut form, "   ");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "  ");
        form.update(Action::SubmitTicket).unwrap();
        assert!(matches!(rx.try_recv().unwrap(), Action::Error(_)));
    }

    #[test]
    fn a_complete_form_emits_a_trimmed_draft() {
        let (mut form, mut rx) = active_form();
        type_str(&mut form, "  Printer broken ");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "Won't turn on");
        press(&mut form, KeyCode::Tab); // category
        press(&mut form, KeyCode::Left); // General -> Billing
        press(&mut form, KeyCode::Tab); // priority
        press(&mut form, KeyCode::Right); // Medium -> High

        form.update(Action::SubmitTicket).unwrap();
        let action = rx.try_recv().unwrap();
        assert_eq!(
            action,
            Action::CreateTicket(TicketDraft {
                title: "Printer broken".into(),
                description: "Won't turn on".into(),
                category: Category::Billing,
                priority: Priority::High,
            })
        );
    }

    #[test]
    fn form_clears_only_after_a_successful_create() {
        let (mut form, _rx) = active_form();
        type_str(&mut form, "Printer broken");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "Won't turn on");

        // Leaving the form keeps whatever was typed.
        form.update(Action::SwitchMode(Mode::Tickets)).unwrap();
        form.update(Action::SwitchMode(Mode::Form)).unwrap();
        assert!(form.draft().is_some());

        form.update(Action::TicketCreated(1)).unwrap();
        assert!(form.draft().is_none());
        assert_eq!(form.category, Category::default());
        assert_eq!(form.priority, Priority::default());
    }

    #[test]
    fn inactive_form_ignores_keys_and_submit() {
        let (mut form, mut rx) = active_form();
        form.update(Action::SwitchMode(Mode::Tickets)).unwrap();
        type_str(&mut form, "ignored");
        form.update(Action::SubmitTicket).unwrap();
        assert!(rx.try_recv().is_err());
        assert!(form.title.lines().join("").is_empty());
    }

    #[test]
    fn description_accepts_multiple_lines() {
        let (mut form, mut rx) = active_form();
        type_str(&mut form, "Printer broken");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "Won't turn on.");
        press(&mut form, KeyCode::Enter);
        type_str(&mut form, "Power light is off.");

        form.update(Action::SubmitTicket).unwrap();
        match rx.try_recv().unwrap() {
            Action::CreateTicket(draft) => {
                assert_eq!(draft.description, "Won't turn on.\nPower light is off.");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
