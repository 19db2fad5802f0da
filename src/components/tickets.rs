use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::Component;
use crate::{
    action::Action,
    config::Config,
    mode::Mode,
    ticket::{Status, Ticket},
    tui::Frame,
};

/// The ticket table: a read-only projection of the store, fully rebuilt from
/// every `TicketsLoaded`, plus the status chooser and the delete
/// confirmation dialog.
#[derive(Default)]
pub struct TicketTable {
    command_tx: Option<UnboundedSender<Action>>,
    config: Config,
    tickets: Vec<Ticket>,
    table_state: TableState,
    chooser: Status,
    pending_delete: Option<i64>,
}

impl TicketTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&Ticket> {
        self.table_state.selected().and_then(|i| self.tickets.get(i))
    }

    fn send(&self, action: Action) -> Result<()> {
        if let Some(tx) = &self.command_tx {
            tx.send(action)?;
        }
        Ok(())
    }

    fn style(&self, mode: Mode, key: &str) -> Style {
        self.config
            .styles
            .get(&mode)
            .and_then(|styles| styles.get(key))
            .copied()
            .unwrap_or_default()
    }

    fn draw_confirm_dialog(&self, f: &mut Frame<'_>, area: Rect, id: i64) {
        let dialog_area = centered_rect(44, 20, area);
        f.render_widget(Clear, dialog_area);
        let dialog = Paragraph::new(format!("Delete ticket #{id}? (y/n)"))
            .alignment(Alignment::Center)
            .style(self.style(Mode::ConfirmDelete, "dialog"))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirm Deletion"),
            );
        f.render_widget(dialog, dialog_area);
    }
}

/// A rect of the given percentage size, centered inside `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);
    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

impl Component for TicketTable {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.command_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::TicketsLoaded(tickets) => {
                // Selection survives a reload, clamped to the new row count.
                let selection = match self.table_state.selected() {
                    _ if tickets.is_empty() => None,
                    Some(i) => Some(i.min(tickets.len() - 1)),
                    None => None,
                };
                self.tickets = tickets;
                self.table_state.select(selection);
            }
            Action::SelectNext => {
                let selection = match self.table_state.selected() {
                    _ if self.tickets.is_empty() => None,
                    Some(i) if i < self.tickets.len() - 1 => Some(i + 1),
                    Some(_) => Some(self.tickets.len() - 1),
                    None => Some(0),
                };
                self.table_state.select(selection);
            }
            Action::SelectPrev => {
                let selection = match self.table_state.selected() {
                    _ if self.tickets.is_empty() => None,
                    Some(i) if i > 0 => Some(i - 1),
                    _ => Some(0),
                };
                self.table_state.select(selection);
            }
            Action::SelectFirst => {
                let selection = if self.tickets.is_empty() { None } else { Some(0) };
                self.table_state.select(selection);
            }
            Action::SelectLast => {
                let selection = match self.tickets.len() {
                    0 => None,
                    n => Some(n - 1),
                };
                self.table_state.select(selection);
            }
            Action::Unselect => {
                self.table_state.select(None);
            }
            Action::NextStatus => {
                self.chooser = self.chooser.next();
            }
            Action::PrevStatus => {
                self.chooser = self.chooser.prev();
            }
            Action::UpdateStatus => match self.selected() {
                Some(ticket) => {
                    self.send(Action::RequestUpdateStatus(ticket.id, self.chooser))?;
                }
                None => {
                    self.send(Action::SystemMessage(
                        "Select a ticket to update.".to_string(),
                    ))?;
                }
            },
            Action::DeleteTicket => match self.selected() {
                Some(ticket) => {
                    self.pending_delete = Some(ticket.id);
                    self.send(Action::SwitchMode(Mode::ConfirmDelete))?;
                }
                None => {
                    self.send(Action::SystemMessage(
                        "Select a ticket to delete.".to_string(),
                    ))?;
                }
            },
            Action::ConfirmDelete => {
                if let Some(id) = self.pending_delete.take() {
                    self.send(Action::RequestDelete(id))?;
                }
                self.send(Action::SwitchMode(Mode::Tickets))?;
            }
            Action::CancelDelete => {
                self.pending_delete = None;
                self.send(Action::SwitchMode(Mode::Tickets))?;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let layout = Layout::vertical([
            Constraint::Min(5),    // table
            Constraint::Length(1), // status chooser
            Constraint::Length(6), // detail pane
            Constraint::Length(2), // status bar, drawn elsewhere
        ])
        .split(area);

        let header_style = self.style(Mode::Tickets, "header");
        let header = Row::new(
            ["ID", "Title", "Category", "Priority", "Status", "Created"]
                .into_iter()
                .map(|h| Cell::from(Span::styled(h, header_style))),
        );

        let rows = self.tickets.iter().map(|t| {
            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.title.clone()),
                Cell::from(t.category.to_string()),
                Cell::from(t.priority.to_string()),
                Cell::from(t.status.to_string()),
                Cell::from(t.created_at.clone()),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Min(20),
                Constraint::Length(16),
                Constraint::Length(9),
                Constraint::Length(11),
                Constraint::Length(19),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Tickets"))
        .row_highlight_style(self.style(Mode::Tickets, "highlight"));

        f.render_stateful_widget(table, layout[0], &mut self.table_state);

        let chooser = Paragraph::new(Line::from(vec![
            Span::raw("Status: "),
            Span::styled(
                format!("⟨ {} ⟩", self.chooser),
                self.style(Mode::Tickets, "chooser"),
            ),
            Span::raw("  s cycles, u applies to the selected ticket"),
        ]));
        f.render_widget(chooser, layout[1]);

        let (detail_title, detail_body) = match self.selected() {
            Some(t) => (format!("#{} {}", t.id, t.title), t.description.clone()),
            None => ("Detail".to_string(), String::new()),
        };
        let detail = Paragraph::new(detail_body)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(detail_title));
        f.render_widget(detail, layout[2]);

        if let Some(id) = self.pending_delete {
            self.draw_confirm_dialog(f, area, id);
        }

        Ok(())
    }
}
