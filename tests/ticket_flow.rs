//! End-to-end flow through the app loop: create, update status, delete.

use pretty_assertions::assert_eq;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use ticktui::{
    action::Action,
    app::App,
    config::Config,
    mode::Mode,
    store::{SqliteStore, StoreError, TicketStore},
    ticket::{Category, Priority, Status, Ticket, TicketDraft},
};

struct Harness {
    app: App,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
}

impl Harness {
    fn new() -> Self {
        let config = Config::new().unwrap();
        let store = SqliteStore::in_memory().unwrap();
        let mut app = App::new(config, 4.0, 60.0, Box::new(store)).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        app.register_handlers(&tx).unwrap();
        Self { app, tx, rx }
    }

    fn send(&mut self, action: Action) {
        self.tx.send(action).unwrap();
        self.app.process_pending(&mut self.rx, &self.tx).unwrap();
    }
}

/// A store whose backing file has gone away: every operation fails.
struct FailingStore;

impl FailingStore {
    fn error() -> StoreError {
        StoreError::Unavailable(rusqlite::Error::InvalidQuery)
    }
}

impl TicketStore for FailingStore {
    fn create(&mut self, _draft: &TicketDraft) -> Result<i64, StoreError> {
        Err(Self::error())
    }

    fn list(&self) -> Result<Vec<Ticket>, StoreError> {
        Err(Self::error())
    }

    fn update_status(&mut self, _id: i64, _status: Status) -> Result<(), StoreError> {
        Err(Self::error())
    }

    fn delete(&mut self, _id: i64) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

fn printer_draft() -> TicketDraft {
    TicketDraft {
        title: "Printer broken".into(),
        description: "Won't turn on".into(),
        category: Category::ItSupport,
        priority: Priority::High,
    }
}

#[test]
fn create_update_delete_round_trip() {
    let mut h = Harness::new();

    // Create.
    h.send(Action::CreateTicket(printer_draft()));
    let tickets = h.app.store().list().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].title, "Printer broken");
    assert_eq!(tickets[0].description, "Won't turn on");
    assert_eq!(tickets[0].category, Category::ItSupport);
    assert_eq!(tickets[0].priority, Priority::High);
    assert_eq!(tickets[0].status, Status::Open);
    assert_eq!(h.app.mode, Mode::Tickets);

    // Select the row and move the chooser from Open to In Progress.
    h.send(Action::SelectFirst);
    h.send(Action::NextStatus);
    h.send(Action::UpdateStatus);
    let tickets = h.app.store().list().unwrap();
    assert_eq!(tickets[0].status, Status::InProgress);
    assert_eq!(tickets[0].title, "Printer broken");
    assert_eq!(tickets[0].priority, Priority::High);

    // Delete, going through the confirmation dialog.
    h.send(Action::DeleteTicket);
    assert_eq!(h.app.mode, Mode::ConfirmDelete);
    h.send(Action::ConfirmDelete);
    assert_eq!(h.app.mode, Mode::Tickets);
    assert!(h.app.store().list().unwrap().is_empty());
}

#[test]
fn declining_the_confirmation_keeps_the_ticket() {
    let mut h = Harness::new();
    h.send(Action::CreateTicket(printer_draft()));
    h.send(Action::SelectFirst);

    h.send(Action::DeleteTicket);
    assert_eq!(h.app.mode, Mode::ConfirmDelete);
    h.send(Action::CancelDelete);

    assert_eq!(h.app.mode, Mode::Tickets);
    assert_eq!(h.app.store().list().unwrap().len(), 1);
}

#[test]
fn update_and_delete_without_selection_touch_nothing() {
    let mut h = Harness::new();
    h.send(Action::CreateTicket(printer_draft()));
    h.send(Action::Unselect);

    h.send(Action::UpdateStatus);
    h.send(Action::DeleteTicket);

    let tickets = h.app.store().list().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].status, Status::Open);
    assert_eq!(h.app.mode, Mode::Tickets);
}

#[test]
fn tickets_list_in_reverse_creation_order() {
    let mut h = Harness::new();
    for title in ["A", "B", "C"] {
        h.send(Action::CreateTicket(TicketDraft {
            title: title.into(),
            description: "d".into(),
            ..Default::default()
        }));
    }
    let titles: Vec<String> = h
        .app
        .store()
        .list()
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["C", "B", "A"]);
}

#[test]
fn storage_errors_surface_as_messages_and_the_app_keeps_running() {
    let config = Config::new().unwrap();
    let mut app = App::new(config, 4.0, 60.0, Box::new(FailingStore)).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    app.register_handlers(&tx).unwrap();

    let failing_actions = [
        Action::CreateTicket(printer_draft()),
        Action::RequestUpdateStatus(1, Status::Closed),
        Action::RequestDelete(1),
        Action::Reload,
    ];
    for action in failing_actions {
        tx.send(action.clone()).unwrap();
        let mut seen = Vec::new();
        while let Ok(a) = rx.try_recv() {
            app.dispatch(a.clone(), &tx).unwrap();
            seen.push(a);
        }
        assert!(
            seen.iter().any(|a| matches!(a, Action::Error(_))),
            "{action:?} should surface an error, saw {seen:?}"
        );
        assert!(!app.should_quit);
    }

    // The loop still dispatches normally after storage failures.
    tx.send(Action::NewTicket).unwrap();
    app.process_pending(&mut rx, &tx).unwrap();
    assert_eq!(app.mode, Mode::Form);
}

#[test]
fn opening_the_form_switches_mode_and_closing_restores_it() {
    let mut h = Harness::new();
    h.send(Action::NewTicket);
    assert_eq!(h.app.mode, Mode::Form);
    h.send(Action::CloseForm);
    assert_eq!(h.app.mode, Mode::Tickets);
}
