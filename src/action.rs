use serde::{Deserialize, Serialize};
use strum::Display;

use crate::mode::Mode;
use crate::ticket::{Status, Ticket, TicketDraft};

/// Everything that can happen in the app. UI components emit actions; the
/// [`App`](crate::app::App) loop executes the storage-facing ones and
/// broadcasts the results back through the same channel.
#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Refresh,
    Error(String),
    SystemMessage(String),
    SwitchMode(Mode),

    // Table navigation.
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    Unselect,

    // Status chooser.
    NextStatus,
    PrevStatus,

    // Form lifecycle.
    NewTicket,
    CloseForm,
    SubmitTicket,

    // Storage commands, executed by the app loop.
    CreateTicket(TicketDraft),
    UpdateStatus,
    RequestUpdateStatus(i64, Status),
    DeleteTicket,
    ConfirmDelete,
    CancelDelete,
    RequestDelete(i64),
    Reload,

    // Storage results, broadcast to components.
    TicketCreated(i64),
    TicketsLoaded(Vec<Ticket>),
}
