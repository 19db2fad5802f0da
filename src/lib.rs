//! # ticktui
//!
//! A terminal user interface for a single-user, locally stored support-ticket
//! queue. Tickets live in one SQLite file; the UI is a create form, a table
//! of existing tickets, a status chooser and a delete confirmation.
//!
//! ## Modules
//!
//! - [`ticket`] - The ticket entity and its closed value sets
//! - [`store`] - The persistence boundary ([`store::TicketStore`])
//! - [`app`] - Event loop wiring components to the store
//! - [`components`] - Form, table and status bar
//! - [`config`] - Keybindings and styles

pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod mode;
pub mod store;
pub mod ticket;
pub mod tui;
pub mod utils;

pub use action::Action;
pub use app::App;
pub use mode::Mode;
pub use store::{StoreError, TicketStore};
pub use ticket::{Category, Priority, Status, Ticket, TicketDraft};
