use serde::{Deserialize, Serialize};

/// Which surface currently owns key input. Keybindings in the config are
/// grouped per mode.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Browsing the ticket table.
    #[default]
    Tickets,
    /// The create-ticket form is open and owns raw keys.
    Form,
    /// The delete confirmation dialog is open.
    ConfirmDelete,
}
