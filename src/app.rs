use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::prelude::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    action::Action,
    components::{Component, Form, StatusBar, TicketTable},
    config::Config,
    mode::Mode,
    store::TicketStore,
    ticket::TicketDraft,
    tui,
    tui::Tui,
};

/// Owns the store and the components, and runs the event loop. Components
/// never touch storage directly; they emit storage commands and the loop
/// executes them here, broadcasting results back through the action channel.
pub struct App {
    pub config: Config,
    pub tick_rate: f64,
    pub frame_rate: f64,
    pub components: Vec<Box<dyn Component>>,
    pub should_quit: bool,
    pub should_suspend: bool,
    pub mode: Mode,
    pub last_tick_key_events: Vec<KeyEvent>,
    store: Box<dyn TicketStore>,
}

impl App {
    pub fn new(
        config: Config,
        tick_rate: f64,
        frame_rate: f64,
        store: Box<dyn TicketStore>,
    ) -> Result<Self> {
        let table = TicketTable::new();
        let form = Form::new();
        let status_bar = StatusBar::new();
        Ok(Self {
            config,
            tick_rate,
            frame_rate,
            // Draw order: table first, form popup above it, status bar last.
            components: vec![Box::new(table), Box::new(form), Box::new(status_bar)],
            should_quit: false,
            should_suspend: false,
            mode: Mode::Tickets,
            last_tick_key_events: Vec::new(),
            store,
        })
    }

    /// Read access to the store, for assertions in integration tests.
    pub fn store(&self) -> &dyn TicketStore {
        self.store.as_ref()
    }

    /// Wires the action channel and the config into every component.
    pub fn register_handlers(&mut self, tx: &UnboundedSender<Action>) -> Result<()> {
        for component in self.components.iter_mut() {
            component.register_action_handler(tx.clone())?;
        }
        for component in self.components.iter_mut() {
            component.register_config_handler(self.config.clone())?;
        }
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        self.register_handlers(&action_tx)?;
        let size = tui.size()?;
        for component in self.components.iter_mut() {
            component.init(Rect::new(0, 0, size.width, size.height))?;
        }

        // Populate the table on startup.
        action_tx.send(Action::Reload)?;

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Quit => action_tx.send(Action::Quit)?,
                    tui::Event::Tick => action_tx.send(Action::Tick)?,
                    tui::Event::Render => action_tx.send(Action::Render)?,
                    tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                    tui::Event::Key(key) => {
                        if let Some(keymap) = self.config.keybindings.get(&self.mode) {
                            if let Some(action) = keymap.get(&vec![key]) {
                                log::info!("Got action: {action:?}");
                                action_tx.send(action.clone())?;
                            } else {
                                // If the key was not handled as a single key action,
                                // then consider it for multi-key combinations.
                                self.last_tick_key_events.push(key);
                                if let Some(action) = keymap.get(&self.last_tick_key_events) {
                                    log::info!("Got action: {action:?}");
                                    action_tx.send(action.clone())?;
                                }
                            }
                        };
                    }
                    _ => {}
                }
                for component in self.components.iter_mut() {
                    if let Some(action) = component.handle_events(Some(e.clone()))? {
                        action_tx.send(action)?;
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    log::debug!("{action:?}");
                }
                match action {
                    Action::Tick => {
                        self.last_tick_key_events.drain(..);
                    }
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.draw(&mut tui, &action_tx)?;
                    }
                    Action::Render => {
                        self.draw(&mut tui, &action_tx)?;
                    }
                    _ => {}
                }
                self.dispatch(action, &action_tx)?;
            }

            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                tui = Tui::new()?
                    .tick_rate(self.tick_rate)
                    .frame_rate(self.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    /// Executes one action (including the storage-facing ones) and forwards
    /// it to every component. Follow-up actions go back into the channel.
    pub fn dispatch(&mut self, action: Action, tx: &UnboundedSender<Action>) -> Result<()> {
        match &action {
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::SwitchMode(mode) => self.mode = *mode,
            Action::NewTicket => {
                self.mode = Mode::Form;
                tx.send(Action::SwitchMode(Mode::Form))?;
            }
            Action::CloseForm => {
                self.mode = Mode::Tickets;
                tx.send(Action::SwitchMode(Mode::Tickets))?;
            }
            Action::CreateTicket(draft) => self.create_ticket(draft.clone(), tx)?,
            Action::RequestUpdateStatus(id, status) => {
                match self.store.update_status(*id, *status) {
                    Ok(()) => {
                        tx.send(Action::SystemMessage(format!(
                            "Ticket #{id} set to {status}."
                        )))?;
                        self.reload(tx)?;
                    }
                    Err(e) => {
                        log::error!("update_status failed: {e}");
                        tx.send(Action::Error(e.to_string()))?;
                    }
                }
            }
            Action::RequestDelete(id) => match self.store.delete(*id) {
                Ok(()) => {
                    tx.send(Action::SystemMessage(format!("Deleted ticket #{id}.")))?;
                    self.reload(tx)?;
                }
                Err(e) => {
                    log::error!("delete failed: {e}");
                    tx.send(Action::Error(e.to_string()))?;
                }
            },
            Action::Reload | Action::Refresh => self.reload(tx)?,
            _ => {}
        }

        for component in self.components.iter_mut() {
            if let Some(follow_up) = component.update(action.clone())? {
                tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Drains the action channel, dispatching everything that is pending.
    /// Actions emitted while draining are processed in the same pass. This
    /// is the non-terminal half of the run loop; integration tests drive the
    /// app through it.
    pub fn process_pending(
        &mut self,
        rx: &mut UnboundedReceiver<Action>,
        tx: &UnboundedSender<Action>,
    ) -> Result<()> {
        while let Ok(action) = rx.try_recv() {
            self.dispatch(action, tx)?;
        }
        Ok(())
    }

    fn create_ticket(&mut self, draft: TicketDraft, tx: &UnboundedSender<Action>) -> Result<()> {
        match self.store.create(&draft) {
            Ok(id) => {
                log::info!("created ticket #{id}");
                self.mode = Mode::Tickets;
                tx.send(Action::TicketCreated(id))?;
                tx.send(Action::SwitchMode(Mode::Tickets))?;
                tx.send(Action::SystemMessage(format!("Created ticket #{id}.")))?;
                self.reload(tx)?;
            }
            Err(e) => {
                log::error!("create failed: {e}");
                tx.send(Action::Error(e.to_string()))?;
            }
        }
        Ok(())
    }

    fn reload(&mut self, tx: &UnboundedSender<Action>) -> Result<()> {
        match self.store.list() {
            Ok(tickets) => tx.send(Action::TicketsLoaded(tickets))?,
            Err(e) => {
                log::error!("list failed: {e}");
                tx.send(Action::Error(e.to_string()))?;
            }
        }
        Ok(())
    }

    fn draw(&mut self, tui: &mut Tui, tx: &UnboundedSender<Action>) -> Result<()> {
        tui.draw(|f| {
            for component in self.components.iter_mut() {
                if let Err(e) = component.draw(f, f.area()) {
                    let _ = tx.send(Action::Error(format!("Failed to draw: {e:?}")));
                }
            }
        })?;
        Ok(())
    }
}
