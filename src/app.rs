use std::{io, io::ErrorKind, time::Duration};

use color_eyre::{
    Result,
    eyre::{Report, eyre},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::{select, sync::mpsc};
use tracing::{debug, info, warn};

use crate::{
    client::{ApiClient, ResponseLogger},
    clipboard,
    config::Config,
    server,
    state::{Action, Completion, Effect, Tab, ViewState},
    tui::{self, Event, TerminalGuard},
    ui,
};

pub struct TedSuiteApp {
    tick_rate: Duration,
    state: ViewState,
    client: ApiClient,
    server: Option<server::ServerHandle>,
}

/// What a key press asks the app to do.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Apply(KeyAction),
}

/// Key-driven subset of [`Action`], comparable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    SelectTab(Tab),
    NextTab,
    PreviousTab,
    Input(char),
    Backspace,
    FocusUp,
    FocusDown,
    ChipLeft,
    ChipRight,
    SelectNext,
    SelectPrevious,
    Submit,
    Copy,
}

impl From<KeyAction> for Action {
    fn from(action: KeyAction) -> Self {
        match action {
            KeyAction::SelectTab(tab) => Action::SelectTab(tab),
            KeyAction::NextTab => Action::NextTab,
            KeyAction::PreviousTab => Action::PreviousTab,
            KeyAction::Input(ch) => Action::Input(ch),
            KeyAction::Backspace => Action::Backspace,
            KeyAction::FocusUp => Action::FocusUp,
            KeyAction::FocusDown => Action::FocusDown,
            KeyAction::ChipLeft => Action::ChipLeft,
            KeyAction::ChipRight => Action::ChipRight,
            KeyAction::SelectNext => Action::SelectNext,
            KeyAction::SelectPrevious => Action::SelectPrevious,
            KeyAction::Submit => Action::Submit,
            KeyAction::Copy => Action::Copy,
        }
    }
}

enum Step {
    Apply(Action),
    Idle,
    Exit,
}

impl TedSuiteApp {
    pub async fn bootstrap(config: Config) -> Result<Self> {
        let dump = config
            .debug_dump
            .as_ref()
            .map(|path| ResponseLogger::new(path.clone()));

        let (server, api_base) = if config.mock {
            let server_config = config.server_config();
            let bind_addr = server_config.bind_addr;
            let server = server::spawn(server_config)
                .await
                .map_err(|err| match err {
                    server::ServerError::Io(io_err) if io_err.kind() == ErrorKind::AddrInUse => {
                        eyre!(
                            "Port {} is already in use. Pass --mock-bind <addr:port> to choose a different address.",
                            bind_addr
                        )
                    }
                    other => Report::from(other),
                })?;
            let api_base = format!("http://{}", server.addr());
            info!(addr = %server.addr(), "mock backend ready");
            (Some(server), Some(api_base))
        } else {
            (None, None)
        };

        let client = ApiClient::new(config.client_config(api_base), dump)?;
        info!(api_base = client.api_base(), flavor = ?client.flavor(), "backend client ready");

        Ok(Self {
            tick_rate: Duration::from_millis(250),
            state: ViewState::new(config.tab),
            client,
            server,
        })
    }

    pub async fn run(mut self) -> Result<()> {
        info!("starting TED Suite");

        let mut terminal = TerminalGuard::new()?;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<Completion>();
        let event_handle = tui::spawn_event_loop(tx, self.tick_rate);

        loop {
            let view_model =
                ui::build_view_model(&self.state, self.client.api_base(), self.client.flavor());
            terminal.draw(|frame| tui::render_app(frame, &view_model))?;

            let step = select! {
                maybe_event = rx.recv() => {
                    match maybe_event {
                        Some(event) => handle_event(event),
                        None => Step::Exit,
                    }
                }
                Some(completion) = completion_rx.recv() => {
                    Step::Apply(Action::Completed(completion))
                }
                ctrl_c = tokio::signal::ctrl_c() => {
                    if let Err(err) = ctrl_c {
                        warn!(?err, "failed to listen for ctrl+c");
                    } else {
                        info!("received ctrl+c");
                    }
                    Step::Exit
                }
            };

            match step {
                Step::Apply(action) => self.dispatch(action, &completion_tx),
                Step::Idle => {}
                Step::Exit => break,
            }
        }

        drop(terminal);
        drop(rx);

        if let Err(err) = event_handle.await {
            warn!(?err, "terminal event loop task ended unexpectedly");
        }

        if let Some(server) = self.server.take() {
            server.shutdown().await?;
        }

        info!("TED Suite shutting down");
        Ok(())
    }

    /// Applies `action` and every follow-up the resulting effects produce.
    fn dispatch(&mut self, action: Action, completions: &mpsc::UnboundedSender<Completion>) {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            next = self
                .state
                .apply(action)
                .and_then(|effect| self.perform(effect, completions));
        }
    }

    fn perform(
        &self,
        effect: Effect,
        completions: &mpsc::UnboundedSender<Completion>,
    ) -> Option<Action> {
        match effect {
            Effect::Dispatch { ticket, request } => {
                let client = self.client.clone();
                let completions = completions.clone();
                tokio::spawn(async move {
                    let outcome = client.execute(request).await;
                    if completions.send(Completion { ticket, outcome }).is_err() {
                        debug!(%ticket, "completion receiver dropped");
                    }
                });
                None
            }
            Effect::Copy(text) => Some(Action::CopyFinished(clipboard::copy_to_terminal(
                &mut io::stdout(),
                &text,
            ))),
        }
    }
}

fn handle_event(event: Event) -> Step {
    match event {
        Event::Input(key) => match key_command(key) {
            Some(Command::Quit) => Step::Exit,
            Some(Command::Apply(action)) => Step::Apply(action.into()),
            None => Step::Idle,
        },
        Event::Tick => Step::Apply(Action::Tick),
        Event::Resize(width, height) => {
            debug!(%width, %height, "terminal resized");
            Step::Idle
        }
    }
}

fn key_command(key: KeyEvent) -> Option<Command> {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);

    let action = match key.code {
        KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Char('c') if control => return Some(Command::Quit),
        KeyCode::Char('y') if control => KeyAction::Copy,
        KeyCode::Char(_) if control || key.modifiers.contains(KeyModifiers::ALT) => return None,
        KeyCode::Char(ch) => KeyAction::Input(ch),
        KeyCode::F(n @ 1..=3) => KeyAction::SelectTab(Tab::ALL[usize::from(n) - 1]),
        KeyCode::Tab => KeyAction::NextTab,
        KeyCode::BackTab => KeyAction::PreviousTab,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Up => KeyAction::FocusUp,
        KeyCode::Down => KeyAction::FocusDown,
        KeyCode::Left => KeyAction::ChipLeft,
        KeyCode::Right => KeyAction::ChipRight,
        KeyCode::PageDown => KeyAction::SelectNext,
        KeyCode::PageUp => KeyAction::SelectPrevious,
        _ => return None,
    };

    Some(Command::Apply(action))
}
