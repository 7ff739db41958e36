use anyhow::Result;
use crossterm::{
    event::{Event as CrosstermEvent, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tui_textarea::TextArea;
use voxclone_core::form::{FormSession, FormState};
use voxclone_core::service::SynthesisService;
use voxclone_core::settings::{Settings, SettingsManager};

use super::event_handler::{handle_app_event, AppEvent};
use super::input_handler::{configure_path_input, configure_textarea, handle_key_event, TuiAction};
use super::state::TuiState;
use super::ui::draw_ui;
use crate::player;

pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    state: TuiState,
    settings_manager: SettingsManager,
}

impl TuiApp {
    pub fn new(
        service: Arc<dyn SynthesisService>,
        settings: Settings,
        settings_manager: SettingsManager,
    ) -> Result<Self> {
        let session = FormSession::new(FormState::new(settings.default_language), service);
        let state = TuiState::new(
            session,
            settings.download_dir(),
            settings.player_command(),
        );
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            event_tx,
            event_rx,
            state,
            settings_manager,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Install panic hook to restore terminal on panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        self.fetch_model_info();

        let mut textarea = TextArea::default();
        configure_textarea(&mut textarea);
        let mut path_input = TextArea::default();
        configure_path_input(&mut path_input);

        let tick_rate = Duration::from_millis(50);
        let mut crossterm_reader = EventStream::new();

        loop {
            let state = &self.state;
            let ta = &textarea;
            let pi = &path_input;
            self.terminal.draw(|frame| {
                draw_ui(frame, state, ta, pi);
            })?;

            if self.state.should_quit {
                break;
            }

            tokio::select! {
                // Completions from spawned requests and player processes
                Some(app_event) = self.event_rx.recv() => {
                    handle_app_event(&mut self.state, app_event);
                }

                Some(Ok(crossterm_event)) = crossterm_reader.next() => {
                    if let CrosstermEvent::Key(key) = crossterm_event {
                        if key.kind == KeyEventKind::Release {
                            continue;
                        }
                        match handle_key_event(key, &mut textarea, &mut path_input, &mut self.state) {
                            TuiAction::Submit => self.submit(),
                            TuiAction::PickVoiceFile(path) => self.state.pick_voice_file(&path),
                            TuiAction::Play => self.play(),
                            TuiAction::Save => self.save(),
                            TuiAction::Quit => {
                                self.state.should_quit = true;
                            }
                            TuiAction::None => {}
                        }
                    }
                }

                // Tick for spinner animation
                _ = tokio::time::sleep(tick_rate) => {
                    if self.state.form().any_loading() {
                        self.state.spinner_frame = self.state.spinner_frame.wrapping_add(1);
                    }
                }
            }
        }

        self.restore_terminal()?;
        self.remember_language();

        Ok(())
    }

    fn remember_language(&self) {
        let language = self.state.form().language();
        match self.settings_manager.remember_language(language) {
            Ok(true) => info!(%language, "Saved default language"),
            Ok(false) => {}
            Err(e) => warn!(error = ?e, "Failed to save default language"),
        }
    }

    fn fetch_model_info(&self) {
        let service = self.state.session.service();
        let tx = self.event_tx.clone();
        tokio::task::spawn_local(async move {
            let result = service.model_info().await;
            let _ = tx.send(AppEvent::ModelInfo(result));
        });
    }

    fn submit(&mut self) {
        let pending = match self.state.session.begin_submit() {
            Ok(pending) => pending,
            Err(e) => {
                self.state.show_notice(e.to_string());
                return;
            }
        };

        let mode = pending.mode();
        self.state.info(format!("{} request sent.", mode.title()));

        let tx = self.event_tx.clone();
        tokio::task::spawn_local(async move {
            let outcome = pending.run().await;
            let _ = tx.send(AppEvent::SubmissionFinished(outcome));
        });
    }

    fn play(&mut self) {
        let started = match self.state.form().active_slot().result.as_ref() {
            Some(handle) => player::spawn(&self.state.player_command, handle.path())
                .map(|child| (child, handle.path().to_path_buf())),
            None => {
                self.state.error("Nothing to play yet.");
                return;
            }
        };

        match started {
            Ok((child, path)) => {
                info!(?path, "Started playback");
                let tx = self.event_tx.clone();
                tokio::task::spawn_local(async move {
                    let result = player::wait(child).await;
                    let _ = tx.send(AppEvent::PlaybackFinished(result));
                });
            }
            Err(e) => self.state.error(format!("{e:#}")),
        }
    }

    fn save(&mut self) {
        let saved = match self.state.form().active_slot().result.as_ref() {
            Some(handle) => handle.save_to(&self.state.download_dir),
            None => {
                self.state.error("Nothing to save yet.");
                return;
            }
        };

        match saved {
            Ok(path) => self.state.success(format!("Saved {}", path.display())),
            Err(e) => self.state.error(format!("{e:#}")),
        }
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
