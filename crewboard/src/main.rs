//! `Crewboard` — terminal-native team task board.
//!
//! Launches the TUI against the local data store. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/crewboard/config.toml`).
//!
//! ```bash
//! # Seeded demo team
//! cargo run --bin crewboard
//!
//! # Register a team, then work on it
//! cargo run --bin crewboard -- --team acme --password s3cret --register
//! cargo run --bin crewboard -- --team acme --password s3cret
//!
//! # Or via environment variables
//! CREWBOARD_TEAM=acme CREWBOARD_PASSWORD=s3cret cargo run
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use crewboard::app::{App, AppCommand, AppEvent};
use crewboard::backend::{Backend, LocalBackend};
use crewboard::command::resolve;
use crewboard::config::{CliArgs, ClientConfig};
use crewboard::session::{self, SessionHandle};
use crewboard::ui;
use crewboard_proto::session::Session;
use crewboard_proto::team::TeamId;
use crewboard_store::{StoreError, TeamStore};

/// Name of the team seeded when no credentials are configured.
const DEMO_TEAM: &str = "demo";
const DEMO_PASSWORD: &str = "demo";

/// Capacity of the dispatcher's event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("crewboard starting");

    let store = Arc::new(match config.snapshot_path() {
        Some(path) => TeamStore::with_snapshot(path),
        None => TeamStore::new(),
    });

    // Log in before touching the terminal so failures print normally.
    let initial_session = match establish_session(&store, &config).await {
        Ok(session) => session,
        Err(message) => {
            eprintln!("{message}");
            return Ok(());
        }
    };

    let session_handle = SessionHandle::new(Some(initial_session.clone()));
    save_session_cache(config.session_cache_path().as_deref(), &initial_session);

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config, store, session_handle, initial_session).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("crewboard exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown to
/// ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("crewboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Produces the starting session: configured credentials, then the cached
/// session, then the seeded demo team.
async fn establish_session(store: &TeamStore, config: &ClientConfig) -> Result<Session, String> {
    if let Some(team) = &config.team {
        let Some(password) = &config.password else {
            return Err(
                "A team password is required (--password or CREWBOARD_PASSWORD)".to_string(),
            );
        };
        let result = if config.register {
            store.register_team(team, password).await
        } else {
            store.login_team(team, password).await
        };
        let mut session = result.map_err(|e| e.to_string())?;

        if let Some(member) = &config.member {
            match store.user_by_name(session.team.id, member).await {
                Ok(Some(user)) => session.user = Some(user),
                Ok(None) => return Err(format!("User @{member} not found")),
                Err(e) => return Err(e.to_string()),
            }
        }
        return Ok(session);
    }

    if let Some(cached) = config
        .session_cache_path()
        .and_then(|path| session::load_cache(&path))
    {
        if store.has_team(cached.team.id).await {
            tracing::info!(team = %cached.team.name, "resuming cached session");
            return Ok(revalidate_member(store, cached).await);
        }
        tracing::info!("cached session points at an unknown team, ignoring");
    }

    seed_demo_session(store).await
}

/// Drops a cached member selection that no longer exists on the roster.
async fn revalidate_member(store: &TeamStore, mut session: Session) -> Session {
    if let Some(user) = &session.user {
        let still_there = store
            .member(session.team.id, user.id)
            .await
            .ok()
            .flatten()
            .is_some();
        if !still_there {
            session.user = store
                .members(session.team.id)
                .await
                .ok()
                .and_then(|members| members.into_iter().next());
        }
    }
    session
}

/// Logs into the demo team, seeding it on first run.
async fn seed_demo_session(store: &TeamStore) -> Result<Session, String> {
    match store.login_team(DEMO_TEAM, DEMO_PASSWORD).await {
        Ok(session) => return Ok(session),
        Err(StoreError::TeamNotFound) => {}
        Err(e) => return Err(e.to_string()),
    }

    tracing::info!("seeding demo team");
    let session = store
        .register_team(DEMO_TEAM, DEMO_PASSWORD)
        .await
        .map_err(|e| e.to_string())?;
    let team_id = session.team.id;

    let mut members = Vec::new();
    for name in ["alice", "bob", "carol"] {
        members.push(
            store
                .add_member(team_id, name)
                .await
                .map_err(|e| e.to_string())?,
        );
    }

    use crewboard_proto::task::TaskStatus;
    let seed_tasks = [
        ("Sketch the onboarding flow", TaskStatus::New, 0),
        ("Fix the login redirect bug", TaskStatus::Current, 0),
        ("Write the API changelog", TaskStatus::InProgress, 1),
        ("Ship the October release", TaskStatus::Completed, 1),
        ("Review open pull requests", TaskStatus::New, 2),
    ];
    for (title, status, member_idx) in seed_tasks {
        store
            .create_task(team_id, title, "", members[member_idx].id, status)
            .await
            .map_err(|e| e.to_string())?;
    }

    store
        .login_team(DEMO_TEAM, DEMO_PASSWORD)
        .await
        .map_err(|e| e.to_string())
}

fn save_session_cache(path: Option<&Path>, session: &Session) {
    if let Some(path) = path
        && let Err(e) = session::save_cache(path, session)
    {
        tracing::warn!("could not save session cache: {e}");
    }
}

/// Executes [`AppCommand`]s on tokio tasks and reports completions back
/// over the event channel.
#[derive(Clone)]
struct Dispatcher {
    store: Arc<TeamStore>,
    backend: LocalBackend,
    session: SessionHandle,
    cache_path: Option<PathBuf>,
    tx: mpsc::Sender<AppEvent>,
}

impl Dispatcher {
    fn team_id(&self) -> Result<TeamId, String> {
        self.session
            .current()
            .map(|s| s.team.id)
            .ok_or_else(|| "Not authenticated".to_string())
    }

    /// Spawns the async work for one command.
    fn dispatch(&self, command: AppCommand) {
        let this = self.clone();
        tokio::spawn(async move {
            let event = this.run(command).await;
            if this.tx.send(event).await.is_err() {
                tracing::debug!("event channel closed, dropping completion");
            }
        });
    }

    async fn run(&self, command: AppCommand) -> AppEvent {
        match command {
            AppCommand::Search { generation, query } => AppEvent::SearchDone {
                generation,
                outcome: self.backend.search_tasks(&query).await,
            },

            AppCommand::Resolve { generation, intent } => AppEvent::Resolved {
                generation,
                resolution: resolve(intent, &self.backend).await,
            },

            AppCommand::LoadBoard { user_id } => {
                let outcome = match self.team_id() {
                    Ok(team_id) => self
                        .store
                        .user_tasks(team_id, user_id)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                AppEvent::BoardLoaded { user_id, outcome }
            }

            AppCommand::LoadRoster => {
                let outcome = match self.team_id() {
                    Ok(team_id) => self.store.members(team_id).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                AppEvent::RosterLoaded { outcome }
            }

            AppCommand::MoveTask { task_id, status } => {
                let outcome = match self.team_id() {
                    Ok(team_id) => self
                        .store
                        .update_task_status(team_id, task_id, status)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                AppEvent::TaskMoved { outcome }
            }

            AppCommand::DeleteTask { task_id } => {
                let outcome = match self.team_id() {
                    Ok(team_id) => self
                        .store
                        .delete_task(team_id, task_id)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                AppEvent::TaskDeleted { task_id, outcome }
            }

            AppCommand::AddMember { name } => {
                let outcome = match self.team_id() {
                    Ok(team_id) => self
                        .store
                        .add_member(team_id, &name)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                AppEvent::MemberAdded { outcome }
            }

            AppCommand::RemoveMember { user_id } => {
                let outcome = match self.team_id() {
                    Ok(team_id) => self
                        .store
                        .remove_member(team_id, user_id)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                if let Ok(removed) = &outcome {
                    // Removing the active member leaves the session with no
                    // selection until the app switches to someone else.
                    let active = self.session.current().and_then(|s| s.user);
                    if active.map(|u| u.id) == Some(removed.id) {
                        if let Some(mut current) = self.session.current() {
                            current.user = None;
                            self.session.set(Some(current.clone()));
                            save_session_cache(self.cache_path.as_deref(), &current);
                        }
                    }
                }
                AppEvent::MemberRemoved { outcome }
            }

            AppCommand::SwitchMember { user_id } => {
                let outcome = match self.team_id() {
                    Ok(team_id) => match self.store.member(team_id, user_id).await {
                        Ok(Some(user)) => {
                            self.session.set_user(user.clone());
                            if let Some(current) = self.session.current() {
                                save_session_cache(self.cache_path.as_deref(), &current);
                            }
                            Ok(user)
                        }
                        Ok(None) => Err("User not found".to_string()),
                        Err(e) => Err(e.to_string()),
                    },
                    Err(e) => Err(e),
                };
                AppEvent::MemberSwitched { outcome }
            }
        }
    }
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
    store: Arc<TeamStore>,
    session_handle: SessionHandle,
    initial_session: Session,
) -> io::Result<()> {
    let backend = LocalBackend::new(
        Arc::clone(&store),
        session_handle.clone(),
        config.search_limit,
    );

    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let dispatcher = Dispatcher {
        store,
        backend,
        session: session_handle,
        cache_path: config.session_cache_path(),
        tx,
    };

    let mut app = App::new(Some(initial_session.clone()))
        .with_timestamp_format(config.timestamp_format.clone());

    // Kick off the initial loads.
    dispatcher.dispatch(AppCommand::LoadRoster);
    if let Some(user) = initial_session.user {
        dispatcher.dispatch(AppCommand::LoadBoard { user_id: user.id });
    }

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending completions (non-blocking).
        while let Ok(event) = rx.try_recv() {
            if let Some(follow_up) = app.apply_event(event) {
                dispatcher.dispatch(follow_up);
            }
        }

        // Step 3: Dispatch a live search once the debounce window elapsed.
        if let Some(command) = app.take_due_search(config.search_debounce) {
            dispatcher.dispatch(command);
        }

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(command) = app.handle_key_event(key) {
                dispatcher.dispatch(command);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
