// ============================================================================
// BTC Converter - Point d'entrée
// ============================================================================
// Convertisseur BTC/SATS → USD, EUR et devises additionnelles, en TUI.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : résultats → minuteries → rendu → entrée
// 3. Async dans sync : un worker thread possède le runtime tokio
// 4. mpsc channels : l'UI envoie des AppCommand, reçoit des AppResult
// ============================================================================

use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use btcconvert::api::{build_http_client, BackendClient};
use btcconvert::app::App;
use btcconvert::config::{self, Config};
use btcconvert::ui::{handle_event, project, render, EventHandler};
use btcconvert::worker::{spawn_worker, AppCommand, AppResult, Services};

/// Délai max de la sonde /health au démarrage
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// Logging
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Le TUI occupe stdout : les logs vont dans
/// `<data_local_dir>/btcconvert/logs/btcconvert.log` (rotation quotidienne).
///
/// ```bash
/// tail -f ~/.local/share/btcconvert/logs/btcconvert.log
/// RUST_LOG=btcconvert=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config::log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "btcconvert.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "btcconvert=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Sans logs, l'application reste utilisable
    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {:#}", e);
    }
    info!(version = env!("CARGO_PKG_VERSION"), "BTC Converter starting");

    let config = Config::from_env();
    info!(api_url = %config.api_url, coingecko_url = %config.coingecko_url, "Configuration loaded");

    probe_backend(&config);
    let services = Services::from_config(&config)?;

    // Le worker possède le runtime ; l'UI garde App pour elle seule
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();
    let worker = spawn_worker(services, command_rx, result_tx)?;

    let mut terminal = setup_terminal()?;
    let mut app = App::from_config(&config);
    app.mount(Instant::now());

    let events = EventHandler::default();
    let outcome = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Démontage : minuteries arrêtées, channel fermé → le worker sort de sa boucle
    app.teardown();
    drop(command_tx);
    if worker.join().is_err() {
        error!("Worker thread panicked");
    }

    restore_terminal(&mut terminal)?;

    if let Err(e) = &outcome {
        error!(error = %e, "Event loop failed");
    }
    info!("BTC Converter exiting");
    outcome
}

/// Sonde /health au démarrage : uniquement journalisée, l'UI démarre quoi qu'il arrive
///
/// Client HTTP dédié : ses connexions meurent avec ce runtime temporaire et
/// ne doivent pas rester dans le pool du worker.
fn probe_backend(config: &Config) {
    let setup = build_http_client(config).and_then(|http| {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok((BackendClient::new(http, config.api_url.clone()), runtime))
    });
    let (backend, runtime) = match setup {
        Ok(setup) => setup,
        Err(e) => {
            warn!(error = %e, "Could not prepare health probe");
            return;
        }
    };

    let probe = runtime.block_on(async {
        tokio::time::timeout(HEALTH_TIMEOUT, backend.health()).await
    });

    match probe {
        Ok(Ok(health)) => {
            info!(status = %health.status, version = %health.version, "Backend is reachable")
        }
        Ok(Err(e)) => warn!(error = %e, "Backend health check failed"),
        Err(_) => warn!(timeout = ?HEALTH_TIMEOUT, "Backend health check timed out"),
    }
}

// ============================================================================
// Event loop
// ============================================================================

/// Envoie les commandes au worker
fn dispatch(command_tx: &mpsc::Sender<AppCommand>, commands: Vec<AppCommand>) -> Result<()> {
    for command in commands {
        debug!(?command, "Dispatching command");
        command_tx
            .send(command)
            .context("Le worker thread ne reçoit plus de commandes")?;
    }
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    while app.is_running() {
        // ========================================
        // 0. RÉSULTATS : tout ce que le worker a terminé
        // ========================================
        loop {
            match result_rx.try_recv() {
                Ok(result) => {
                    let follow_up = app.handle_result(result);
                    dispatch(command_tx, follow_up)?;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    anyhow::bail!("Worker thread disconnected");
                }
            }
        }

        // ========================================
        // 1. MINUTERIES : debounce et rafraîchissement
        // ========================================
        let commands = app.tick(Instant::now());
        dispatch(command_tx, commands)?;

        // ========================================
        // 2. RENDER
        // ========================================
        let view = project(app);
        terminal.draw(|frame| render(frame, &view))?;

        // ========================================
        // 3. INPUT
        // ========================================
        match events.next() {
            Ok(event) => {
                let commands = handle_event(app, event, Instant::now());
                dispatch(command_tx, commands)?;
            }
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Terminal
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
