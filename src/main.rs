mod audio;
mod bridge;
mod config;
mod controller;
mod diagnostics;
mod logging;
mod model;
mod view;
mod window;

use std::io;
use std::time::{Duration, Instant};
use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use config::ShellConfig;
use controller::AppController;
use diagnostics::Diagnostics;
use window::TerminalWindow;

#[tokio::main]
async fn main() -> Result<()> {
    let diagnostics = Diagnostics::new();
    if let Err(e) = logging::init_logging(diagnostics.clone()) {
        eprintln!("Warning: Failed to initialize logging: {:#}", e);
    }

    tracing::info!("=== Enhanced CD Shell Starting ===");

    let config = ShellConfig::load()?;
    let output = audio::open_output(&config);
    let mut controller = AppController::new(&config, output, TerminalWindow::new(), diagnostics);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    // Tear down the game panel and its runtime before logging stops
    drop(controller);
    tracing::info!("Enhanced CD Shell shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut AppController,
) -> Result<()> {
    loop {
        controller.tick(Instant::now());

        // Get current state
        let playback = controller.playback_info();
        let game = controller.game_info();
        let ui_state = controller.ui_state().clone();

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, game.as_ref());
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if controller.should_quit() {
            break;
        }
    }

    Ok(())
}
