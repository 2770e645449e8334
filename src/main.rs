mod backend;
mod config;
mod controller;
mod events;
mod logging;
mod model;
mod resizer;
mod timer;
mod view;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};

use config::PlayerConfig;
use controller::PlayerController;
use events::EventBus;
use model::PlayerModel;
use view::PlayerView;

// The whole player is cooperative and event-driven; a single-threaded
// runtime keeps every suspension point an explicit await.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== vidsync-rs starting ===");

    let config = match std::env::args().nth(1) {
        Some(path) => PlayerConfig::load(Path::new(&path))?,
        None => PlayerConfig::default(),
    };
    tracing::debug!(?config, "Player configuration");

    let bus = EventBus::new();
    events::install_tracing_sink(&bus);
    // Startup marker: logged for whichever lifecycle event lands first.
    bus.subscribe_once(|emitted| {
        tracing::debug!(event = ?emitted.event, "First player event");
    });

    let model = PlayerModel::new(&config);
    let (player_backend, backend_events) = backend::create(&config);

    let controller = PlayerController::new(&model, player_backend, bus, &config);
    controller.start_backend_listener(backend_events);

    if let Some(url) = config.captions_url.clone() {
        controller.start_caption_fetch(url);
    } else {
        tracing::info!("No caption resource configured, caption panel stays hidden");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let size = terminal.size()?;
    controller.handle_resize(size.width, size.height);

    let res = run_app(&mut terminal, &model, &controller).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("vidsync-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: &PlayerModel,
    controller: &PlayerController,
) -> io::Result<()> {
    let mut input = EventStream::new();
    // Redraw faster than the 200 ms clock ticks so the gauge tracks them.
    let mut redraw = tokio::time::interval(Duration::from_millis(50));

    loop {
        tokio::select! {
            _ = redraw.tick() => {
                let snapshot = model.snapshot();
                terminal.draw(|f| PlayerView::render(f, &snapshot))?;
            }
            maybe_event = input.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => controller.handle_key_event(key),
                    Some(Ok(Event::Resize(width, height))) => {
                        controller.handle_resize(width, height);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::error!(error = %e, "Input stream error"),
                    None => break,
                }
            }
        }

        if model.should_quit() {
            break;
        }
    }

    Ok(())
}
