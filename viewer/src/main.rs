use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error};
use ratatui::{Terminal, backend::CrosstermBackend, style::Color};

mod app;
mod embed;
mod facts;
mod ui;

use app::App;

/// Feed URL the original gallery page ships with.
const DEFAULT_FEED_URL: &str = "https://cdn.jsdelivr.net/gh/GCA-Classroom/apod/data.json";

#[derive(Parser)]
#[command(
    name = "apodview",
    about = "Shuffled astronomy-picture-of-the-day gallery for the terminal"
)]
struct Args {
    /// Feed URL to fetch
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    url: String,

    /// Seed for the shuffle order (reproducible navigation)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logger
    env_logger::init();
    let args = Args::parse();

    // Restore the terminal to a usable state if we panic mid-draw.
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        orig_hook(panic_info);
    }));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to set up terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(args.url, args.seed);
    // Show a fact right away, like the page does on load.
    app.facts.pick();

    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    // Main loop
    while !app.should_quit {
        terminal.draw(|f| {
            if let Err(e) = ui::draw_ui(f, &mut app) {
                error!("UI draw error: {}", e);
            }
        })?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Err(e) = app.handle_key_event(key).await {
                        error!("Key handler error: {}", e);
                        app.set_status(format!("Error: {}", e), Color::Red);
                    }
                }
                Event::Mouse(mouse) => {
                    if let Err(e) = app.handle_mouse_event(mouse).await {
                        error!("Mouse handler error: {}", e);
                    }
                }
                Event::Resize(width, height) => {
                    debug!("Resize to {}x{}", width, height);
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick().await;
            last_tick = Instant::now();
        }
    }

    // Restore terminal state
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}
