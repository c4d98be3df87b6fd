//! Mainframe Protocol
//!
//! A hacker-themed birthday quiz for the terminal: boot the mainframe,
//! pass the biometric scan, then breach four firewalls by answering
//! questions only Shinzo would know.

use anyhow::Context;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mainframe::tui::App;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::File;
use std::io::{self, stdout, Stdout};
use std::sync::Mutex;
use tracing::{error, info, Level};

const LOG_FILE: &str = "mainframe.log";

fn init_logging() -> anyhow::Result<()> {
    // The terminal belongs to the UI, so logs go to a file
    let path = std::env::temp_dir().join(LOG_FILE);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    let mut app = App::new();
    app.start();

    // Main loop
    while app.running {
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        if !app.handle_input()? {
            break;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal);

    // Cleanup, even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(%err, "terminal loop failed");
        return Err(err).context("mainframe session aborted");
    }
    info!("session closed");

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  MAINFRAME PROTOCOL :: CONNECTION TERMINATED           ║");
    println!("║                                                        ║");
    println!("║  Happy birthday, Shinzo.                               ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    Ok(())
}
