//! # Vitae CLI Entry Point
//!
//! This is the main entry point for the Vitae TUI application.
//!
//! ## Overview
//!
//! Vitae is a terminal user interface for building resume variants written in
//! Typst. It lists the `.typ` sources found in the variants directory, runs
//! the external `typst` compiler for the selected one, and offers to open the
//! produced PDF or copy its path (the path is also copied automatically after
//! every successful build).
//!
//! ## Usage
//!
//! ```bash
//! # Use the default variants/ and output/ directories
//! vitae
//!
//! # Use specific directories
//! vitae --variants-dir cv/variants --output-dir cv/pdfs
//!
//! # Debug mode - print the discovered catalog and exit
//! vitae --debug
//! ```
//!
//! ## Key Bindings
//!
//! - `↑`/`k`, `↓`/`j` - Navigate the variant list
//! - `Enter` / `Space` - Build the selected variant
//! - `/` - Filter the list
//! - `o` - Open the built PDF
//! - `c` - Copy the PDF path to the clipboard
//! - `Esc` / `b` - Back to the list
//! - `?` - Toggle help
//! - `q` / `Ctrl-C` - Quit

use vitae::build;
use vitae::catalog;
use vitae::config::Config;
use vitae::ui;
use vitae::ui::theme::Theme;
use vitae::ui::{App, TaskMsg};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// Vitae - a TUI for building Typst resume variants into PDFs
#[derive(Parser, Debug)]
#[command(name = "vitae")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build Typst resume variants from your terminal", long_about = None)]
struct Args {
    /// Directory containing variant source files
    #[arg(long, value_name = "DIR")]
    variants_dir: Option<PathBuf>,

    /// Directory that receives compiled PDFs
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Compiler executable to invoke
    #[arg(long, value_name = "TOOL")]
    compiler: Option<String>,

    /// Theme name (overrides the persisted config)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Print the discovered variant catalog and exit
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);

        original_hook(panic_info);
    }));

    let result = run_application(args).await;

    let _ = panic::take_hook();

    result
}

async fn run_application(args: Args) -> Result<()> {
    // Persisted config first, command-line flags on top.
    let mut config = Config::load();
    if let Some(dir) = args.variants_dir {
        config.variants_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(compiler) = args.compiler {
        config.compiler = compiler;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    // Startup preconditions, checked before any UI is shown.
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    if !build::is_compiler_available(&config.compiler) {
        anyhow::bail!(
            "{} command not found. Please install Typst first.\nVisit: https://typst.app/docs/guides/install/",
            config.compiler
        );
    }

    if !config.variants_dir.is_dir() {
        anyhow::bail!(
            "{} directory not found. Create it and add your .{} files.",
            config.variants_dir.display(),
            config.extension
        );
    }

    let entries = catalog::discover_variants(&config.variants_dir, &config.extension)
        .with_context(|| {
            format!(
                "Failed to load variants from: {}",
                config.variants_dir.display()
            )
        })?;

    if entries.is_empty() {
        eprintln!(
            "No .{} files found in {} directory",
            config.extension,
            config.variants_dir.display()
        );
        std::process::exit(1);
    }

    // Debug mode: print the catalog and exit
    if args.debug {
        println!("=== Discovered Variants ===");
        for entry in &entries {
            println!("  {} ({})", entry.name, entry.size_label);
        }
        println!("\nTotal: {} variants", entries.len());
        return Ok(());
    }

    let theme = Theme::by_name(&config.theme)
        .cloned()
        .unwrap_or_else(|| Theme::default_theme().clone());

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Background tasks report back through this channel; the loop is its
    // single consumer.
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(entries, config, theme, tx);

    // Run the app and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(&mut terminal, &mut app, &mut rx, &mut event_reader).await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    // Return the first error that occurred, or Ok if both succeeded
    run_result?;
    cleanup_result?;

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<TaskMsg>,
    event_reader: &mut dyn EventReader,
) -> Result<()> {
    loop {
        // Drain finished background tasks once per iteration.
        while let Ok(msg) = rx.try_recv() {
            app.handle_task(msg);
        }

        terminal
            .draw(|f| ui::render(f, app))
            .context("Failed to draw terminal UI")?;

        // Poll faster while a build is in flight so the spinner animates.
        let poll_timeout = if app.is_building() {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(100)
        };

        match event_reader.read_event(poll_timeout)? {
            Some(Event::Key(key)) => app.handle_key(key),
            Some(Event::Resize(width, height)) => app.handle_resize(width, height),
            Some(_) => {}
            // Timeout: advance the progress indicator (no-op unless building).
            None => app.tick(),
        }

        if app.should_quit {
            terminal
                .draw(|f| ui::render(f, app))
                .context("Failed to draw terminal UI")?;
            break;
        }
    }

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;
    use std::fs;
    use tempfile::TempDir;

    /// Mock event reader for testing that returns a predetermined sequence of events
    struct MockEventReader {
        events: VecDeque<Event>,
    }

    impl MockEventReader {
        fn new(events: Vec<Event>) -> Self {
            Self {
                events: VecDeque::from(events),
            }
        }
    }

    impl EventReader for MockEventReader {
        fn read_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            Ok(self.events.pop_front())
        }
    }

    /// Helper to create a key event
    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_mock_event_reader() {
        let events = vec![
            key_event(KeyCode::Char('j')),
            key_event(KeyCode::Char('k')),
            key_event(KeyCode::Enter),
        ];

        let mut reader = MockEventReader::new(events);

        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).unwrap(),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Char('j'),
                ..
            }))
        ));
        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).unwrap(),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Char('k'),
                ..
            }))
        ));
        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).unwrap(),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            }))
        ));

        // Should return None when no more events
        assert!(reader
            .read_event(Duration::from_millis(10))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_crossterm_event_reader_type() {
        // Just verify that CrosstermEventReader exists and implements the trait
        let _reader: Box<dyn EventReader> = Box::new(CrosstermEventReader);
    }

    fn test_args() -> Args {
        Args {
            variants_dir: None,
            output_dir: None,
            compiler: None,
            theme: None,
            debug: false,
        }
    }

    #[tokio::test]
    async fn test_run_application_missing_compiler() {
        let temp_dir = TempDir::new().unwrap();

        let args = Args {
            output_dir: Some(temp_dir.path().join("output")),
            compiler: Some("definitely-not-a-real-compiler-xyz".to_string()),
            ..test_args()
        };

        let result = run_application(args).await;
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("not found"));
    }

    #[tokio::test]
    async fn test_run_application_missing_variants_dir() {
        let temp_dir = TempDir::new().unwrap();

        // cargo is always resolvable while the tests run, so the startup
        // check falls through to the variants directory.
        let args = Args {
            variants_dir: Some(temp_dir.path().join("does-not-exist")),
            output_dir: Some(temp_dir.path().join("output")),
            compiler: Some("cargo".to_string()),
            ..test_args()
        };

        let result = run_application(args).await;
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("directory not found"));
    }

    #[tokio::test]
    async fn test_run_application_debug_mode_exits_before_ui() {
        let temp_dir = TempDir::new().unwrap();
        let variants_dir = temp_dir.path().join("variants");
        fs::create_dir(&variants_dir).unwrap();
        fs::write(variants_dir.join("modern.typ"), "= CV").unwrap();

        let args = Args {
            variants_dir: Some(variants_dir),
            output_dir: Some(temp_dir.path().join("output")),
            compiler: Some("cargo".to_string()),
            debug: true,
            ..test_args()
        };

        let result = run_application(args).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_application_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("nested").join("output");

        let args = Args {
            variants_dir: Some(temp_dir.path().join("does-not-exist")),
            output_dir: Some(output_dir.clone()),
            compiler: Some("cargo".to_string()),
            ..test_args()
        };

        // Fails later (missing variants dir), but the output dir is created
        // first.
        let result = run_application(args).await;
        assert!(result.is_err());
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_args_construction() {
        let args = Args {
            variants_dir: Some(PathBuf::from("/some/path")),
            ..test_args()
        };
        assert_eq!(args.variants_dir, Some(PathBuf::from("/some/path")));
        assert_eq!(args.compiler, None);
        assert!(!args.debug);
    }
}
