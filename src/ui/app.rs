//! # Application State Machine
//!
//! [`App`] owns every piece of mutable UI state and is the single consumer of
//! keyboard events, resize events, spinner ticks, and the results of
//! background tasks. All mutation happens on the event loop; the only work
//! that leaves the loop (the compiler run and the clipboard write) comes back
//! as exactly one [`TaskMsg`] over the channel.

use crate::build::{self, BuildResult};
use crate::catalog::VariantEntry;
use crate::config::Config;
use crate::ui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

/// Frames of the progress indicator shown while a build is in flight.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// The mode of the application. Each phase carries exactly the payload that
/// is valid in it, so e.g. an artifact path cannot be observed outside
/// `Completed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Browsing the variant catalog.
    Listing,
    /// A build for `variant` is in flight.
    Building { variant: String },
    /// The last build finished; `result` holds its log and artifact.
    Completed { result: BuildResult },
}

/// Message delivered back to the event loop when a background task finishes.
/// Every task sends exactly one of these.
#[derive(Debug)]
pub enum TaskMsg {
    BuildFinished(BuildResult),
    /// Acknowledgment of a clipboard write. Consumed and ignored; it exists
    /// only to keep the task protocol uniform.
    ClipboardDone,
}

/// All mutable UI state, owned by the event loop.
pub struct App {
    pub phase: Phase,
    pub entries: Vec<VariantEntry>,
    pub selected_index: usize,
    pub filter_mode: bool,
    pub filter_query: String,
    pub show_help: bool,
    pub should_quit: bool,
    pub spinner_frame: usize,
    pub width: u16,
    pub height: u16,
    pub theme: Theme,
    config: Config,
    tx: UnboundedSender<TaskMsg>,
}

impl App {
    pub fn new(
        entries: Vec<VariantEntry>,
        config: Config,
        theme: Theme,
        tx: UnboundedSender<TaskMsg>,
    ) -> Self {
        Self {
            phase: Phase::Listing,
            entries,
            selected_index: 0,
            filter_mode: false,
            filter_query: String::new(),
            show_help: false,
            should_quit: false,
            spinner_frame: 0,
            width: 0,
            height: 0,
            theme,
            config,
            tx,
        }
    }

    // ── List view ───────────────────────────────────────────────

    /// Catalog entries matching the current filter query, in catalog order.
    pub fn visible_entries(&self) -> Vec<&VariantEntry> {
        if self.filter_query.is_empty() {
            return self.entries.iter().collect();
        }
        let query = self.filter_query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&VariantEntry> {
        self.visible_entries().get(self.selected_index).copied()
    }

    pub fn next(&mut self) {
        let count = self.visible_entries().len();
        if count > 0 {
            self.selected_index = (self.selected_index + 1) % count;
        }
    }

    pub fn previous(&mut self) {
        let count = self.visible_entries().len();
        if count > 0 {
            if self.selected_index > 0 {
                self.selected_index -= 1;
            } else {
                self.selected_index = count - 1;
            }
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.filter_query.clear();
        self.selected_index = 0;
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
        self.filter_query.clear();
        self.selected_index = 0;
    }

    pub fn filter_push_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.selected_index = 0; // Reset selection when the filter changes
    }

    pub fn filter_pop_char(&mut self) {
        self.filter_query.pop();
        self.selected_index = 0; // Reset selection when the filter changes
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ── Phase machine ───────────────────────────────────────────

    pub fn is_building(&self) -> bool {
        matches!(self.phase, Phase::Building { .. })
    }

    /// Current spinner glyph.
    pub fn spinner_glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Advance the progress indicator. Ticks arriving outside `Building` are
    /// ignored.
    pub fn tick(&mut self) {
        if self.is_building() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Resize events update the stored viewport in any phase and never the
    /// phase itself.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Start a build for the highlighted entry. No-op unless Listing with a
    /// selection; the phase moves to `Building` in the same step, so a second
    /// build cannot be triggered while one is in flight.
    pub fn confirm_selection(&mut self) {
        if !matches!(self.phase, Phase::Listing) {
            return;
        }
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let variant = entry.name.clone();
        self.spinner_frame = 0;
        self.spawn_build(variant.clone());
        self.phase = Phase::Building { variant };
    }

    /// Return from the completed view to the list. The previous build's log
    /// and artifact are dropped with the phase.
    pub fn go_back(&mut self) {
        if matches!(self.phase, Phase::Completed { .. }) {
            self.phase = Phase::Listing;
        }
    }

    /// Consume one background-task message.
    pub fn handle_task(&mut self, msg: TaskMsg) {
        match msg {
            TaskMsg::BuildFinished(result) => {
                // Auto-copy the artifact path on every successful build.
                if result.succeeded {
                    if let Some(path) = result.artifact_path.clone() {
                        self.spawn_copy(path);
                    }
                }
                self.phase = Phase::Completed { result };
            }
            TaskMsg::ClipboardDone => {}
        }
    }

    // ── Keyboard dispatch ───────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl-C quits from any state, including filter input.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.filter_mode && matches!(self.phase, Phase::Listing) {
            self.handle_filter_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.toggle_help();
                return;
            }
            _ => {}
        }

        match self.phase {
            Phase::Listing => self.handle_listing_key(key),
            // Only the quit keys act while a build runs.
            Phase::Building { .. } => {}
            Phase::Completed { .. } => self.handle_completed_key(key),
        }
    }

    fn handle_listing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char('/') => self.enter_filter_mode(),
            KeyCode::Enter | KeyCode::Char(' ') => self.confirm_selection(),
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.exit_filter_mode(),
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Backspace => self.filter_pop_char(),
            KeyCode::Enter => {
                self.confirm_selection();
                self.exit_filter_mode();
            }
            KeyCode::Char(c) => self.filter_push_char(c),
            _ => {}
        }
    }

    fn handle_completed_key(&mut self, key: KeyEvent) {
        let artifact = match &self.phase {
            Phase::Completed { result } => result.artifact_path.clone(),
            _ => return,
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => self.go_back(),
            KeyCode::Char('o') => {
                if let Some(path) = &artifact {
                    build::open_artifact(path);
                }
            }
            KeyCode::Char('c') => {
                if let Some(path) = artifact {
                    self.spawn_copy(path);
                }
            }
            _ => {}
        }
    }

    // ── Background tasks ────────────────────────────────────────

    /// Run the compiler off the UI loop. The task reports back with exactly
    /// one `BuildFinished` message.
    fn spawn_build(&self, variant: String) {
        let config = self.config.clone();
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = build::run_build(&config, &variant);
            let _ = tx.send(TaskMsg::BuildFinished(result));
        });
    }

    /// Write the artifact path to the clipboard off the UI loop. Failures are
    /// swallowed; one `ClipboardDone` is sent either way.
    fn spawn_copy(&self, path: PathBuf) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let _ = build::copy_path_to_clipboard(&path);
            let _ = tx.send(TaskMsg::ClipboardDone);
        });
    }
}
