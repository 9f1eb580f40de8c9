//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read it but never mutate it. The App event-loop is the only
//! writer.

use std::path::PathBuf;

use pet_core::{ExplorerScreen, Pet};

use crate::widgets::status_bar::Mode;

/// Where the catalog on screen came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    BuiltIn,
    File(PathBuf),
}

impl CatalogSource {
    pub fn label(&self) -> String {
        match self {
            Self::BuiltIn => "built-in catalog".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// The full shared state of the application.
pub struct AppState {
    // ── Explorer ────────────────────────────────────────────────────────────
    pub screen: ExplorerScreen,
    pub catalog_source: CatalogSource,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub mode: Mode,
    pub show_keys: bool,

    // ── Session ─────────────────────────────────────────────────────────────
    /// Latest status line, already timestamped.
    pub last_log: Option<String>,
    pub log_path: PathBuf,
}

impl AppState {
    pub fn new(screen: ExplorerScreen, catalog_source: CatalogSource, log_path: PathBuf) -> Self {
        Self {
            screen,
            catalog_source,
            mode: Mode::Browse,
            show_keys: true,
            last_log: None,
            log_path,
        }
    }

    pub fn is_adopted(&self, pet: &Pet) -> bool {
        self.screen.is_adopted(pet)
    }

    pub fn adopted_count(&self) -> usize {
        self.screen.adoptions().len()
    }

    /// Record a status line stamped with the local time.
    pub fn set_log(&mut self, message: impl AsRef<str>) {
        let now = chrono::Local::now().format("%H:%M:%S");
        self.last_log = Some(format!("{now} {}", message.as_ref()));
    }
}
