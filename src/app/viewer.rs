use crate::config::{ViewerConfig, ViewerMode};
use crate::upload::{FileEntry, FileRegistry};

/// Which file is focused and whether the report panel is open.
/// Holds ids only; the registry and report model own the data.
#[derive(Debug, Clone)]
pub struct ViewerController {
    mode: ViewerMode,
    clear_selection_on_close: bool,
    selected_file_id: Option<String>,
    panel_open: bool,
}

impl ViewerController {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            mode: config.mode,
            clear_selection_on_close: config.clear_selection_on_close,
            selected_file_id: None,
            panel_open: false,
        }
    }

    pub fn mode(&self) -> ViewerMode {
        self.mode
    }

    pub fn selected_file_id(&self) -> Option<&str> {
        self.selected_file_id.as_deref()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Focuses a registered file. Unknown ids leave the state untouched.
    pub fn select(&mut self, registry: &FileRegistry, id: &str) -> bool {
        if !registry.contains(id) {
            return false;
        }
        self.selected_file_id = Some(id.to_string());
        if self.mode == ViewerMode::Combined {
            self.panel_open = true;
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected_file_id = None;
    }

    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
        if self.clear_selection_on_close {
            self.selected_file_id = None;
        }
    }

    pub fn toggle_panel(&mut self) {
        if self.panel_open {
            self.close_panel();
        } else {
            self.open_panel();
        }
    }

    /// Drops a selection whose entry has left the registry.
    pub fn reconcile(&mut self, registry: &FileRegistry) {
        let stale = self
            .selected_file_id
            .as_deref()
            .map(|id| !registry.contains(id))
            .unwrap_or(false);
        if stale {
            self.selected_file_id = None;
        }
    }

    pub fn selected_entry<'a>(&self, registry: &'a FileRegistry) -> Option<&'a FileEntry> {
        self.selected_file_id
            .as_deref()
            .and_then(|id| registry.get(id))
    }

    /// Whether the document preview is on screen.
    pub fn preview_visible(&self) -> bool {
        match self.mode {
            ViewerMode::Combined => self.panel_open && self.selected_file_id.is_some(),
            ViewerMode::Split => self.selected_file_id.is_some(),
        }
    }
}
