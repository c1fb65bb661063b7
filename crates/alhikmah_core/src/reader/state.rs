//! In-memory state of one open reading session.

use crate::reader::page_jump::PageJumpDialog;

pub const DEFAULT_ZOOM: f32 = 1.0;

/// UI-facing reader state. Nothing here is persisted directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderState {
    /// 0-based.
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub night_mode: bool,
    pub zoom: f32,
    pub controls_visible: bool,
    pub page_dialog: PageJumpDialog,
    /// Set when the renderer failed; the session then shows no content.
    pub load_error: Option<String>,
}

impl ReaderState {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page,
            total_pages,
            is_loading: true,
            night_mode: false,
            zoom: DEFAULT_ZOOM,
            controls_visible: true,
            page_dialog: PageJumpDialog::default(),
            load_error: None,
        }
    }

    pub fn has_content(&self) -> bool {
        !self.is_loading && self.load_error.is_none()
    }

    /// "Page N / M" style 1-based position; `None` until the count is known.
    pub fn page_label(&self) -> Option<(u32, u32)> {
        (self.total_pages > 0).then(|| (self.current_page + 1, self.total_pages))
    }
}
