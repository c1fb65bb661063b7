//! Reader session controller.
//!
//! # Responsibility
//! - Hold the in-memory state of one open book.
//! - Translate renderer callbacks into progress writes and snapshots.
//! - Route navigation and page-jump requests to the renderer.
//!
//! # Invariants
//! - Progress is written only when the page actually changes and the
//!   initial load has completed. Reloads keep persisting.
//! - `current_page` stays inside `[0, total_pages)` once the count is known.
//! - Snapshots are appended on pages that are multiples of the interval;
//!   their duration is always 0.
//! - Night mode and zoom are never persisted.

use crate::config::DEFAULT_SNAPSHOT_INTERVAL_PAGES;
use crate::model::book::Book;
use crate::model::progress::completion_percentage;
use crate::reader::renderer::{DocumentRenderer, RenderConfig, RendererEvent};
use crate::reader::state::ReaderState;
use crate::repo::library_repo::{LibraryRepository, RepoError};
use crate::time::now_epoch_ms;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Service error for reader use-cases.
#[derive(Debug)]
pub enum ReaderError {
    Repo(RepoError),
}

impl Display for ReaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ReaderError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Controller for one open reading session.
pub struct ReaderSession<R: LibraryRepository, V: DocumentRenderer> {
    repo: R,
    renderer: V,
    book: Book,
    state: ReaderState,
    snapshot_interval: u32,
}

impl<R: LibraryRepository, V: DocumentRenderer> ReaderSession<R, V> {
    /// Opens `book` in `renderer` at its stored page.
    ///
    /// A renderer that refuses the document leaves the session in the
    /// no-content state instead of failing.
    pub fn open(repo: R, renderer: V, book: Book) -> Self {
        Self::with_snapshot_interval(repo, renderer, book, DEFAULT_SNAPSHOT_INTERVAL_PAGES)
    }

    pub fn with_snapshot_interval(repo: R, renderer: V, book: Book, snapshot_interval: u32) -> Self {
        let state = ReaderState::new(book.current_page, book.total_pages);
        let mut session = Self {
            repo,
            renderer,
            book,
            state,
            snapshot_interval: snapshot_interval.max(1),
        };
        info!(
            "event=reader_open module=reader status=start book_id={} page={}",
            session.book.id, session.state.current_page
        );
        session.load(session.state.current_page);
        session
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn state(&self) -> &ReaderState {
        &self.state
    }

    pub fn renderer(&self) -> &V {
        &self.renderer
    }

    /// Dispatches one renderer callback.
    pub fn handle_event(&mut self, event: RendererEvent) -> Result<(), ReaderError> {
        match event {
            RendererEvent::Loaded { page_count } => self.on_load_complete(page_count),
            RendererEvent::PageChanged { page, .. } => self.on_page_changed(page),
            RendererEvent::LoadError(message) => {
                self.on_load_error(&message);
                Ok(())
            }
            RendererEvent::Tap => {
                self.toggle_controls();
                Ok(())
            }
        }
    }

    /// Records the discovered page count; persists it when the book had none.
    pub fn on_load_complete(&mut self, page_count: u32) -> Result<(), ReaderError> {
        self.state.is_loading = false;
        self.state.load_error = None;
        self.state.total_pages = page_count;
        info!(
            "event=reader_load module=reader status=ok book_id={} total_pages={}",
            self.book.id, page_count
        );

        if page_count > 0 {
            self.state.current_page = self.state.current_page.min(page_count - 1);
        }

        if self.book.total_pages == 0 && page_count > 0 {
            self.book.total_pages = page_count;
            self.book.current_page = self.book.clamp_page(self.book.current_page);
            self.repo.update_book(&self.book)?;
        }
        Ok(())
    }

    /// Applies a page notification and runs the persistence reaction.
    pub fn on_page_changed(&mut self, page: u32) -> Result<(), ReaderError> {
        let page = if self.state.total_pages > 0 {
            page.min(self.state.total_pages - 1)
        } else {
            page
        };
        if page == self.state.current_page {
            return Ok(());
        }
        self.state.current_page = page;
        if self.state.is_loading {
            return Ok(());
        }

        let now = now_epoch_ms();
        self.repo
            .update_reading_progress_at(self.book.id, page, now)?;
        self.book.current_page = page;
        self.book.last_read_time = now;

        if page % self.snapshot_interval == 0 {
            let percentage = completion_percentage(page, self.state.total_pages);
            // Session timing is not tracked yet; duration stays 0.
            self.repo
                .save_reading_session(self.book.id, page, percentage, 0)?;
            debug!(
                "event=reader_snapshot module=reader status=ok book_id={} page={}",
                self.book.id, page
            );
        }
        Ok(())
    }

    /// Downgrades to the no-content state.
    pub fn on_load_error(&mut self, message: &str) {
        error!(
            "event=reader_load module=reader status=error book_id={} error={}",
            self.book.id, message
        );
        self.state.is_loading = false;
        self.state.load_error = Some(message.to_string());
    }

    /// Flips the favorite flag and persists the whole record.
    pub fn toggle_favorite(&mut self) -> Result<bool, ReaderError> {
        self.book.is_favorite = !self.book.is_favorite;
        if let Err(err) = self.repo.update_book(&self.book) {
            self.book.is_favorite = !self.book.is_favorite;
            return Err(err.into());
        }
        Ok(self.book.is_favorite)
    }

    /// Reloads the document with night mode flipped, keeping the page.
    ///
    /// The session keeps its content while the renderer reloads, so page
    /// changes reported in the meantime are still persisted.
    pub fn toggle_night_mode(&mut self) -> bool {
        self.state.night_mode = !self.state.night_mode;
        self.load(self.state.current_page);
        self.state.night_mode
    }

    /// Stores a finite positive zoom level; other values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() && zoom > 0.0 {
            self.state.zoom = zoom;
        }
    }

    pub fn toggle_controls(&mut self) {
        self.state.controls_visible = !self.state.controls_visible;
    }

    pub fn hide_controls(&mut self) {
        self.state.controls_visible = false;
    }

    /// Requests the next page. Returns whether a jump was requested.
    pub fn next_page(&mut self) -> bool {
        let next = self.state.current_page.saturating_add(1);
        self.seek(next)
    }

    /// Requests the previous page. Returns whether a jump was requested.
    pub fn previous_page(&mut self) -> bool {
        match self.state.current_page.checked_sub(1) {
            Some(previous) => self.seek(previous),
            None => false,
        }
    }

    /// Requests a jump to the 0-based `page` when it exists.
    pub fn seek(&mut self, page: u32) -> bool {
        if page >= self.state.total_pages || page == self.state.current_page {
            return false;
        }
        self.renderer.jump_to_page(page);
        true
    }

    pub fn open_page_dialog(&mut self) {
        self.state.page_dialog.open();
    }

    pub fn set_page_input(&mut self, text: &str) {
        self.state.page_dialog.set_input(text);
    }

    pub fn dismiss_page_dialog(&mut self) {
        self.state.page_dialog.dismiss();
    }

    /// Jumps to the dialog's page and closes it; invalid input keeps it open.
    pub fn confirm_page_jump(&mut self) -> bool {
        match self.state.page_dialog.target_page(self.state.total_pages) {
            Some(page) => {
                self.renderer.jump_to_page(page);
                self.state.page_dialog.dismiss();
                true
            }
            None => false,
        }
    }

    fn load(&mut self, page: u32) {
        let config = RenderConfig::new(page, self.state.night_mode);
        self.state.load_error = None;
        if let Err(err) = self
            .renderer
            .load_document(Path::new(&self.book.file_path), &config)
        {
            self.on_load_error(err.message());
        }
    }
}
