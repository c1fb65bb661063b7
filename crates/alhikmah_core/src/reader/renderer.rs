//! Capability contract for the external document renderer.
//!
//! # Responsibility
//! - Describe what the core asks of a renderer (load, jump) and what it
//!   hears back (load completion, page changes, errors, taps).
//!
//! # Invariants
//! - Page numbers crossing this boundary are 0-based.
//! - The renderer owns pagination; the core never assumes a jump succeeded
//!   until `RendererEvent::PageChanged` arrives.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Gap between rendered pages, in renderer units.
pub const DEFAULT_PAGE_SPACING: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicy {
    #[default]
    Width,
    Height,
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    #[default]
    Vertical,
    Horizontal,
}

/// Options passed with every document load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// 0-based page shown first.
    pub default_page: u32,
    pub night_mode: bool,
    pub fit_policy: FitPolicy,
    pub swipe_direction: SwipeDirection,
    pub page_spacing: u32,
    pub enable_double_tap: bool,
    pub enable_annotations: bool,
}

impl RenderConfig {
    pub fn new(default_page: u32, night_mode: bool) -> Self {
        Self {
            default_page,
            night_mode,
            fit_policy: FitPolicy::Width,
            swipe_direction: SwipeDirection::Vertical,
            page_spacing: DEFAULT_PAGE_SPACING,
            enable_double_tap: true,
            enable_annotations: true,
        }
    }
}

/// Failure reported by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "render failed: {}", self.message)
    }
}

impl Error for RenderError {}

/// Callbacks delivered by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererEvent {
    Loaded { page_count: u32 },
    PageChanged { page: u32, page_count: u32 },
    LoadError(String),
    Tap,
}

/// Adapter around a concrete document renderer.
pub trait DocumentRenderer {
    /// Starts loading `path`. Completion arrives as `RendererEvent::Loaded`.
    fn load_document(&mut self, path: &Path, config: &RenderConfig) -> Result<(), RenderError>;
    /// Requests a jump to the 0-based `page`.
    fn jump_to_page(&mut self, page: u32);
}
