//! Reader building blocks: renderer capability, page-jump dialog and
//! per-session UI state.
//!
//! The session controller that ties them to persistence lives in
//! [`crate::service::reader_service`].

pub mod page_jump;
pub mod renderer;
pub mod state;

pub use page_jump::PageJumpDialog;
pub use renderer::{DocumentRenderer, FitPolicy, RenderConfig, RenderError, RendererEvent, SwipeDirection};
pub use state::ReaderState;
