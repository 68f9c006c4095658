//! Profile widget: fetches a profile document for one user and renders it
//! into a host page, refreshing on a timer and degrading to an offline
//! marker when a refresh fails.

pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use commands::widget::ProfileWidget;
pub use error::WidgetError;
pub use models::{ModalKind, ProfileSnapshot, WidgetSettings};
pub use services::profile_client::{HttpProfileSource, ProfileSource, RefreshOutcome};
pub use services::refresh_scheduler::RefreshState;
pub use services::surface::{MemorySurface, Mount, Surface};
