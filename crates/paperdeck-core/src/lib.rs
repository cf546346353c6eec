//! Core of the paper browser: backend client, navigation controller and the
//! view models the terminal front end paints.

pub mod api;
pub mod config;
pub mod config_file;
pub mod controller;
pub mod model;
pub mod nav;
pub mod view;

// Re-export for convenience
pub use api::{ApiClient, MockApi, PaperApi, RequestError};
pub use config::{Overrides, Settings};
pub use controller::{BrowseSettings, Controller, DetailOutcome, DetailTicket, Step};
pub use model::{
    Analysis, BookmarkInfo, BookmarkRecord, PaperDetail, PaperListResponse, PaperSummary,
};
pub use nav::{Direction, Mode, NavigationState};
pub use view::{AnalysisView, BookmarkState, Display, Header, PageIndicator, PaperView};
