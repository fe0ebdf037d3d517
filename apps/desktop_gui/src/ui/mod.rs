//! UI layer for the catalog browser: app shell, details dialog, widgets and theme.

pub mod app;
pub mod images;
pub mod modal;
pub mod scroll_lock;
pub mod theme;
pub mod widgets;

pub use app::CatalogApp;
