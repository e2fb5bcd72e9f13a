//! Recorder UI
//!
//! Everything rendered is a pure function of the session state; the
//! components read the `Session` and report user intent back to the app.

pub mod app;
pub mod components;
pub mod theme;

pub use app::RetakeApp;
pub use theme::Theme;
