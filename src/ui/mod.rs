//! Terminal kiosk user interface.

mod kiosk;

pub use kiosk::run_app;
