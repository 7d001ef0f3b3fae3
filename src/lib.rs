// Global debug flag - can be toggled at runtime with Ctrl+D
use std::sync::atomic::AtomicBool;
pub static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

// Debug print macro - only prints if DEBUG_ENABLED is true
// Compiled out entirely in release builds
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        if $crate::DEBUG_ENABLED.load(std::sync::atomic::Ordering::Relaxed) {
            println!($($arg)*);
        }
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {};
}

/// Initialize the `log` backend. `RUST_LOG` overrides the default `info`
/// filter. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod preview;
pub mod samples;
pub mod style;
pub mod types;
pub mod ui;

pub use canvas::{Canvas, CanvasError, Command, FontSize};
pub use config::Settings;
pub use geometry::Point;
pub use preview::PreviewSheet;
pub use types::*;
pub use ui::{Backdrop, PixelSurface, RecordingSurface, RenderPipeline, Surface};
