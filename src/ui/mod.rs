pub mod app;
pub mod backdrop;
pub mod background;
pub mod compositing;
pub mod drawing;
mod keyboard;
mod mouse;
pub mod pipeline;
pub mod raster;
pub mod recording;
pub mod renderer;
pub mod surface;
pub mod text_rasterizing;
pub mod theme;

pub use app::{CanvasApp, DropError};
pub use backdrop::Backdrop;
pub use pipeline::{RenderError, RenderPipeline, RenderReport};
pub use raster::PixelSurface;
pub use recording::{DrawOp, RecordingSurface};
pub use surface::{FontSpec, Paint, Shadow, Surface, TextMeasure};
pub use text_rasterizing::TextRenderer;
