// Desktop viewer state: owns the canvas, the page surface and the window
// presentation, and turns window events into canvas commands.

use std::path::Path as FsPath;
use std::rc::Rc;

use log::{debug, info, warn};
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::keyboard::ModifiersState;
use winit::window::Window;

use super::drawing::{blit_page, draw_desk_texture, draw_page_shadow, PageRect};
use super::pipeline::RenderPipeline;
use super::raster::PixelSurface;
use super::renderer::{Renderer, RendererError};
use super::text_rasterizing::TextRenderer;
use crate::canvas::{Canvas, CanvasError, Command};
use crate::config::Settings;
use crate::debug_println;
use crate::geometry::Point;
use crate::types::FragmentId;

/// Offset of the page's drop shadow on the desk, in window pixels
pub const PAGE_SHADOW_OFFSET: usize = 6;

#[derive(Error, Debug)]
pub enum DropError {
    #[error("Failed to read dropped file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

pub struct CanvasApp {
    pub(super) canvas: Canvas,
    pipeline: RenderPipeline,
    /// Page-sized surface the pipeline paints into; also the text measurer
    pub(super) page: PixelSurface,
    pub(super) page_rect: PageRect,
    renderer: Renderer,
    desk: Vec<u32>,
    pub width: u32,
    pub height: u32,
    pub(super) modifiers: ModifiersState,
    /// Last cursor position in window pixels
    pub(super) cursor: Option<(f64, f64)>,
    pub(super) next_sample: usize,
    /// Accumulated trackpad rotation not yet turned into a snap step
    pub(super) rotation_accum: f32,
    /// Grid state to restore when a file hover ends
    grid_before_hover: Option<bool>,
}

impl CanvasApp {
    pub fn new(window: Rc<Window>, settings: &Settings) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let renderer = Renderer::new(window, size.width.max(1), size.height.max(1))?;
        let canvas = Canvas::from_settings(settings);
        info!("Session seed {}", canvas.session_seed());

        let mut app = Self {
            canvas,
            pipeline: RenderPipeline::from_entropy(),
            page: PixelSurface::with_text(0, 0, TextRenderer::new()),
            page_rect: PageRect { x: 0, y: 0, width: 0, height: 0 },
            renderer,
            desk: Vec::new(),
            width: 0,
            height: 0,
            modifiers: ModifiersState::empty(),
            cursor: None,
            next_sample: 0,
            rotation_accum: 0.,
            grid_before_hover: None,
        };
        app.resize(size);
        Ok(app)
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            debug!("Ignoring zero-sized resize");
            return;
        }
        if let Err(e) = self.renderer.resize(size.width, size.height) {
            warn!("Renderer resize failed: {}", e);
            return;
        }
        self.width = size.width;
        self.height = size.height;

        let (w, h) = (size.width as usize, size.height as usize);
        self.desk.resize(w * h, 0);
        draw_desk_texture(&mut self.desk, w, h);

        self.apply(Command::Resize {
            width: size.width as f32,
            height: size.height as f32,
        });
        if let Some((page_w, page_h)) = self.canvas.size() {
            let (pw, ph) = (page_w.round() as usize, page_h.round() as usize);
            self.page.resize(pw, ph);
            self.page_rect = PageRect::centred(w, h, pw, ph);
        }
    }

    /// Apply a command, logging rejections. Returns true when a repaint is due.
    pub fn apply(&mut self, command: Command) -> bool {
        if let Err(e) = self.canvas.apply(command, &mut self.page) {
            warn!("Command rejected: {}", e);
        }
        self.canvas.is_dirty()
    }

    /// Window pixel position to page units.
    pub fn to_page(&self, x: f64, y: f64) -> Point {
        Point::new((x - self.page_rect.x as f64) as f32, (y - self.page_rect.y as f64) as f32)
    }

    pub fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Repaint the page if the canvas changed, then present desk and page.
    pub fn render(&mut self) -> Result<(), RendererError> {
        if self.canvas.take_dirty() {
            let report = self.pipeline.render(&self.canvas, &mut self.page);
            debug_println!("Repaint: {} drawn, {} skipped", report.drawn, report.skipped);
        }

        let width = self.width as usize;
        let height = self.height as usize;
        let page_rect = self.page_rect;
        let mut buffer = self.renderer.lock_buffer()?;
        if buffer.len() != self.desk.len() {
            debug!("Buffer size mismatch, waiting for resize");
            return Ok(());
        }
        buffer.copy_from_slice(&self.desk);
        draw_page_shadow(&mut buffer, width, height, page_rect, PAGE_SHADOW_OFFSET);
        let (page_stride, _) = self.page.dimensions();
        blit_page(&mut buffer, width, page_rect, self.page.pixels(), page_stride);
        buffer.present()?;
        Ok(())
    }

    /// A file is hovering over the window: show the alignment grid.
    pub fn handle_file_hover(&mut self) -> bool {
        if self.grid_before_hover.is_none() {
            self.grid_before_hover = Some(self.canvas.show_grid());
        }
        self.apply(Command::SetGrid(true))
    }

    pub fn handle_file_hover_cancelled(&mut self) -> bool {
        let show = self.grid_before_hover.take().unwrap_or(false);
        self.apply(Command::SetGrid(show))
    }

    /// Place the fragment described by a dropped `.json` file at the cursor,
    /// or the page centre when the cursor is unknown. Other files are ignored.
    pub fn handle_dropped_file(&mut self, path: &FsPath) -> Result<Option<FragmentId>, DropError> {
        self.handle_file_hover_cancelled();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            debug!("Ignoring dropped file {}", path.display());
            return Ok(None);
        }

        let payload = std::fs::read_to_string(path)?;
        let at = match self.cursor {
            Some((x, y)) if self.page_rect.contains(x, y) => self.to_page(x, y),
            _ => {
                let (w, h) = self.canvas.size().unwrap_or_default();
                Point::new(w / 2., h / 2.)
            }
        };
        let id = self.canvas.drop_payload(&payload, at)?;
        Ok(Some(id))
    }
}
