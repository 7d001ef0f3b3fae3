use softbuffer::{Buffer, Context, SoftBufferError, Surface};
use std::num::NonZeroU32;
use std::rc::Rc;
use thiserror::Error;
use winit::window::Window;

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Presentation surface failed: {0}")]
    Surface(#[from] SoftBufferError),
    #[error("Window has zero size")]
    ZeroSize,
}

/// Window presentation through softbuffer. The window is shared with the
/// event loop, so the surface holds its own handle.
pub struct Renderer {
    _context: Context<Rc<Window>>,
    surface: Surface<Rc<Window>, Rc<Window>>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(window: Rc<Window>, width: u32, height: u32) -> Result<Self, RendererError> {
        let context = Context::new(window.clone())?;
        let surface = Surface::new(&context, window)?;
        let mut renderer = Self {
            _context: context,
            surface,
            width: 0,
            height: 0,
        };
        renderer.resize(width, height)?;
        Ok(renderer)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RendererError> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Err(RendererError::ZeroSize);
        };
        self.surface.resize(w, h)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Borrow the back buffer. Call `present()` on it when done drawing.
    pub fn lock_buffer(&mut self) -> Result<Buffer<'_, Rc<Window>, Rc<Window>>, RendererError> {
        Ok(self.surface.buffer_mut()?)
    }
}
