// Window-level drawing: the desk behind the page and the page blit.
// All buffers are packed ARGB u32, row major.

use super::compositing::over_opaque;
use super::theme;
use rayon::prelude::*;

/// Where the page sits inside the window, in window pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PageRect {
    /// Centre a page of `page_w` x `page_h` in the window, clamped to fit.
    pub fn centred(window_w: usize, window_h: usize, page_w: usize, page_h: usize) -> Self {
        let width = page_w.min(window_w);
        let height = page_h.min(window_h);
        Self {
            x: (window_w - width) / 2,
            y: (window_h - height) / 2,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && y >= self.y as f64
            && x < (self.x + self.width) as f64
            && y < (self.y + self.height) as f64
    }
}

/// Fill the whole buffer with the wood-grain desk noise.
pub fn draw_desk_texture(pixels: &mut [u32], width: usize, height: usize) {
    if width == 0 || height == 0 {
        return;
    }
    pixels[..width * height]
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, row_pixels)| draw_desk_row(row_pixels, width, row, height));
}

#[inline]
fn row_seed(row: usize, height: usize) -> usize {
    0xDEADBEEF01234567 ^ row.wrapping_sub(height / 2).wrapping_mul(0x9E3779B94517B397)
}

/// One row of desk noise. Each half walks outward from the centre column so
/// the grain reads symmetric.
#[inline]
fn draw_desk_row(row_pixels: &mut [u32], width: usize, row: usize, height: usize) {
    let mask = theme::DESK_MASK;
    let alpha = theme::DESK_ALPHA;
    let ones = 0x00010101;
    let base = theme::DESK_BASE;
    let speckle_colour = theme::DESK_SPECKLE;

    let mut rng = row_seed(row, height);
    let mut colour = rng as u32 & mask | alpha;
    for x in width / 2..width {
        rng ^= rng.rotate_left(13).wrapping_add(12345678942);
        colour = desk_step(rng, colour, mask, ones, speckle_colour, alpha);
        row_pixels[x] = colour.wrapping_add(base) | alpha;
    }

    rng = row_seed(row, height);
    colour = rng as u32 & mask | alpha;
    for x in (0..width / 2).rev() {
        rng ^= rng.rotate_left(13).wrapping_sub(12345678942);
        colour = desk_step(rng, colour, mask, ones, speckle_colour, alpha);
        row_pixels[x] = colour.wrapping_add(base) | alpha;
    }
}

#[inline]
fn desk_step(rng: usize, colour: u32, mask: u32, ones: u32, speckle: u32, alpha: u32) -> u32 {
    if rng < usize::MAX / 256 {
        return rng as u32 >> 8 & speckle | alpha;
    }
    let adder = rng as u32 & ones;
    let subtractor = (rng >> 5) as u32 & ones;
    (colour.wrapping_add(adder) & mask).wrapping_sub(subtractor) & mask
}

/// Darken a band below and right of the page so it lifts off the desk.
pub fn draw_page_shadow(pixels: &mut [u32], width: usize, height: usize, page: PageRect, offset: usize) {
    let x0 = (page.x + offset).min(width);
    let y0 = (page.y + offset).min(height);
    let x1 = (page.x + page.width + offset).min(width);
    let y1 = (page.y + page.height + offset).min(height);
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    pixels[y0 * width..y1 * width]
        .par_chunks_mut(width)
        .for_each(|row| {
            for px in &mut row[x0..x1] {
                *px = over_opaque(*px, theme::PAGE_SHADOW);
            }
        });
}

/// Composite the page's straight-alpha pixels onto the window buffer over
/// the page colour.
pub fn blit_page(pixels: &mut [u32], width: usize, page: PageRect, page_pixels: &[u32], page_stride: usize) {
    if page.width == 0 || page_stride == 0 {
        return;
    }
    let start = page.y * width;
    let end = (page.y + page.height) * width;
    pixels[start..end]
        .par_chunks_mut(width)
        .zip(page_pixels.par_chunks(page_stride))
        .for_each(|(row, src)| {
            let dst = &mut row[page.x..page.x + page.width];
            for (px, s) in dst.iter_mut().zip(src) {
                *px = over_opaque(theme::PAGE_COLOUR, *s);
            }
        });
}
