use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, SwashCache, SwashContent, Weight,
};

use super::surface::{FontSpec, TextMeasure};

/// Alpha mask of a shaped run, positioned relative to the run's centre.
///
/// `left`/`top` give the mask's top-left corner in raster pixels, measured
/// from the point the text is centred on.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
    pub left: f32,
    pub top: f32,
}

impl GlyphMask {
    /// Bilinear alpha lookup in mask pixel coordinates, 0.0..=1.0.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let (fx, fy) = (x - 0.5, y - 0.5);
        let (x0, y0) = (fx.floor(), fy.floor());
        let (tx, ty) = (fx - x0, fy - y0);
        let texel = |ix: f32, iy: f32| -> f32 {
            if ix < 0. || iy < 0. || ix >= self.width as f32 || iy >= self.height as f32 {
                0.
            } else {
                self.data[iy as usize * self.width + ix as usize] as f32 / 255.
            }
        };
        let top = texel(x0, y0) * (1. - tx) + texel(x0 + 1., y0) * tx;
        let bottom = texel(x0, y0 + 1.) * (1. - tx) + texel(x0 + 1., y0 + 1.) * tx;
        top * (1. - ty) + bottom * ty
    }
}

pub struct TextRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic CSS families map onto fontdb's generic slots; anything else is a
/// family name looked up in the system database.
fn family(name: &str) -> Family<'_> {
    match name {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        other => Family::Name(other),
    }
}

impl TextRenderer {
    /// Loads the system font database. Slow; create once and keep.
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Adds font files (TTF/OTF bytes) on top of the system fonts.
    pub fn with_font_data(fonts: impl IntoIterator<Item = Vec<u8>>) -> Self {
        let mut renderer = Self::new();
        let db = renderer.font_system.db_mut();
        for data in fonts {
            db.load_font_data(data);
        }
        renderer
    }

    fn shape(&mut self, text: &str, font: &FontSpec, size: f32) -> Buffer {
        let attrs = Attrs::new()
            .family(family(&font.family))
            .weight(Weight(font.weight))
            .style(if font.italic { Style::Italic } else { Style::Normal });

        let metrics = Metrics::relative(size, 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Width and line height of the first layout run.
    fn extent(buffer: &Buffer) -> (f32, f32) {
        if let Some(run) = buffer.layout_runs().next() {
            let mut min_x = f32::MAX;
            let mut max_x = f32::MIN;

            for glyph in run.glyphs {
                min_x = min_x.min(glyph.x);
                max_x = max_x.max(glyph.x + glyph.w);
            }

            if run.glyphs.is_empty() {
                (0., run.line_height)
            } else {
                (max_x - min_x, run.line_height)
            }
        } else {
            (0., 0.)
        }
    }

    pub fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        let buffer = self.shape(text, font, font.size);
        Self::extent(&buffer).0
    }

    /// Rasterize `text` at `font.size * scale` pixels, centred on the origin.
    pub fn rasterize(&mut self, text: &str, font: &FontSpec, scale: f32) -> Option<GlyphMask> {
        let size = font.size * scale;
        if !(size.is_finite() && size > 0.) {
            return None;
        }
        let buffer = self.shape(text, font, size);
        let (text_width, text_height) = Self::extent(&buffer);
        let (offset_x, offset_y) = (-text_width / 2., -text_height / 2.);

        // (x, y, width, height, alpha) per glyph, relative to the centre
        let mut glyphs: Vec<(i32, i32, usize, usize, Vec<u8>)> = Vec::new();
        for run in buffer.layout_runs() {
            let baseline_offset = run.line_y;

            for glyph in run.glyphs {
                let physical_glyph = glyph.physical((offset_x, offset_y), 1.);

                if let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical_glyph.cache_key)
                {
                    let glyph_x = physical_glyph.x + image.placement.left;
                    let glyph_y = physical_glyph.y + baseline_offset as i32 - image.placement.top;

                    let glyph_width = image.placement.width as usize;
                    let glyph_height = image.placement.height as usize;
                    let alpha: Vec<u8> = match image.content {
                        SwashContent::Mask => image.data.clone(),
                        SwashContent::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
                        SwashContent::SubpixelMask => image
                            .data
                            .chunks_exact(4)
                            .map(|px| px[0].max(px[1]).max(px[2]))
                            .collect(),
                    };
                    if alpha.len() >= glyph_width * glyph_height && glyph_width > 0 {
                        glyphs.push((glyph_x, glyph_y, glyph_width, glyph_height, alpha));
                    }
                }
            }
        }

        let min_x = glyphs.iter().map(|g| g.0).min()?;
        let min_y = glyphs.iter().map(|g| g.1).min()?;
        let max_x = glyphs.iter().map(|g| g.0 + g.2 as i32).max()?;
        let max_y = glyphs.iter().map(|g| g.1 + g.3 as i32).max()?;
        let width = (max_x - min_x) as usize;
        let height = (max_y - min_y) as usize;

        let mut data = vec![0u8; width * height];
        for (gx, gy, gw, gh, alpha) in &glyphs {
            for cy in 0..*gh {
                let row = (*gy - min_y) as usize + cy;
                for cx in 0..*gw {
                    let col = (*gx - min_x) as usize + cx;
                    let idx = row * width + col;
                    data[idx] = data[idx].max(alpha[cy * gw + cx]);
                }
            }
        }

        Some(GlyphMask {
            width,
            height,
            data,
            left: min_x as f32,
            top: min_y as f32,
        })
    }
}

impl TextMeasure for TextRenderer {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f32 {
        self.measure(text, font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_families_map_to_slots() {
        assert_eq!(family("serif"), Family::Serif);
        assert_eq!(family("sans-serif"), Family::SansSerif);
        assert_eq!(family("Kaiti SC"), Family::Name("Kaiti SC"));
    }

    #[test]
    fn test_mask_sample_interpolates() {
        let mask = GlyphMask {
            width: 2,
            height: 1,
            data: vec![0, 255],
            left: 0.,
            top: 0.,
        };
        assert_eq!(mask.sample(1.5, 0.5), 1.);
        assert!((mask.sample(1.0, 0.5) - 0.5).abs() < 1e-4);
        assert_eq!(mask.sample(10., 10.), 0.);
    }
}
