//! Software rasterizer behind the [`Surface`] contract.
//!
//! Paths are flattened to polygons, transformed to device space and scan
//! converted with four sub-scanlines per pixel under the nonzero winding
//! rule. Each fill produces a coverage mask which is multiplied by the clip
//! mask and composited row by row with rayon. Shadows reuse the same mask,
//! shifted and box blurred.

use rayon::prelude::*;
use std::path::Path as FsPath;
use std::sync::Arc;

use super::compositing::{blend_over, unpack_argb};
use super::pipeline::RenderError;
use super::surface::{FixedAdvance, FontSpec, Paint, Shadow, StateStack, Surface, TextMeasure};
use super::text_rasterizing::TextRenderer;
use crate::geometry::{Affine, Path, Point};
use crate::style::Rgba;

const SUBSAMPLES: usize = 4;

/// Fractional pixel coverage over a rectangular window of the surface.
/// Pixels outside the window have zero coverage.
#[derive(Clone, Debug, PartialEq)]
pub struct Coverage {
    x0: isize,
    y0: isize,
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Coverage {
    fn empty() -> Self {
        Self {
            x0: 0,
            y0: 0,
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    #[inline]
    pub fn at(&self, x: isize, y: isize) -> f32 {
        let (cx, cy) = (x - self.x0, y - self.y0);
        if cx < 0 || cy < 0 || cx >= self.width as isize || cy >= self.height as isize {
            0.
        } else {
            self.data[cy as usize * self.width + cx as usize]
        }
    }

    fn intersect(&self, other: &Coverage) -> Coverage {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = (self.x0 + self.width as isize).min(other.x0 + other.width as isize);
        let y1 = (self.y0 + self.height as isize).min(other.y0 + other.height as isize);
        if x1 <= x0 || y1 <= y0 {
            return Coverage::empty();
        }
        let (width, height) = ((x1 - x0) as usize, (y1 - y0) as usize);
        let mut data = vec![0.; width * height];
        for row in 0..height {
            for col in 0..width {
                let (x, y) = (x0 + col as isize, y0 + row as isize);
                data[row * width + col] = self.at(x, y) * other.at(x, y);
            }
        }
        Coverage {
            x0,
            y0,
            width,
            height,
            data,
        }
    }

    fn shifted(mut self, dx: isize, dy: isize) -> Coverage {
        self.x0 += dx;
        self.y0 += dy;
        self
    }

    /// Three box passes per axis approximate a gaussian with the canvas
    /// convention sigma = blur / 2.
    fn blurred(&self, blur: f32) -> Coverage {
        let sigma = blur / 2.;
        let radius = (((4. * sigma * sigma + 1.).sqrt() - 1.) / 2.).round() as usize;
        if radius == 0 || self.data.is_empty() {
            return self.clone();
        }
        let pad = radius * 3;
        let (width, height) = (self.width + pad * 2, self.height + pad * 2);
        let mut data = vec![0.; width * height];
        for row in 0..self.height {
            let src = &self.data[row * self.width..(row + 1) * self.width];
            let start = (row + pad) * width + pad;
            data[start..start + self.width].copy_from_slice(src);
        }
        for _ in 0..3 {
            box_pass(&mut data, width, height, radius, true);
            box_pass(&mut data, width, height, radius, false);
        }
        Coverage {
            x0: self.x0 - pad as isize,
            y0: self.y0 - pad as isize,
            width,
            height,
            data,
        }
    }
}

/// One running-sum box blur pass along rows (`horizontal`) or columns.
fn box_pass(data: &mut [f32], width: usize, height: usize, radius: usize, horizontal: bool) {
    let (lines, len) = if horizontal { (height, width) } else { (width, height) };
    let index = |line: usize, i: usize| {
        if horizontal {
            line * width + i
        } else {
            i * width + line
        }
    };
    let norm = 1. / (2 * radius + 1) as f32;
    let mut scratch = vec![0.; len];
    for line in 0..lines {
        let mut sum = 0.;
        for i in 0..=radius.min(len - 1) {
            sum += data[index(line, i)];
        }
        for (i, out) in scratch.iter_mut().enumerate() {
            *out = sum * norm;
            let add = i + radius + 1;
            if add < len {
                sum += data[index(line, add)];
            }
            if i >= radius {
                sum -= data[index(line, i - radius)];
            }
        }
        for (i, value) in scratch.iter().enumerate() {
            data[index(line, i)] = *value;
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    winding: i32,
}

/// Scan convert device-space polygons (implicitly closed) into coverage
/// clipped to the surface.
fn rasterize(polygons: &[Vec<Point>], surface_width: usize, surface_height: usize) -> Option<Coverage> {
    let mut edges = Vec::new();
    let mut lo = Point::new(f32::MAX, f32::MAX);
    let mut hi = Point::new(f32::MIN, f32::MIN);
    for poly in polygons.iter().filter(|p| p.len() >= 3) {
        for (i, a) in poly.iter().enumerate() {
            if !a.is_finite() {
                return None;
            }
            let b = poly[(i + 1) % poly.len()];
            lo = Point::new(lo.x.min(a.x), lo.y.min(a.y));
            hi = Point::new(hi.x.max(a.x), hi.y.max(a.y));
            if a.y != b.y {
                edges.push(Edge {
                    x0: a.x,
                    y0: a.y,
                    x1: b.x,
                    y1: b.y,
                    winding: if b.y > a.y { 1 } else { -1 },
                });
            }
        }
    }
    if edges.is_empty() {
        return None;
    }

    let x0 = lo.x.floor().max(0.) as usize;
    let y0 = lo.y.floor().max(0.) as usize;
    let x1 = (hi.x.ceil().max(0.) as usize).min(surface_width);
    let y1 = (hi.y.ceil().max(0.) as usize).min(surface_height);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    let (width, height) = (x1 - x0, y1 - y0);
    let mut data = vec![0f32; width * height];
    let weight = 1. / SUBSAMPLES as f32;

    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, cells)| {
            let mut crossings: Vec<(f32, i32)> = Vec::new();
            for s in 0..SUBSAMPLES {
                let sy = (y0 + row) as f32 + (s as f32 + 0.5) * weight;
                crossings.clear();
                for e in &edges {
                    if (e.y0 <= sy && e.y1 > sy) || (e.y1 <= sy && e.y0 > sy) {
                        let x = e.x0 + (sy - e.y0) * (e.x1 - e.x0) / (e.y1 - e.y0);
                        crossings.push((x - x0 as f32, e.winding));
                    }
                }
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));
                let mut winding = 0;
                let mut start = 0.;
                for (x, dir) in &crossings {
                    let was = winding;
                    winding += dir;
                    if was == 0 && winding != 0 {
                        start = *x;
                    } else if was != 0 && winding == 0 {
                        add_span(cells, start, *x, weight);
                    }
                }
            }
            for cell in cells.iter_mut() {
                *cell = cell.min(1.);
            }
        });

    Some(Coverage {
        x0: x0 as isize,
        y0: y0 as isize,
        width,
        height,
        data,
    })
}

/// Accumulate a horizontal span `[xa, xb)` with exact partial coverage at
/// both ends.
#[inline]
fn add_span(cells: &mut [f32], xa: f32, xb: f32, weight: f32) {
    let len = cells.len() as f32;
    let (xa, xb) = (xa.max(0.), xb.min(len));
    if xb <= xa {
        return;
    }
    let ia = xa.floor() as usize;
    let ib = xb.floor() as usize;
    if ia == ib {
        cells[ia] += (xb - xa) * weight;
        return;
    }
    cells[ia] += (ia as f32 + 1. - xa) * weight;
    for cell in &mut cells[ia + 1..ib] {
        *cell += weight;
    }
    if ib < cells.len() {
        cells[ib] += (xb - ib as f32) * weight;
    }
}

/// Split a polyline into the "on" runs of a dash pattern.
fn dash_polyline(points: &[Point], pattern: &[f32]) -> Vec<Vec<Point>> {
    let total: f32 = pattern.iter().sum();
    if pattern.is_empty() || total <= 0. || pattern.iter().any(|d| *d < 0.) {
        return vec![points.to_vec()];
    }
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut index = 0;
    let mut remaining = pattern[0];
    let mut on = true;
    if let Some(first) = points.first() {
        current.push(*first);
    }
    for pair in points.windows(2) {
        let (mut a, b) = (pair[0], pair[1]);
        let mut seg = a.distance(b);
        while seg > 0. {
            let step = seg.min(remaining);
            let t = step / seg;
            let p = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            if on {
                current.push(p);
            }
            seg -= step;
            remaining -= step;
            a = p;
            if remaining <= 0. {
                if on && current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
                on = !on;
                index = (index + 1) % pattern.len();
                remaining = pattern[index];
                if on {
                    current.push(a);
                }
            }
        }
    }
    if on && current.len() >= 2 {
        runs.push(current);
    }
    runs
}

/// One quad per segment, all with the same orientation so nonzero filling
/// unions them.
fn stroke_quads(polyline: &[Point], half_width: f32) -> Vec<Vec<Point>> {
    polyline
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let len = a.distance(b);
            if len <= 0. {
                return None;
            }
            let (nx, ny) = (-(b.y - a.y) / len * half_width, (b.x - a.x) / len * half_width);
            Some(vec![
                a.offset(nx, ny),
                b.offset(nx, ny),
                b.offset(-nx, -ny),
                a.offset(-nx, -ny),
            ])
        })
        .collect()
}

type ClipMask = Option<Arc<Coverage>>;

/// ARGB pixel buffer implementing [`Surface`].
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    state: StateStack<ClipMask>,
    text: Option<TextRenderer>,
    fallback_measure: FixedAdvance,
}

impl PixelSurface {
    /// Surface without a font system: text is measured with a fixed advance
    /// and not drawn.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
            state: StateStack::default(),
            text: None,
            fallback_measure: FixedAdvance::default(),
        }
    }

    pub fn with_text(width: usize, height: usize, text: TextRenderer) -> Self {
        Self {
            text: Some(text),
            ..Self::new(width, height)
        }
    }

    /// Reallocate to a new size. Pixels are cleared and the state stack reset.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height];
        self.state.reset();
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn depth(&self) -> usize {
        self.state.depth()
    }

    /// Straight-alpha RGBA bytes, row major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| {
                let (r, g, b, a) = unpack_argb(*px);
                [r, g, b, a]
            })
            .collect()
    }

    pub fn save_png(&self, path: impl AsRef<FsPath>) -> Result<(), RenderError> {
        let image = image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.to_rgba8())
            .ok_or(RenderError::BufferSize {
                width: self.width,
                height: self.height,
            })?;
        image.save(path)?;
        Ok(())
    }

    fn device_polygons(&self, path: &Path) -> Vec<Vec<Point>> {
        let m = self.state.current.transform;
        path.subpaths()
            .iter()
            .map(|sub| sub.points.iter().map(|p| m.apply(*p)).collect())
            .collect()
    }

    /// Draw the shadow (if any) then the shape, both through the clip.
    fn composite(&mut self, coverage: Coverage, paint: &Paint) {
        let clip = self.state.current.clip.clone();
        if let Some(shadow) = self.state.current.shadow {
            let alpha = shadow.colour.a * paint.mean_alpha();
            if alpha > 0. {
                let shadow_cov = coverage
                    .clone()
                    .shifted(shadow.offset_x.round() as isize, shadow.offset_y.round() as isize)
                    .blurred(shadow.blur);
                self.blend(&shadow_cov, &clip, &Paint::Solid(shadow.colour.with_alpha(alpha)), None);
            }
        }
        let inverse = self.state.current.transform.invert();
        self.blend(&coverage, &clip, paint, inverse);
    }

    fn blend(&mut self, coverage: &Coverage, clip: &ClipMask, paint: &Paint, inverse: Option<Affine>) {
        if !matches!(paint, Paint::Solid(_)) && inverse.is_none() {
            return;
        }
        let inverse = inverse.unwrap_or(Affine::IDENTITY);
        let xs = coverage.x0.max(0) as usize;
        let ys = coverage.y0.max(0) as usize;
        let xe = ((coverage.x0 + coverage.width as isize).max(0) as usize).min(self.width);
        let ye = ((coverage.y0 + coverage.height as isize).max(0) as usize).min(self.height);
        if xe <= xs || ye <= ys {
            return;
        }
        let width = self.width;
        self.pixels[ys * width..ye * width]
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(i, row)| {
                let y = (ys + i) as isize;
                for x in xs..xe {
                    let mut c = coverage.at(x as isize, y);
                    if c <= 0. {
                        continue;
                    }
                    if let Some(mask) = clip {
                        c *= mask.at(x as isize, y);
                        if c <= 0. {
                            continue;
                        }
                    }
                    let colour = match paint {
                        Paint::Solid(colour) => *colour,
                        _ => paint.colour_at(inverse.apply(Point::new(x as f32 + 0.5, y as f32 + 0.5))),
                    };
                    row[x] = blend_over(row[x], colour, c);
                }
            });
    }
}

impl TextMeasure for PixelSurface {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f32 {
        match &mut self.text {
            Some(renderer) => renderer.measure(text, font),
            None => self.fallback_measure.measure_text(text, font),
        }
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn clear(&mut self) {
        self.pixels.par_chunks_mut(self.width.max(1)).for_each(|row| row.fill(0));
        self.state.reset();
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.current.transform = self.state.current.transform.translate(dx, dy);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.current.transform = self.state.current.transform.scale(sx, sy);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.current.transform = self.state.current.transform.rotate(radians);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.current.shadow = shadow.filter(|s| s.colour.a > 0.);
    }

    fn set_line_dash(&mut self, dash: &[f32]) {
        self.state.current.line_dash = dash.to_vec();
    }

    fn clip(&mut self, path: &Path) {
        let coverage = rasterize(&self.device_polygons(path), self.width, self.height)
            .unwrap_or_else(Coverage::empty);
        let clip = match &self.state.current.clip {
            Some(existing) => coverage.intersect(existing),
            None => coverage,
        };
        self.state.current.clip = Some(Arc::new(clip));
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        if let Some(coverage) = rasterize(&self.device_polygons(path), self.width, self.height) {
            self.composite(coverage, paint);
        }
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, line_width: f32) {
        if !(line_width > 0.) {
            return;
        }
        let dash = self.state.current.line_dash.clone();
        let mut quads = Vec::new();
        for sub in path.subpaths() {
            let mut polyline = sub.points.clone();
            if sub.closed {
                if let Some(first) = sub.points.first() {
                    polyline.push(*first);
                }
            }
            for run in dash_polyline(&polyline, &dash) {
                quads.extend(stroke_quads(&run, line_width / 2.));
            }
        }
        let m = self.state.current.transform;
        let device: Vec<Vec<Point>> = quads
            .iter()
            .map(|quad| quad.iter().map(|p| m.apply(*p)).collect())
            .collect();
        if let Some(coverage) = rasterize(&device, self.width, self.height) {
            self.composite(coverage, paint);
        }
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &FontSpec, colour: Rgba) {
        let m = self.state.current.transform;
        let Some(inverse) = m.invert() else {
            return;
        };
        let scale = m.mean_scale().max(0.01);
        let Some(renderer) = &mut self.text else {
            return;
        };
        let Some(mask) = renderer.rasterize(text, font, scale) else {
            return;
        };

        // Mask rectangle in user space, then its device bounds
        let left = at.x + mask.left / scale;
        let top = at.y + mask.top / scale;
        let right = left + mask.width as f32 / scale;
        let bottom = top + mask.height as f32 / scale;
        let corners = [
            m.apply(Point::new(left, top)),
            m.apply(Point::new(right, top)),
            m.apply(Point::new(right, bottom)),
            m.apply(Point::new(left, bottom)),
        ];
        let min_x = corners.iter().map(|p| p.x).fold(f32::MAX, f32::min).floor().max(0.) as usize;
        let min_y = corners.iter().map(|p| p.y).fold(f32::MAX, f32::min).floor().max(0.) as usize;
        let max_x = (corners.iter().map(|p| p.x).fold(f32::MIN, f32::max).ceil().max(0.) as usize).min(self.width);
        let max_y = (corners.iter().map(|p| p.y).fold(f32::MIN, f32::max).ceil().max(0.) as usize).min(self.height);
        if max_x <= min_x || max_y <= min_y {
            return;
        }

        let (width, height) = (max_x - min_x, max_y - min_y);
        let mut data = vec![0f32; width * height];
        data.par_chunks_mut(width).enumerate().for_each(|(row, cells)| {
            for (col, cell) in cells.iter_mut().enumerate() {
                let device = Point::new((min_x + col) as f32 + 0.5, (min_y + row) as f32 + 0.5);
                let user = inverse.apply(device);
                *cell = mask.sample((user.x - at.x) * scale - mask.left, (user.y - at.y) * scale - mask.top);
            }
        });
        let coverage = Coverage {
            x0: min_x as isize,
            y0: min_y as isize,
            width,
            height,
            data,
        };
        self.composite(coverage, &Paint::Solid(colour));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::compositing::unpack_argb;

    fn alpha_at(surface: &PixelSurface, x: usize, y: usize) -> u8 {
        unpack_argb(surface.pixel(x, y).unwrap()).3
    }

    #[test]
    fn test_fill_rect_covers_interior_only() {
        let mut surface = PixelSurface::new(20, 20);
        surface.fill_rect(5., 5., 10., 10., &Paint::Solid(Rgba::opaque(255, 0, 0)));
        assert_eq!(surface.pixel(10, 10), Some(0xFFFF0000));
        assert_eq!(alpha_at(&surface, 2, 2), 0);
        assert_eq!(alpha_at(&surface, 15, 10), 0);
    }

    #[test]
    fn test_half_covered_pixel_gets_half_alpha() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(0.5, 0., 3., 4., &Paint::Solid(Rgba::BLACK));
        let a = alpha_at(&surface, 0, 1);
        assert!((120..=136).contains(&a), "{}", a);
    }

    #[test]
    fn test_clip_restricts_and_restore_releases() {
        let mut surface = PixelSurface::new(20, 20);
        surface.save();
        surface.clip(&Path::rect(0., 0., 10., 20.));
        surface.fill_rect(0., 0., 20., 20., &Paint::Solid(Rgba::BLACK));
        surface.restore();
        assert_eq!(alpha_at(&surface, 5, 5), 255);
        assert_eq!(alpha_at(&surface, 15, 5), 0);
        surface.fill_rect(0., 0., 20., 20., &Paint::Solid(Rgba::BLACK));
        assert_eq!(alpha_at(&surface, 15, 5), 255);
    }

    #[test]
    fn test_transform_moves_fill() {
        let mut surface = PixelSurface::new(20, 20);
        surface.translate(10., 10.);
        surface.fill_rect(-2., -2., 4., 4., &Paint::Solid(Rgba::BLACK));
        assert_eq!(alpha_at(&surface, 10, 10), 255);
        assert_eq!(alpha_at(&surface, 3, 3), 0);
    }

    #[test]
    fn test_dashed_stroke_leaves_gaps() {
        let mut surface = PixelSurface::new(40, 10);
        surface.set_line_dash(&[4., 4.]);
        let mut line = Path::new();
        line.move_to(Point::new(0., 5.));
        line.line_to(Point::new(40., 5.));
        surface.stroke_path(&line, &Paint::Solid(Rgba::BLACK), 2.);
        assert!(alpha_at(&surface, 2, 5) > 200);
        assert_eq!(alpha_at(&surface, 6, 5), 0);
        assert!(alpha_at(&surface, 10, 5) > 200);
    }

    #[test]
    fn test_shadow_spreads_beyond_shape() {
        let mut surface = PixelSurface::new(40, 40);
        surface.set_shadow(Some(Shadow {
            colour: Rgba::new(0, 0, 0, 0.5),
            blur: 4.,
            offset_x: 5.,
            offset_y: 0.,
        }));
        surface.fill_rect(10., 10., 10., 10., &Paint::Solid(Rgba::WHITE));
        assert!(alpha_at(&surface, 23, 15) > 0);
        assert_eq!(surface.pixel(15, 15), Some(0xFFFFFFFF));
    }

    #[test]
    fn test_gradient_follows_user_space() {
        let mut surface = PixelSurface::new(10, 1);
        let paint = Paint::linear(
            Point::new(0., 0.),
            Point::new(10., 0.),
            Rgba::opaque(0, 0, 0),
            Rgba::opaque(255, 255, 255),
        );
        surface.fill_rect(0., 0., 10., 1., &paint);
        let (left, _, _, _) = unpack_argb(surface.pixel(0, 0).unwrap());
        let (right, _, _, _) = unpack_argb(surface.pixel(9, 0).unwrap());
        assert!(left < 30 && right > 225);
    }

    #[test]
    fn test_clear_resets_pixels_and_state() {
        let mut surface = PixelSurface::new(8, 8);
        surface.fill_rect(0., 0., 8., 8., &Paint::Solid(Rgba::BLACK));
        surface.save();
        surface.clear();
        assert!(surface.pixels().iter().all(|px| *px == 0));
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_dash_pattern_splits_runs() {
        let runs = dash_polyline(&[Point::new(0., 0.), Point::new(20., 0.)], &[4., 4.]);
        assert_eq!(runs.len(), 3);
        assert!((runs[1][0].x - 8.).abs() < 1e-4);
    }

    #[test]
    fn test_png_export() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(0., 0., 4., 4., &Paint::Solid(Rgba::opaque(1, 2, 3)));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        surface.save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
