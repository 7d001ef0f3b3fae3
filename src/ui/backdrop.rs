//! Page textures drawn beneath every fragment.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::surface::{Paint, Shadow, Surface};
use crate::geometry::{Path, Point};
use crate::style::Rgba;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown backdrop {0:?} (expected plain, paper or ink)")]
pub struct UnknownBackdrop(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backdrop {
    #[default]
    Plain,
    Paper,
    Ink,
}

impl Backdrop {
    /// Cycle order used by the viewer's backdrop key.
    pub fn next(self) -> Self {
        match self {
            Backdrop::Plain => Backdrop::Paper,
            Backdrop::Paper => Backdrop::Ink,
            Backdrop::Ink => Backdrop::Plain,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backdrop::Plain => "plain",
            Backdrop::Paper => "paper",
            Backdrop::Ink => "ink",
        }
    }
}

impl fmt::Display for Backdrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backdrop {
    type Err = UnknownBackdrop;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Backdrop::Plain),
            "paper" => Ok(Backdrop::Paper),
            "ink" => Ok(Backdrop::Ink),
            _ => Err(UnknownBackdrop(s.to_string())),
        }
    }
}

// Paper grain
const PAPER_BASE: Rgba = Rgba::new(250, 248, 240, 0.03);
const PAPER_LINE: Rgba = Rgba::new(0, 0, 0, 0.02);
const PAPER_GRAIN: Rgba = Rgba::new(0, 0, 0, 0.03);
const PAPER_GRAIN_COUNT: usize = 15;
const PAPER_GRAIN_SIZE: f32 = 0.8;

// Ink splatter
const INK: Rgba = Rgba::new(0, 0, 0, 0.12);
const INK_SHADOW: Shadow = Shadow {
    colour: Rgba::new(0, 0, 0, 0.3),
    blur: 2.,
    offset_x: 0.,
    offset_y: 0.,
};
const INK_SPLATTERS: usize = 4;
const INK_SPLATTER_SIZE: f32 = 8.;
const INK_DROPLETS: usize = 8;
const INK_DROPLET_SIZE: f32 = 3.;

/// Draw `backdrop` over `(x, y, width, height)`. Leaves the surface state as
/// it found it.
pub fn draw_backdrop<R: Rng + ?Sized>(
    surface: &mut dyn Surface,
    rng: &mut R,
    backdrop: Backdrop,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) {
    match backdrop {
        Backdrop::Plain => {}
        Backdrop::Paper => {
            surface.save();
            paper_grain(surface, rng, x, y, width, height);
            surface.restore();
        }
        Backdrop::Ink => {
            surface.save();
            ink_splatter(surface, rng, x, y, width, height);
            surface.restore();
        }
    }
}

fn paper_grain<R: Rng + ?Sized>(surface: &mut dyn Surface, rng: &mut R, x: f32, y: f32, width: f32, height: f32) {
    surface.fill_rect(x, y, width, height, &Paint::Solid(PAPER_BASE));

    let mut lines = Path::new();
    let mut ly = y;
    while ly < y + height {
        lines.append(Path::rect(x, ly, width, 0.5));
        ly += 5.;
    }
    surface.fill_path(&lines, &Paint::Solid(PAPER_LINE));

    for _ in 0..PAPER_GRAIN_COUNT {
        let centre = Point::new(x + rng.gen::<f32>() * width, y + rng.gen::<f32>() * height);
        let radius = rng.gen::<f32>() * PAPER_GRAIN_SIZE + 0.2;
        surface.fill_path(&Path::circle(centre, radius), &Paint::Solid(PAPER_GRAIN));
    }
}

fn ink_splatter<R: Rng + ?Sized>(surface: &mut dyn Surface, rng: &mut R, x: f32, y: f32, width: f32, height: f32) {
    surface.set_shadow(Some(INK_SHADOW));
    let paint = Paint::Solid(INK);

    for _ in 0..INK_SPLATTERS {
        let c = Point::new(x + rng.gen::<f32>() * width, y + rng.gen::<f32>() * height);
        let size = 2. + rng.gen::<f32>() * INK_SPLATTER_SIZE;

        // Teardrop from two mirrored cubics
        let mut blot = Path::new();
        blot.move_to(c.offset(0., -size / 2.));
        blot.cubic_to(c.offset(size, -size / 2.), c.offset(size, size / 2.), c.offset(0., size));
        blot.cubic_to(c.offset(-size, size / 2.), c.offset(-size, -size / 2.), c.offset(0., -size / 2.));
        blot.close();
        surface.fill_path(&blot, &paint);

        for _ in 0..INK_DROPLETS {
            let angle = rng.gen::<f32>() * TAU;
            let distance = size + rng.gen::<f32>() * size * 2.;
            let drop = c.offset(angle.cos() * distance, angle.sin() * distance);
            let radius = rng.gen::<f32>() * INK_DROPLET_SIZE;
            if drop.x >= x && drop.x <= x + width && drop.y >= y && drop.y <= y + height {
                surface.fill_path(&Path::circle(drop, radius), &paint);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::recording::{DrawOp, RecordingSurface};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_cycle_visits_all() {
        let mut b = Backdrop::default();
        assert_eq!(b, Backdrop::Plain);
        b = b.next();
        assert_eq!(b, Backdrop::Paper);
        b = b.next();
        assert_eq!(b, Backdrop::Ink);
        assert_eq!(b.next(), Backdrop::Plain);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Paper".parse::<Backdrop>(), Ok(Backdrop::Paper));
        assert!("velvet".parse::<Backdrop>().is_err());
    }

    #[test]
    fn test_plain_draws_nothing() {
        let mut surface = RecordingSurface::new(100., 100.);
        let mut rng = Pcg64::seed_from_u64(0);
        draw_backdrop(&mut surface, &mut rng, Backdrop::Plain, 0., 0., 100., 100.);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_textures_are_balanced() {
        for backdrop in [Backdrop::Paper, Backdrop::Ink] {
            let mut surface = RecordingSurface::new(100., 100.);
            let mut rng = Pcg64::seed_from_u64(0);
            draw_backdrop(&mut surface, &mut rng, backdrop, 0., 0., 100., 100.);
            assert_eq!(surface.depth(), 0);
            assert!(surface.current_state().shadow.is_none());
            assert!(surface
                .ops()
                .iter()
                .any(|op| matches!(op, DrawOp::FillPath { .. })));
        }
    }
}
