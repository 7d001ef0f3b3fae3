//! Style preview sheet: five sample tiles per paper archetype, one row per
//! archetype, with an explicit regenerate action.
//!
//! This is the only place a look's style is ever replaced after creation.

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_pcg::Pcg64;

use crate::geometry::{Path, Point};
use crate::style::Archetype;
use crate::types::{FragmentId, FragmentLook, LookFactory, LookSeed};
use crate::ui::background::draw_background;
use crate::ui::surface::{FontSpec, Surface};

pub const SAMPLES_PER_ARCHETYPE: usize = 5;
pub const TILE_WIDTH: f32 = 200.;
pub const TILE_HEIGHT: f32 = 120.;
pub const TILE_GAP: f32 = 10.;
pub const PREVIEW_TEXT: &str = "诗词美学";
pub const PREVIEW_FONT_PX: f32 = 24.;

#[derive(Clone, Debug, PartialEq)]
pub struct PreviewSample {
    /// `<archetype>-<n>`
    pub label: String,
    pub look: FragmentLook,
}

impl PreviewSample {
    pub fn archetype(&self) -> Archetype {
        self.look.archetype()
    }
}

pub struct PreviewSheet {
    looks: LookFactory,
    samples: Vec<PreviewSample>,
    restyle_rng: ChaCha8Rng,
    texture_rng: Pcg64,
    generation: u32,
}

impl PreviewSheet {
    pub fn new(seed: u64) -> Self {
        Self::with_looks(seed, LookFactory::default())
    }

    pub fn with_looks(seed: u64, looks: LookFactory) -> Self {
        let mut samples = Vec::with_capacity(Archetype::ALL.len() * SAMPLES_PER_ARCHETYPE);
        for (row, archetype) in Archetype::ALL.into_iter().enumerate() {
            for n in 0..SAMPLES_PER_ARCHETYPE {
                let index = (row * SAMPLES_PER_ARCHETYPE + n) as u64;
                let look_seed = LookSeed::derive(seed, FragmentId::new(index), PREVIEW_TEXT);
                samples.push(PreviewSample {
                    label: format!("{}-{}", archetype.name(), n),
                    look: looks.look_with_archetype(look_seed, archetype),
                });
            }
        }
        Self {
            looks,
            samples,
            restyle_rng: ChaCha8Rng::seed_from_u64(seed),
            texture_rng: Pcg64::seed_from_u64(seed),
            generation: 0,
        }
    }

    pub fn samples(&self) -> &[PreviewSample] {
        &self.samples
    }

    /// Number of regenerate actions applied so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Pixel size of the whole sheet.
    pub fn size() -> (f32, f32) {
        let cols = SAMPLES_PER_ARCHETYPE as f32;
        let rows = Archetype::ALL.len() as f32;
        (
            cols * TILE_WIDTH + (cols + 1.) * TILE_GAP,
            rows * TILE_HEIGHT + (rows + 1.) * TILE_GAP,
        )
    }

    /// Replace every sample's style with a fresh one of the same archetype.
    pub fn regenerate(&mut self) {
        for sample in &mut self.samples {
            sample.look = self.looks.restyle(&sample.look, &mut self.restyle_rng);
        }
        self.generation += 1;
        debug!("Preview styles regenerated ({})", self.generation);
    }

    pub fn tile_origin(index: usize) -> Point {
        let col = (index % SAMPLES_PER_ARCHETYPE) as f32;
        let row = (index / SAMPLES_PER_ARCHETYPE) as f32;
        Point::new(
            TILE_GAP + col * (TILE_WIDTH + TILE_GAP),
            TILE_GAP + row * (TILE_HEIGHT + TILE_GAP),
        )
    }

    pub fn render(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        for (index, sample) in self.samples.iter().enumerate() {
            let origin = Self::tile_origin(index);
            let style = sample.look.style();

            surface.save();
            surface.clip(&Path::rect(origin.x, origin.y, TILE_WIDTH, TILE_HEIGHT));
            draw_background(surface, &mut self.texture_rng, origin.x, origin.y, TILE_WIDTH, TILE_HEIGHT, style);
            let font = FontSpec::from_style(&style.font, PREVIEW_FONT_PX * style.font.size_modifier);
            let centre = origin.offset(TILE_WIDTH / 2., TILE_HEIGHT / 2.);
            surface.fill_text(PREVIEW_TEXT, centre, &font, style.text.to_rgba());
            surface.restore();
        }
    }
}
