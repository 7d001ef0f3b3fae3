use super::palette::{CLASSICAL, DARK_TEXT, FONT_FAMILIES, INK_TEXT, PARCHMENT, SOFT};
use super::Colour;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default archetype weights: solid, gradient, textured, parchment.
pub const ARCHETYPE_WEIGHTS: [f32; 4] = [0.30, 0.20, 0.20, 0.30];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Solid,
    Gradient,
    Textured,
    Parchment,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Solid,
        Archetype::Gradient,
        Archetype::Textured,
        Archetype::Parchment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Solid => "solid",
            Archetype::Gradient => "gradient",
            Archetype::Textured => "textured",
            Archetype::Parchment => "parchment",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "archetype", rename_all = "lowercase")]
pub enum Background {
    Solid {
        colour: Colour,
    },
    Gradient {
        from: Colour,
        to: Colour,
        angle_deg: u16,
    },
    Textured {
        base: Colour,
        spot_density: u32,
        spot_contrast: f32,
    },
    Parchment {
        base: Colour,
        fiber_count: u32,
        fiber_intensity: f32,
        age_spots: u32,
        age_factor: f32,
    },
}

impl Background {
    pub fn archetype(&self) -> Archetype {
        match self {
            Background::Solid { .. } => Archetype::Solid,
            Background::Gradient { .. } => Archetype::Gradient,
            Background::Textured { .. } => Archetype::Textured,
            Background::Parchment { .. } => Archetype::Parchment,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub family: String,
    pub weight: FontWeight,
    pub italic: bool,
    /// Multiplier on the canvas base font size, in `[0.85, 1.15]`
    pub size_modifier: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub background: Background,
    pub text: Colour,
    pub font: FontStyle,
}

impl StyleDescriptor {
    pub fn archetype(&self) -> Archetype {
        self.background.archetype()
    }
}

/// Weighted random paper styles.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorStyleFactory {
    weights: [f32; 4],
}

impl Default for ColorStyleFactory {
    fn default() -> Self {
        Self {
            weights: ARCHETYPE_WEIGHTS,
        }
    }
}

impl ColorStyleFactory {
    /// Weights are taken in `Archetype::ALL` order and need not sum to one.
    pub fn with_weights(weights: [f32; 4]) -> Self {
        Self { weights }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> StyleDescriptor {
        let archetype = self.pick_archetype(rng);
        self.generate_with_archetype(rng, archetype)
    }

    /// Cumulative-distribution pick. Falls back to solid when the draw lands
    /// past the total (only possible with rounding or zero weights).
    pub fn pick_archetype<R: Rng + ?Sized>(&self, rng: &mut R) -> Archetype {
        let total: f32 = self.weights.iter().sum();
        let draw = rng.gen::<f32>() * total;
        let mut sum = 0.;
        for (archetype, weight) in Archetype::ALL.iter().zip(self.weights) {
            sum += weight;
            if draw < sum {
                return *archetype;
            }
        }
        Archetype::Solid
    }

    pub fn generate_with_archetype<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        archetype: Archetype,
    ) -> StyleDescriptor {
        let font = Self::font_style(rng);
        let background = match archetype {
            Archetype::Solid => Background::Solid {
                colour: Self::mixed_paper(rng),
            },
            Archetype::Gradient => Background::Gradient {
                from: Self::pick(rng, &SOFT),
                to: Self::pick(rng, &SOFT),
                angle_deg: rng.gen_range(0..360),
            },
            Archetype::Textured => Background::Textured {
                base: Self::mixed_paper(rng),
                spot_density: rng.gen_range(5..15),
                spot_contrast: rng.gen_range(0.05..0.15),
            },
            Archetype::Parchment => Background::Parchment {
                base: Self::pick(rng, &PARCHMENT),
                fiber_count: rng.gen_range(80..180),
                fiber_intensity: rng.gen_range(0.02..0.06),
                age_spots: rng.gen_range(10..40),
                age_factor: rng.gen_range(0.1..0.3),
            },
        };
        let text = match archetype {
            Archetype::Parchment => Self::pick(rng, &INK_TEXT),
            _ => {
                let index = rng.gen_range(0..DARK_TEXT.len() + INK_TEXT.len());
                DARK_TEXT.iter().chain(INK_TEXT.iter()).copied().nth(index).unwrap_or(INK_TEXT[0])
            }
        };
        StyleDescriptor {
            background,
            text,
            font,
        }
    }

    fn font_style<R: Rng + ?Sized>(rng: &mut R) -> FontStyle {
        FontStyle {
            family: FONT_FAMILIES
                .choose(rng)
                .copied()
                .unwrap_or("sans-serif")
                .to_string(),
            weight: if rng.gen_bool(0.5) {
                FontWeight::Normal
            } else {
                FontWeight::Bold
            },
            italic: rng.gen_bool(0.3),
            size_modifier: rng.gen_range(0.85..1.15),
        }
    }

    /// Soft and classical palettes pooled together.
    fn mixed_paper<R: Rng + ?Sized>(rng: &mut R) -> Colour {
        let index = rng.gen_range(0..SOFT.len() + CLASSICAL.len());
        SOFT.iter().chain(CLASSICAL.iter()).copied().nth(index).unwrap_or(SOFT[0])
    }

    fn pick<R: Rng + ?Sized>(rng: &mut R, palette: &[Colour]) -> Colour {
        palette.choose(rng).copied().unwrap_or(SOFT[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_archetype_frequencies_match_weights() {
        let factory = ColorStyleFactory::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut counts = [0usize; 4];
        let n = 10_000;
        for _ in 0..n {
            let archetype = factory.pick_archetype(&mut rng);
            counts[Archetype::ALL.iter().position(|a| *a == archetype).unwrap()] += 1;
        }
        for (count, weight) in counts.iter().zip(ARCHETYPE_WEIGHTS) {
            let observed = *count as f32 / n as f32;
            assert!((observed - weight).abs() < 0.03, "{} vs {}", observed, weight);
        }
    }

    #[test]
    fn test_parameters_within_ranges() {
        let factory = ColorStyleFactory::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..2000 {
            let style = factory.generate(&mut rng);
            assert!((0.85..=1.15).contains(&style.font.size_modifier));
            assert!(FONT_FAMILIES.contains(&style.font.family.as_str()));
            match style.background {
                Background::Solid { colour } => {
                    assert!(SOFT.contains(&colour) || CLASSICAL.contains(&colour))
                }
                Background::Gradient { from, to, angle_deg } => {
                    assert!(SOFT.contains(&from) && SOFT.contains(&to));
                    assert!(angle_deg < 360);
                }
                Background::Textured {
                    spot_density,
                    spot_contrast,
                    ..
                } => {
                    assert!((5..15).contains(&spot_density));
                    assert!((0.05..0.15).contains(&spot_contrast));
                }
                Background::Parchment {
                    base,
                    fiber_count,
                    fiber_intensity,
                    age_spots,
                    age_factor,
                } => {
                    assert!(PARCHMENT.contains(&base));
                    assert!((80..180).contains(&fiber_count));
                    assert!((0.02..0.06).contains(&fiber_intensity));
                    assert!((10..40).contains(&age_spots));
                    assert!((0.1..0.3).contains(&age_factor));
                    assert!(INK_TEXT.contains(&style.text));
                }
            }
        }
    }

    #[test]
    fn test_forced_archetype_is_respected() {
        let factory = ColorStyleFactory::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for archetype in Archetype::ALL {
            let style = factory.generate_with_archetype(&mut rng, archetype);
            assert_eq!(style.archetype(), archetype);
        }
    }

    #[test]
    fn test_zero_weights_collapse_to_single_archetype() {
        let factory = ColorStyleFactory::with_weights([0., 0., 1., 0.]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..100 {
            assert_eq!(factory.pick_archetype(&mut rng), Archetype::Textured);
        }
    }

    #[test]
    fn test_descriptor_serialises_with_archetype_tag() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let style = ColorStyleFactory::default().generate_with_archetype(&mut rng, Archetype::Parchment);
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["background"]["archetype"], "parchment");
        let back: StyleDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, style);
    }
}
