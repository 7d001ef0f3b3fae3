use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::LookSeed;
use crate::geometry::{EdgePolygon, EdgeShapeGenerator, LiftCurveGenerator, LiftData};
use crate::style::{Archetype, ColorStyleFactory, StyleDescriptor};

/// Everything generated once per fragment: paper style, torn outline, lift
/// record and the angle of the raking light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FragmentLook {
    seed: LookSeed,
    style: StyleDescriptor,
    edge: EdgePolygon,
    lift: LiftData,
    /// Radians in `[0, 2π)`
    light_angle: f32,
}

impl FragmentLook {
    pub fn seed(&self) -> LookSeed {
        self.seed
    }

    pub fn style(&self) -> &StyleDescriptor {
        &self.style
    }

    pub fn edge(&self) -> &EdgePolygon {
        &self.edge
    }

    pub fn lift(&self) -> &LiftData {
        &self.lift
    }

    pub fn light_angle(&self) -> f32 {
        self.light_angle
    }

    pub fn archetype(&self) -> Archetype {
        self.style.archetype()
    }
}

/// Bundles the three generators so callers inject one dependency.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LookFactory {
    pub style: ColorStyleFactory,
    pub edge: EdgeShapeGenerator,
    pub lift: LiftCurveGenerator,
}

impl LookFactory {
    pub fn look_for(&self, seed: LookSeed) -> FragmentLook {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.as_u64());
        let edge = self.edge.generate(&mut rng);
        let lift = self.lift.generate(&mut rng);
        let light_angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let style = self.style.generate(&mut rng);
        FragmentLook {
            seed,
            style,
            edge,
            lift,
            light_angle,
        }
    }

    /// Same seed-derived outline and lift, archetype forced.
    pub fn look_with_archetype(&self, seed: LookSeed, archetype: Archetype) -> FragmentLook {
        let look = self.look_for(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed.as_u64() ^ 0x5eed_57e1);
        FragmentLook {
            style: self.style.generate_with_archetype(&mut rng, archetype),
            ..look
        }
    }

    /// Fresh style of the same archetype. Only the preview sheet's explicit
    /// regenerate action calls this; placed fragments never change look.
    pub fn restyle<R: Rng + ?Sized>(&self, look: &FragmentLook, rng: &mut R) -> FragmentLook {
        FragmentLook {
            style: self.style.generate_with_archetype(rng, look.archetype()),
            ..look.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_look() {
        let factory = LookFactory::default();
        let seed = LookSeed::from_u64(42);
        assert_eq!(factory.look_for(seed), factory.look_for(seed));
    }

    #[test]
    fn test_light_angle_in_range() {
        let factory = LookFactory::default();
        for i in 0..200 {
            let angle = factory.look_for(LookSeed::from_u64(i)).light_angle();
            assert!((0.0..std::f32::consts::TAU).contains(&angle));
        }
    }

    #[test]
    fn test_forced_archetype_keeps_outline() {
        let factory = LookFactory::default();
        let seed = LookSeed::from_u64(77);
        let base = factory.look_for(seed);
        for archetype in Archetype::ALL {
            let forced = factory.look_with_archetype(seed, archetype);
            assert_eq!(forced.archetype(), archetype);
            assert_eq!(forced.edge(), base.edge());
            assert_eq!(forced.lift(), base.lift());
        }
    }

    #[test]
    fn test_restyle_keeps_archetype_and_geometry() {
        let factory = LookFactory::default();
        let look = factory.look_for(LookSeed::from_u64(5));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let restyled = factory.restyle(&look, &mut rng);
        assert_eq!(restyled.archetype(), look.archetype());
        assert_eq!(restyled.edge(), look.edge());
        assert_eq!(restyled.light_angle(), look.light_angle());
    }
}
