//! Paper styles: colours, palettes and the randomised style factory.

pub mod colour;
pub mod factory;
pub mod palette;

pub use colour::{Colour, ColourError, Hsl, Rgba};
pub use factory::{
    Archetype, Background, ColorStyleFactory, FontStyle, FontWeight, StyleDescriptor,
    ARCHETYPE_WEIGHTS,
};
