//! CSS-style colour values.
//!
//! Palettes are authored as HSL triples and must be decomposable back into
//! hue, saturation and lightness for speckle variation. Colours that did not
//! come from HSL (hex or rgb strings) refuse decomposition instead of
//! guessing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColourError {
    #[error("unrecognised colour string {0:?}")]
    Unrecognised(String),

    #[error("colour {0} has no hue/saturation/lightness form")]
    NotHsl(String),
}

static HSL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*hsla?\(\s*(-?[\d.]+)\s*,\s*([\d.]+)%\s*,\s*([\d.]+)%\s*(?:,\s*([\d.]+)\s*)?\)\s*$",
    )
    .expect("valid hsl regex")
});

static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*([\d.]+)\s*)?\)\s*$")
        .expect("valid rgb regex")
});

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#([0-9a-fA-F]{6})\s*$").expect("valid hex regex"));

/// Straight (non-premultiplied) 8-bit colour with float alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation on premultiplied channels, so fading towards a
    /// transparent stop does not darken.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0., 1.);
        let a = self.a + (other.a - self.a) * t;
        if a <= 0. {
            return Rgba::TRANSPARENT;
        }
        let channel = |x: u8, y: u8| {
            let pre = x as f32 * self.a + (y as f32 * other.a - x as f32 * self.a) * t;
            (pre / a).round().clamp(0., 255.) as u8
        };
        Rgba::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            a,
        )
    }
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    pub fn to_rgba(self, alpha: f32) -> Rgba {
        let h = self.h.rem_euclid(360.);
        let s = (self.s / 100.).clamp(0., 1.);
        let l = (self.l / 100.).clamp(0., 1.);
        let c = (1. - (2. * l - 1.).abs()) * s;
        let x = c * (1. - ((h / 60.) % 2. - 1.).abs());
        let m = l - c / 2.;
        let (r, g, b) = match (h / 60.) as u32 {
            0 => (c, x, 0.),
            1 => (x, c, 0.),
            2 => (0., c, x),
            3 => (0., x, c),
            4 => (x, 0., c),
            _ => (c, 0., x),
        };
        let to_u8 = |v: f32| ((v + m) * 255.).round().clamp(0., 255.) as u8;
        Rgba::new(to_u8(r), to_u8(g), to_u8(b), alpha.clamp(0., 1.))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Colour {
    Hsl { hsl: Hsl, alpha: f32 },
    Rgb(Rgba),
}

impl Colour {
    pub const fn hsl(h: f32, s: f32, l: f32) -> Self {
        Colour::Hsl {
            hsl: Hsl::new(h, s, l),
            alpha: 1.,
        }
    }

    pub const fn hsla(h: f32, s: f32, l: f32, alpha: f32) -> Self {
        Colour::Hsl {
            hsl: Hsl::new(h, s, l),
            alpha,
        }
    }

    pub fn to_rgba(&self) -> Rgba {
        match self {
            Colour::Hsl { hsl, alpha } => hsl.to_rgba(*alpha),
            Colour::Rgb(rgba) => *rgba,
        }
    }

    /// Hue/saturation/lightness of an HSL-authored colour.
    pub fn decompose(&self) -> Result<Hsl, ColourError> {
        match self {
            Colour::Hsl { hsl, .. } => Ok(*hsl),
            Colour::Rgb(_) => Err(ColourError::NotHsl(self.to_string())),
        }
    }
}

impl From<Hsl> for Colour {
    fn from(hsl: Hsl) -> Self {
        Colour::Hsl { hsl, alpha: 1. }
    }
}

impl From<Colour> for Rgba {
    fn from(colour: Colour) -> Self {
        colour.to_rgba()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colour::Hsl { hsl, alpha } if *alpha >= 1. => {
                write!(f, "hsl({}, {}%, {}%)", hsl.h, hsl.s, hsl.l)
            }
            Colour::Hsl { hsl, alpha } => {
                write!(f, "hsla({}, {}%, {}%, {})", hsl.h, hsl.s, hsl.l, alpha)
            }
            Colour::Rgb(c) if c.a >= 1. => write!(f, "#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
            Colour::Rgb(c) => write!(f, "rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a),
        }
    }
}

impl FromStr for Colour {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ColourError::Unrecognised(s.to_string());
        let num = |m: Option<regex::Match<'_>>| -> Result<Option<f32>, ColourError> {
            m.map(|m| m.as_str().parse::<f32>().map_err(|_| bad()))
                .transpose()
        };

        if let Some(caps) = HSL_RE.captures(s) {
            let h = num(caps.get(1))?.ok_or_else(bad)?;
            let sat = num(caps.get(2))?.ok_or_else(bad)?;
            let l = num(caps.get(3))?.ok_or_else(bad)?;
            let alpha = num(caps.get(4))?.unwrap_or(1.);
            return Ok(Colour::hsla(h, sat, l, alpha));
        }
        if let Some(caps) = RGB_RE.captures(s) {
            let channel = |i: usize| -> Result<u8, ColourError> {
                caps.get(i)
                    .and_then(|m| m.as_str().parse::<u8>().ok())
                    .ok_or_else(bad)
            };
            let alpha = num(caps.get(4))?.unwrap_or(1.);
            return Ok(Colour::Rgb(Rgba::new(
                channel(1)?,
                channel(2)?,
                channel(3)?,
                alpha,
            )));
        }
        if let Some(caps) = HEX_RE.captures(s) {
            let value = u32::from_str_radix(&caps[1], 16).map_err(|_| bad())?;
            return Ok(Colour::Rgb(Rgba::opaque(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )));
        }
        Err(bad())
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_string()
    }
}
