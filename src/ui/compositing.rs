// Helper functions for u32 packed pixel manipulation
// All buffers are ARGB (0xAARRGGBB), straight (non-premultiplied) alpha

use crate::style::Rgba;

#[inline]
pub fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub fn unpack_argb(pixel: u32) -> (u8, u8, u8, u8) {
    let a = (pixel >> 24) as u8;
    let r = (pixel >> 16) as u8;
    let g = (pixel >> 8) as u8;
    let b = pixel as u8;
    (r, g, b, a)
}

/// Weighted mix of two opaque colours; result alpha forced to 0xFF.
/// Weights should sum to 255 or 256.
#[inline]
pub fn blend_rgb_only(bg_colour: u32, fg_colour: u32, weight_bg: u8, weight_fg: u8) -> u32 {
    let mut bg = bg_colour as u64;
    bg = (bg | (bg << 16)) & 0x0000FFFF0000FFFF;
    bg = (bg | (bg << 8)) & 0x00FF00FF00FF00FF;

    let mut fg = fg_colour as u64;
    fg = (fg | (fg << 16)) & 0x0000FFFF0000FFFF;
    fg = (fg | (fg << 8)) & 0x00FF00FF00FF00FF;

    let mut blended = bg * weight_bg as u64 + fg * weight_fg as u64;
    blended = (blended >> 8) & 0x00FF00FF00FF00FF;
    blended = (blended | (blended >> 8)) & 0x0000FFFF0000FFFF;
    blended = blended | (blended >> 16) | 0xFF000000;

    blended as u32
}

/// Source-over of a straight-alpha colour at partial coverage.
#[inline]
pub fn blend_over(dst: u32, src: Rgba, coverage: f32) -> u32 {
    let sa = (src.a * coverage).clamp(0., 1.);
    if sa <= 0. {
        return dst;
    }
    let (dr, dg, db, da) = unpack_argb(dst);
    let da = da as f32 / 255.;
    let out_a = sa + da * (1. - sa);
    if out_a <= 0. {
        return 0;
    }
    let mix = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1. - sa)) / out_a)
            .round()
            .clamp(0., 255.) as u8
    };
    pack_argb(
        mix(src.r, dr),
        mix(src.g, dg),
        mix(src.b, db),
        (out_a * 255.).round() as u8,
    )
}

/// Composite a straight-alpha ARGB pixel over an opaque one.
#[inline]
pub fn over_opaque(bg: u32, fg: u32) -> u32 {
    let alpha = (fg >> 24) as u8;
    match alpha {
        0 => bg,
        255 => fg,
        a => blend_rgb_only(bg, fg, 255 - a, a),
    }
}
