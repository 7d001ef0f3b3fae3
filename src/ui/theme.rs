// Global theme colours and constants
// Page drawing colours are straight-alpha Rgba; desk colours are packed ARGB u32

use super::surface::Shadow;
use crate::style::Rgba;

// Page geometry
pub const PAGE_ASPECT: f32 = 210. / 297.; // A4 portrait
pub const PAGE_FILL: f32 = 0.9; // Fraction of the container the page occupies
pub const GRID_DIVISIONS: f32 = 40.; // Grid spacing = page width / 40
pub const GRID_LINE: Rgba = Rgba::new(0, 0, 0, 0.1);
pub const GRID_LINE_WIDTH: f32 = 0.5;

// Note layout
pub const FONT_SMALL: f32 = 18.;
pub const FONT_LARGE: f32 = 30.;
pub const HIT_HEIGHT_SMALL: f32 = 30.;
pub const HIT_HEIGHT_LARGE: f32 = 50.;
pub const NOTE_PADDING: f32 = 15.;
pub const TEXT_HEIGHT_RATIO: f32 = 0.8; // Text box height as a fraction of font size

// Note shadow and overlays
pub const NOTE_SHADOW: Shadow = Shadow {
    colour: Rgba::new(0, 0, 0, 0.2),
    blur: 8.,
    offset_x: 3.,
    offset_y: 3.,
};
pub const PAPER_TINT: Rgba = Rgba::new(250, 248, 240, 0.03);
pub const LIGHT_HIGHLIGHT: Rgba = Rgba::new(255, 255, 255, 0.1);
pub const LIGHT_SHADE: Rgba = Rgba::new(0, 0, 0, 0.05);
pub const INNER_EDGE: Rgba = Rgba::new(0, 0, 0, 0.03);
pub const INNER_EDGE_SCALE: f32 = 0.99;
pub const INNER_EDGE_WIDTH: f32 = 0.5;
pub const RULE_LINE: Rgba = Rgba::new(0, 0, 0, 0.02);
pub const RULE_SPACING: f32 = 5.;
pub const RULE_HEIGHT: f32 = 0.5;
pub const GRAIN: Rgba = Rgba::new(0, 0, 0, 0.01);
pub const GRAIN_COUNT: usize = 15;
pub const BLEMISH: Rgba = Rgba::new(0, 0, 0, 0.02);
pub const BLEMISH_CHANCE: f64 = 0.3;
pub const WRINKLE: Rgba = Rgba::new(255, 255, 255, 0.03);
pub const WRINKLE_WIDTH: f32 = 0.7;

// Selection
pub const SELECTION_GLOW: Shadow = Shadow {
    colour: Rgba::new(255, 215, 0, 0.4),
    blur: 10.,
    offset_x: 0.,
    offset_y: 0.,
};
pub const SELECTION_OUTLINE: Rgba = Rgba::new(255, 215, 0, 0.8);
pub const SELECTION_OUTLINE_WIDTH: f32 = 2.;
pub const SELECTION_OUTLINE_SCALE: f32 = 1.1;
pub const SELECTION_DASH: [f32; 2] = [4., 4.];

// Page and desk behind it (viewer only)
pub const PAGE_COLOUR: u32 = 0xFF_FB_F8_F1;
pub const PAGE_SHADOW: u32 = 0x40_00_00_00;
pub const DESK_BASE: u32 = 0xFF_2A_20_18; // Base warm brown for the desk
pub const DESK_MASK: u32 = 0xFF_0F_0B_07; // Channel mask for noise generation
pub const DESK_ALPHA: u32 = 0xFF_00_00_00; // Alpha channel (opaque)
pub const DESK_SPECKLE: u32 = 0x00_1F_17_0F; // Speckle highlight colour (no alpha)

// Viewer window
pub const WINDOW_TITLE: &str = "papercut";
pub const WINDOW_WIDTH: u32 = 820;
pub const WINDOW_HEIGHT: u32 = 1080;
