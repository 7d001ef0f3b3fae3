//! Fixed palettes and font families sampled by the style factory.

use super::Colour;

/// Light, grey, beige, pastel, neutral and bright paper tones.
pub const SOFT: [Colour; 29] = [
    Colour::hsl(210., 40., 90.),
    Colour::hsl(120., 40., 90.),
    Colour::hsl(60., 40., 90.),
    Colour::hsl(180., 35., 85.),
    Colour::hsl(0., 30., 90.),
    Colour::hsl(30., 35., 90.),
    Colour::hsl(330., 30., 90.),
    Colour::hsl(300., 25., 90.),
    Colour::hsl(240., 25., 90.),
    Colour::hsl(90., 30., 90.),
    // greys
    Colour::hsl(0., 0., 95.),
    Colour::hsl(0., 0., 90.),
    // beige and sand
    Colour::hsl(40., 30., 90.),
    Colour::hsl(30., 25., 85.),
    Colour::hsl(35., 30., 80.),
    // pastels
    Colour::hsl(210., 25., 85.),
    Colour::hsl(150., 25., 85.),
    Colour::hsl(70., 25., 85.),
    Colour::hsl(10., 25., 85.),
    Colour::hsl(350., 25., 85.),
    Colour::hsl(280., 20., 85.),
    // neutrals
    Colour::hsl(30., 20., 80.),
    Colour::hsl(40., 20., 85.),
    Colour::hsl(60., 15., 85.),
    // brights
    Colour::hsl(45., 100., 90.),
    Colour::hsl(200., 100., 85.),
    Colour::hsl(160., 100., 88.),
    Colour::hsl(340., 100., 88.),
    Colour::hsl(50., 100., 90.),
];

/// Traditional Chinese pigment approximations.
pub const CLASSICAL: [Colour; 31] = [
    Colour::hsl(30., 25., 90.),  // ivory
    Colour::hsl(48., 38., 89.),  // rice yellow
    Colour::hsl(40., 80., 90.),  // apricot
    Colour::hsl(0., 0., 90.),    // silver white
    Colour::hsl(42., 37., 85.),  // bronze
    Colour::hsl(26., 30., 75.),  // camel
    Colour::hsl(3., 27., 87.),   // coral
    Colour::hsl(27., 80., 85.),  // tangerine
    Colour::hsl(358., 30., 80.), // rouge
    Colour::hsl(340., 40., 80.),
    Colour::hsl(350., 67., 84.), // magenta
    Colour::hsl(12., 85., 77.),  // vermilion
    Colour::hsl(8., 83., 74.),
    Colour::hsl(5., 73., 66.),   // cinnabar
    Colour::hsl(0., 72., 65.),   // madder
    Colour::hsl(24., 57., 82.),
    Colour::hsl(15., 27., 60.),  // chestnut
    Colour::hsl(0., 0., 85.),
    Colour::hsl(14., 75., 70.),  // brick
    Colour::hsl(0., 60., 65.),
    Colour::hsl(0., 76., 40.),   // ochre red
    Colour::hsl(45., 100., 93.), // gosling yellow
    Colour::hsl(30., 100., 70.),
    Colour::hsl(28., 80., 75.),
    Colour::hsl(46., 90., 85.),
    Colour::hsl(49., 80., 82.),  // primrose
    Colour::hsl(52., 95., 80.),
    Colour::hsl(32., 98., 83.),
    Colour::hsl(52., 93., 78.),  // red gold
    Colour::hsl(51., 100., 70.),
    Colour::hsl(45., 90., 60.),  // realgar
];

/// Aged rice-paper tones.
pub const PARCHMENT: [Colour; 14] = [
    Colour::hsl(40., 30., 92.),
    Colour::hsl(35., 35., 90.),
    Colour::hsl(30., 25., 88.),
    Colour::hsl(45., 20., 87.),
    Colour::hsl(42., 28., 85.),
    Colour::hsl(38., 22., 95.),
    Colour::hsl(34., 30., 94.),
    Colour::hsl(33., 35., 93.),
    Colour::hsl(32., 25., 92.),
    Colour::hsl(36., 20., 91.),
    Colour::hsl(39., 30., 90.),
    Colour::hsl(37., 35., 89.),
    Colour::hsl(40., 25., 91.),
    Colour::hsl(43., 15., 93.),
];

pub const DARK_TEXT: [Colour; 5] = [
    Colour::hsl(0., 0., 10.),
    Colour::hsl(0., 0., 15.),
    Colour::hsl(0., 0., 20.),
    Colour::hsl(25., 30., 20.),
    Colour::hsl(220., 20., 25.),
];

/// Ink tones, including seal red. Parchment notes only use these.
pub const INK_TEXT: [Colour; 8] = [
    Colour::hsl(0., 0., 10.),
    Colour::hsl(0., 0., 15.),
    Colour::hsl(25., 25., 20.),
    Colour::hsl(200., 15., 20.),
    Colour::hsl(280., 10., 25.),
    Colour::hsl(0., 25., 25.),
    Colour::hsl(10., 65., 30.),
    Colour::hsl(0., 70., 40.),
];

/// Families tried for fragment text. Unknown names fall back to the system
/// default when shaped.
pub const FONT_FAMILIES: [&str; 18] = [
    "Heiti SC",
    "Songti SC",
    "Kaiti SC",
    "PingFang SC",
    "Hiragino Sans GB",
    "Microsoft YaHei",
    "Noto Sans SC",
    "Noto Serif SC",
    "ZCOOL XiaoWei",
    "ZCOOL QingKe HuangYou",
    "ZCOOL KuaiLe",
    "Ma Shan Zheng",
    "Zhi Mang Xing",
    "Long Cang",
    "Liu Jian Mao Cao",
    "LXGW WenKai",
    "sans-serif",
    "serif",
];
