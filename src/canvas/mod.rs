//! Canvas view state: the placed fragments plus everything the renderer and
//! gesture handling need to agree on.
//!
//! All mutation goes through [`Canvas::apply`] (see [`command`]); the getters
//! here are read only. Every accepted change raises the dirty flag so the
//! host repaints once per transition.

pub mod command;
pub mod transform;

pub use command::Command;
pub use hit_test::hit_test;
pub use transform::{
    pinch_scale, round_half_up, snap_rotation, NudgeDirection, MAX_SCALE, MIN_SCALE, NUDGE_STEP,
    ROTATION_STEP_DEG,
};

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::Settings;
use crate::geometry::Point;
use crate::types::{generate_session_seed, Fragment, FragmentDescriptor, FragmentId, LookFactory, LookSeed};
use crate::ui::backdrop::Backdrop;
use crate::ui::theme::{FONT_LARGE, FONT_SMALL, HIT_HEIGHT_LARGE, HIT_HEIGHT_SMALL, PAGE_ASPECT, PAGE_FILL};

/// Width over height of the page (A4 portrait).
pub const CANVAS_ASPECT: f32 = PAGE_ASPECT;

/// Placement tilt is drawn from `[-MAX_PLACEMENT_TILT, MAX_PLACEMENT_TILT)`.
pub const MAX_PLACEMENT_TILT: f32 = 5.;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Malformed fragment payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Non-finite {0} rejected")]
    NonFinite(&'static str),

    #[error("No fragment {0} on the canvas")]
    UnknownFragment(FragmentId),

    #[error("Invalid container size {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, CanvasError>;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown font size {0:?} (expected small or large)")]
pub struct UnknownFontSize(pub String);

/// Global text size setting. Each fragment scales it by its own modifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    #[default]
    Small,
    Large,
}

impl FontSize {
    pub fn base_px(self) -> f32 {
        match self {
            FontSize::Small => FONT_SMALL,
            FontSize::Large => FONT_LARGE,
        }
    }

    /// Height of the hit band around a fragment's centre.
    pub fn hit_height(self) -> f32 {
        match self {
            FontSize::Small => HIT_HEIGHT_SMALL,
            FontSize::Large => HIT_HEIGHT_LARGE,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FontSize::Small => FontSize::Large,
            FontSize::Large => FontSize::Small,
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontSize::Small => "small",
            FontSize::Large => "large",
        })
    }
}

impl FromStr for FontSize {
    type Err = UnknownFontSize;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "large" => Ok(FontSize::Large),
            _ => Err(UnknownFontSize(s.to_string())),
        }
    }
}

/// Largest page of `CANVAS_ASPECT` that fits in `PAGE_FILL` of the container.
pub fn fit_to_container(container_width: f32, container_height: f32) -> Option<(f32, f32)> {
    let valid = |v: f32| v.is_finite() && v > 0.;
    if !valid(container_width) || !valid(container_height) {
        return None;
    }
    if container_width / container_height > CANVAS_ASPECT {
        let height = container_height * PAGE_FILL;
        Some((height * CANVAS_ASPECT, height))
    } else {
        let width = container_width * PAGE_FILL;
        Some((width, width / CANVAS_ASPECT))
    }
}

/// Fragment being dragged and where it was grabbed, relative to its centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    pub id: FragmentId,
    pub grab_offset: Point,
}

pub struct Canvas {
    size: Option<(f32, f32)>,
    fragments: Vec<Fragment>,
    selected: Option<FragmentId>,
    drag: Option<Drag>,
    show_grid: bool,
    font_size: FontSize,
    backdrop: Backdrop,
    looks: LookFactory,
    session_seed: u64,
    next_id: u64,
    placement_rng: ChaCha8Rng,
    dirty: bool,
}

impl Canvas {
    pub fn new(session_seed: u64) -> Self {
        Self::with_looks(session_seed, LookFactory::default())
    }

    /// Canvas with injected generators.
    pub fn with_looks(session_seed: u64, looks: LookFactory) -> Self {
        Self {
            size: None,
            fragments: Vec::new(),
            selected: None,
            drag: None,
            show_grid: false,
            font_size: FontSize::default(),
            backdrop: Backdrop::default(),
            looks,
            session_seed,
            next_id: 1,
            placement_rng: ChaCha8Rng::seed_from_u64(session_seed),
            dirty: true,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(generate_session_seed);
        debug!("Canvas session seed {}", seed);
        let mut canvas = Self::new(seed);
        canvas.font_size = settings.font_size;
        canvas.backdrop = settings.backdrop;
        canvas
    }

    pub fn session_seed(&self) -> u64 {
        self.session_seed
    }

    pub fn looks(&self) -> &LookFactory {
        &self.looks
    }

    /// Page size in pixels once the container has reported its size.
    pub fn size(&self) -> Option<(f32, f32)> {
        self.size
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn fragment(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.id() == id)
    }

    #[cfg(test)]
    pub(crate) fn fragment_mut(&mut self, id: FragmentId) -> Option<&mut Fragment> {
        self.fragments.iter_mut().find(|f| f.id() == id)
    }

    pub fn selected(&self) -> Option<&Fragment> {
        self.selected.and_then(|id| self.fragment(id))
    }

    pub fn selected_id(&self) -> Option<FragmentId> {
        self.selected
    }

    pub fn drag(&self) -> Option<Drag> {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn max_z(&self) -> u32 {
        self.fragments.iter().map(|f| f.z_index()).max().unwrap_or(0)
    }

    /// Fragments in paint order: ascending z, ties in insertion order.
    pub fn draw_order(&self) -> Vec<&Fragment> {
        let mut order: Vec<&Fragment> = self.fragments.iter().collect();
        order.sort_by_key(|f| f.z_index());
        order
    }

    /// Parse a JSON drop payload and place it at `at`. A malformed payload
    /// leaves the canvas untouched.
    pub fn drop_payload(&mut self, payload: &str, at: Point) -> Result<FragmentId> {
        let descriptor = FragmentDescriptor::from_payload(payload)?;
        self.place(descriptor, at)
    }

    /// Attach a look, a small random tilt and the next z to `descriptor`.
    /// The new fragment becomes the selection.
    pub fn place(&mut self, descriptor: FragmentDescriptor, at: Point) -> Result<FragmentId> {
        if !at.is_finite() {
            return Err(CanvasError::NonFinite("placement point"));
        }
        let id = FragmentId::new(self.next_id);
        self.next_id += 1;

        let look = self.looks.look_for(LookSeed::derive(self.session_seed, id, &descriptor.text));
        let rotation = self.placement_rng.gen::<f32>() * MAX_PLACEMENT_TILT * 2. - MAX_PLACEMENT_TILT;
        let z_index = self.max_z() + 1;
        debug!(
            "Placed {} {:?} at ({:.1}, {:.1}) as {}",
            id,
            descriptor.text,
            at.x,
            at.y,
            look.archetype().name()
        );
        self.fragments
            .push(Fragment::new(id, descriptor, at, rotation, z_index, look));
        self.selected = Some(id);
        self.dirty = true;
        Ok(id)
    }

    /// Select `id` and raise it above every other fragment.
    fn promote(&mut self, id: FragmentId) -> Result<()> {
        let top = self.max_z() + 1;
        let fragment = self
            .fragments
            .iter_mut()
            .find(|f| f.id() == id)
            .ok_or(CanvasError::UnknownFragment(id))?;
        fragment.z_index = top;
        self.selected = Some(id);
        self.dirty = true;
        Ok(())
    }

    fn selected_mut(&mut self) -> Option<&mut Fragment> {
        let id = self.selected?;
        self.fragments.iter_mut().find(|f| f.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_to_container_keeps_aspect() {
        let (w, h) = fit_to_container(1000., 1000.).unwrap();
        assert!((w / h - CANVAS_ASPECT).abs() < 1e-4);
        assert!((h - 900.).abs() < 1e-3);

        let (w, h) = fit_to_container(500., 2000.).unwrap();
        assert!((w - 450.).abs() < 1e-3);
        assert!((w / h - CANVAS_ASPECT).abs() < 1e-4);

        assert_eq!(fit_to_container(0., 100.), None);
        assert_eq!(fit_to_container(f32::NAN, 100.), None);
    }

    #[test]
    fn test_place_assigns_increasing_z_and_selects() {
        let mut canvas = Canvas::new(7);
        let a = canvas.place(FragmentDescriptor::new("1", "春", ""), Point::new(10., 10.)).unwrap();
        let b = canvas.place(FragmentDescriptor::new("2", "风", ""), Point::new(20., 20.)).unwrap();
        assert_eq!(canvas.fragment(a).unwrap().z_index(), 1);
        assert_eq!(canvas.fragment(b).unwrap().z_index(), 2);
        assert_eq!(canvas.selected_id(), Some(b));
        assert_eq!(a.to_string(), "canvas-1");
    }

    #[test]
    fn test_placement_tilt_within_range() {
        let mut canvas = Canvas::new(3);
        for i in 0..200 {
            let id = canvas.place(FragmentDescriptor::new("", "字", ""), Point::new(i as f32, 0.)).unwrap();
            let r = canvas.fragment(id).unwrap().rotation();
            assert!((-5. ..5.).contains(&r), "{}", r);
        }
    }

    #[test]
    fn test_same_session_same_looks() {
        let mut a = Canvas::new(11);
        let mut b = Canvas::new(11);
        let ia = a.place(FragmentDescriptor::new("", "明月", ""), Point::ORIGIN).unwrap();
        let ib = b.place(FragmentDescriptor::new("", "明月", ""), Point::ORIGIN).unwrap();
        assert_eq!(a.fragment(ia).unwrap().look(), b.fragment(ib).unwrap().look());
    }

    #[test]
    fn test_draw_order_is_ascending_z() {
        let mut canvas = Canvas::new(1);
        let a = canvas.place(FragmentDescriptor::new("", "a", ""), Point::ORIGIN).unwrap();
        canvas.place(FragmentDescriptor::new("", "b", ""), Point::ORIGIN).unwrap();
        canvas.promote(a).unwrap();
        let order: Vec<_> = canvas.draw_order().iter().map(|f| f.text().to_string()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_font_size_parse_and_toggle() {
        assert_eq!("LARGE".parse::<FontSize>(), Ok(FontSize::Large));
        assert_eq!(FontSize::Small.toggled(), FontSize::Large);
        assert!("huge".parse::<FontSize>().is_err());
    }

    #[test]
    fn test_take_dirty_clears() {
        let mut canvas = Canvas::new(1);
        assert!(canvas.take_dirty());
        assert!(!canvas.is_dirty());
    }
}
