//! The single mutation entry point for the canvas.
//!
//! Commands are validated before anything is touched, so a rejected command
//! leaves the canvas exactly as it was.

use log::debug;

use super::hit_test::hit_test;
use super::transform::{pinch_scale, snap_rotation, NudgeDirection};
use super::{fit_to_container, Canvas, CanvasError, Drag, FontSize, Result};
use crate::geometry::Point;
use crate::types::{FragmentDescriptor, FragmentId};
use crate::ui::backdrop::Backdrop;
use crate::ui::surface::TextMeasure;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Place a tray fragment at a page point (a drop).
    Add { descriptor: FragmentDescriptor, at: Point },
    /// Place a tray fragment at the page centre (double-click in the tray).
    PlaceAtCentre(FragmentDescriptor),
    /// Select and promote a fragment, or clear the selection.
    Select(Option<FragmentId>),
    /// Hit test, select what was hit and start dragging it.
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Multiply the selected fragment's scale.
    Pinch(f32),
    /// Rotate the selected fragment by a delta in degrees.
    Rotate(f32),
    Nudge(NudgeDirection),
    /// Remove the selected fragment.
    Delete,
    /// Container size in pixels; the page is fitted inside it.
    Resize { width: f32, height: f32 },
    SetGrid(bool),
    SetFontSize(FontSize),
    SetBackdrop(Backdrop),
}

fn finite(value: f32, what: &'static str) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CanvasError::NonFinite(what))
    }
}

fn finite_point(point: Point, what: &'static str) -> Result<Point> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(CanvasError::NonFinite(what))
    }
}

impl Canvas {
    /// Apply one command atomically. `measure` sizes hit boxes for pointer
    /// commands and is ignored by the rest.
    pub fn apply(&mut self, command: Command, measure: &mut dyn TextMeasure) -> Result<()> {
        match command {
            Command::Add { descriptor, at } => {
                self.place(descriptor, at)?;
            }
            Command::PlaceAtCentre(descriptor) => {
                let Some((width, height)) = self.size else {
                    debug!("No page size yet, ignoring place at centre");
                    return Ok(());
                };
                self.place(descriptor, Point::new(width / 2., height / 2.))?;
            }
            Command::Select(Some(id)) => self.promote(id)?,
            Command::Select(None) => self.clear_selection(),
            Command::PointerDown(at) => {
                let at = finite_point(at, "pointer position")?;
                match hit_test(&self.fragments, at, self.font_size, measure) {
                    Some(id) => {
                        self.promote(id)?;
                        if let Some(fragment) = self.fragment(id) {
                            let grab_offset = at - fragment.position();
                            self.drag = Some(Drag { id, grab_offset });
                        }
                    }
                    None => self.clear_selection(),
                }
            }
            Command::PointerMove(at) => {
                let at = finite_point(at, "pointer position")?;
                if let Some(drag) = self.drag {
                    let position = finite_point(at - drag.grab_offset, "fragment position")?;
                    if let Some(fragment) = self.fragments.iter_mut().find(|f| f.id() == drag.id) {
                        fragment.position = position;
                        self.dirty = true;
                    }
                }
            }
            Command::PointerUp => {
                self.drag = None;
            }
            Command::Pinch(factor) => {
                let factor = finite(factor, "pinch factor")?;
                if self.drag.is_none() {
                    if let Some(fragment) = self.selected_mut() {
                        fragment.scale = pinch_scale(fragment.scale, factor);
                        self.dirty = true;
                    }
                }
            }
            Command::Rotate(delta) => {
                let delta = finite(delta, "rotation delta")?;
                if self.drag.is_none() {
                    if let Some(fragment) = self.selected_mut() {
                        let rotation = snap_rotation(fragment.rotation, delta);
                        fragment.rotation = finite(rotation, "rotation")?;
                        self.dirty = true;
                    }
                }
            }
            Command::Nudge(direction) => {
                let (dx, dy) = direction.delta();
                if let Some(fragment) = self.selected_mut() {
                    let position = fragment.position.offset(dx, dy);
                    fragment.position = finite_point(position, "fragment position")?;
                    self.dirty = true;
                }
            }
            Command::Delete => {
                if let Some(id) = self.selected.take() {
                    self.fragments.retain(|f| f.id() != id);
                    if self.drag.is_some_and(|d| d.id == id) {
                        self.drag = None;
                    }
                    debug!("Deleted {}", id);
                    self.dirty = true;
                }
            }
            Command::Resize { width, height } => {
                let (new_w, new_h) =
                    fit_to_container(width, height).ok_or(CanvasError::InvalidSize { width, height })?;
                if let Some((old_w, old_h)) = self.size.filter(|(w, h)| *w > 0. && *h > 0.) {
                    let (sx, sy) = (new_w / old_w, new_h / old_h);
                    let positions = self
                        .fragments
                        .iter()
                        .map(|f| finite_point(f.position().scaled(sx, sy), "fragment position"))
                        .collect::<Result<Vec<_>>>()?;
                    // A drag in flight keeps its grip on the same spot of the note
                    let drag = match self.drag {
                        Some(drag) => Some(Drag {
                            grab_offset: finite_point(
                                drag.grab_offset.scaled(sx, sy),
                                "grab offset",
                            )?,
                            ..drag
                        }),
                        None => None,
                    };
                    for (fragment, position) in self.fragments.iter_mut().zip(positions) {
                        fragment.position = position;
                    }
                    self.drag = drag;
                }
                self.size = Some((new_w, new_h));
                self.dirty = true;
            }
            Command::SetGrid(show) => {
                if self.show_grid != show {
                    self.show_grid = show;
                    self.dirty = true;
                }
            }
            Command::SetFontSize(size) => {
                if self.font_size != size {
                    self.font_size = size;
                    self.dirty = true;
                }
            }
            Command::SetBackdrop(backdrop) => {
                if self.backdrop != backdrop {
                    self.backdrop = backdrop;
                    self.dirty = true;
                }
            }
        }
        Ok(())
    }

    fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.dirty = true;
        }
        self.drag = None;
    }
}
