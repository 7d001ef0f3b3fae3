use serde::{Deserialize, Serialize};
use std::fmt;

use super::FragmentLook;
use crate::geometry::Point;

/// Canvas-local identity. Distinct from the tray id the descriptor came with:
/// the same tray entry may be placed more than once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FragmentId(u64);

impl FragmentId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "canvas-{}", self.0)
    }
}

/// Bare fragment as supplied by a tray or a drag payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentDescriptor {
    pub id: String,
    pub text: String,
    pub source: String,
}

impl FragmentDescriptor {
    pub fn new(id: impl Into<String>, text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: source.into(),
        }
    }

    /// Parse a JSON drag payload of the form `{"id":..,"text":..,"source":..}`.
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A placed fragment. Transform fields change through canvas commands only;
/// the look is fixed at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub(crate) id: FragmentId,
    pub(crate) tray_id: String,
    pub(crate) text: String,
    pub(crate) source: String,
    pub(crate) position: Point,
    /// Degrees, clockwise
    pub(crate) rotation: f32,
    pub(crate) scale: f32,
    pub(crate) z_index: u32,
    pub(crate) look: FragmentLook,
}

impl Fragment {
    pub(crate) fn new(
        id: FragmentId,
        descriptor: FragmentDescriptor,
        position: Point,
        rotation: f32,
        z_index: u32,
        look: FragmentLook,
    ) -> Self {
        Self {
            id,
            tray_id: descriptor.id,
            text: descriptor.text,
            source: descriptor.source,
            position,
            rotation,
            scale: 1.,
            z_index,
            look,
        }
    }

    pub fn id(&self) -> FragmentId {
        self.id
    }

    pub fn tray_id(&self) -> &str {
        &self.tray_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    pub fn look(&self) -> &FragmentLook {
        &self.look
    }

    pub fn descriptor(&self) -> FragmentDescriptor {
        FragmentDescriptor::new(self.tray_id.clone(), self.text.clone(), self.source.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_round_trip() {
        let descriptor = FragmentDescriptor::new("f1", "明月", "唐诗");
        let payload = descriptor.to_payload().unwrap();
        assert_eq!(FragmentDescriptor::from_payload(&payload).unwrap(), descriptor);
    }

    #[test]
    fn test_payload_without_text_is_rejected() {
        assert!(FragmentDescriptor::from_payload(r#"{"id":"f1"}"#).is_err());
        assert!(FragmentDescriptor::from_payload("not json").is_err());
    }

    #[test]
    fn test_payload_needs_every_field() {
        assert!(FragmentDescriptor::from_payload(r#"{"text":"清泉"}"#).is_err());
        assert!(FragmentDescriptor::from_payload(r#"{"id":"f1","text":"清泉"}"#).is_err());
        let descriptor =
            FragmentDescriptor::from_payload(r#"{"id":"","text":"清泉","source":""}"#).unwrap();
        assert_eq!(descriptor.text, "清泉");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(FragmentId::new(7).to_string(), "canvas-7");
    }
}
