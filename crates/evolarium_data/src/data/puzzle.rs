use super::geometry::{Rect, Vec2};
use super::obstacle::HitCounter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    Red,
    Gold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorKind {
    Wood,
    Iron,
}

impl DoorKind {
    /// The key that must be collected before this door can be struck.
    #[must_use]
    pub const fn required_key(self) -> KeyKind {
        match self {
            DoorKind::Wood => KeyKind::Red,
            DoorKind::Iron => KeyKind::Gold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub kind: KeyKind,
    pub position: Vec2,
    pub collected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub kind: DoorKind,
    pub rect: Rect,
    pub hits: HitCounter,
}

impl Door {
    #[must_use]
    pub fn new(kind: DoorKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            hits: HitCounter::default(),
        }
    }

    /// A door is open once its hit counter reached the threshold.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.hits.destroyed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    pub rect: Rect,
    pub open: bool,
}

/// Walled region excluded from generation. Hosts puzzle objects and is
/// sealed by one door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fortress {
    pub bounds: Rect,
    pub door: DoorKind,
}

impl Fortress {
    #[must_use]
    pub fn interior_contains(&self, point: Vec2) -> bool {
        self.bounds.contains(point)
    }
}
