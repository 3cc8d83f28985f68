//! Static-ish world objects: doors, destructibles, shrines, portals.

use tn_core::{ObjectId, Position};

/// What kind of object this is, as far as navigation cares.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    /// A barrier.  A *selectable* door is closed.
    Door,
    /// Breakable clutter (barrels, crates) that can wall off a corridor.
    Destructible,
    Shrine,
    Chest,
    Portal,
    Other,
}

/// One object from the world snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldObject {
    pub id:         ObjectId,
    pub kind:       ObjectKind,
    pub position:   Position,
    /// The object can currently be interacted with.  For a door this means
    /// it is closed.
    pub selectable: bool,
}

impl WorldObject {
    pub fn new(id: ObjectId, kind: ObjectKind, position: Position) -> Self {
        Self { id, kind, position, selectable: true }
    }

    /// A door that is still closed.
    #[inline]
    pub fn is_closed_door(&self) -> bool {
        self.kind == ObjectKind::Door && self.selectable
    }

    /// A destructible that has not been broken yet.
    #[inline]
    pub fn is_intact_destructible(&self) -> bool {
        self.kind == ObjectKind::Destructible && self.selectable
    }
}
