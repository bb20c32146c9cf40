use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::grid::GridPosition;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FurnitureId(String);

impl FurnitureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FurnitureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FurnitureId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureKind {
    ChairBasic,
    TableWood,
    LampTall,
    NeonTube,
}

impl FurnitureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChairBasic => "chair_basic",
            Self::TableWood => "table_wood",
            Self::LampTall => "lamp_tall",
            Self::NeonTube => "neon_tube",
        }
    }

    /// Kinds whose interaction state is an on/off switch.
    pub fn is_togglable(self) -> bool {
        matches!(self, Self::LampTall | Self::NeonTube)
    }

    pub fn default_capabilities(self) -> Capabilities {
        match self {
            Self::ChairBasic => Capabilities {
                can_sit: true,
                can_walk: true,
                can_stack: false,
            },
            Self::TableWood => Capabilities {
                can_sit: false,
                can_walk: false,
                can_stack: true,
            },
            Self::LampTall | Self::NeonTube => Capabilities::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_sit: bool,
    pub can_walk: bool,
    pub can_stack: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: FurnitureId,
    pub kind: FurnitureKind,
    pub position: GridPosition,
    pub rotation: Direction,
    pub state: i32,
    pub capabilities: Capabilities,
}

impl FurnitureItem {
    pub fn new(
        id: impl Into<FurnitureId>,
        kind: FurnitureKind,
        position: GridPosition,
        rotation: Direction,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            rotation,
            state: 0,
            capabilities: kind.default_capabilities(),
        }
    }

    pub fn with_state(mut self, state: i32) -> Self {
        self.state = state;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn is_togglable(&self) -> bool {
        self.kind.is_togglable()
    }

    /// 1 becomes 0, anything else becomes 1.
    pub(crate) fn toggle_state(&mut self) -> i32 {
        self.state = if self.state == 1 { 0 } else { 1 };
        self.state
    }
}

/// First sittable item occupying `position`, if any.
pub fn seat_at(furniture: &[FurnitureItem], position: GridPosition) -> Option<&FurnitureItem> {
    furniture
        .iter()
        .find(|item| item.position == position && item.capabilities.can_sit)
}
