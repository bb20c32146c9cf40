//! The lounge: a 14x14 room with a door on the east side, two tables
//! flanked by chairs, two lamps, and one resident.

use crate::config::RoomConfig;
use crate::direction::Direction;
use crate::entity::Identity;
use crate::furniture::{FurnitureItem, FurnitureKind};
use crate::grid::{GridPosition, StaticLayout};
use crate::room::{Room, RoomError};

/// Where a freshly joined visitor heads first.
pub const LOUNGE_ENTRY_WALK_TARGET: GridPosition = GridPosition { x: 10, y: 8 };

pub const LOUNGE_LAYOUT: [[u8; 14]; 14] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

pub fn lounge_layout() -> Result<StaticLayout, RoomError> {
    Ok(StaticLayout::from_rows(&LOUNGE_LAYOUT)?)
}

pub fn lounge_furniture() -> Vec<FurnitureItem> {
    vec![
        FurnitureItem::new(
            "t1",
            FurnitureKind::TableWood,
            GridPosition::new(4, 4),
            Direction::North,
        ),
        FurnitureItem::new(
            "t2",
            FurnitureKind::TableWood,
            GridPosition::new(5, 4),
            Direction::North,
        ),
        FurnitureItem::new(
            "c1",
            FurnitureKind::ChairBasic,
            GridPosition::new(3, 4),
            Direction::East,
        ),
        FurnitureItem::new(
            "c2",
            FurnitureKind::ChairBasic,
            GridPosition::new(6, 4),
            Direction::West,
        ),
        FurnitureItem::new(
            "l1",
            FurnitureKind::LampTall,
            GridPosition::new(1, 1),
            Direction::North,
        )
        .with_state(1),
        FurnitureItem::new(
            "l2",
            FurnitureKind::LampTall,
            GridPosition::new(12, 1),
            Direction::North,
        )
        .with_state(1),
    ]
}

pub fn lounge_residents() -> Vec<(Identity, GridPosition, Direction)> {
    vec![(
        Identity::new("Frank", "#7f8c8d"),
        GridPosition::new(12, 2),
        Direction::West,
    )]
}

/// The lounge with its furniture placed and residents spawned. Nobody has
/// joined yet, so there is no local entity.
pub fn lounge_room(config: RoomConfig) -> Result<Room, RoomError> {
    let mut room = Room::new(config, lounge_layout()?, lounge_furniture())?;
    for (identity, position, rotation) in lounge_residents() {
        room.spawn_entity(identity, position, rotation);
    }
    Ok(room)
}
