use super::*;
use crate::entity::MotionState;
use crate::preset::{lounge_layout, lounge_room, LOUNGE_ENTRY_WALK_TARGET};

const TICK: Duration = Duration::from_millis(480);

fn lounge() -> Room {
    lounge_room(RoomConfig::default()).expect("lounge room")
}

fn joined_lounge() -> (Room, EntityId) {
    let mut room = lounge();
    let id = room.join_room(Identity::new("visitor", "#e74c3c"));
    (room, id)
}

fn entity(room: &Room, id: EntityId) -> EntitySnapshot {
    room.entity(id).expect("entity present")
}

fn assigned_steps(outcome: MoveOutcome) -> usize {
    match outcome {
        MoveOutcome::Assigned { steps } => steps,
        other => panic!("expected an assigned path, got {other:?}"),
    }
}

#[test]
fn construction_rejects_zero_tick_interval() {
    let config = RoomConfig {
        tick_interval: Duration::ZERO,
        ..RoomConfig::default()
    };
    let err = Room::new(config, lounge_layout().expect("layout"), Vec::new())
        .expect_err("zero interval");
    assert_eq!(err, RoomError::ZeroTickInterval);
}

#[test]
fn construction_rejects_layout_of_wrong_size() {
    let config = RoomConfig {
        width: 10,
        ..RoomConfig::default()
    };
    let err = Room::new(config, lounge_layout().expect("layout"), Vec::new())
        .expect_err("size mismatch");
    assert_eq!(
        err,
        RoomError::DimensionMismatch {
            expected_width: 10,
            expected_height: 14,
            actual_width: 14,
            actual_height: 14,
        }
    );
}

#[test]
fn construction_rejects_entry_outside_grid() {
    let config = RoomConfig {
        entry_cell: GridPosition::new(14, 3),
        ..RoomConfig::default()
    };
    let err = Room::new(config, lounge_layout().expect("layout"), Vec::new())
        .expect_err("entry out of bounds");
    assert!(matches!(err, RoomError::EntryOutOfBounds { x: 14, y: 3, .. }));
}

#[test]
fn layout_errors_pass_through_unchanged() {
    let err = RoomError::from(LayoutError::Empty);
    assert_eq!(err.to_string(), "layout has no cells");
}

#[test]
fn join_places_local_entity_at_entry_facing_into_room() {
    let (room, id) = joined_lounge();
    let visitor = entity(&room, id);
    assert_eq!(room.local_entity(), Some(id));
    assert_eq!(visitor.grid_position, GridPosition::new(12, 11));
    assert_eq!(visitor.rotation, Direction::NorthWest);
    assert_eq!(visitor.motion_state(), MotionState::Idle);
    assert_eq!(visitor.last_tick_at, None);
}

#[test]
fn spawn_outside_grid_is_rejected() {
    let mut room = lounge();
    let spawned = room.spawn_entity(
        Identity::new("ghost", "#000000"),
        GridPosition::new(-1, 4),
        Direction::South,
    );
    assert_eq!(spawned, None);
    assert_eq!(room.entities().len(), 1);
}

#[test]
fn walk_from_entry_reaches_target_then_stops_next_tick() {
    let (mut room, id) = joined_lounge();
    let steps = assigned_steps(room.move_entity(id, LOUNGE_ENTRY_WALK_TARGET));

    let queued = entity(&room, id);
    assert_eq!(queued.path.len(), steps);
    assert_eq!(queued.path.last(), Some(&LOUNGE_ENTRY_WALK_TARGET));
    let mut previous = queued.grid_position;
    for step in &queued.path {
        assert!(previous.is_adjacent_to(*step));
        assert!(room.collision_grid().is_walkable(*step));
        previous = *step;
    }

    room.advance(TICK * steps as u32);
    let arrived = entity(&room, id);
    assert_eq!(arrived.grid_position, LOUNGE_ENTRY_WALK_TARGET);
    assert!(arrived.path.is_empty());
    assert!(arrived.is_walking);

    room.advance(TICK);
    let stopped = entity(&room, id);
    assert_eq!(stopped.grid_position, LOUNGE_ENTRY_WALK_TARGET);
    assert!(!stopped.is_walking);
    assert!(!stopped.is_sitting);
    assert_eq!(stopped.previous_grid_position, stopped.next_grid_position);
}

#[test]
fn catch_up_advances_exactly_one_step_per_elapsed_tick() {
    let (mut room, id) = joined_lounge();
    let steps = assigned_steps(room.move_entity(id, GridPosition::new(2, 11)));
    assert!(steps > 3);
    let planned = entity(&room, id).path;

    let report = room.advance(TICK * 3 + Duration::from_millis(100));
    assert_eq!(report.ticks_run, 3);
    assert_eq!(report.idle_ticks, 0);

    let visitor = entity(&room, id);
    assert_eq!(visitor.grid_position, planned[2]);
    assert_eq!(visitor.previous_grid_position, planned[1]);
    assert_eq!(visitor.path, planned[3..].to_vec());
    assert_eq!(visitor.last_tick_at, Some(TICK * 3));
    assert_eq!(room.ticks_elapsed(), 3);
    assert_eq!(room.clock(), TICK * 3 + Duration::from_millis(100));
}

#[test]
fn short_path_halts_early_within_a_long_catch_up() {
    let (mut room, id) = joined_lounge();
    let steps = assigned_steps(room.move_entity(id, GridPosition::new(10, 11)));
    assert_eq!(steps, 2);

    let report = room.advance(TICK * 5);
    assert_eq!(report.ticks_run, 5);
    assert_eq!(report.entity_updates, 3);
    assert_eq!(report.idle_ticks, 2);

    let visitor = entity(&room, id);
    assert_eq!(visitor.grid_position, GridPosition::new(10, 11));
    assert_eq!(visitor.motion_state(), MotionState::Idle);
    assert_eq!(visitor.last_tick_at, Some(TICK * 3));
}

#[test]
fn sub_interval_frames_do_not_move_anyone() {
    let (mut room, id) = joined_lounge();
    room.move_entity(id, LOUNGE_ENTRY_WALK_TARGET);

    let report = room.advance(TICK - Duration::from_millis(1));
    assert_eq!(report, TickReport::default());
    assert_eq!(entity(&room, id).grid_position, GridPosition::new(12, 11));

    room.advance(Duration::from_millis(1));
    assert_ne!(entity(&room, id).grid_position, GridPosition::new(12, 11));
}

#[test]
fn one_large_frame_matches_many_small_frames() {
    let (mut bulk, bulk_id) = joined_lounge();
    let (mut stepped, stepped_id) = joined_lounge();
    bulk.interact_furniture(&FurnitureId::from("c1"));
    stepped.interact_furniture(&FurnitureId::from("c1"));

    bulk.advance(TICK * 40);
    for _ in 0..120 {
        stepped.advance(Duration::from_millis(160));
    }

    assert_eq!(bulk.entities(), stepped.entities());
    assert_eq!(bulk.ticks_elapsed(), stepped.ticks_elapsed());
    assert_eq!(
        entity(&bulk, bulk_id).motion_state(),
        entity(&stepped, stepped_id).motion_state()
    );
}

#[test]
fn idle_room_skips_tick_work_but_keeps_time() {
    let (mut room, id) = joined_lounge();
    let report = room.advance(TICK * 4);
    assert_eq!(report.ticks_run, 4);
    assert_eq!(report.idle_ticks, 4);
    assert_eq!(report.entity_updates, 0);
    assert_eq!(room.ticks_elapsed(), 4);
    assert_eq!(entity(&room, id).last_tick_at, None);

    let steps = assigned_steps(room.move_entity(id, GridPosition::new(11, 11)));
    assert_eq!(steps, 1);
    room.advance(TICK);
    assert_eq!(entity(&room, id).last_tick_at, Some(TICK * 5));
}

#[test]
fn chair_interaction_walks_there_and_sits_on_the_stop_tick() {
    let (mut room, id) = joined_lounge();
    let outcome = room.interact_furniture(&FurnitureId::from("c1"));
    let steps = match outcome {
        InteractionOutcome::Approaching {
            entity_id,
            target,
            steps,
        } => {
            assert_eq!(entity_id, id);
            assert_eq!(target, GridPosition::new(3, 4));
            steps
        }
        other => panic!("expected approach, got {other:?}"),
    };

    room.advance(TICK * steps as u32);
    let arrived = entity(&room, id);
    assert_eq!(arrived.grid_position, GridPosition::new(3, 4));
    assert!(arrived.is_walking);
    assert!(!arrived.is_sitting);

    room.advance(TICK);
    let seated = entity(&room, id);
    assert!(seated.is_sitting);
    assert!(!seated.is_walking);
    assert_eq!(seated.rotation, Direction::East);
    assert_eq!(seated.motion_state(), MotionState::Sitting);
}

#[test]
fn clicking_the_occupied_seat_again_is_a_no_op() {
    let (mut room, id) = joined_lounge();
    room.interact_furniture(&FurnitureId::from("c1"));
    room.advance(TICK * 40);
    let seated = entity(&room, id);

    let outcome = room.interact_furniture(&FurnitureId::from("c1"));
    assert_eq!(
        outcome,
        InteractionOutcome::Ignored(IgnoredReason::NoRoute(MoveOutcome::AlreadyThere))
    );
    assert_eq!(entity(&room, id), seated);
}

#[test]
fn standing_up_clears_sitting_on_first_step() {
    let (mut room, id) = joined_lounge();
    room.interact_furniture(&FurnitureId::from("c1"));
    room.advance(TICK * 40);
    assert!(entity(&room, id).is_sitting);

    assigned_steps(room.move_entity(id, GridPosition::new(3, 6)));
    room.advance(TICK);
    let standing = entity(&room, id);
    assert!(!standing.is_sitting);
    assert!(standing.is_walking);
}

#[test]
fn lamp_toggle_flips_state_and_leaves_entity_alone() {
    let (mut room, id) = joined_lounge();
    let before = entity(&room, id);
    let lamp = FurnitureId::from("l1");

    assert_eq!(
        room.interact_furniture(&lamp),
        InteractionOutcome::Toggled {
            furniture_id: lamp.clone(),
            state: 0
        }
    );
    assert_eq!(room.furniture_item(&lamp).expect("lamp").state, 0);
    assert_eq!(entity(&room, id), before);
    assert!(!room.has_pending_motion());

    assert_eq!(
        room.interact_furniture(&lamp),
        InteractionOutcome::Toggled {
            furniture_id: lamp.clone(),
            state: 1
        }
    );
    assert!(!room.collision_grid().is_walkable(GridPosition::new(1, 1)));
}

#[test]
fn table_interaction_is_ignored() {
    let (mut room, id) = joined_lounge();
    assert_eq!(
        room.interact(&FurnitureId::from("t1"), id),
        InteractionOutcome::Ignored(IgnoredReason::NotInteractive)
    );
    assert!(entity(&room, id).path.is_empty());
}

#[test]
fn unknown_ids_are_ignored() {
    let (mut room, id) = joined_lounge();
    assert_eq!(
        room.move_entity(EntityId(99), GridPosition::new(5, 5)),
        MoveOutcome::UnknownEntity
    );
    assert_eq!(
        room.interact(&FurnitureId::from("sofa"), id),
        InteractionOutcome::Ignored(IgnoredReason::UnknownFurniture)
    );
    assert_eq!(
        room.interact(&FurnitureId::from("l1"), EntityId(99)),
        InteractionOutcome::Ignored(IgnoredReason::UnknownEntity)
    );
    assert_eq!(room.furniture_item(&FurnitureId::from("l1")).expect("l1").state, 1);
}

#[test]
fn interaction_without_local_entity_is_ignored() {
    let mut room = lounge();
    assert_eq!(
        room.interact_furniture(&FurnitureId::from("l1")),
        InteractionOutcome::Ignored(IgnoredReason::NoLocalEntity)
    );
    assert_eq!(room.furniture_item(&FurnitureId::from("l1")).expect("l1").state, 1);
}

#[test]
fn blocked_or_missing_goals_leave_entity_untouched() {
    let (mut room, id) = joined_lounge();
    let before = entity(&room, id);

    for goal in [
        GridPosition::new(4, 4),
        GridPosition::new(0, 0),
        GridPosition::new(20, 20),
        GridPosition::new(-1, 3),
    ] {
        assert_eq!(room.move_entity(id, goal), MoveOutcome::Unreachable);
    }
    assert_eq!(
        room.move_entity(id, GridPosition::new(12, 11)),
        MoveOutcome::AlreadyThere
    );
    assert_eq!(entity(&room, id), before);
}

#[test]
fn rejected_move_keeps_the_current_route() {
    let (mut room, id) = joined_lounge();
    room.move_entity(id, LOUNGE_ENTRY_WALK_TARGET);
    let planned = entity(&room, id).path;

    assert_eq!(
        room.move_entity(id, GridPosition::new(5, 4)),
        MoveOutcome::Unreachable
    );
    assert_eq!(entity(&room, id).path, planned);
}

#[test]
fn second_move_before_any_tick_replaces_the_first() {
    let (mut room, id) = joined_lounge();
    room.move_entity(id, GridPosition::new(2, 2));
    room.move_entity(id, GridPosition::new(12, 6));

    let grid = room.collision_grid().clone();
    let expected = find_path(GridPosition::new(12, 11), GridPosition::new(12, 6), &grid);
    assert_eq!(entity(&room, id).path, expected);
}

#[test]
fn repath_mid_walk_starts_from_committed_cell() {
    let (mut room, id) = joined_lounge();
    room.move_entity(id, GridPosition::new(2, 11));
    room.advance(TICK);
    let walking = entity(&room, id);
    assert!(walking.is_walking);
    assert_eq!(walking.grid_position, GridPosition::new(11, 11));

    let goal = GridPosition::new(11, 5);
    let steps = assigned_steps(room.move_entity(id, goal));
    let grid = room.collision_grid().clone();
    let expected = find_path(GridPosition::new(11, 11), goal, &grid);
    assert_eq!(entity(&room, id).path, expected);

    room.advance(TICK * (steps as u32 + 1));
    let stopped = entity(&room, id);
    assert_eq!(stopped.grid_position, goal);
    assert!(!stopped.is_walking);
}

#[test]
fn relocation_rebuilds_collision_before_next_path() {
    let (mut room, id) = joined_lounge();
    let table = FurnitureId::from("t1");
    assert!(room.relocate_furniture(&table, LOUNGE_ENTRY_WALK_TARGET, Direction::East));

    let grid = room.collision_grid();
    assert!(!grid.is_walkable(LOUNGE_ENTRY_WALK_TARGET));
    assert!(grid.is_walkable(GridPosition::new(4, 4)));
    assert_eq!(
        room.move_entity(id, LOUNGE_ENTRY_WALK_TARGET),
        MoveOutcome::Unreachable
    );
    assert!(matches!(
        room.move_entity(id, GridPosition::new(4, 4)),
        MoveOutcome::Assigned { .. }
    ));

    let moved = room.furniture_item(&table).expect("table");
    assert_eq!(moved.position, LOUNGE_ENTRY_WALK_TARGET);
    assert_eq!(moved.rotation, Direction::East);
}

#[test]
fn moving_a_seat_away_unseats_its_occupant() {
    let (mut room, id) = joined_lounge();
    room.interact_furniture(&FurnitureId::from("c1"));
    room.advance(TICK * 40);
    assert!(entity(&room, id).is_sitting);

    assert!(room.relocate_furniture(
        &FurnitureId::from("c2"),
        GridPosition::new(7, 4),
        Direction::West
    ));
    assert!(entity(&room, id).is_sitting);

    assert!(room.relocate_furniture(
        &FurnitureId::from("c1"),
        GridPosition::new(8, 8),
        Direction::North
    ));
    room.advance(TICK * 3);
    let stranded = entity(&room, id);
    assert_eq!(stranded.grid_position, GridPosition::new(3, 4));
    assert!(!stranded.is_sitting);
    assert_eq!(stranded.motion_state(), MotionState::Idle);
    let published = room.snapshot_handle().latest();
    assert!(!published.entity(id).expect("visitor published").is_sitting);
}

#[test]
fn relocating_unknown_furniture_reports_false() {
    let mut room = lounge();
    assert!(!room.relocate_furniture(
        &FurnitureId::from("piano"),
        GridPosition::new(2, 2),
        Direction::North
    ));
}

#[test]
fn snapshot_handle_follows_published_state() {
    let mut room = lounge();
    let handle = room.snapshot_handle();
    assert_eq!(handle.latest().entities.len(), 1);
    assert!(handle.latest().local().is_none());

    let id = room.join_room(Identity::new("visitor", "#e74c3c"));
    room.move_entity(id, LOUNGE_ENTRY_WALK_TARGET);
    room.advance(TICK * 2);

    let latest = handle.latest();
    assert_eq!(latest.tick, 2);
    assert_eq!(latest.clock, TICK * 2);
    assert_eq!(latest.local_entity, Some(id));
    assert_eq!(latest.local(), room.entity(id).as_ref());
    assert_eq!(latest.tick_interval, TICK);
}

#[test]
fn snapshot_reflects_toggled_furniture() {
    let (mut room, _) = joined_lounge();
    let handle = room.snapshot_handle();
    room.interact_furniture(&FurnitureId::from("l2"));

    let latest = handle.latest();
    let lamp = latest
        .furniture
        .iter()
        .find(|item| item.id.as_str() == "l2")
        .expect("l2 in snapshot");
    assert_eq!(lamp.state, 0);
    assert_eq!(room.snapshot().furniture, latest.furniture);
}
