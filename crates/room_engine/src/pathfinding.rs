//! A* over the collision grid.
//!
//! Costs are kept in tenths so that ordering is exact: a cardinal step costs
//! 10, a diagonal step 14, and the heuristic is 10 x Manhattan distance. The
//! heuristic overestimates on diagonal-heavy routes, so a returned path is
//! not always the cheapest one, but it is always the same one for the same
//! grid.
//!
//! Equal `f` costs are broken by the order in which nodes were first
//! discovered. Lowering a node's cost keeps that first-discovery rank. A
//! search that instead re-sorts its open list stably after each update can
//! pick a different, equally cheap path on some maps; both are deterministic.

use crate::direction::Direction;
use crate::grid::{Grid, GridPosition};

pub const CARDINAL_STEP_COST: u32 = 10;
pub const DIAGONAL_STEP_COST: u32 = 14;

/// Returns the steps from `start` to `goal`, excluding `start` and ending at
/// `goal`. Empty when the goal is blocked, unreachable, or equal to `start`.
pub fn find_path(start: GridPosition, goal: GridPosition, grid: &Grid) -> Vec<GridPosition> {
    if !grid.is_walkable(goal) {
        return Vec::new();
    }
    let (Some(start_index), Some(goal_index)) = (grid.index_of(start), grid.index_of(goal))
    else {
        return Vec::new();
    };
    if start_index == goal_index {
        return Vec::new();
    }

    let node_count = grid.cell_count();
    let mut closed = vec![false; node_count];
    let mut best_g = vec![u32::MAX; node_count];
    let mut f_cost = vec![u32::MAX; node_count];
    let mut insertion_order = vec![u64::MAX; node_count];
    let mut parent = vec![None::<usize>; node_count];
    let mut open = Vec::new();
    let mut next_insertion = 0u64;

    best_g[start_index] = 0;
    f_cost[start_index] = 0;
    insertion_order[start_index] = next_insertion;
    next_insertion = next_insertion.saturating_add(1);
    open.push(start_index);

    while !open.is_empty() {
        let best_slot = pick_best_open_slot(&open, &f_cost, &insertion_order);
        let current_index = open.swap_remove(best_slot);
        if current_index == goal_index {
            return reconstruct_path(&parent, grid, start_index, goal_index);
        }
        closed[current_index] = true;

        let current = grid.position_of(current_index);
        let current_g = best_g[current_index];
        for (neighbor, step_cost) in walkable_neighbors(grid, current) {
            let Some(neighbor_index) = grid.index_of(neighbor) else {
                continue;
            };
            if closed[neighbor_index] {
                continue;
            }

            let tentative_g = current_g.saturating_add(step_cost);
            if tentative_g >= best_g[neighbor_index] {
                continue;
            }

            let discovered = best_g[neighbor_index] != u32::MAX;
            best_g[neighbor_index] = tentative_g;
            parent[neighbor_index] = Some(current_index);
            f_cost[neighbor_index] = tentative_g.saturating_add(heuristic(neighbor, goal));
            if !discovered {
                insertion_order[neighbor_index] = next_insertion;
                next_insertion = next_insertion.saturating_add(1);
                open.push(neighbor_index);
            }
        }
    }

    Vec::new()
}

/// Legal single steps out of `node`, in expansion order, with their cost.
/// A diagonal step needs both orthogonal cells it passes to be walkable.
pub fn walkable_neighbors(grid: &Grid, node: GridPosition) -> Vec<(GridPosition, u32)> {
    let mut neighbors = Vec::with_capacity(Direction::ALL.len());
    for direction in Direction::ALL {
        let (dx, dy) = direction.delta();
        let candidate = node.offset(dx, dy);
        if !grid.is_walkable(candidate) {
            continue;
        }
        if direction.is_diagonal() {
            if !grid.is_walkable(node.offset(dx, 0)) || !grid.is_walkable(node.offset(0, dy)) {
                continue;
            }
            neighbors.push((candidate, DIAGONAL_STEP_COST));
        } else {
            neighbors.push((candidate, CARDINAL_STEP_COST));
        }
    }
    neighbors
}

/// Total cost of walking `path` from `start`, in tenths of a cardinal step.
pub fn path_cost(start: GridPosition, path: &[GridPosition]) -> u32 {
    let mut previous = start;
    let mut total = 0u32;
    for &step in path {
        let diagonal = previous.x != step.x && previous.y != step.y;
        total = total.saturating_add(if diagonal {
            DIAGONAL_STEP_COST
        } else {
            CARDINAL_STEP_COST
        });
        previous = step;
    }
    total
}

fn heuristic(from: GridPosition, goal: GridPosition) -> u32 {
    let manhattan = from.x.abs_diff(goal.x).saturating_add(from.y.abs_diff(goal.y));
    manhattan.saturating_mul(CARDINAL_STEP_COST)
}

fn pick_best_open_slot(open: &[usize], f_cost: &[u32], insertion_order: &[u64]) -> usize {
    let mut best_slot = 0usize;
    for slot in 1..open.len() {
        let candidate = open[slot];
        let best = open[best_slot];
        if (f_cost[candidate], insertion_order[candidate]) < (f_cost[best], insertion_order[best])
        {
            best_slot = slot;
        }
    }
    best_slot
}

fn reconstruct_path(
    parent: &[Option<usize>],
    grid: &Grid,
    start_index: usize,
    goal_index: usize,
) -> Vec<GridPosition> {
    let mut cursor = goal_index;
    let mut indices = vec![cursor];
    while cursor != start_index {
        let Some(next) = parent.get(cursor).copied().flatten() else {
            return Vec::new();
        };
        cursor = next;
        indices.push(cursor);
    }
    indices.pop();
    indices.reverse();
    indices
        .into_iter()
        .map(|index| grid.position_of(index))
        .collect()
}
