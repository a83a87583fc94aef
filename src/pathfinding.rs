//! Grid A* search for ghost navigation, plus the one-step greedy steering the
//! ghosts use every tick.
//!
//! Neighbour expansion wraps across map edges before the wall test, so paths
//! may leave one side of the map and re-enter on the other. Plain movement
//! (`collision::can_move`) never wraps.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::collision::check_wall_collision;
use crate::geometry::{get_next_position, manhattan_distance, positions_equal};
use crate::types::{Direction, Position};
use crate::world::TileMap;

/// A node of the transient search tree built by [`find_path`].
#[derive(Clone, Copy, Debug)]
pub struct PathNode {
    pub position: Position,
    /// Steps from the start.
    pub g: u32,
    /// Manhattan estimate to the goal.
    pub h: f32,
    pub f: f32,
    /// Index of the parent node in the search arena.
    pub parent: Option<usize>,
}

/// Min-heap entry. Equal `f` pops in insertion order, which keeps the search
/// deterministic for a fixed map.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f32,
    seq: u64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Returns the route from `start` to `goal` inclusive of both ends, or an
/// empty vector when the goal cannot be reached.
pub fn find_path(start: Position, goal: Position, map: &TileMap) -> Vec<Position> {
    let start_h = manhattan_distance(start, goal);
    let mut nodes = vec![PathNode {
        position: start,
        g: 0,
        h: start_h,
        f: start_h,
        parent: None,
    }];
    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        f: start_h,
        seq: 0,
        node: 0,
    });
    let mut best_g: HashMap<(i32, i32), u32> = HashMap::from([(start.tile(), 0)]);
    let mut closed: HashSet<(i32, i32)> = HashSet::new();
    let mut seq = 1u64;

    while let Some(entry) = open.pop() {
        let current = nodes[entry.node];
        let key = current.position.tile();
        if closed.contains(&key) {
            continue;
        }
        if positions_equal(current.position, goal) {
            return reconstruct_path(&nodes, entry.node);
        }
        closed.insert(key);

        for neighbor in get_neighbors(current.position, map) {
            let neighbor_key = neighbor.tile();
            if closed.contains(&neighbor_key) {
                continue;
            }
            let g = current.g + 1;
            if best_g
                .get(&neighbor_key)
                .is_some_and(|known| *known <= g)
            {
                continue;
            }
            best_g.insert(neighbor_key, g);

            let h = manhattan_distance(neighbor, goal);
            let f = g as f32 + h;
            nodes.push(PathNode {
                position: neighbor,
                g,
                h,
                f,
                parent: Some(entry.node),
            });
            open.push(OpenEntry {
                f,
                seq,
                node: nodes.len() - 1,
            });
            seq += 1;
        }
    }

    Vec::new()
}

fn get_neighbors(pos: Position, map: &TileMap) -> Vec<Position> {
    let width = map.width() as f32;
    let height = map.height() as f32;
    let mut neighbors = Vec::with_capacity(4);
    for dir in Direction::CARDINALS {
        let mut next = get_next_position(pos, dir);
        if next.x < 0.0 {
            next.x = width - 1.0;
        }
        if next.x >= width {
            next.x = 0.0;
        }
        if next.y < 0.0 {
            next.y = height - 1.0;
        }
        if next.y >= height {
            next.y = 0.0;
        }
        if !check_wall_collision(next, map) {
            neighbors.push(next);
        }
    }
    neighbors
}

fn reconstruct_path(nodes: &[PathNode], goal_idx: usize) -> Vec<Position> {
    let mut path = Vec::new();
    let mut cursor = Some(goal_idx);
    while let Some(idx) = cursor {
        path.push(nodes[idx].position);
        cursor = nodes[idx].parent;
    }
    path.reverse();
    path
}

/// Greedy single step: the open neighbour closest (Manhattan) to `to`.
/// Ties keep the earlier of up/down/left/right; all walls yields `None`.
pub fn get_direction_to_target(from: Position, to: Position, map: &TileMap) -> Direction {
    let mut best_direction = Direction::None;
    let mut best_distance = f32::INFINITY;
    for dir in Direction::CARDINALS {
        let next = get_next_position(from, dir);
        if check_wall_collision(next, map) {
            continue;
        }
        let distance = manhattan_distance(next, to);
        if distance < best_distance {
            best_distance = distance;
            best_direction = dir;
        }
    }
    best_direction
}

pub fn get_next_tile_in_path(start: Position, goal: Position, map: &TileMap) -> Option<Position> {
    find_path(start, goal, map).get(1).copied()
}
