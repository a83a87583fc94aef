use crate::constants::GHOST_COLLISION_THRESHOLD;
use crate::geometry::{get_next_position, is_in_bounds};
use crate::types::{Body, CollisionResult, Direction, Ghost, Player, Position, TileType};
use crate::world::TileMap;

/// Out-of-bounds counts as a wall. Edge tunnels exist only inside path search.
pub fn check_wall_collision(pos: Position, map: &TileMap) -> bool {
    if !is_in_bounds(pos, map.width(), map.height()) {
        return true;
    }
    map.tile_at(pos) == TileType::Wall
}

pub fn can_move(body: &Body, direction: Direction, map: &TileMap) -> bool {
    let next = get_next_position(body.position, direction);
    !check_wall_collision(next, map)
}

/// Axis-aligned proximity box: both deltas must be strictly under `threshold`.
pub fn check_ghost_collision(player_pos: Position, ghost_pos: Position, threshold: f32) -> bool {
    let dx = (player_pos.x - ghost_pos.x).abs();
    let dy = (player_pos.y - ghost_pos.y).abs();
    dx < threshold && dy < threshold
}

/// Index of the first ghost in list order that touches the player.
pub fn check_all_ghost_collisions(player: &Player, ghosts: &[Ghost]) -> Option<usize> {
    ghosts.iter().position(|ghost| {
        check_ghost_collision(
            player.body.position,
            ghost.body.position,
            GHOST_COLLISION_THRESHOLD,
        )
    })
}

pub fn get_tile_at(pos: Position, map: &TileMap) -> TileType {
    map.tile_at(pos)
}

pub fn check_dot_collision(pos: Position, map: &TileMap) -> bool {
    get_tile_at(pos, map) == TileType::Dot
}

pub fn check_power_pellet_collision(pos: Position, map: &TileMap) -> bool {
    get_tile_at(pos, map) == TileType::PowerPellet
}

/// Ghost contact wins over anything on the same tile, then wall, pellet, dot.
pub fn check_collisions(player: &Player, ghosts: &[Ghost], map: &TileMap) -> CollisionResult {
    if let Some(idx) = check_all_ghost_collisions(player, ghosts) {
        return CollisionResult::Ghost(idx);
    }
    let pos = player.body.position;
    if check_wall_collision(pos, map) {
        return CollisionResult::Wall;
    }
    if check_power_pellet_collision(pos, map) {
        return CollisionResult::PowerPellet;
    }
    if check_dot_collision(pos, map) {
        return CollisionResult::Dot;
    }
    CollisionResult::None
}

pub fn get_valid_adjacent_positions(pos: Position, map: &TileMap) -> Vec<Position> {
    Direction::CARDINALS
        .into_iter()
        .map(|dir| get_next_position(pos, dir))
        .filter(|next| !check_wall_collision(*next, map))
        .collect()
}

pub fn is_intersection(pos: Position, map: &TileMap) -> bool {
    get_valid_adjacent_positions(pos, map).len() > 2
}

pub fn on_same_tile(a: &Body, b: &Body) -> bool {
    a.position.tile() == b.position.tile()
}
