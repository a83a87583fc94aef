use crate::types::{Direction, Position};

pub fn manhattan_distance(a: Position, b: Position) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

pub fn euclidean_distance(a: Position, b: Position) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

pub fn positions_equal(a: Position, b: Position) -> bool {
    a.x == b.x && a.y == b.y
}

pub fn get_next_position(pos: Position, dir: Direction) -> Position {
    let (dx, dy) = dir.vector();
    Position::new(pos.x + dx, pos.y + dy)
}

pub fn is_in_bounds(pos: Position, width: usize, height: usize) -> bool {
    pos.x >= 0.0 && pos.x < width as f32 && pos.y >= 0.0 && pos.y < height as f32
}

pub fn get_opposite_direction(dir: Direction) -> Direction {
    dir.opposite()
}

/// Cardinal directions minus the reverse of `current`.
pub fn valid_directions(current: Direction) -> Vec<Direction> {
    let opposite = current.opposite();
    Direction::CARDINALS
        .into_iter()
        .filter(|dir| *dir != opposite)
        .collect()
}

pub fn to_tile_position(pos: Position, tile_size: f32) -> Position {
    Position::new((pos.x / tile_size).floor(), (pos.y / tile_size).floor())
}

pub fn to_pixel_position(pos: Position, tile_size: f32) -> Position {
    Position::new(pos.x * tile_size, pos.y * tile_size)
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Dominant-axis heading from `from` to `to`. Equal axes resolve vertically.
pub fn direction_to(from: Position, to: Position) -> Direction {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

pub fn wrap_position(pos: Position, width: usize, height: usize) -> Position {
    Position::new(
        pos.x.rem_euclid(width as f32),
        pos.y.rem_euclid(height as f32),
    )
}
