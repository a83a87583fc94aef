//! Per-personality target selection and the per-tick steering decision.

use crate::collision::check_wall_collision;
use crate::constants::{CLYDE_SHY_DISTANCE, GHOST_HOUSE_CENTER, INKY_LOOKAHEAD, PINKY_LOOKAHEAD};
use crate::geometry::{euclidean_distance, get_next_position};
use crate::pathfinding::get_direction_to_target;
use crate::rng::Rng;
use crate::types::{Direction, Ghost, GhostMode, GhostType, Player, Position};
use crate::world::TileMap;

/// Goal tile for `ghost` this tick. `blinky_pos` anchors Inky's pincer; when
/// absent Inky anchors on itself.
pub fn calculate_target_tile(
    ghost: &Ghost,
    player: &Player,
    blinky_pos: Option<Position>,
) -> Position {
    match ghost.mode {
        GhostMode::Eaten => GHOST_HOUSE_CENTER,
        GhostMode::Scatter => ghost.home_corner,
        GhostMode::Frightened => ghost.target_tile,
        GhostMode::Chase => chase_target(ghost, player, blinky_pos),
    }
}

fn chase_target(ghost: &Ghost, player: &Player, blinky_pos: Option<Position>) -> Position {
    match ghost.ghost_type {
        GhostType::Blinky => player.body.position,
        GhostType::Pinky => pinky_target(player),
        GhostType::Inky => inky_target(player, blinky_pos.unwrap_or(ghost.body.position)),
        GhostType::Clyde => clyde_target(player, ghost.body.position, ghost.home_corner),
    }
}

/// Four tiles ahead of the player. Facing up also shifts four tiles left,
/// as the arcade overflow did.
fn pinky_target(player: &Player) -> Position {
    let Position { mut x, mut y } = player.body.position;
    match player.body.direction {
        Direction::Up => {
            y -= PINKY_LOOKAHEAD;
            x -= PINKY_LOOKAHEAD;
        }
        Direction::Down => y += PINKY_LOOKAHEAD,
        Direction::Left => x -= PINKY_LOOKAHEAD,
        Direction::Right => x += PINKY_LOOKAHEAD,
        Direction::None => {}
    }
    Position::new(x, y)
}

/// `blinky + 2 * (pivot - blinky)` with the pivot two tiles ahead of the player.
fn inky_target(player: &Player, blinky_pos: Position) -> Position {
    let (dx, dy) = player.body.direction.vector();
    let pivot = Position::new(
        player.body.position.x + dx * INKY_LOOKAHEAD,
        player.body.position.y + dy * INKY_LOOKAHEAD,
    );
    Position::new(
        blinky_pos.x + (pivot.x - blinky_pos.x) * 2.0,
        blinky_pos.y + (pivot.y - blinky_pos.y) * 2.0,
    )
}

fn clyde_target(player: &Player, clyde_pos: Position, home_corner: Position) -> Position {
    if euclidean_distance(clyde_pos, player.body.position) > CLYDE_SHY_DISTANCE {
        player.body.position
    } else {
        home_corner
    }
}

/// Refreshes `ghost.target_tile` and returns the heading the ghost wants.
/// Frightened ghosts wander randomly; everyone else steers greedily.
pub fn update_ghost_ai(
    ghost: &mut Ghost,
    player: &Player,
    map: &TileMap,
    blinky_pos: Option<Position>,
    rng: &mut Rng,
) -> Direction {
    ghost.target_tile = calculate_target_tile(ghost, player, blinky_pos);
    if ghost.mode == GhostMode::Frightened {
        return random_direction(ghost, map, rng);
    }
    get_direction_to_target(ghost.body.position, ghost.target_tile, map)
}

/// Uniform pick among open headings that do not reverse the ghost. With no
/// such heading the current one is kept.
fn random_direction(ghost: &Ghost, map: &TileMap, rng: &mut Rng) -> Direction {
    let reverse = ghost.body.direction.opposite();
    let options: Vec<Direction> = Direction::CARDINALS
        .into_iter()
        .filter(|dir| *dir != reverse)
        .filter(|dir| !check_wall_collision(get_next_position(ghost.body.position, *dir), map))
        .collect();
    rng.pick(&options).unwrap_or(ghost.body.direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{get_ghost_spawn, get_home_corner, GHOST_SPEED};
    use crate::maps::create_empty_map;
    use crate::types::{Body, TileType};

    fn make_player(x: f32, y: f32, direction: Direction) -> Player {
        Player {
            body: Body {
                position: Position::new(x, y),
                direction,
                speed: 2.0,
            },
            lives: 3,
            score: 0,
            power_up_active: false,
            power_up_timer: 0,
        }
    }

    fn make_ghost(ghost_type: GhostType, mode: GhostMode, x: f32, y: f32) -> Ghost {
        Ghost {
            body: Body {
                position: Position::new(x, y),
                direction: Direction::None,
                speed: GHOST_SPEED,
            },
            ghost_type,
            mode,
            target_tile: Position::new(-3.0, -3.0),
            home_corner: get_home_corner(ghost_type),
            spawn_position: get_ghost_spawn(ghost_type),
            mode_timer: 0,
        }
    }

    #[test]
    fn eaten_ghost_heads_home_regardless_of_type() {
        let player = make_player(5.0, 5.0, Direction::Left);
        for ghost_type in GhostType::ALL {
            let ghost = make_ghost(ghost_type, GhostMode::Eaten, 1.0, 1.0);
            assert_eq!(
                calculate_target_tile(&ghost, &player, None),
                GHOST_HOUSE_CENTER
            );
        }
    }

    #[test]
    fn scatter_targets_home_corner() {
        let player = make_player(5.0, 5.0, Direction::Left);
        let ghost = make_ghost(GhostType::Inky, GhostMode::Scatter, 1.0, 1.0);
        assert_eq!(
            calculate_target_tile(&ghost, &player, None),
            get_home_corner(GhostType::Inky)
        );
    }

    #[test]
    fn frightened_keeps_previous_target() {
        let player = make_player(5.0, 5.0, Direction::Left);
        let ghost = make_ghost(GhostType::Pinky, GhostMode::Frightened, 1.0, 1.0);
        assert_eq!(
            calculate_target_tile(&ghost, &player, None),
            Position::new(-3.0, -3.0)
        );
    }

    #[test]
    fn blinky_chases_player_position() {
        let player = make_player(7.0, 3.0, Direction::Right);
        let ghost = make_ghost(GhostType::Blinky, GhostMode::Chase, 1.0, 1.0);
        assert_eq!(
            calculate_target_tile(&ghost, &player, None),
            Position::new(7.0, 3.0)
        );
    }

    #[test]
    fn pinky_leads_player_and_keeps_the_up_quirk() {
        let ghost = make_ghost(GhostType::Pinky, GhostMode::Chase, 1.0, 1.0);
        let up = make_player(10.0, 10.0, Direction::Up);
        assert_eq!(
            calculate_target_tile(&ghost, &up, None),
            Position::new(6.0, 6.0)
        );
        let right = make_player(10.0, 10.0, Direction::Right);
        assert_eq!(
            calculate_target_tile(&ghost, &right, None),
            Position::new(14.0, 10.0)
        );
        let down = make_player(10.0, 10.0, Direction::Down);
        assert_eq!(
            calculate_target_tile(&ghost, &down, None),
            Position::new(10.0, 14.0)
        );
        let idle = make_player(10.0, 10.0, Direction::None);
        assert_eq!(
            calculate_target_tile(&ghost, &idle, None),
            Position::new(10.0, 10.0)
        );
    }

    #[test]
    fn inky_doubles_vector_from_blinky() {
        let ghost = make_ghost(GhostType::Inky, GhostMode::Chase, 20.0, 20.0);
        let player = make_player(10.0, 10.0, Direction::Right);
        // pivot (12,10); blinky (8,6) -> (8 + 8, 6 + 8)
        assert_eq!(
            calculate_target_tile(&ghost, &player, Some(Position::new(8.0, 6.0))),
            Position::new(16.0, 14.0)
        );
    }

    #[test]
    fn inky_without_blinky_anchors_on_itself() {
        let ghost = make_ghost(GhostType::Inky, GhostMode::Chase, 20.0, 20.0);
        let player = make_player(10.0, 10.0, Direction::Down);
        // pivot (10,12); anchor (20,20) -> (0, 4)
        assert_eq!(
            calculate_target_tile(&ghost, &player, None),
            Position::new(0.0, 4.0)
        );
    }

    #[test]
    fn clyde_is_shy_within_eight_tiles() {
        let player = make_player(10.0, 10.0, Direction::Left);
        let far = make_ghost(GhostType::Clyde, GhostMode::Chase, 10.0, 19.0);
        assert_eq!(
            calculate_target_tile(&far, &player, None),
            Position::new(10.0, 10.0)
        );
        let near = make_ghost(GhostType::Clyde, GhostMode::Chase, 10.0, 18.0);
        assert_eq!(
            calculate_target_tile(&near, &player, None),
            get_home_corner(GhostType::Clyde)
        );
    }

    #[test]
    fn update_ghost_ai_stores_target_and_steers_greedily() {
        let map = create_empty_map(10, 10);
        let player = make_player(8.0, 5.0, Direction::Left);
        let mut ghost = make_ghost(GhostType::Blinky, GhostMode::Chase, 2.0, 5.0);
        let mut rng = Rng::new(3);
        let dir = update_ghost_ai(&mut ghost, &player, &map, None, &mut rng);
        assert_eq!(dir, Direction::Right);
        assert_eq!(ghost.target_tile, Position::new(8.0, 5.0));
    }

    #[test]
    fn frightened_ghost_never_reverses_or_enters_walls() {
        let mut map = create_empty_map(5, 5);
        map.set(2, 1, TileType::Wall);
        let player = make_player(0.0, 0.0, Direction::None);
        for seed in 0..200u32 {
            let mut ghost = make_ghost(GhostType::Clyde, GhostMode::Frightened, 2.0, 2.0);
            ghost.body.direction = Direction::Right;
            let mut rng = Rng::new(seed);
            let dir = update_ghost_ai(&mut ghost, &player, &map, None, &mut rng);
            assert_ne!(dir, Direction::Left);
            assert_ne!(dir, Direction::Up);
            assert_ne!(dir, Direction::None);
        }
    }

    #[test]
    fn frightened_ghost_in_dead_end_keeps_heading() {
        let mut map = create_empty_map(3, 3);
        map.set(1, 0, TileType::Wall);
        map.set(0, 1, TileType::Wall);
        map.set(2, 1, TileType::Wall);
        let player = make_player(0.0, 0.0, Direction::None);
        let mut ghost = make_ghost(GhostType::Pinky, GhostMode::Frightened, 1.0, 1.0);
        ghost.body.direction = Direction::Up;
        let mut rng = Rng::new(11);
        let dir = update_ghost_ai(&mut ghost, &player, &map, None, &mut rng);
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn frightened_steering_is_reproducible_per_seed() {
        let map = create_empty_map(9, 9);
        let player = make_player(0.0, 0.0, Direction::None);
        let run = |seed: u32| {
            let mut rng = Rng::new(seed);
            (0..16)
                .map(|_| {
                    let mut ghost =
                        make_ghost(GhostType::Inky, GhostMode::Frightened, 4.0, 4.0);
                    update_ghost_ai(&mut ghost, &player, &map, None, &mut rng)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }
}
