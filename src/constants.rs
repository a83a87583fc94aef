use crate::types::{GhostType, Position};

pub const DEFAULT_TICK_MS: u64 = 16;
pub const TILE_SIZE: f32 = 8.0;

pub const MAP_WIDTH: usize = 28;
pub const MAP_HEIGHT: usize = 31;

pub const PLAYER_SPEED: f32 = 2.0;
pub const PLAYER_SPAWN: Position = Position::new(14.0, 23.0);
pub const INITIAL_LIVES: u32 = 3;
pub const POWER_UP_DURATION_MS: u64 = 6_000;

pub const GHOST_SPEED: f32 = 1.8;
pub const GHOST_FRIGHTENED_SPEED: f32 = 0.9;
pub const GHOST_EATEN_SPEED: f32 = 4.0;
pub const GHOST_HOUSE_CENTER: Position = Position::new(14.0, 14.0);

pub const GHOST_COLLISION_THRESHOLD: f32 = 0.5;
pub const PINKY_LOOKAHEAD: f32 = 4.0;
pub const INKY_LOOKAHEAD: f32 = 2.0;
pub const CLYDE_SHY_DISTANCE: f32 = 8.0;

pub const POINTS_DOT: u32 = 10;
pub const POINTS_POWER_PELLET: u32 = 50;
pub const POINTS_GHOST: [u32; 4] = [200, 400, 800, 1_600];
pub const EXTRA_LIFE_THRESHOLD: u32 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeTiming {
    pub scatter_ms: u64,
    /// `None` keeps the ghosts chasing forever.
    pub chase_ms: Option<u64>,
}

pub const MODE_TIMINGS: [ModeTiming; 4] = [
    ModeTiming {
        scatter_ms: 7_000,
        chase_ms: Some(20_000),
    },
    ModeTiming {
        scatter_ms: 7_000,
        chase_ms: Some(20_000),
    },
    ModeTiming {
        scatter_ms: 5_000,
        chase_ms: Some(20_000),
    },
    ModeTiming {
        scatter_ms: 5_000,
        chase_ms: None,
    },
];

pub fn get_mode_timing(mode_phase: usize) -> ModeTiming {
    MODE_TIMINGS[mode_phase.min(MODE_TIMINGS.len() - 1)]
}

/// Levels bucket into mode phases: level 1 is phase 0, and every level past
/// the table's end reuses the final (endless chase) phase.
pub fn mode_phase_for_level(level: u32) -> usize {
    (level.saturating_sub(1) as usize).min(MODE_TIMINGS.len() - 1)
}

pub fn get_ghost_spawn(ghost_type: GhostType) -> Position {
    match ghost_type {
        GhostType::Blinky => Position::new(14.0, 11.0),
        GhostType::Pinky => Position::new(14.0, 14.0),
        GhostType::Inky => Position::new(12.0, 14.0),
        GhostType::Clyde => Position::new(16.0, 14.0),
    }
}

pub fn get_home_corner(ghost_type: GhostType) -> Position {
    match ghost_type {
        GhostType::Blinky => Position::new(25.0, 0.0),
        GhostType::Pinky => Position::new(2.0, 0.0),
        GhostType::Inky => Position::new(27.0, 30.0),
        GhostType::Clyde => Position::new(0.0, 30.0),
    }
}

pub fn get_ghost_points(streak: usize) -> u32 {
    POINTS_GHOST[streak.min(POINTS_GHOST.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_bucket_into_mode_phases() {
        assert_eq!(mode_phase_for_level(0), 0);
        assert_eq!(mode_phase_for_level(1), 0);
        assert_eq!(mode_phase_for_level(3), 2);
        assert_eq!(mode_phase_for_level(4), 3);
        assert_eq!(mode_phase_for_level(40), 3);
        assert_eq!(get_mode_timing(9).chase_ms, None);
    }

    #[test]
    fn ghost_points_cap_at_last_entry() {
        assert_eq!(get_ghost_points(0), 200);
        assert_eq!(get_ghost_points(3), 1_600);
        assert_eq!(get_ghost_points(7), 1_600);
    }

    #[test]
    fn each_ghost_has_distinct_spawn_and_corner() {
        for (idx, a) in GhostType::ALL.iter().enumerate() {
            for b in &GhostType::ALL[idx + 1..] {
                assert_ne!(get_ghost_spawn(*a), get_ghost_spawn(*b));
                assert_ne!(get_home_corner(*a), get_home_corner(*b));
            }
        }
    }
}
