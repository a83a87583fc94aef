//! Ghost mode state machine: timed scatter/chase cycling, with frightened and
//! eaten as externally driven overrides.

use crate::constants::{
    get_mode_timing, GHOST_EATEN_SPEED, GHOST_FRIGHTENED_SPEED, GHOST_HOUSE_CENTER, GHOST_SPEED,
};
use crate::geometry::manhattan_distance;
use crate::types::{Ghost, GhostMode};

/// Advances the scatter/chase timer. Returns the new mode when a transition
/// fired this call.
pub fn update_ghost_mode(ghost: &mut Ghost, dt_ms: u64, mode_phase: usize) -> Option<GhostMode> {
    if matches!(ghost.mode, GhostMode::Frightened | GhostMode::Eaten) {
        return None;
    }

    ghost.mode_timer = ghost.mode_timer.saturating_add(dt_ms);
    let timing = get_mode_timing(mode_phase);

    let next = match ghost.mode {
        GhostMode::Scatter if ghost.mode_timer >= timing.scatter_ms => GhostMode::Chase,
        GhostMode::Chase
            if timing
                .chase_ms
                .is_some_and(|chase_ms| ghost.mode_timer >= chase_ms) =>
        {
            GhostMode::Scatter
        }
        _ => return None,
    };
    ghost.mode = next;
    ghost.mode_timer = 0;
    Some(next)
}

/// Every ghost that is not eaten turns frightened and flips its heading.
/// The duration is tracked by the player's power-up timer, not per ghost.
pub fn frighten_ghosts(ghosts: &mut [Ghost]) {
    for ghost in ghosts.iter_mut().filter(|ghost| ghost.mode != GhostMode::Eaten) {
        ghost.mode = GhostMode::Frightened;
        ghost.mode_timer = 0;
        ghost.body.direction = ghost.body.direction.opposite();
    }
}

/// Callers only eat frightened ghosts.
pub fn eat_ghost(ghost: &mut Ghost) {
    ghost.mode = GhostMode::Eaten;
    ghost.mode_timer = 0;
    ghost.body.speed = GHOST_EATEN_SPEED;
}

/// An eaten ghost that has reached the house centre resumes scatter.
pub fn check_ghost_respawn(ghost: &mut Ghost) -> bool {
    if ghost.mode != GhostMode::Eaten {
        return false;
    }
    if manhattan_distance(ghost.body.position, GHOST_HOUSE_CENTER) >= 1.0 {
        return false;
    }
    ghost.mode = GhostMode::Scatter;
    ghost.body.speed = GHOST_SPEED;
    ghost.mode_timer = 0;
    true
}

pub fn get_ghost_speed(ghost: &Ghost) -> f32 {
    match ghost.mode {
        GhostMode::Frightened => GHOST_FRIGHTENED_SPEED,
        GhostMode::Eaten => GHOST_EATEN_SPEED,
        GhostMode::Scatter | GhostMode::Chase => GHOST_SPEED,
    }
}
