use super::*;

use crate::collision::{can_move, check_collisions};
use crate::constants::mode_phase_for_level;
use crate::geometry::get_next_position;
use crate::ghost_ai::update_ghost_ai;
use crate::ghost_mode::{check_ghost_respawn, get_ghost_speed, update_ghost_mode};
use crate::types::CollisionResult;

impl GameState {
    /// Advances the simulation by one tick. Does nothing once the game is
    /// over or while paused.
    pub fn step(&mut self, dt_ms: u64, input: Option<Direction>) {
        if self.game_over || self.paused {
            return;
        }
        self.timestamp = self.timestamp.saturating_add(dt_ms);

        if let Some(direction) = input {
            self.move_player(direction);
        }
        self.update_power_up(dt_ms);
        self.update_ghosts(dt_ms);
        self.resolve_collisions();
        self.check_extra_life();
    }

    pub fn set_player_direction(&mut self, direction: Direction) {
        self.player.body.direction = direction;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Back to a level-1 start on the current board. Tiles already eaten stay
    /// eaten; `dots_remaining` is recounted from what is left.
    pub fn reset_game(&mut self) {
        self.game_over = false;
        self.paused = false;
        self.level = 1;
        self.player.lives = self.config.initial_lives;
        self.player.score = 0;
        self.player.body.direction = Direction::None;
        self.dots_remaining = self.map.count_pickups();
        self.ghost_eat_streak = 0;
        self.last_extra_life_score = 0;
        self.rng = Rng::new(self.config.seed);
        self.events.clear();
        respawn_player(&mut self.player);
        for ghost in &mut self.ghosts {
            respawn_ghost(ghost);
            ghost.body.direction = Direction::None;
            ghost.target_tile = ghost.home_corner;
        }
    }

    fn move_player(&mut self, direction: Direction) {
        if can_move(&self.player.body, direction, &self.map) {
            self.player.body.direction = direction;
        }
        let heading = self.player.body.direction;
        if can_move(&self.player.body, heading, &self.map) {
            self.player.body.position = get_next_position(self.player.body.position, heading);
        }
    }

    fn update_ghosts(&mut self, dt_ms: u64) {
        let mode_phase = mode_phase_for_level(self.level);
        let blinky_pos = self.blinky_position();
        for idx in 0..self.ghosts.len() {
            let ghost = &mut self.ghosts[idx];
            let ghost_type = ghost.ghost_type;

            let changed = update_ghost_mode(ghost, dt_ms, mode_phase);
            let returned = check_ghost_respawn(ghost);

            let desired =
                update_ghost_ai(ghost, &self.player, &self.map, blinky_pos, &mut self.rng);
            if desired != Direction::None {
                ghost.body.direction = desired;
            }
            if can_move(&ghost.body, ghost.body.direction, &self.map) {
                ghost.body.position = get_next_position(ghost.body.position, ghost.body.direction);
                ghost.body.speed = get_ghost_speed(ghost);
            }

            if let Some(mode) = changed {
                self.push_event(GameEvent::GhostModeChanged {
                    ghost: ghost_type,
                    mode,
                });
            }
            if returned {
                self.push_event(GameEvent::GhostReturned { ghost: ghost_type });
            }
        }
    }

    fn resolve_collisions(&mut self) {
        let position = self.player.body.position;
        match check_collisions(&self.player, &self.ghosts, &self.map) {
            CollisionResult::Ghost(idx) => match self.ghosts[idx].mode {
                GhostMode::Frightened => self.handle_ghost_eaten(idx),
                GhostMode::Eaten => {}
                GhostMode::Scatter | GhostMode::Chase => {
                    self.handle_player_death();
                    self.reset_ghost_eat_streak();
                }
            },
            CollisionResult::PowerPellet => self.collect_power_pellet(position),
            CollisionResult::Dot => self.collect_dot(position),
            CollisionResult::Wall | CollisionResult::None => {}
        }
    }
}
