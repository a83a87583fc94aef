use super::*;

use crate::constants::{get_ghost_points, POINTS_DOT, POINTS_POWER_PELLET};
use crate::ghost_mode::{eat_ghost, frighten_ghosts};
use crate::types::TileType;

pub fn respawn_player(player: &mut Player) {
    player.body.position = PLAYER_SPAWN;
    player.power_up_active = false;
    player.power_up_timer = 0;
}

pub fn respawn_ghost(ghost: &mut Ghost) {
    ghost.body.position = ghost.spawn_position;
    ghost.body.speed = GHOST_SPEED;
    ghost.mode = GhostMode::Scatter;
    ghost.mode_timer = 0;
}

impl GameState {
    /// Clears a dot under `position`. Does nothing unless the tile holds a dot.
    pub fn collect_dot(&mut self, position: Position) {
        let (x, y) = position.tile();
        if self.map.get(x, y) != TileType::Dot {
            return;
        }
        self.map.set(x, y, TileType::Empty);
        self.player.score += POINTS_DOT;
        self.dots_remaining = self.dots_remaining.saturating_sub(1);
        self.push_event(GameEvent::DotEaten { x, y });
        if self.dots_remaining == 0 {
            self.advance_level();
        }
    }

    pub fn collect_power_pellet(&mut self, position: Position) {
        let (x, y) = position.tile();
        if self.map.get(x, y) != TileType::PowerPellet {
            return;
        }
        self.map.set(x, y, TileType::Empty);
        self.player.score += POINTS_POWER_PELLET;
        self.dots_remaining = self.dots_remaining.saturating_sub(1);
        self.push_event(GameEvent::PelletTaken { x, y });
        self.activate_power_up();
        if self.dots_remaining == 0 {
            self.advance_level();
        }
    }

    pub fn activate_power_up(&mut self) {
        let duration_ms = self.config.power_up_duration_ms;
        self.player.power_up_active = true;
        self.player.power_up_timer = duration_ms;
        frighten_ghosts(&mut self.ghosts);
        self.push_event(GameEvent::PowerUpStarted { duration_ms });
    }

    pub fn update_power_up(&mut self, dt_ms: u64) {
        if !self.player.power_up_active {
            return;
        }
        self.player.power_up_timer = self.player.power_up_timer.saturating_sub(dt_ms);
        if self.player.power_up_timer == 0 {
            self.deactivate_power_up();
        }
    }

    fn deactivate_power_up(&mut self) {
        self.player.power_up_active = false;
        self.player.power_up_timer = 0;
        for ghost in self
            .ghosts
            .iter_mut()
            .filter(|ghost| ghost.mode == GhostMode::Frightened)
        {
            ghost.mode = GhostMode::Scatter;
            ghost.mode_timer = 0;
        }
        self.push_event(GameEvent::PowerUpEnded);
    }

    /// Scores and eats the ghost at `ghost_idx` if it is frightened; any other
    /// mode is left alone.
    pub fn handle_ghost_eaten(&mut self, ghost_idx: usize) {
        let Some(ghost) = self.ghosts.get_mut(ghost_idx) else {
            return;
        };
        if ghost.mode != GhostMode::Frightened {
            return;
        }
        let points = get_ghost_points(self.ghost_eat_streak);
        let ghost_type = ghost.ghost_type;
        eat_ghost(ghost);
        self.player.score += points;
        self.ghost_eat_streak += 1;
        self.push_event(GameEvent::GhostEaten {
            ghost: ghost_type,
            points,
            streak: self.ghost_eat_streak,
        });
    }

    pub fn reset_ghost_eat_streak(&mut self) {
        self.ghost_eat_streak = 0;
    }

    /// Costs a life. The last life ends the game where it stands; otherwise
    /// everyone goes back to their spawn.
    pub fn handle_player_death(&mut self) {
        self.player.lives = self.player.lives.saturating_sub(1);
        self.push_event(GameEvent::PlayerDied {
            lives_left: self.player.lives,
        });
        if self.player.lives == 0 {
            self.game_over = true;
            self.push_event(GameEvent::GameOver {
                score: self.player.score,
            });
            return;
        }
        self.respawn_actors();
    }

    pub fn advance_level(&mut self) {
        self.level += 1;
        self.map = self.layout.clone();
        self.dots_remaining = self.map.count_pickups();
        self.respawn_actors();
        self.reset_ghost_eat_streak();
        self.push_event(GameEvent::LevelAdvanced { level: self.level });
    }

    /// Grants one life when the score enters a new multiple of the threshold
    /// since the previous call. Must run every tick.
    pub fn check_extra_life(&mut self) {
        let threshold = self.config.extra_life_threshold.max(1);
        let current = self.player.score / threshold;
        let previous = self.last_extra_life_score / threshold;
        if current > previous {
            self.player.lives += 1;
            self.push_event(GameEvent::ExtraLife {
                lives: self.player.lives,
            });
        }
        self.last_extra_life_score = self.player.score;
    }

    fn respawn_actors(&mut self) {
        respawn_player(&mut self.player);
        for ghost in &mut self.ghosts {
            respawn_ghost(ghost);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GHOST_EATEN_SPEED, POINTS_GHOST, POWER_UP_DURATION_MS};
    use crate::maps::{create_empty_map, generate_test_map};

    fn make_state() -> GameState {
        let mut map = create_empty_map(28, 31);
        map.set(3, 3, TileType::Dot);
        map.set(4, 3, TileType::Dot);
        map.set(5, 3, TileType::PowerPellet);
        initialize_game(map)
    }

    #[test]
    fn collect_dot_scores_once() {
        let mut state = make_state();
        let before = state.dots_remaining;
        let pos = Position::new(3.0, 3.0);

        state.collect_dot(pos);
        assert_eq!(state.player.score, 10);
        assert_eq!(state.dots_remaining, before - 1);
        assert_eq!(state.map.tile_at(pos), TileType::Empty);

        state.collect_dot(pos);
        assert_eq!(state.player.score, 10);
        assert_eq!(state.dots_remaining, before - 1);
    }

    #[test]
    fn collect_dot_ignores_pellet_tiles() {
        let mut state = make_state();
        state.collect_dot(Position::new(5.0, 3.0));
        assert_eq!(state.player.score, 0);
        assert_eq!(state.map.get(5, 3), TileType::PowerPellet);
    }

    #[test]
    fn collect_power_pellet_scores_and_frightens() {
        let mut state = make_state();
        state.collect_power_pellet(Position::new(5.0, 3.0));
        assert_eq!(state.player.score, 50);
        assert_eq!(state.dots_remaining, 2);
        assert!(state.player.power_up_active);
        assert_eq!(state.player.power_up_timer, POWER_UP_DURATION_MS);
        assert!(state
            .ghosts
            .iter()
            .all(|ghost| ghost.mode == GhostMode::Frightened));

        state.collect_power_pellet(Position::new(5.0, 3.0));
        assert_eq!(state.player.score, 50);
    }

    #[test]
    fn activate_power_up_spares_eaten_ghosts() {
        let mut state = make_state();
        state.ghosts[2].mode = GhostMode::Eaten;
        state.activate_power_up();
        for (idx, ghost) in state.ghosts.iter().enumerate() {
            if idx == 2 {
                assert_eq!(ghost.mode, GhostMode::Eaten);
            } else {
                assert_eq!(ghost.mode, GhostMode::Frightened);
            }
        }
    }

    #[test]
    fn power_up_expiry_returns_frightened_to_scatter() {
        let mut state = make_state();
        state.activate_power_up();
        state.ghosts[1].mode = GhostMode::Eaten;
        state.player.power_up_timer = 100;

        state.update_power_up(200);
        assert!(!state.player.power_up_active);
        assert_eq!(state.player.power_up_timer, 0);
        assert_eq!(state.ghosts[0].mode, GhostMode::Scatter);
        assert_eq!(state.ghosts[1].mode, GhostMode::Eaten);
        assert_eq!(state.ghosts[2].mode, GhostMode::Scatter);
        assert_eq!(state.ghosts[3].mode, GhostMode::Scatter);
    }

    #[test]
    fn power_up_counts_down_while_active() {
        let mut state = make_state();
        state.activate_power_up();
        state.update_power_up(1_000);
        assert!(state.player.power_up_active);
        assert_eq!(state.player.power_up_timer, POWER_UP_DURATION_MS - 1_000);

        let mut idle = make_state();
        idle.update_power_up(1_000);
        assert!(!idle.player.power_up_active);
        assert_eq!(idle.player.power_up_timer, 0);
    }

    #[test]
    fn eating_frightened_ghosts_escalates_and_caps() {
        let mut state = make_state();
        state.activate_power_up();
        for idx in 0..4 {
            state.handle_ghost_eaten(idx);
            assert_eq!(state.ghosts[idx].mode, GhostMode::Eaten);
            assert_eq!(state.ghosts[idx].body.speed, GHOST_EATEN_SPEED);
        }
        assert_eq!(state.player.score, POINTS_GHOST.iter().sum::<u32>());
        assert_eq!(state.ghost_eat_streak, 4);

        state.ghosts[0].mode = GhostMode::Frightened;
        state.handle_ghost_eaten(0);
        assert_eq!(
            state.player.score,
            POINTS_GHOST.iter().sum::<u32>() + POINTS_GHOST[3]
        );
    }

    #[test]
    fn eating_non_frightened_ghost_is_a_no_op() {
        let mut state = make_state();
        state.ghosts[0].mode = GhostMode::Chase;
        state.handle_ghost_eaten(0);
        state.handle_ghost_eaten(1);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.ghosts[0].mode, GhostMode::Chase);
        assert_eq!(state.ghosts[1].mode, GhostMode::Scatter);
        assert_eq!(state.ghost_eat_streak, 0);
        state.handle_ghost_eaten(99);
        assert_eq!(state.player.score, 0);
    }

    #[test]
    fn death_on_last_life_ends_game() {
        let mut state = make_state();
        state.player.lives = 1;
        state.player.body.position = Position::new(7.0, 7.0);
        state.handle_player_death();
        assert_eq!(state.player.lives, 0);
        assert!(state.game_over);
    }

    #[test]
    fn death_with_lives_left_respawns_everyone() {
        let mut state = make_state();
        state.player.lives = 2;
        state.player.body.position = Position::new(7.0, 7.0);
        state.player.power_up_active = true;
        state.player.power_up_timer = 3_000;
        state.ghosts[0].body.position = Position::new(1.0, 1.0);
        state.ghosts[0].mode = GhostMode::Chase;
        state.ghosts[0].mode_timer = 4_000;

        state.handle_player_death();
        assert_eq!(state.player.lives, 1);
        assert!(!state.game_over);
        assert_eq!(state.player.body.position, PLAYER_SPAWN);
        assert!(!state.player.power_up_active);
        assert_eq!(state.player.power_up_timer, 0);
        assert_eq!(state.ghosts[0].body.position, state.ghosts[0].spawn_position);
        assert_eq!(state.ghosts[0].mode, GhostMode::Scatter);
        assert_eq!(state.ghosts[0].mode_timer, 0);
    }

    #[test]
    fn clearing_the_board_advances_exactly_one_level() {
        let mut state = make_state();
        state.ghost_eat_streak = 2;
        state.collect_dot(Position::new(3.0, 3.0));
        state.collect_dot(Position::new(4.0, 3.0));
        assert_eq!(state.level, 1);
        state.collect_power_pellet(Position::new(5.0, 3.0));

        assert_eq!(state.level, 2);
        assert_eq!(state.dots_remaining, 3);
        assert_eq!(state.dots_remaining, state.map.count_pickups());
        assert_eq!(state.map.get(3, 3), TileType::Dot);
        assert_eq!(&state.map, state.layout());
        assert_eq!(state.player.body.position, PLAYER_SPAWN);
        assert_eq!(state.ghost_eat_streak, 0);
        let levels = state
            .pending_events()
            .iter()
            .filter(|event| matches!(event, GameEvent::LevelAdvanced { .. }))
            .count();
        assert_eq!(levels, 1);
    }

    #[test]
    fn extra_life_awarded_on_crossing_even_in_one_jump() {
        let mut state = make_state();
        state.player.score = 9_990;
        state.check_extra_life();
        assert_eq!(state.player.lives, 3);

        state.player.score = 10_050;
        state.check_extra_life();
        assert_eq!(state.player.lives, 4);

        state.check_extra_life();
        assert_eq!(state.player.lives, 4);

        state.player.score = 19_999;
        state.check_extra_life();
        assert_eq!(state.player.lives, 4);
        state.player.score = 20_000;
        state.check_extra_life();
        assert_eq!(state.player.lives, 5);
    }

    #[test]
    fn respawn_helpers_reset_position_and_mode() {
        let mut state = initialize_game(generate_test_map());
        let ghost = &mut state.ghosts[3];
        ghost.body.position = Position::new(2.0, 2.0);
        ghost.mode = GhostMode::Eaten;
        ghost.body.speed = GHOST_EATEN_SPEED;
        respawn_ghost(ghost);
        assert_eq!(ghost.body.position, ghost.spawn_position);
        assert_eq!(ghost.mode, GhostMode::Scatter);
        assert_eq!(ghost.body.speed, GHOST_SPEED);
    }
}
