use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::GameConfig;
use crate::constants::{get_ghost_spawn, get_home_corner, GHOST_SPEED, PLAYER_SPAWN, PLAYER_SPEED};
use crate::rng::Rng;
use crate::types::{
    Body, Direction, GameEvent, GameStats, Ghost, GhostMode, GhostType, GhostView, Player,
    Position, Snapshot,
};
use crate::world::TileMap;

mod controller;
mod mechanics;

pub use self::mechanics::{respawn_ghost, respawn_player};

/// Complete simulation state. Owned by whoever drives the tick loop; nothing
/// here is shared across instances.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// Always the four personalities in `GhostType::ALL` order.
    pub ghosts: Vec<Ghost>,
    pub map: TileMap,
    pub level: u32,
    pub dots_remaining: u32,
    pub game_over: bool,
    pub paused: bool,
    pub timestamp: u64,
    /// Ghosts eaten since the last death or level change.
    pub ghost_eat_streak: usize,
    /// Score seen by the previous extra-life check.
    pub last_extra_life_score: u32,
    pub config: GameConfig,
    pub rng: Rng,

    layout: TileMap,
    events: Vec<GameEvent>,
}

pub fn initialize_game(map: TileMap) -> GameState {
    GameState::new(map, GameConfig::default())
}

pub fn initialize_game_with_config(map: TileMap, config: GameConfig) -> GameState {
    GameState::new(map, config)
}

impl GameState {
    pub fn new(map: TileMap, config: GameConfig) -> Self {
        let player = Player {
            body: Body {
                position: PLAYER_SPAWN,
                direction: Direction::None,
                speed: PLAYER_SPEED,
            },
            lives: config.initial_lives,
            score: 0,
            power_up_active: false,
            power_up_timer: 0,
        };
        let ghosts = GhostType::ALL.into_iter().map(create_ghost).collect();

        Self {
            player,
            ghosts,
            dots_remaining: map.count_pickups(),
            layout: map.clone(),
            map,
            level: 1,
            game_over: false,
            paused: false,
            timestamp: now_ms(),
            ghost_eat_streak: 0,
            last_extra_life_score: 0,
            rng: Rng::new(config.seed),
            config,
            events: Vec::new(),
        }
    }

    /// The layout this game reloads on every new level.
    pub fn layout(&self) -> &TileMap {
        &self.layout
    }

    pub fn blinky_position(&self) -> Option<Position> {
        self.ghosts
            .iter()
            .find(|ghost| ghost.ghost_type == GhostType::Blinky)
            .map(|ghost| ghost.body.position)
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            score: self.player.score,
            lives: self.player.lives,
            level: self.level,
            dots_remaining: self.dots_remaining,
            power_up_active: self.player.power_up_active,
            power_up_time_remaining: self.player.power_up_timer,
            game_over: self.game_over,
            paused: self.paused,
        }
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        Snapshot {
            timestamp_ms: self.timestamp,
            stats: self.stats(),
            player: self.player.body.position,
            player_dir: self.player.body.direction,
            ghosts: self
                .ghosts
                .iter()
                .map(|ghost| GhostView {
                    ghost_type: ghost.ghost_type,
                    x: ghost.body.position.x,
                    y: ghost.body.position.y,
                    dir: ghost.body.direction,
                    mode: ghost.mode,
                    target: ghost.target_tile,
                })
                .collect(),
            events: if include_events {
                self.drain_events()
            } else {
                Vec::new()
            },
        }
    }

    fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

fn create_ghost(ghost_type: GhostType) -> Ghost {
    let spawn = get_ghost_spawn(ghost_type);
    let home_corner = get_home_corner(ghost_type);
    Ghost {
        body: Body {
            position: spawn,
            direction: Direction::None,
            speed: GHOST_SPEED,
        },
        ghost_type,
        mode: GhostMode::Scatter,
        target_tile: home_corner,
        home_corner,
        spawn_position: spawn,
        mode_timer: 0,
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INITIAL_LIVES;
    use crate::maps::{generate_classic_map, generate_test_map};

    #[test]
    fn initialize_game_builds_fresh_state() {
        let map = generate_classic_map();
        let pickups = map.count_pickups();
        let state = initialize_game(map);

        assert_eq!(state.player.body.position, PLAYER_SPAWN);
        assert_eq!(state.player.lives, INITIAL_LIVES);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.dots_remaining, pickups);
        assert!(!state.game_over);
        assert!(!state.paused);
        assert!(state.timestamp > 0);
        assert_eq!(state.ghost_eat_streak, 0);

        let types: Vec<GhostType> = state.ghosts.iter().map(|g| g.ghost_type).collect();
        assert_eq!(types, GhostType::ALL.to_vec());
        for ghost in &state.ghosts {
            assert_eq!(ghost.mode, GhostMode::Scatter);
            assert_eq!(ghost.mode_timer, 0);
            assert_eq!(ghost.body.position, get_ghost_spawn(ghost.ghost_type));
            assert_eq!(ghost.home_corner, get_home_corner(ghost.ghost_type));
            assert_eq!(ghost.target_tile, ghost.home_corner);
        }
    }

    #[test]
    fn config_overrides_lives_and_seed() {
        let config = GameConfig {
            seed: 1234,
            initial_lives: 5,
            ..GameConfig::default()
        };
        let state = initialize_game_with_config(generate_test_map(), config);
        assert_eq!(state.player.lives, 5);
        assert_eq!(state.rng, Rng::new(1234));
    }

    #[test]
    fn stats_project_current_values() {
        let mut state = initialize_game(generate_test_map());
        state.player.score = 420;
        state.player.power_up_active = true;
        state.player.power_up_timer = 1_500;
        state.paused = true;
        let stats = state.stats();
        assert_eq!(stats.score, 420);
        assert_eq!(stats.lives, INITIAL_LIVES);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.dots_remaining, state.dots_remaining);
        assert!(stats.power_up_active);
        assert_eq!(stats.power_up_time_remaining, 1_500);
        assert!(!stats.game_over);
        assert!(stats.paused);
    }

    #[test]
    fn snapshot_drains_events_only_when_asked() {
        let mut state = initialize_game(generate_test_map());
        state.push_event(GameEvent::PowerUpEnded);

        let quiet = state.build_snapshot(false);
        assert!(quiet.events.is_empty());
        assert_eq!(state.pending_events().len(), 1);

        let loud = state.build_snapshot(true);
        assert_eq!(loud.events, vec![GameEvent::PowerUpEnded]);
        assert!(state.pending_events().is_empty());
        assert_eq!(loud.ghosts.len(), 4);
    }

    #[test]
    fn separate_games_keep_separate_bookkeeping() {
        let mut a = initialize_game(generate_test_map());
        let b = initialize_game(generate_test_map());
        a.ghost_eat_streak = 3;
        a.last_extra_life_score = 9_990;
        assert_eq!(b.ghost_eat_streak, 0);
        assert_eq!(b.last_extra_life_score, 0);
    }
}
