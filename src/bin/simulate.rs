use anyhow::{anyhow, Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, ValueEnum};
use pacman_sim::collision::can_move;
use pacman_sim::config::GameConfig;
use pacman_sim::constants::DEFAULT_TICK_MS;
use pacman_sim::engine::{initialize_game_with_config, GameState};
use pacman_sim::geometry::{direction_to, manhattan_distance};
use pacman_sim::maps::{generate_classic_map, generate_test_map};
use pacman_sim::pathfinding::{get_direction_to_target, get_next_tile_in_path};
use pacman_sim::types::{Direction, GameEvent, GhostMode, Position};
use pacman_sim::world::TileMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Layout {
    Classic,
    Test,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value_t = 1)]
    runs: usize,
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long, value_enum, default_value_t = Layout::Classic)]
    layout: Layout,
    /// ASCII map file; overrides --layout.
    #[arg(long)]
    map: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct RunResultLine {
    run: usize,
    seed: u32,
    ticks: u64,
    score: u32,
    lives: u32,
    level: u32,
    #[serde(rename = "dotsRemaining")]
    dots_remaining: u32,
    #[serde(rename = "dotsEaten")]
    dots_eaten: u32,
    #[serde(rename = "pelletsTaken")]
    pellets_taken: u32,
    #[serde(rename = "ghostsEaten")]
    ghosts_eaten: u32,
    deaths: u32,
    #[serde(rename = "extraLives")]
    extra_lives: u32,
    #[serde(rename = "gameOver")]
    game_over: bool,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct NotableEvent {
    tick: u64,
    event: GameEvent,
}

#[derive(Clone, Debug)]
struct RunOutcome {
    result: RunResultLine,
    anomaly_records: Vec<AnomalyRecord>,
    notable_events: Vec<NotableEvent>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "runCount")]
    run_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "maxLevel")]
    max_level: u32,
    #[serde(rename = "gameOverCount")]
    game_over_count: usize,
    runs: Vec<RunResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.runs == 0 {
        return Err(anyhow!("--runs must be at least 1"));
    }
    if cli.tick_ms == 0 {
        return Err(anyhow!("--tick-ms must be positive"));
    }

    let (config, config_seed) = match cli.config.as_ref() {
        Some(path) => {
            let config = GameConfig::load(path)
                .with_context(|| format!("failed loading config {}", path.display()))?;
            let seed = config.seed;
            (config, Some(seed))
        }
        None => (GameConfig::default(), None),
    };
    let map = load_map(&cli)?;
    let base_seed = cli
        .seed
        .or(config_seed)
        .unwrap_or_else(rand::random::<u32>);

    let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(base_seed, now_ms()));
    let mut has_anomaly = false;
    let mut total_anomalies = 0usize;
    let mut results = Vec::new();

    for run in 0..cli.runs {
        let seed = base_seed.wrapping_add(run as u32);
        emit_log(
            "info",
            "run_started",
            &match_id,
            Some(run),
            Some(seed),
            None,
            json!({
                "ticks": cli.ticks,
                "tickMs": cli.tick_ms,
                "width": map.width(),
                "height": map.height(),
                "pickups": map.count_pickups(),
            }),
        );

        let outcome = run_simulation(
            &map,
            GameConfig {
                seed,
                ..config.clone()
            },
            run,
            cli.ticks,
            cli.tick_ms,
        );

        for notable in &outcome.notable_events {
            emit_log(
                "info",
                event_key(&notable.event),
                &match_id,
                Some(run),
                Some(seed),
                Some(notable.tick),
                serde_json::to_value(&notable.event).unwrap_or(Value::Null),
            );
        }
        for anomaly in &outcome.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &match_id,
                Some(run),
                Some(seed),
                Some(anomaly.tick),
                json!({
                    "message": anomaly.message,
                }),
            );
        }

        if !outcome.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += outcome.anomaly_records.len();

        emit_log(
            "info",
            "run_finished",
            &match_id,
            Some(run),
            Some(seed),
            Some(outcome.result.ticks),
            json!({
                "score": outcome.result.score,
                "level": outcome.result.level,
                "gameOver": outcome.result.game_over,
                "anomalyCount": outcome.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&outcome.result).context("run result should serialize")?
        );
        results.push(outcome.result);
    }

    let finished_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let summary =
        build_run_summary(match_id.clone(), started_at, finished_at, results, total_anomalies);

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &match_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "simulation_finished",
        &match_id,
        None,
        None,
        None,
        json!({
            "runCount": summary.run_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "maxLevel": summary.max_level,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
    Ok(())
}

fn load_map(cli: &Cli) -> Result<TileMap> {
    if let Some(path) = cli.map.as_ref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading map {}", path.display()))?;
        return TileMap::parse(&text)
            .with_context(|| format!("failed parsing map {}", path.display()));
    }
    Ok(match cli.layout {
        Layout::Classic => generate_classic_map(),
        Layout::Test => generate_test_map(),
    })
}

fn run_simulation(
    map: &TileMap,
    config: GameConfig,
    run: usize,
    ticks: u64,
    tick_ms: u64,
) -> RunOutcome {
    let seed = config.seed;
    let mut state = initialize_game_with_config(map.clone(), config);
    let mut anomalies = AnomalyLog::default();
    let mut notable_events = Vec::new();
    let mut dots_eaten = 0;
    let mut pellets_taken = 0;
    let mut ghosts_eaten = 0;
    let mut deaths = 0;
    let mut extra_lives = 0;
    let mut last_tick = 0u64;

    for tick in 1..=ticks {
        if state.game_over {
            break;
        }
        let input = choose_input(&state);
        state.step(tick_ms, Some(input));
        last_tick = tick;

        let snapshot = state.build_snapshot(true);
        for event in snapshot.events {
            match event {
                GameEvent::DotEaten { .. } => dots_eaten += 1,
                GameEvent::PelletTaken { .. } => pellets_taken += 1,
                GameEvent::GhostEaten { .. } => ghosts_eaten += 1,
                GameEvent::PlayerDied { .. } => deaths += 1,
                GameEvent::ExtraLife { .. } => extra_lives += 1,
                _ => {}
            }
            if is_notable(&event) {
                notable_events.push(NotableEvent { tick, event });
            }
        }
        for message in collect_state_anomalies(&state) {
            anomalies.record(tick, message);
        }
    }

    RunOutcome {
        result: RunResultLine {
            run,
            seed,
            ticks: last_tick,
            score: state.player.score,
            lives: state.player.lives,
            level: state.level,
            dots_remaining: state.dots_remaining,
            dots_eaten,
            pellets_taken,
            ghosts_eaten,
            deaths,
            extra_lives,
            game_over: state.game_over,
            anomalies: anomalies.distinct,
        },
        anomaly_records: anomalies.records,
        notable_events,
    }
}

/// Heads for the nearest pickup along an A* route. Falls back to greedy
/// steering when the route is empty or its next step crosses a map edge.
fn choose_input(state: &GameState) -> Direction {
    let from = state.player.body.position;
    let Some(goal) = nearest_pickup(state) else {
        return state.player.body.direction;
    };
    if let Some(next) = get_next_tile_in_path(from, goal, &state.map) {
        if manhattan_distance(from, next) == 1.0 {
            let direction = direction_to(from, next);
            if can_move(&state.player.body, direction, &state.map) {
                return direction;
            }
        }
    }
    match get_direction_to_target(from, goal, &state.map) {
        Direction::None => state.player.body.direction,
        direction => direction,
    }
}

fn nearest_pickup(state: &GameState) -> Option<Position> {
    let from = state.player.body.position;
    state
        .map
        .pickup_cells()
        .into_iter()
        .map(|(x, y)| Position::new(x as f32, y as f32))
        .min_by(|a, b| manhattan_distance(from, *a).total_cmp(&manhattan_distance(from, *b)))
}

fn collect_state_anomalies(state: &GameState) -> Vec<String> {
    let mut anomalies = Vec::new();
    let pickups = state.map.count_pickups();
    if state.dots_remaining != pickups {
        anomalies.push(format!(
            "dot count drift: dotsRemaining={} map={}",
            state.dots_remaining, pickups
        ));
    }
    if state.game_over != (state.player.lives == 0) {
        anomalies.push(format!(
            "lives/game-over mismatch: lives={} gameOver={}",
            state.player.lives, state.game_over
        ));
    }
    if !state.player.power_up_active && state.player.power_up_timer > 0 {
        anomalies.push(format!(
            "inactive power-up with timer {}",
            state.player.power_up_timer
        ));
    }
    if !state.player.power_up_active
        && state
            .ghosts
            .iter()
            .any(|ghost| ghost.mode == GhostMode::Frightened)
    {
        anomalies.push("frightened ghost without power-up".to_string());
    }
    anomalies
}

fn is_notable(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::PlayerDied { .. }
            | GameEvent::GameOver { .. }
            | GameEvent::LevelAdvanced { .. }
            | GameEvent::ExtraLife { .. }
    )
}

fn event_key(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::DotEaten { .. } => "dot_eaten",
        GameEvent::PelletTaken { .. } => "pellet_taken",
        GameEvent::PowerUpStarted { .. } => "power_up_started",
        GameEvent::PowerUpEnded => "power_up_ended",
        GameEvent::GhostEaten { .. } => "ghost_eaten",
        GameEvent::GhostReturned { .. } => "ghost_returned",
        GameEvent::GhostModeChanged { .. } => "ghost_mode_changed",
        GameEvent::PlayerDied { .. } => "player_died",
        GameEvent::GameOver { .. } => "game_over",
        GameEvent::LevelAdvanced { .. } => "level_advanced",
        GameEvent::ExtraLife { .. } => "extra_life",
    }
}

/// Invariant breaks seen during one run. Every occurrence is kept with its
/// tick; the result line lists each message once, in first-seen order.
#[derive(Debug, Default)]
struct AnomalyLog {
    records: Vec<AnomalyRecord>,
    distinct: Vec<String>,
}

impl AnomalyLog {
    fn record(&mut self, tick: u64, message: String) {
        if !self.distinct.contains(&message) {
            self.distinct.push(message.clone());
        }
        self.records.push(AnomalyRecord { tick, message });
    }
}

fn default_match_id(seed: u32, started_ms: u64) -> String {
    format!("pacman-{seed}-{started_ms}")
}

fn build_run_summary(
    match_id: String,
    started_at: String,
    finished_at: String,
    runs: Vec<RunResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let run_count = runs.len();
    let total_score: u64 = runs.iter().map(|run| u64::from(run.score)).sum();
    let average_score = if run_count == 0 {
        0
    } else {
        (total_score / run_count as u64) as u32
    };
    RunSummary {
        match_id,
        started_at,
        finished_at,
        run_count,
        anomaly_count,
        average_score,
        max_level: runs.iter().map(|run| run.level).max().unwrap_or(0),
        game_over_count: runs.iter().filter(|run| run.game_over).count(),
        runs,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    match_id: &str,
    run: Option<usize>,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        match_id: match_id.to_string(),
        run,
        seed,
        tick,
        details,
    };
    if let Ok(line) = serde_json::to_string(&log_line) {
        eprintln!("{line}");
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}
