use serde::{Deserialize, Serialize};

/// Grid coordinates. Motion is whole-tile per tick, but values are kept as
/// floats so fractional positions floor onto the tile they sit in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Integer tile this position falls in.
    pub fn tile(self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Cardinal directions in evaluation order. Steering ties resolve to the
    /// earliest entry.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn vector(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::None => (0.0, 0.0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Empty,
    Wall,
    Dot,
    PowerPellet,
    GhostHouse,
}

impl TileType {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            'O' => Some(Self::PowerPellet),
            'H' => Some(Self::GhostHouse),
            '.' => Some(Self::Dot),
            ' ' | '=' => Some(Self::Empty),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall => '#',
            Self::Dot => '.',
            Self::PowerPellet => 'O',
            Self::GhostHouse => 'H',
        }
    }

    pub fn is_pickup(self) -> bool {
        matches!(self, Self::Dot | Self::PowerPellet)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostType {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostType {
    /// Fixed creation order of the four ghosts.
    pub const ALL: [GhostType; 4] = [
        GhostType::Blinky,
        GhostType::Pinky,
        GhostType::Inky,
        GhostType::Clyde,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened,
    Eaten,
}

/// Kinematic state shared by the player and the ghosts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Body {
    pub position: Position,
    pub direction: Direction,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Player {
    pub body: Body,
    pub lives: u32,
    pub score: u32,
    #[serde(rename = "powerUpActive")]
    pub power_up_active: bool,
    #[serde(rename = "powerUpTimer")]
    pub power_up_timer: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ghost {
    pub body: Body,
    #[serde(rename = "type")]
    pub ghost_type: GhostType,
    pub mode: GhostMode,
    #[serde(rename = "targetTile")]
    pub target_tile: Position,
    #[serde(rename = "homeCorner")]
    pub home_corner: Position,
    #[serde(rename = "spawnPosition")]
    pub spawn_position: Position,
    #[serde(rename = "modeTimer")]
    pub mode_timer: u64,
}

/// Outcome of the per-tick collision query, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionResult {
    None,
    Wall,
    /// Index into the ghost list of the first ghost in range.
    Ghost(usize),
    PowerPellet,
    Dot,
}

impl CollisionResult {
    pub fn collided(self) -> bool {
        self != Self::None
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameStats {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    #[serde(rename = "dotsRemaining")]
    pub dots_remaining: u32,
    #[serde(rename = "powerUpActive")]
    pub power_up_active: bool,
    #[serde(rename = "powerUpTimeRemaining")]
    pub power_up_time_remaining: u64,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    pub paused: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    DotEaten {
        x: i32,
        y: i32,
    },
    PelletTaken {
        x: i32,
        y: i32,
    },
    PowerUpStarted {
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
    PowerUpEnded,
    GhostEaten {
        ghost: GhostType,
        points: u32,
        streak: usize,
    },
    GhostReturned {
        ghost: GhostType,
    },
    GhostModeChanged {
        ghost: GhostType,
        mode: GhostMode,
    },
    PlayerDied {
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    GameOver {
        score: u32,
    },
    LevelAdvanced {
        level: u32,
    },
    ExtraLife {
        lives: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    #[serde(rename = "type")]
    pub ghost_type: GhostType,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    pub mode: GhostMode,
    pub target: Position,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: u64,
    pub stats: GameStats,
    pub player: Position,
    #[serde(rename = "playerDir")]
    pub player_dir: Direction,
    pub ghosts: Vec<GhostView>,
    pub events: Vec<GameEvent>,
}
