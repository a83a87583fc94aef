use crate::error::MapError;
use crate::types::{Position, TileType};

/// Fixed-size grid of tiles, row-major. Pickups are cleared in place; walls
/// and the ghost house never change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<TileType>,
}

impl TileMap {
    pub fn new(width: usize, height: usize, fill: TileType) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; width * height],
        }
    }

    pub fn from_rows(rows: Vec<Vec<TileType>>) -> Result<Self, MapError> {
        let Some(first) = rows.first() else {
            return Err(MapError::Empty);
        };
        let width = first.len();
        if width == 0 {
            return Err(MapError::Empty);
        }
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MapError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    actual: row.len(),
                });
            }
            tiles.extend(row);
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Strict ASCII loader: `#` wall, `O` power pellet, `H` ghost house,
    /// `.` dot, space or `=` empty. Trailing newline is ignored.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut rows = Vec::new();
        for (row_idx, line) in text.lines().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (col, symbol) in line.chars().enumerate() {
                let tile = TileType::from_symbol(symbol).ok_or(MapError::UnknownSymbol {
                    row: row_idx,
                    col,
                    symbol,
                })?;
                row.push(tile);
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Out-of-bounds reads as a wall.
    pub fn get(&self, x: i32, y: i32) -> TileType {
        self.index(x, y)
            .and_then(|idx| self.tiles.get(idx).copied())
            .unwrap_or(TileType::Wall)
    }

    /// Writes outside the grid are dropped.
    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile;
        }
    }

    pub fn tile_at(&self, pos: Position) -> TileType {
        let (x, y) = pos.tile();
        self.get(x, y)
    }

    pub fn count_pickups(&self) -> u32 {
        self.tiles.iter().filter(|tile| tile.is_pickup()).count() as u32
    }

    /// Tiles holding a dot or pellet, in row-major order.
    pub fn pickup_cells(&self) -> Vec<(i32, i32)> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_pickup())
            .map(|(idx, _)| ((idx % self.width) as i32, (idx / self.width) as i32))
            .collect()
    }

    /// Row slices top to bottom. A zero-width grid has no rows.
    pub fn rows(&self) -> impl Iterator<Item = &[TileType]> {
        self.tiles.chunks(self.width.max(1))
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            out.extend(row.iter().map(|tile| tile.symbol()));
            out.push('\n');
        }
        out
    }
}
