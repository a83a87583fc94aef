use crate::constants::{MAP_HEIGHT, MAP_WIDTH};
use crate::types::TileType;
use crate::world::TileMap;

const CLASSIC_TEMPLATE: [&str; MAP_HEIGHT] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#O####.#####.##.#####.####O#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###==### ##.#     ",
    "######.## #HHHHHH# ##.######",
    "      .   #HHHHHH#   .      ",
    "######.## #HHHHHH# ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#O..##................##..O#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Bordered test maze: ghost house in the middle, pellets in the corners,
/// a lattice of pillar walls and a split down the centre column.
pub fn generate_test_map() -> TileMap {
    let mut map = TileMap::new(MAP_WIDTH, MAP_HEIGHT, TileType::Dot);
    let (w, h) = (MAP_WIDTH as i32, MAP_HEIGHT as i32);
    for y in 0..h {
        for x in 0..w {
            let tile = if x == 0 || x == w - 1 || y == 0 || y == h - 1 {
                TileType::Wall
            } else if (12..=16).contains(&x) && (13..=15).contains(&y) {
                TileType::GhostHouse
            } else if (x == 1 || x == w - 2) && (y == 1 || y == h - 2) {
                TileType::PowerPellet
            } else if (x % 4 == 0 && y % 4 == 0 && x > 4 && x < w - 4 && y > 4 && y < h - 4)
                || (x == w / 2 && (y < 10 || y > 20))
            {
                TileType::Wall
            } else {
                TileType::Dot
            };
            map.set(x, y, tile);
        }
    }
    map
}

/// The fixed arcade-style layout. Symbols outside the loader's alphabet
/// become dots.
pub fn generate_classic_map() -> TileMap {
    let mut map = TileMap::new(MAP_WIDTH, MAP_HEIGHT, TileType::Empty);
    for (y, line) in CLASSIC_TEMPLATE.iter().enumerate() {
        for (x, symbol) in line.chars().enumerate() {
            let tile = TileType::from_symbol(symbol).unwrap_or(TileType::Dot);
            map.set(x as i32, y as i32, tile);
        }
    }
    map
}

pub fn create_empty_map(width: usize, height: usize) -> TileMap {
    TileMap::new(width, height, TileType::Empty)
}
