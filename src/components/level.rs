//! Level grid: tile codes, text parsing and export.
//!
//! A level is a rectangular grid of [`Tile`]s written as text, one row per
//! line:
//!
//! ```text
//! St   O
//!     GGG
//! GGGGGGGGLLGG
//! ```
//!
//! Every character is one cell, except the start marker `St`, which takes two
//! characters in the text but a single cell in the grid. Short rows are padded
//! on the right with empty cells so that the grid is always rectangular.
//!
//! The [`Level`] component stores the grid together with the tile size and is
//! the source of truth consulted by the collision system.

use std::fmt;
use std::path::Path;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Rows of the blank grid installed when no usable level is available.
pub const DEFAULT_ROWS: usize = 20;
/// Columns of the blank grid installed when no usable level is available.
pub const DEFAULT_COLS: usize = 30;

/// One grid cell.
///
/// Unknown characters are kept as [`Tile::Other`] so that export reproduces
/// them, but they behave exactly like [`Tile::Empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Tile {
    #[default]
    Empty,
    /// `G`
    Ground,
    /// `W`
    Water,
    /// `R`
    Grass,
    /// `O`, blocks only falling bodies coming from above.
    OneWay,
    /// `L`, hurts on contact but does not block.
    Lava,
    /// `St`
    Start,
    Other(char),
}

impl Tile {
    pub fn from_char(c: char) -> Self {
        match c {
            ' ' => Tile::Empty,
            'G' => Tile::Ground,
            'W' => Tile::Water,
            'R' => Tile::Grass,
            'O' => Tile::OneWay,
            'L' => Tile::Lava,
            other => Tile::Other(other),
        }
    }

    /// Parse a full cell code, including the two-character `St`.
    pub fn from_code(code: &str) -> Self {
        if code == "St" {
            return Tile::Start;
        }
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Tile::Empty,
            (Some(c), None) => Tile::from_char(c),
            (Some(c), Some(_)) => Tile::Other(c),
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Tile::Ground | Tile::Water | Tile::Grass)
    }

    pub fn is_one_way(&self) -> bool {
        matches!(self, Tile::OneWay)
    }

    pub fn is_damaging(&self) -> bool {
        matches!(self, Tile::Lava)
    }

    /// Whether a static entity is spawned for this cell.
    pub fn is_spawnable(&self) -> bool {
        self.is_solid() || self.is_one_way() || self.is_damaging()
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tile::Empty => f.write_str(" "),
            Tile::Ground => f.write_str("G"),
            Tile::Water => f.write_str("W"),
            Tile::Grass => f.write_str("R"),
            Tile::OneWay => f.write_str("O"),
            Tile::Lava => f.write_str("L"),
            Tile::Start => f.write_str("St"),
            Tile::Other(c) => write!(f, "{}", c),
        }
    }
}

impl From<Tile> for String {
    fn from(tile: Tile) -> Self {
        tile.to_string()
    }
}

impl From<String> for Tile {
    fn from(code: String) -> Self {
        Tile::from_code(&code)
    }
}

/// Rectangular grid of tiles, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelGrid {
    cells: Vec<Vec<Tile>>,
    cols: usize,
}

impl LevelGrid {
    /// Grid of `rows` x `cols` empty cells.
    pub fn blank(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![Tile::Empty; cols]; rows],
            cols,
        }
    }

    /// Build a grid from rows of tiles, padding short rows with empty cells.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells = rows;
        for row in cells.iter_mut() {
            row.resize(cols, Tile::Empty);
        }
        Self { cells, cols }
    }

    /// Parse level text. Empty text yields a grid with no rows.
    pub fn parse(text: &str) -> Self {
        Self::from_rows(text.lines().map(parse_row).collect())
    }

    /// Read and parse a level file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Export as level text, the inverse of [`parse`](Self::parse).
    pub fn to_level_text(&self) -> String {
        self.to_string()
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// True when the grid has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() || self.cols == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Overwrite one cell. Returns false when the cell is outside the grid.
    pub fn set(&mut self, row: usize, col: usize, tile: Tile) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = tile;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, row: usize) -> Option<&[Tile]> {
        self.cells.get(row).map(Vec::as_slice)
    }

    /// Copy of this grid with new dimensions. Overlapping cells are kept,
    /// new cells are empty.
    pub fn resized(&self, rows: usize, cols: usize) -> Self {
        let mut grid = Self::blank(rows, cols);
        for (r, row) in self.cells.iter().enumerate().take(rows) {
            for (c, tile) in row.iter().enumerate().take(cols) {
                grid.cells[r][c] = *tile;
            }
        }
        grid
    }

    /// Iterate over every cell as `(row, col, tile)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, t)| (r, c, *t)))
    }

    /// First start marker in row-major order.
    pub fn start_cell(&self) -> Option<(usize, usize)> {
        self.cells()
            .find(|(_, _, t)| *t == Tile::Start)
            .map(|(r, c, _)| (r, c))
    }

    /// Top-most tile that can be stood on (solid or one-way) with at least
    /// `clearance` non-solid cells above it, leftmost first.
    pub fn highest_support(&self, clearance: usize) -> Option<(usize, usize)> {
        self.cells()
            .find(|&(r, c, t)| {
                (t.is_solid() || t.is_one_way())
                    && r >= clearance
                    && (r - clearance..r)
                        .all(|above| !self.get(above, c).is_some_and(|t| t.is_solid()))
            })
            .map(|(r, c, _)| (r, c))
    }
}

impl fmt::Display for LevelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                f.write_str("\n")?;
            }
            for tile in row {
                write!(f, "{}", tile)?;
            }
        }
        Ok(())
    }
}

fn parse_row(line: &str) -> Vec<Tile> {
    let mut row = Vec::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == 'S' && chars.peek() == Some(&'t') {
            chars.next();
            row.push(Tile::Start);
        } else {
            row.push(Tile::from_char(c));
        }
    }
    row
}

/// Level grid plus the pixel size of one cell.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Level {
    pub grid: LevelGrid,
    pub tile_size: f32,
}

impl Level {
    pub fn new(grid: LevelGrid, tile_size: f32) -> Self {
        Self { grid, tile_size }
    }

    /// Level width in pixels.
    pub fn width_px(&self) -> f32 {
        self.grid.col_count() as f32 * self.tile_size
    }

    /// Level height in pixels.
    pub fn height_px(&self) -> f32 {
        self.grid.row_count() as f32 * self.tile_size
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, row: usize, col: usize) -> (f32, f32) {
        (col as f32 * self.tile_size, row as f32 * self.tile_size)
    }

    /// Indices of the columns whose cells overlap `[min, max)` in pixels.
    pub fn col_span(&self, min: f32, max: f32) -> std::ops::Range<usize> {
        span(min, max, self.tile_size, self.grid.col_count())
    }

    /// Indices of the rows whose cells overlap `[min, max)` in pixels.
    pub fn row_span(&self, min: f32, max: f32) -> std::ops::Range<usize> {
        span(min, max, self.tile_size, self.grid.row_count())
    }
}

fn span(min: f32, max: f32, tile_size: f32, limit: usize) -> std::ops::Range<usize> {
    if max <= min || tile_size <= 0.0 {
        return 0..0;
    }
    let first = (min / tile_size).floor().max(0.0) as usize;
    let end = ((max / tile_size).ceil().max(0.0) as usize).min(limit);
    first.min(end)..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(grid: &LevelGrid, row: usize) -> Vec<String> {
        grid.row(row)
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_start_token_is_atomic() {
        let grid = LevelGrid::parse("StG");
        assert_eq!(codes(&grid, 0), vec!["St", "G"]);
    }

    #[test]
    fn test_lone_s_is_not_start() {
        let grid = LevelGrid::parse("SG");
        assert_eq!(grid.get(0, 0), Some(Tile::Other('S')));
        assert_eq!(grid.get(0, 1), Some(Tile::Ground));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let grid = LevelGrid::parse("G\nGGGG\n\nGG");
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.col_count(), 4);
        for r in 0..4 {
            assert_eq!(grid.row(r).unwrap().len(), 4);
        }
        assert_eq!(grid.get(0, 3), Some(Tile::Empty));
        assert_eq!(grid.row(2).unwrap(), &[Tile::Empty; 4]);
    }

    #[test]
    fn test_start_row_width_counts_cells() {
        let grid = LevelGrid::parse("St G\nGGGG");
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 4);
        assert_eq!(
            grid.row(0).unwrap(),
            &[Tile::Start, Tile::Empty, Tile::Ground, Tile::Empty]
        );
    }

    #[test]
    fn test_empty_input_has_no_rows() {
        let grid = LevelGrid::parse("");
        assert_eq!(grid.row_count(), 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let grid = LevelGrid::parse("GO\r\nLW\r\n");
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.get(1, 0), Some(Tile::Lava));
        assert_eq!(grid.get(1, 1), Some(Tile::Water));
    }

    #[test]
    fn test_round_trip() {
        let text = "St  O \n  RRW \nGGLLGG";
        let grid = LevelGrid::parse(text);
        let exported = grid.to_level_text();
        assert_eq!(LevelGrid::parse(&exported), grid);
    }

    #[test]
    fn test_round_trip_padded_start_row() {
        let grid = LevelGrid::parse("St\nGGG");
        let exported = grid.to_level_text();
        assert_eq!(exported, "St  \nGGG");
        assert_eq!(LevelGrid::parse(&exported), grid);
    }

    #[test]
    fn test_unknown_codes_behave_as_empty() {
        let tile = Tile::from_char('x');
        assert_eq!(tile, Tile::Other('x'));
        assert!(!tile.is_solid());
        assert!(!tile.is_one_way());
        assert!(!tile.is_damaging());
        assert!(!tile.is_spawnable());
        assert_eq!(tile.to_string(), "x");
    }

    #[test]
    fn test_tile_classes() {
        assert!(Tile::Ground.is_solid());
        assert!(Tile::Water.is_solid());
        assert!(Tile::Grass.is_solid());
        assert!(!Tile::OneWay.is_solid());
        assert!(Tile::OneWay.is_one_way());
        assert!(Tile::Lava.is_damaging());
        assert!(!Tile::Lava.is_solid());
        assert!(!Tile::Start.is_spawnable());
        assert!(!Tile::Empty.is_spawnable());
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Tile::from_code("St"), Tile::Start);
        assert_eq!(Tile::from_code("G"), Tile::Ground);
        assert_eq!(Tile::from_code(""), Tile::Empty);
        assert_eq!(Tile::from_code(" "), Tile::Empty);
    }

    #[test]
    fn test_tile_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Tile::Start).unwrap(), "\"St\"");
        let tile: Tile = serde_json::from_str("\"O\"").unwrap();
        assert_eq!(tile, Tile::OneWay);
    }

    #[test]
    fn test_set_and_resize() {
        let mut grid = LevelGrid::blank(2, 2);
        assert!(grid.set(1, 1, Tile::Ground));
        assert!(!grid.set(2, 0, Tile::Ground));
        let bigger = grid.resized(3, 4);
        assert_eq!(bigger.row_count(), 3);
        assert_eq!(bigger.col_count(), 4);
        assert_eq!(bigger.get(1, 1), Some(Tile::Ground));
        let smaller = bigger.resized(1, 1);
        assert_eq!(smaller.get(0, 0), Some(Tile::Empty));
        assert_eq!(smaller.get(1, 1), None);
    }

    #[test]
    fn test_start_and_support_lookup() {
        let grid = LevelGrid::parse("    \n  O \nStGG");
        assert_eq!(grid.start_cell(), Some((2, 0)));
        assert_eq!(grid.highest_support(1), Some((1, 2)));
        assert_eq!(LevelGrid::blank(3, 3).highest_support(1), None);
    }

    #[test]
    fn test_support_needs_clearance() {
        // nothing fits above the top row
        let grid = LevelGrid::parse("GGGG\n    \n    ");
        assert_eq!(grid.highest_support(1), None);
        assert_eq!(grid.highest_support(0), Some((0, 0)));
        // a solid cell right above disqualifies the support under it
        let grid = LevelGrid::parse("  \nG \nGG");
        assert_eq!(grid.highest_support(1), Some((1, 0)));
        assert_eq!(grid.highest_support(2), Some((2, 1)));
    }

    #[test]
    fn test_level_dimensions_and_spans() {
        let level = Level::new(LevelGrid::blank(4, 10), 32.0);
        assert_eq!(level.width_px(), 320.0);
        assert_eq!(level.height_px(), 128.0);
        assert_eq!(level.col_span(0.0, 32.0), 0..1);
        assert_eq!(level.col_span(16.0, 48.0), 0..2);
        assert_eq!(level.col_span(-40.0, 10.0), 0..1);
        assert_eq!(level.col_span(300.0, 400.0), 9..10);
        assert_eq!(level.row_span(10.0, 10.0), 0..0);
        assert_eq!(level.row_span(500.0, 600.0), 4..4);
    }
}
