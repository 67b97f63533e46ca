//! Board module - manages the game grid
//!
//! The board is a fixed-size grid (10x20 by default) where each cell is empty or
//! tagged with the piece kind that filled it. Dimensions are chosen at construction
//! and never change afterwards. Storage is a flat row-major buffer.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Rows above the board (y < 0) are open space: pieces may extend into them
//! while falling but never collide there.

use arrayvec::ArrayVec;

use crate::error::EngineError;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_TAG};

/// Smallest supported width/height (one piece bounding box).
pub const MIN_BOARD_DIM: u8 = 4;

/// Largest supported width.
pub const MAX_BOARD_WIDTH: u8 = 40;

/// Largest supported height.
pub const MAX_BOARD_HEIGHT: u8 = 60;

/// Indices of rows removed by one clear pass, bottom to top, in pre-clear coordinates.
pub type ClearedRows = ArrayVec<u8, { MAX_BOARD_HEIGHT as usize }>;

/// The game board - `width` columns x `height` rows using flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty 10x20 board
    pub fn new() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cells: vec![None; BOARD_WIDTH as usize * BOARD_HEIGHT as usize],
        }
    }

    /// Create an empty board with custom dimensions.
    pub fn with_size(width: u8, height: u8) -> Result<Self, EngineError> {
        if !(MIN_BOARD_DIM..=MAX_BOARD_WIDTH).contains(&width)
            || !(MIN_BOARD_DIM..=MAX_BOARD_HEIGHT).contains(&height)
        {
            return Err(EngineError::InvalidBoardSize { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    /// Build a board from rows of cell tags (`EMPTY_TAG` or a piece tag).
    ///
    /// Rows are aligned to the bottom of the board; rows not given stay empty.
    /// Each row must be exactly `width` tags long; the first row that is not,
    /// or the first row past `height`, is reported as `InvalidTagRow`.
    pub fn from_tag_rows(width: u8, height: u8, rows: &[&[u8]]) -> Result<Self, EngineError> {
        let mut board = Self::with_size(width, height)?;
        if rows.len() > height as usize {
            return Err(EngineError::InvalidTagRow(height as usize));
        }
        if let Some(row) = rows.iter().position(|row| row.len() != width as usize) {
            return Err(EngineError::InvalidTagRow(row));
        }

        let top = height as usize - rows.len();
        for (i, row) in rows.iter().enumerate() {
            let y = top + i;
            for (x, &tag) in row.iter().enumerate() {
                let cell = if tag == EMPTY_TAG {
                    None
                } else {
                    Some(PieceKind::from_tag(tag)?)
                };
                board.cells[y * width as usize + x] = cell;
            }
        }
        Ok(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8
    }

    /// Whether a mino at (x, y) would collide.
    ///
    /// Columns outside the board and rows below the floor are solid, rows above
    /// the board are open, everything else depends on occupancy.
    #[inline]
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.is_occupied(x, y)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        let start = y * self.width as usize;
        let end = start + self.width as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Clear a row and shift all rows above down
    /// Returns the number of lines cleared (1 or 0)
    pub fn clear_row(&mut self, y: usize) -> usize {
        if y >= self.height as usize {
            return 0;
        }

        let width = self.width as usize;

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            let dst_start = row * width;
            self.cells
                .copy_within(src_start..src_start + width, dst_start);
        }

        for cell in &mut self.cells[0..width] {
            *cell = None;
        }

        1
    }

    /// Clear all full rows and return their indices (bottom to top, pre-clear rows).
    ///
    /// Rows are scanned from the bottom. A full row is removed, everything above
    /// drops by one and an empty row enters at the top; the same index is then
    /// examined again before moving upward.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut y = self.height as usize;

        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                // Every removal so far happened at or below `row`.
                cleared.push((row - cleared.len()) as u8);
                self.clear_row(row);
                continue;
            }
            y -= 1;
        }

        cleared
    }

    /// Clear all full rows, returning how many were removed.
    pub fn clear_lines(&mut self) -> usize {
        self.clear_full_rows().len()
    }

    /// Write a piece's minos onto the board.
    ///
    /// Minos above the board are dropped. Returns false if any mino was above the
    /// visible area (the caller treats that as a lock out).
    pub fn lock_piece(&mut self, shape: &[(i8, i8)], x: i8, y: i8, kind: PieceKind) -> bool {
        let mut fully_visible = true;
        for &(dx, dy) in shape {
            let px = x + dx;
            let py = y + dy;
            if py < 0 {
                fully_visible = false;
                continue;
            }
            self.set(px, py, Some(kind));
        }
        fully_visible
    }

    /// True when no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Export the grid as row-major tags into `out` (resized as needed).
    pub fn write_tag_grid(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(
            self.cells
                .iter()
                .map(|cell| cell.map_or(EMPTY_TAG, |kind| kind.tag())),
        );
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
