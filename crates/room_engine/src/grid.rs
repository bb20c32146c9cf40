use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::furniture::FurnitureItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn is_adjacent_to(self, other: GridPosition) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellCode {
    Walkable,
    Wall,
    Door,
    Void,
}

impl CellCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Walkable),
            1 => Some(Self::Wall),
            3 => Some(Self::Door),
            9 => Some(Self::Void),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Walkable => 0,
            Self::Wall => 1,
            Self::Door => 3,
            Self::Void => 9,
        }
    }

    pub fn is_walkable(self) -> bool {
        matches!(self, Self::Walkable | Self::Door)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no cells")]
    Empty,
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown cell code {code} at ({x},{y})")]
    UnknownCellCode { x: usize, y: usize, code: u8 },
    #[error("cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
}

/// Static room layout, row-major: row `y` holds cells `(0..width, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLayout {
    width: u32,
    height: u32,
    cells: Vec<CellCode>,
}

impl StaticLayout {
    pub fn new(width: u32, height: u32, cells: Vec<CellCode>) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::Empty);
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(LayoutError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, LayoutError> {
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(LayoutError::RaggedRow {
                    row: y,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (x, &code) in row.iter().enumerate() {
                let cell =
                    CellCode::from_code(code).ok_or(LayoutError::UnknownCellCode { x, y, code })?;
                cells.push(cell);
            }
        }

        Self::new(width as u32, rows.len() as u32, cells)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_at(&self, position: GridPosition) -> Option<CellCode> {
        index_in(self.width, self.height, position).map(|index| self.cells[index])
    }
}

/// Walkability map: the static layout with furniture occupancy stamped on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellCode>,
}

impl Grid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: GridPosition) -> bool {
        self.index_of(position).is_some()
    }

    pub fn index_of(&self, position: GridPosition) -> Option<usize> {
        index_in(self.width, self.height, position)
    }

    pub fn cell_at(&self, position: GridPosition) -> Option<CellCode> {
        self.index_of(position).map(|index| self.cells[index])
    }

    pub fn is_walkable(&self, position: GridPosition) -> bool {
        self.cell_at(position).is_some_and(CellCode::is_walkable)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellCode]> {
        self.cells.chunks(self.width as usize)
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn position_of(&self, index: usize) -> GridPosition {
        let width = self.width as usize;
        GridPosition {
            x: (index % width) as i32,
            y: (index / width) as i32,
        }
    }
}

/// Overlays furniture onto the layout. Items outside the grid are skipped.
pub fn build_grid(layout: &StaticLayout, furniture: &[FurnitureItem]) -> Grid {
    let mut grid = Grid {
        width: layout.width,
        height: layout.height,
        cells: layout.cells.clone(),
    };
    for item in furniture {
        let Some(index) = grid.index_of(item.position) else {
            continue;
        };
        grid.cells[index] = if item.capabilities.can_walk {
            CellCode::Walkable
        } else {
            CellCode::Wall
        };
    }
    grid
}

pub fn is_walkable(x: i32, y: i32, grid: &Grid) -> bool {
    grid.is_walkable(GridPosition { x, y })
}

fn index_in(width: u32, height: u32, position: GridPosition) -> Option<usize> {
    if position.x < 0 || position.y < 0 {
        return None;
    }
    let (x, y) = (position.x as u32, position.y as u32);
    if x >= width || y >= height {
        return None;
    }
    Some(y as usize * width as usize + x as usize)
}
