//! Rack Grid Model
//!
//! Projects a rack's rows × columns and its occupant list into display
//! cells. Rows are ordered top shelf first (`rows` down to 1), columns left
//! to right (1 up to `columns`). The projection is rebuilt from the rack
//! every time; nothing here is persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::care_status::{cell_status, CareStatus};
use super::gecko::{Gecko, GeckoId};
use super::rack::{Rack, RackId, MAX_RACK_DIMENSION};

/// A cell address across all racks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub rack_id: RackId,
    pub row: u32,
    pub column: u32,
}

impl Position {
    pub fn new(rack_id: RackId, row: u32, column: u32) -> Self {
        Self { rack_id, row, column }
    }
}

/// Occupant data that breaks the one-gecko-per-cell rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("rack {rack_id} has invalid dimensions {rows}x{columns}")]
    InvalidDimensions { rack_id: RackId, rows: u32, columns: u32 },
    #[error("rack {rack_id}: geckos {first} and {second} both occupy row {row}, column {column}")]
    DuplicateCell {
        rack_id: RackId,
        row: u32,
        column: u32,
        first: GeckoId,
        second: GeckoId,
    },
    #[error("rack {rack_id}: gecko {gecko_id} at row {row}, column {column} is outside the {rows}x{columns} grid")]
    OutOfBounds {
        rack_id: RackId,
        gecko_id: GeckoId,
        row: u32,
        column: u32,
        rows: u32,
        columns: u32,
    },
}

/// Check the rack's occupants: every gecko in bounds, at most one per cell
pub fn validate_occupants(rack: &Rack) -> Result<(), GridError> {
    let valid = 1..=MAX_RACK_DIMENSION;
    if !valid.contains(&rack.rows) || !valid.contains(&rack.columns) {
        return Err(GridError::InvalidDimensions {
            rack_id: rack.id,
            rows: rack.rows,
            columns: rack.columns,
        });
    }

    let mut seen: HashMap<(u32, u32), GeckoId> = HashMap::with_capacity(rack.geckos.len());
    for gecko in &rack.geckos {
        if !rack.contains(gecko.row, gecko.column) {
            return Err(GridError::OutOfBounds {
                rack_id: rack.id,
                gecko_id: gecko.id,
                row: gecko.row,
                column: gecko.column,
                rows: rack.rows,
                columns: rack.columns,
            });
        }
        if let Some(first) = seen.insert((gecko.row, gecko.column), gecko.id) {
            return Err(GridError::DuplicateCell {
                rack_id: rack.id,
                row: gecko.row,
                column: gecko.column,
                first,
                second: gecko.id,
            });
        }
    }
    Ok(())
}

/// One slot of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub rack_id: RackId,
    pub row: u32,
    pub column: u32,
    pub occupant: Option<Gecko>,
}

impl GridCell {
    pub fn position(&self) -> Position {
        Position::new(self.rack_id, self.row, self.column)
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn occupant_id(&self) -> Option<GeckoId> {
        self.occupant.as_ref().map(|g| g.id)
    }

    /// Care status of the occupant, `Empty` for a free cell
    pub fn status(&self, now: DateTime<Utc>) -> CareStatus {
        cell_status(self.occupant.as_ref(), now)
    }
}

/// One shelf of the grid, labelled by its row number
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub row: u32,
    pub cells: Vec<GridCell>,
}

/// Display layout of a rack
#[derive(Debug, Clone, PartialEq)]
pub struct RackGrid {
    pub rack_id: RackId,
    pub rows: u32,
    pub columns: u32,
    shelves: Vec<GridRow>,
}

impl RackGrid {
    /// Build the grid, rejecting racks whose occupant data is inconsistent
    pub fn build(rack: &Rack) -> Result<Self, GridError> {
        validate_occupants(rack)?;

        let mut by_cell: HashMap<(u32, u32), &Gecko> = rack
            .geckos
            .iter()
            .map(|g| ((g.row, g.column), g))
            .collect();

        let shelves = (1..=rack.rows)
            .rev()
            .map(|row| GridRow {
                row,
                cells: (1..=rack.columns)
                    .map(|column| GridCell {
                        rack_id: rack.id,
                        row,
                        column,
                        occupant: by_cell.remove(&(row, column)).cloned(),
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            rack_id: rack.id,
            rows: rack.rows,
            columns: rack.columns,
            shelves,
        })
    }

    /// Shelves, top first
    pub fn rows(&self) -> &[GridRow] {
        &self.shelves
    }

    /// All cells in display order
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.shelves.iter().flat_map(|shelf| shelf.cells.iter())
    }

    pub fn cell(&self, row: u32, column: u32) -> Option<&GridCell> {
        if row == 0 || row > self.rows || column == 0 || column > self.columns {
            return None;
        }
        let shelf = (self.rows - row) as usize;
        self.shelves.get(shelf)?.cells.get((column - 1) as usize)
    }

    /// Cell currently holding `gecko_id`
    pub fn locate(&self, gecko_id: GeckoId) -> Option<&GridCell> {
        self.cells().find(|c| c.occupant_id() == Some(gecko_id))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells().filter(|c| !c.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rack(rows: u32, columns: u32, geckos: Vec<Gecko>) -> Rack {
        Rack::new(1, "Test", rows, columns).with_geckos(geckos)
    }

    #[test]
    fn test_layout_order_top_shelf_first() {
        let grid = RackGrid::build(&rack(3, 2, vec![])).unwrap();
        let labels: Vec<u32> = grid.rows().iter().map(|r| r.row).collect();
        assert_eq!(labels, vec![3, 2, 1]);

        let coords: Vec<(u32, u32)> = grid.cells().map(|c| (c.row, c.column)).collect();
        assert_eq!(coords, vec![(3, 1), (3, 2), (2, 1), (2, 2), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_every_cell_within_bounds() {
        for rows in 1..=6 {
            for columns in 1..=6 {
                let grid = RackGrid::build(&rack(rows, columns, vec![])).unwrap();
                assert_eq!(grid.cells().count(), (rows * columns) as usize);
                for cell in grid.cells() {
                    assert!((1..=rows).contains(&cell.row));
                    assert!((1..=columns).contains(&cell.column));
                }
            }
        }
    }

    #[test]
    fn test_occupants_land_in_their_cells() {
        let grid = RackGrid::build(&rack(
            2,
            3,
            vec![Gecko::new(10, "A", 1, 1, 1), Gecko::new(11, "B", 1, 2, 3)],
        ))
        .unwrap();

        assert_eq!(grid.cell(1, 1).unwrap().occupant_id(), Some(10));
        assert_eq!(grid.cell(2, 3).unwrap().occupant_id(), Some(11));
        assert!(grid.cell(2, 1).unwrap().is_empty());
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.locate(11).map(|c| (c.row, c.column)), Some((2, 3)));
        assert!(grid.locate(99).is_none());
        assert!(grid.cell(0, 1).is_none());
        assert!(grid.cell(3, 1).is_none());
    }

    #[test]
    fn test_duplicate_cell_is_error() {
        let err = RackGrid::build(&rack(
            2,
            2,
            vec![Gecko::new(1, "A", 1, 1, 2), Gecko::new(2, "B", 1, 1, 2)],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            GridError::DuplicateCell { rack_id: 1, row: 1, column: 2, first: 1, second: 2 }
        );
    }

    #[test]
    fn test_out_of_bounds_is_error() {
        let err = RackGrid::build(&rack(2, 2, vec![Gecko::new(5, "A", 1, 3, 1)])).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { gecko_id: 5, row: 3, .. }));
    }

    #[test]
    fn test_zero_dimensions_is_error() {
        let err = RackGrid::build(&rack(0, 3, vec![])).unwrap_err();
        assert!(matches!(err, GridError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_oversized_dimensions_is_error() {
        let huge = Rack::new(9, "Broken", u32::MAX, u32::MAX);
        assert_eq!(huge.capacity(), u32::MAX);
        let err = RackGrid::build(&huge).unwrap_err();
        assert!(matches!(err, GridError::InvalidDimensions { rack_id: 9, .. }));
    }
}
