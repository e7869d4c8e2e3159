//! Uniform-grid spatial index over element bounding boxes.
//!
//! Visibility and rectangle-selection queries only need to look at the
//! elements near the query rectangle. Each element is registered in every
//! grid cell its bounding box touches, so a query visits the cells under the
//! rectangle instead of the whole document.
//!
//! ```text
//!   cell_size
//!   ├────┤
//!   ┌────┬────┬────┬────┐
//!   │    │ ▓▓▓│▓   │    │   ▓ element registered in cells (1,0) and (2,0)
//!   ├────┼────┼────┼────┤
//!   │    │ ░░░│░░░ │    │   ░ query rectangle visits (1,1) and (2,1)
//!   └────┴────┴────┴────┘
//! ```
//!
//! Very large elements are kept in a separate list that every query checks,
//! and very large queries scan the cached boxes directly. Results are always
//! filtered against the exact bounding box, so the index never changes what a
//! query returns, only how fast it answers.

use std::collections::{HashMap, HashSet};

use crate::geometry::Rect;
use crate::id::ElementId;

/// Default cell edge length in document units.
pub const DEFAULT_CELL_SIZE: f64 = 512.0;

/// Elements touching more cells than this are tracked as oversized.
const MAX_CELLS_PER_ELEMENT: i64 = 64;

/// Queries touching more cells than this scan every cached box instead.
const MAX_CELLS_PER_QUERY: i64 = 4096;

/// Inclusive range of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl CellRange {
    /// Saturates at `i64::MAX` for ranges touching clamped far-away cells.
    fn cell_count(&self) -> i64 {
        let span = |min: i64, max: i64| max.saturating_sub(min).saturating_add(1);
        span(self.min_x, self.max_x).saturating_mul(span(self.min_y, self.max_y))
    }

    fn cells(self) -> impl Iterator<Item = (i64, i64)> {
        (self.min_x..=self.max_x).flat_map(move |cx| (self.min_y..=self.max_y).map(move |cy| (cx, cy)))
    }
}

/// Where an element is registered.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Cells(CellRange),
    Oversized,
}

/// Grid index mapping cells to the elements whose boxes touch them.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<(i64, i64), HashSet<ElementId>>,
    bounds: HashMap<ElementId, (Rect, Placement)>,
    oversized: HashSet<ElementId>,
}

impl SpatialGrid {
    /// Create an empty grid with the given cell size in document units.
    ///
    /// Non-positive or non-finite sizes fall back to [`DEFAULT_CELL_SIZE`].
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            bounds: HashMap::new(),
            oversized: HashSet::new(),
        }
    }

    /// Number of indexed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Cached bounding box of an element.
    #[must_use]
    pub fn bounds_of(&self, id: ElementId) -> Option<Rect> {
        self.bounds.get(&id).map(|(rect, _)| *rect)
    }

    /// Register or re-register an element's bounding box.
    pub fn insert(&mut self, id: ElementId, rect: Rect) {
        self.remove(id);
        let range = self.cell_range(&rect);
        let placement = if range.cell_count() > MAX_CELLS_PER_ELEMENT {
            self.oversized.insert(id);
            Placement::Oversized
        } else {
            for cell in range.cells() {
                self.cells.entry(cell).or_default().insert(id);
            }
            Placement::Cells(range)
        };
        self.bounds.insert(id, (rect, placement));
    }

    /// Unregister an element. Returns its cached box.
    pub fn remove(&mut self, id: ElementId) -> Option<Rect> {
        let (rect, placement) = self.bounds.remove(&id)?;
        match placement {
            Placement::Oversized => {
                self.oversized.remove(&id);
            }
            Placement::Cells(range) => {
                for cell in range.cells() {
                    if let Some(bucket) = self.cells.get_mut(&cell) {
                        bucket.remove(&id);
                        if bucket.is_empty() {
                            self.cells.remove(&cell);
                        }
                    }
                }
            }
        }
        Some(rect)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.bounds.clear();
        self.oversized.clear();
    }

    /// Ids of every element whose box intersects `rect`, in no particular order.
    #[must_use]
    pub fn query(&self, rect: &Rect) -> Vec<ElementId> {
        let range = self.cell_range(rect);
        if range.cell_count() > MAX_CELLS_PER_QUERY {
            return self
                .bounds
                .iter()
                .filter(|(_, (bounds, _))| bounds.intersects(rect))
                .map(|(id, _)| *id)
                .collect();
        }

        let mut seen = HashSet::new();
        let candidates = range
            .cells()
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .chain(self.oversized.iter());

        candidates
            .filter(|id| seen.insert(**id))
            .filter(|id| {
                self.bounds
                    .get(id)
                    .is_some_and(|(bounds, _)| bounds.intersects(rect))
            })
            .copied()
            .collect()
    }

    // Float-to-int casts saturate, which keeps far-away coordinates in range.
    #[allow(clippy::cast_possible_truncation)]
    fn cell_range(&self, rect: &Rect) -> CellRange {
        let cell = |v: f64| (v / self.cell_size).floor() as i64;
        CellRange {
            min_x: cell(rect.x),
            min_y: cell(rect.y),
            max_x: cell(rect.max_x()),
            max_y: cell(rect.max_y()),
        }
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut ids: Vec<ElementId>) -> Vec<ElementId> {
        ids.sort();
        ids
    }

    #[test]
    fn test_query_finds_intersecting() {
        let mut grid = SpatialGrid::new(100.0);
        let near = ElementId::new();
        let far = ElementId::new();
        grid.insert(near, Rect::new(10.0, 10.0, 50.0, 50.0));
        grid.insert(far, Rect::new(10_000.0, 10.0, 50.0, 50.0));

        let hits = grid.query(&Rect::new(0.0, 0.0, 1000.0, 1000.0));
        assert_eq!(hits, vec![near]);
    }

    #[test]
    fn test_query_filters_exactly_within_shared_cell() {
        let mut grid = SpatialGrid::new(1000.0);
        let id = ElementId::new();
        grid.insert(id, Rect::new(500.0, 500.0, 10.0, 10.0));
        // Same cell, no overlap.
        assert!(grid.query(&Rect::new(0.0, 0.0, 100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_reinsert_moves_element() {
        let mut grid = SpatialGrid::new(100.0);
        let id = ElementId::new();
        grid.insert(id, Rect::new(0.0, 0.0, 10.0, 10.0));
        grid.insert(id, Rect::new(5000.0, 5000.0, 10.0, 10.0));

        assert!(grid.query(&Rect::new(0.0, 0.0, 50.0, 50.0)).is_empty());
        assert_eq!(grid.query(&Rect::new(4990.0, 4990.0, 50.0, 50.0)), vec![id]);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut grid = SpatialGrid::new(100.0);
        let id = ElementId::new();
        grid.insert(id, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(grid.remove(id).is_some());
        assert!(grid.is_empty());
        assert!(grid.query(&Rect::new(0.0, 0.0, 50.0, 50.0)).is_empty());
        assert!(grid.remove(id).is_none());
    }

    #[test]
    fn test_oversized_element_always_checked() {
        let mut grid = SpatialGrid::new(10.0);
        let huge = ElementId::new();
        grid.insert(huge, Rect::new(-1.0e6, -1.0e6, 2.0e6, 2.0e6));
        assert_eq!(grid.query(&Rect::new(0.0, 0.0, 1.0, 1.0)), vec![huge]);
        assert!(grid.query(&Rect::new(5.0e6, 5.0e6, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_huge_query_scans() {
        let mut grid = SpatialGrid::new(10.0);
        let a = ElementId::new();
        let b = ElementId::new();
        grid.insert(a, Rect::new(0.0, 0.0, 5.0, 5.0));
        grid.insert(b, Rect::new(90_000.0, 90_000.0, 5.0, 5.0));
        let hits = grid.query(&Rect::new(-1.0e5, -1.0e5, 2.0e5, 2.0e5));
        assert_eq!(sorted(hits), sorted(vec![a, b]));
    }

    #[test]
    fn test_far_away_coordinates_saturate_to_oversized() {
        let mut grid = SpatialGrid::new(512.0);
        let wide = ElementId::new();
        let far = ElementId::new();
        grid.insert(wide, Rect::new(-1.0e22, 0.0, 1.0e22, 10.0));
        grid.insert(far, Rect::new(1.0e300, 1.0e300, 1.0e299, 1.0e299));

        assert!(grid.oversized.contains(&wide));
        assert_eq!(grid.query(&Rect::new(-10.0, 0.0, 1.0, 1.0)), vec![wide]);
        assert!(grid.query(&Rect::new(10.0, 0.0, 1.0, 1.0)).is_empty());

        let everything = grid.query(&Rect::new(-1.0e22, -1.0e22, 2.0e22, 2.0e22));
        assert_eq!(everything, vec![wide]);
        assert_eq!(grid.query(&Rect::new(1.0e300, 1.0e300, 1.0, 1.0)), vec![far]);

        assert!(grid.remove(wide).is_some());
        assert!(grid.remove(far).is_some());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_element_spanning_cells_reported_once() {
        let mut grid = SpatialGrid::new(10.0);
        let id = ElementId::new();
        grid.insert(id, Rect::new(0.0, 0.0, 35.0, 35.0));
        assert_eq!(grid.query(&Rect::new(0.0, 0.0, 40.0, 40.0)), vec![id]);
    }

    #[test]
    fn test_invalid_cell_size_falls_back() {
        let grid = SpatialGrid::new(0.0);
        assert!((grid.cell_size - 512.0).abs() < f64::EPSILON);
    }
}
