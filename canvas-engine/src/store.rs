//! Authoritative element storage.
//!
//! [`ElementStore`] owns every element of one open document. Elements live in
//! an arena keyed by id (ids are time-ordered, so iteration follows creation
//! order), alongside a paint-order index and a spatial index of bounding
//! boxes. All three are kept in step by the crate-private mutation
//! primitives, which only the history engine calls.

use std::collections::{BTreeMap, BTreeSet};

use crate::element::CanvasElement;
use crate::geometry::{Point, Rect};
use crate::id::ElementId;
use crate::spatial::SpatialGrid;

/// Element arena with paint-order and spatial indexes.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    /// All elements, indexed by ID.
    elements: BTreeMap<ElementId, CanvasElement>,
    /// `(z_index, id)` pairs in paint order.
    paint_order: BTreeSet<(i64, ElementId)>,
    /// Bounding-box index for visibility queries.
    index: SpatialGrid,
}

impl ElementStore {
    /// Create an empty store whose spatial index uses `cell_size` cells.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            elements: BTreeMap::new(),
            paint_order: BTreeSet::new(),
            index: SpatialGrid::new(cell_size),
        }
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.get(&id)
    }

    /// Whether an element with this ID exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &CanvasElement> {
        self.elements.values()
    }

    /// Element IDs in creation order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    /// Elements in paint order (lowest z-index first).
    pub fn paint_order(&self) -> impl DoubleEndedIterator<Item = &CanvasElement> {
        self.paint_order
            .iter()
            .filter_map(|(_, id)| self.elements.get(id))
    }

    /// Owned copy of every element in paint order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CanvasElement> {
        self.paint_order().cloned().collect()
    }

    /// Highest z-index in use.
    #[must_use]
    pub fn max_z_index(&self) -> Option<i64> {
        self.paint_order.last().map(|(z, _)| *z)
    }

    /// Lowest z-index in use.
    #[must_use]
    pub fn min_z_index(&self) -> Option<i64> {
        self.paint_order.first().map(|(z, _)| *z)
    }

    /// Z-index for an element that should paint above everything.
    #[must_use]
    pub fn next_z_index(&self) -> i64 {
        self.max_z_index().map_or(0, |z| z.saturating_add(1))
    }

    /// Cached bounding box of an element.
    #[must_use]
    pub fn bounding_box(&self, id: ElementId) -> Option<Rect> {
        self.index.bounds_of(id)
    }

    /// Union of every element's bounding box.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.ids()
            .filter_map(|id| self.index.bounds_of(id))
            .reduce(|acc, rect| acc.union(&rect))
    }

    /// Elements whose bounding box intersects `rect`, in paint order.
    #[must_use]
    pub fn query_rect(&self, rect: &Rect) -> Vec<&CanvasElement> {
        let mut hits: Vec<&CanvasElement> = self
            .index
            .query(rect)
            .into_iter()
            .filter_map(|id| self.elements.get(&id))
            .collect();
        hits.sort_by_key(|e| (e.z_index, e.id));
        hits
    }

    /// Topmost element whose bounding box contains the point.
    #[must_use]
    pub fn element_at(&self, point: Point) -> Option<&CanvasElement> {
        self.query_rect(&Rect::new(point.x, point.y, 0.0, 0.0))
            .into_iter()
            .next_back()
    }

    // -----------------------------------------------------------------------
    // Mutation primitives (history engine only)
    // -----------------------------------------------------------------------

    /// Insert or overwrite an element, keeping indexes in step.
    pub(crate) fn put(&mut self, element: CanvasElement) -> Option<CanvasElement> {
        let id = element.id;
        let previous = self.elements.remove(&id);
        if let Some(prev) = &previous {
            self.paint_order.remove(&(prev.z_index, id));
        }
        self.paint_order.insert((element.z_index, id));
        self.index.insert(id, element.bounding_box());
        self.elements.insert(id, element);
        previous
    }

    /// Remove an element, keeping indexes in step.
    pub(crate) fn take(&mut self, id: ElementId) -> Option<CanvasElement> {
        let element = self.elements.remove(&id)?;
        self.paint_order.remove(&(element.z_index, id));
        self.index.remove(id);
        Some(element)
    }

    /// Replace the whole contents.
    pub(crate) fn reset(&mut self, elements: Vec<CanvasElement>) {
        self.elements.clear();
        self.paint_order.clear();
        self.index.clear();
        for element in elements {
            self.put(element);
        }
    }
}
