//! Recursive four-way spatial partition, generic over the payload type.
//!
//! # Contract
//!
//! The tree keys on axis-aligned footprints only.  `retrieve` returns a
//! *candidate superset*: every stored item whose AABB overlaps the query
//! AABB is included, plus possibly more (straddlers are duplicated into
//! every child they overlap, and deep queries can pick up leaf neighbours).
//! Callers needing exactness run the precise OBB tests from `cg-core`
//! on the candidates.
//!
//! Items that overlap no child quadrant — including items wholly outside
//! the root bounds — stay in the nearest node's local list, so an insert
//! can never lose an item.

use cg_core::Bounds;

use crate::{SpatialError, SpatialResult};

/// A quadtree node.  The root is created with [`QuadTree::new`]; interior
/// nodes are managed internally.
pub struct QuadTree<T> {
    bounds: Bounds,
    max_objects: usize,
    max_levels: usize,
    level: usize,
    /// Items held at this node: leaf contents, or straddlers/out-of-bounds
    /// entries that fit no child.
    items: Vec<(Bounds, T)>,
    children: Option<Box<[QuadTree<T>; 4]>>,
}

impl<T: Clone + PartialEq> QuadTree<T> {
    /// Create an empty tree over the world AABB.
    ///
    /// Fails fast on non-positive extent or `max_objects == 0` — both are
    /// configuration errors that would otherwise degrade every query.
    pub fn new(bounds: Bounds, max_objects: usize, max_levels: usize) -> SpatialResult<Self> {
        if !bounds.is_finite() || bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Err(SpatialError::InvalidBounds {
                x: bounds.x,
                y: bounds.y,
                width: bounds.width,
                height: bounds.height,
            });
        }
        if max_objects == 0 {
            return Err(SpatialError::ZeroMaxObjects);
        }
        Ok(Self::node(bounds, max_objects, max_levels, 0))
    }

    fn node(bounds: Bounds, max_objects: usize, max_levels: usize, level: usize) -> Self {
        Self {
            bounds,
            max_objects,
            max_levels,
            level,
            items: Vec::new(),
            children: None,
        }
    }

    /// Store `item` under `rect`.
    pub fn insert(&mut self, rect: Bounds, item: T) {
        if let Some(children) = self.children.as_deref_mut() {
            let mut placed = false;
            for child in children.iter_mut() {
                if child.bounds.intersects_aabb(&rect) {
                    child.insert(rect, item.clone());
                    placed = true;
                }
            }
            if !placed {
                // Overlaps no quadrant (outside the root): keep it here so
                // the item is never lost.
                self.items.push((rect, item));
            }
            return;
        }

        self.items.push((rect, item));

        if self.items.len() > self.max_objects && self.level < self.max_levels {
            self.split();
        }
    }

    /// Candidate items whose stored AABB may overlap `rect`.  Duplicates are
    /// possible for straddlers.
    pub fn retrieve(&self, rect: &Bounds) -> Vec<T> {
        let mut out = Vec::new();
        self.retrieve_into(rect, &mut out);
        out
    }

    fn retrieve_into(&self, rect: &Bounds, out: &mut Vec<T>) {
        for (stored, item) in &self.items {
            if stored.intersects_aabb(rect) {
                out.push(item.clone());
            }
        }
        if let Some(children) = self.children.as_deref() {
            for child in children.iter() {
                if child.bounds.intersects_aabb(rect) {
                    child.retrieve_into(rect, out);
                }
            }
        }
    }

    /// Remove every stored copy of `item` reachable under `rect`.
    /// Returns `true` if at least one copy was removed.
    pub fn remove(&mut self, rect: &Bounds, item: &T) -> bool {
        let before = self.items.len();
        self.items.retain(|(_, stored)| stored != item);
        let mut removed = self.items.len() != before;

        if let Some(children) = self.children.as_deref_mut() {
            for child in children.iter_mut() {
                if child.bounds.intersects_aabb(rect) {
                    removed |= child.remove(rect, item);
                }
            }
        }
        removed
    }

    /// Drop all items and collapse back to a single empty node.
    pub fn clear(&mut self) {
        self.items.clear();
        self.children = None;
    }

    /// Number of stored entries in this subtree.  Straddlers count once per
    /// copy, so this is an upper bound on distinct items.
    pub fn len(&self) -> usize {
        let mut n = self.items.len();
        if let Some(children) = self.children.as_deref() {
            for child in children.iter() {
                n += child.len();
            }
        }
        n
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The world AABB this tree was constructed over.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Split into four equal quadrants and redistribute local items.
    /// Items overlapping more than one quadrant are copied into each;
    /// items overlapping none stay local.
    fn split(&mut self) {
        let half_w = self.bounds.width / 2.0;
        let half_h = self.bounds.height / 2.0;
        let (x, y) = (self.bounds.x, self.bounds.y);

        let quadrant = |ix: usize, iy: usize| {
            Bounds::new(x + ix as f64 * half_w, y + iy as f64 * half_h, half_w, half_h)
        };
        let mut children = Box::new([
            Self::node(quadrant(0, 0), self.max_objects, self.max_levels, self.level + 1),
            Self::node(quadrant(1, 0), self.max_objects, self.max_levels, self.level + 1),
            Self::node(quadrant(0, 1), self.max_objects, self.max_levels, self.level + 1),
            Self::node(quadrant(1, 1), self.max_objects, self.max_levels, self.level + 1),
        ]);

        let mut kept = Vec::new();
        for (rect, item) in self.items.drain(..) {
            let mut placed = false;
            for child in children.iter_mut() {
                if child.bounds.intersects_aabb(&rect) {
                    child.insert(rect, item.clone());
                    placed = true;
                }
            }
            if !placed {
                kept.push((rect, item));
            }
        }
        self.items = kept;
        self.children = Some(children);
    }
}
