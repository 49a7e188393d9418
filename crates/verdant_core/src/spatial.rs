//! Manhattan-distance neighborhood search over the world grid.
//!
//! The grid is rectangular with 4-connectivity; positions without a cell
//! ("void" positions) are traversed by the search but never returned. The
//! search is a bounded breadth-first expansion labelled by distance, so the
//! cost is proportional to the diamond area rather than exponential in the
//! radius.
//!
//! For an interior origin on a large enough grid, the number of positions at
//! Manhattan distance 1..=r is `2 * r * (r + 1)`.

use crate::CellId;
use std::collections::VecDeque;

/// Coordinate bookkeeping for the rectangular grid.
///
/// Cells are addressed as `y * width + x`. The index knows nothing about
/// cell contents; callers supply an `exists` predicate to filter void
/// positions out of query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridIndex {
    width: u16,
    height: u16,
}

impl GridIndex {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of grid positions.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat id of the position at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn id_at(&self, x: u16, y: u16) -> CellId {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// Coordinates of the position with flat id `id`.
    #[inline]
    #[must_use]
    pub fn coords(&self, id: CellId) -> (u16, u16) {
        let width = usize::from(self.width);
        ((id % width) as u16, (id / width) as u16)
    }

    #[must_use]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Every existing cell whose Manhattan distance from `origin` is between
    /// 1 and `radius` inclusive, in breadth-first (distance-ascending) order.
    ///
    /// The origin itself is never part of its own neighborhood. Void
    /// positions are stepped over when expanding but excluded from the
    /// result. A radius of zero is a usage error.
    pub fn neighbors<F>(
        &self,
        origin: CellId,
        radius: u32,
        exists: F,
    ) -> anyhow::Result<Vec<CellId>>
    where
        F: Fn(CellId) -> bool,
    {
        anyhow::ensure!(radius >= 1, "neighborhood radius must be positive");
        anyhow::ensure!(origin < self.len(), "origin {origin} outside the grid");

        let mut seen = vec![false; self.len()];
        let mut queue = VecDeque::new();
        let mut found = Vec::new();
        seen[origin] = true;
        queue.push_back((origin, 0u32));

        while let Some((id, dist)) = queue.pop_front() {
            if dist > 0 && exists(id) {
                found.push(id);
            }
            if dist == radius {
                continue;
            }
            let (x, y) = self.coords(id);
            for (nx, ny) in self.adjacent(x, y) {
                let nid = self.id_at(nx, ny);
                if !seen[nid] {
                    seen[nid] = true;
                    queue.push_back((nid, dist + 1));
                }
            }
        }
        Ok(found)
    }

    /// The up-to-four in-bounds positions adjacent to `(x, y)`.
    fn adjacent(&self, x: u16, y: u16) -> impl Iterator<Item = (u16, u16)> {
        let (width, height) = (self.width, self.height);
        let right = (x + 1 < width).then(|| (x + 1, y));
        let left = (x > 0).then(|| (x - 1, y));
        let down = (y + 1 < height).then(|| (x, y + 1));
        let up = (y > 0).then(|| (x, y - 1));
        [right, left, down, up].into_iter().flatten()
    }
}
