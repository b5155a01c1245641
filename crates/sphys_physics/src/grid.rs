//! Uniform spatial hash used by the broad phase
//!
//! Objects are binned into fixed-size grid cells keyed by their integer
//! cell coordinates. An object whose bounding box spans several cells
//! appears in all of them; queries and pair collection deduplicate.

use std::collections::HashMap;

use sphys_math::Vector;

use crate::aabb::Aabb;

/// A uniform grid mapping cells to the keys of the objects inside them
#[derive(Debug)]
pub struct SpatialHash<V: Vector, K: Copy + PartialEq> {
    chunk_size: f32,
    cells: HashMap<V::Cell, Vec<K>>,
    scratch: Vec<V::Cell>,
}

impl<V: Vector, K: Copy + PartialEq> SpatialHash<V, K> {
    /// Create an empty hash with the given cell edge length
    ///
    /// Non-positive sizes are clamped to a small positive value.
    pub fn new(chunk_size: f32) -> Self {
        Self {
            chunk_size: chunk_size.max(1e-3),
            cells: HashMap::new(),
            scratch: Vec::new(),
        }
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Insert a key into every cell its bounds span
    pub fn insert(&mut self, bounds: &Aabb<V>, key: K) {
        self.scratch.clear();
        V::cover_cells(bounds.min, bounds.max, self.chunk_size, &mut self.scratch);
        for cell in self.scratch.drain(..) {
            self.cells.entry(cell).or_default().push(key);
        }
    }

    /// Insert a key, collecting the unique keys already present in the
    /// spanned cells into `prior`
    ///
    /// Feeding objects in one at a time and pairing each against the prior
    /// occupants visits every candidate pair exactly once.
    pub fn insert_collecting(&mut self, bounds: &Aabb<V>, key: K, prior: &mut Vec<K>) {
        self.scratch.clear();
        V::cover_cells(bounds.min, bounds.max, self.chunk_size, &mut self.scratch);
        for cell in self.scratch.drain(..) {
            let occupants = self.cells.entry(cell).or_default();
            for &other in occupants.iter() {
                if !prior.contains(&other) {
                    prior.push(other);
                }
            }
            occupants.push(key);
        }
    }

    /// Collect the unique keys whose cells overlap the given bounds
    pub fn query(&mut self, bounds: &Aabb<V>, out: &mut Vec<K>) {
        self.scratch.clear();
        V::cover_cells(bounds.min, bounds.max, self.chunk_size, &mut self.scratch);
        for cell in self.scratch.iter() {
            if let Some(occupants) = self.cells.get(cell) {
                for &key in occupants {
                    if !out.contains(&key) {
                        out.push(key);
                    }
                }
            }
        }
    }

    /// Remove every entry, keeping allocated capacity
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
