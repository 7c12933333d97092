//! Coordinate-hashed state table
//!
//! Keeps the bijection between discretized joint coordinates and the dense
//! state ids handed to the search engine. Records are stored once, in id
//! order; the hash map only holds ids, so the two views cannot diverge.

use std::collections::HashMap;

use tracing::warn;

use crate::common::{CellXYZ, Coord, JointAngles, PlanningError, PlanningResult, StateId};

/// Distance value for states no distance source has reported on
pub const UNSET_DISTANCE: u32 = u32::MAX;

/// Canonical entry for one discovered coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub state_id: StateId,
    pub coord: Coord,
    /// Joint angles at creation time
    pub angles: JointAngles,
    /// End-effector cell
    pub xyz: CellXYZ,
    /// Distance to the nearest obstacle in cells
    pub dist: u32,
    /// Primitive that created the record, if the table keys on it
    pub primitive: Option<usize>,
}

type StateKey = (Coord, Option<usize>);

/// Hash-indexed store of state records
#[derive(Debug, Default)]
pub struct StateTable {
    coord_to_id: HashMap<StateKey, StateId>,
    records: Vec<StateRecord>,
    key_by_primitive: bool,
}

impl StateTable {
    /// Table keyed by coordinate only
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that keeps one record per (coordinate, primitive) pair
    pub fn keyed_by_primitive() -> Self {
        Self {
            key_by_primitive: true,
            ..Self::default()
        }
    }

    pub fn is_keyed_by_primitive(&self) -> bool {
        self.key_by_primitive
    }

    fn key(&self, coord: &[i32], primitive: Option<usize>) -> StateKey {
        let primitive = if self.key_by_primitive { primitive } else { None };
        (coord.to_vec(), primitive)
    }

    pub fn lookup(&self, coord: &[i32], primitive: Option<usize>) -> Option<&StateRecord> {
        self.coord_to_id
            .get(&self.key(coord, primitive))
            .map(|&id| &self.records[id])
    }

    /// Create a record under the next id
    ///
    /// Inserting a key that is already present returns the existing record.
    pub fn insert(
        &mut self,
        coord: Coord,
        angles: JointAngles,
        xyz: CellXYZ,
        primitive: Option<usize>,
    ) -> &StateRecord {
        self.insert_with_distance(coord, angles, xyz, UNSET_DISTANCE, primitive)
    }

    /// Like `insert`, with a known distance-to-obstacle value
    ///
    /// An existing record keeps its distance.
    pub fn insert_with_distance(
        &mut self,
        coord: Coord,
        angles: JointAngles,
        xyz: CellXYZ,
        dist: u32,
        primitive: Option<usize>,
    ) -> &StateRecord {
        let key = self.key(&coord, primitive);
        if let Some(&id) = self.coord_to_id.get(&key) {
            warn!("State table: coordinate {:?} already has state {}", coord, id);
            return &self.records[id];
        }

        let state_id = self.records.len();
        self.coord_to_id.insert(key, state_id);
        self.records.push(StateRecord {
            state_id,
            coord,
            angles,
            xyz,
            dist,
            primitive: if self.key_by_primitive { primitive } else { None },
        });
        &self.records[state_id]
    }

    pub fn get_by_id(&self, state_id: StateId) -> PlanningResult<&StateRecord> {
        self.records
            .get(state_id)
            .ok_or(PlanningError::StateOutOfRange {
                id: state_id,
                size: self.records.len(),
            })
    }

    /// Overwrite the distance-to-obstacle value of a record
    pub fn set_distance(&mut self, state_id: StateId, dist: u32) -> PlanningResult<()> {
        let size = self.records.len();
        let record = self
            .records
            .get_mut(state_id)
            .ok_or(PlanningError::StateOutOfRange { id: state_id, size })?;
        record.dist = dist;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateRecord> {
        self.records.iter()
    }

    /// Drop every record; ids restart at zero
    pub fn clear(&mut self) {
        self.coord_to_id.clear();
        self.records.clear();
    }
}
