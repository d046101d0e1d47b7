//! Process-wide actuator status registry.
//!
//! `Set` requests land here; `Get` requests read it back. The table is a
//! fixed-capacity map behind the [`ActuatorStatePort`] accessor trait so
//! it can later move to NVS without touching the dispatcher. Nothing is
//! persisted across reboots.

use heapless::FnvIndexMap;

use crate::RequestError;

use super::ports::ActuatorStatePort;

/// Distinct actuator ids the registry can hold (power of two, per
/// `heapless::FnvIndexMap`).
pub const MAX_ACTUATORS: usize = 16;

/// In-memory registry of last-set actuator statuses.
pub struct ActuatorTable {
    entries: FnvIndexMap<u16, bool, MAX_ACTUATORS>,
}

impl ActuatorTable {
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
        }
    }

    /// Number of ids with a recorded status.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActuatorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorStatePort for ActuatorTable {
    fn get(&self, id: u16) -> Option<bool> {
        self.entries.get(&id).copied()
    }

    fn set(&mut self, id: u16, status: bool) -> Result<(), RequestError> {
        self.entries
            .insert(id, status)
            .map(|_| ())
            .map_err(|_| RequestError::RegistryFull)
    }
}
