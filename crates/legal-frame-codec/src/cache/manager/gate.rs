//! Per-key encode gates.
//!
//! The first caller to miss on a key becomes its leader and holds a
//! [`GateTicket`]. Later callers for the same key follow: they block on the
//! leader's [`Gate`] and re-read the cache once it opens. Dropping the
//! ticket opens the gate, so followers are released even if the leader's
//! encode fails or panics.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::cache::types::CacheKey;

#[derive(Debug, Default)]
pub(super) struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    /// Block until the leader drops its ticket.
    pub(super) fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.opened.wait(&mut open);
        }
    }

    fn release(&self) {
        *self.open.lock() = true;
        self.opened.notify_all();
    }
}

/// In-flight encodes, one gate per key.
#[derive(Debug, Default)]
pub(super) struct GateTable {
    gates: Mutex<HashMap<CacheKey, Arc<Gate>>>,
}

pub(super) enum Claim<'a> {
    Leader(GateTicket<'a>),
    Follower(Arc<Gate>),
}

impl GateTable {
    pub(super) fn claim(&self, key: CacheKey) -> Claim<'_> {
        let mut gates = self.gates.lock();
        if let Some(gate) = gates.get(&key) {
            return Claim::Follower(Arc::clone(gate));
        }
        let gate = Arc::new(Gate::default());
        gates.insert(key, Arc::clone(&gate));
        Claim::Leader(GateTicket {
            table: self,
            key,
            gate,
        })
    }

    pub(super) fn in_flight(&self) -> usize {
        self.gates.lock().len()
    }
}

/// Leadership of one key's encode. Releases followers on drop.
pub(super) struct GateTicket<'a> {
    table: &'a GateTable,
    key: CacheKey,
    gate: Arc<Gate>,
}

impl Drop for GateTicket<'_> {
    fn drop(&mut self) {
        {
            let mut gates = self.table.gates.lock();
            if gates
                .get(&self.key)
                .is_some_and(|g| Arc::ptr_eq(g, &self.gate))
            {
                gates.remove(&self.key);
            }
        }
        self.gate.release();
    }
}
