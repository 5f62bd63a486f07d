use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};

use crate::Player;

/// Single-slot handoff of the winner from the arbiter to the one suspended
/// reader. Holds at most one value; a second commit before the reader wakes
/// overwrites the first, which the round rules never allow to happen.
pub(crate) struct Rendezvous<M: RawMutex> {
    slot: Signal<M, Player>,
}

impl<M: RawMutex> Rendezvous<M> {
    pub(crate) const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    pub(crate) fn clear(&self) {
        self.slot.reset();
    }

    pub(crate) fn hand_off(&self, winner: Player) {
        self.slot.signal(winner);
    }

    pub(crate) async fn receive(&self) -> Player {
        self.slot.wait().await
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.slot.signaled()
    }
}
