use core::cell::RefCell;

use defmt::Format;
use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};

use crate::{Edge, LedFrame, LightSink, Player, Scoreboard, Verdict, rendezvous::Rendezvous};

struct Inner<S> {
    scoreboard: Scoreboard,
    sink: S,
    waiter: bool,
    edges: u32,
    dropped: u32,
}

impl<S: LightSink> Inner<S> {
    fn refresh(&mut self) {
        let frame = self.scoreboard.frame();
        self.sink.show(frame);
    }

    fn count_edge(&mut self) -> u32 {
        self.edges = self.edges.wrapping_add(1);
        self.edges
    }
}

/// What [`Arbiter::judge`] made of one edge, and where that edge falls in the
/// device's edge count.
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ruling {
    pub verdict: Verdict,
    pub edge_number: u32,
}

/// Decides which button was pressed first and hands the winner to the one
/// caller suspended in [`Arbiter::await_winner`].
///
/// Every read-modify-write of the round runs inside one critical section of
/// `M`. With [`embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex`]
/// that holds across cores and interrupt priorities, so two edges arriving at
/// the same time can never both commit a winner. `NoopRawMutex` is only sound
/// when every edge and the reader run on the same executor.
pub struct Arbiter<M: RawMutex, S> {
    inner: Mutex<M, RefCell<Inner<S>>>,
    rendezvous: Rendezvous<M>,
}

impl<M: RawMutex, S: LightSink> Arbiter<M, S> {
    pub const fn new(sink: S) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                scoreboard: Scoreboard::new(),
                sink,
                waiter: false,
                edges: 0,
                dropped: 0,
            })),
            rendezvous: Rendezvous::new(),
        }
    }

    fn with<U>(&self, f: impl FnOnce(&mut Inner<S>) -> U) -> U {
        self.inner.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    /// Applies the first-press rule to one edge.
    ///
    /// Never blocks, so it can run from an interrupt-level task. The edge
    /// counter moves on every call, ignored edges included, and the six
    /// outputs are rewritten on every call.
    pub fn handle_edge(&self, edge: Edge) -> Verdict {
        self.judge(edge).verdict
    }

    /// [`Arbiter::handle_edge`], also reporting the edge's number as counted
    /// inside the same critical section.
    pub fn judge(&self, edge: Edge) -> Ruling {
        self.with(|inner| {
            let edge_number = inner.count_edge();

            let verdict = inner.scoreboard.press(edge.player);
            inner.refresh();

            if let Verdict::Won(winner) = verdict {
                if inner.waiter {
                    self.rendezvous.hand_off(winner);
                }
            }

            Ruling {
                verdict,
                edge_number,
            }
        })
    }

    /// Counts an edge that was seen but never reached [`Arbiter::judge`],
    /// e.g. because the edge queue was full. The round and the outputs are
    /// left alone. Returns the edge's number.
    pub fn record_dropped(&self) -> u32 {
        self.with(|inner| {
            inner.dropped = inner.dropped.wrapping_add(1);
            inner.count_edge()
        })
    }

    /// Resets the round to standby and forgets any waiter. Idempotent.
    pub fn arm(&self) {
        self.with(|inner| {
            inner.scoreboard.arm();
            inner.waiter = false;
            self.rendezvous.clear();
            inner.refresh();
        })
    }

    /// Re-arms the round, then suspends until an edge wins it.
    ///
    /// There is no timeout: if no button is ever pressed this never returns.
    /// Only one caller may wait at a time. Dropping the future before it
    /// completes unregisters the waiter.
    pub async fn await_winner(&self) -> Player {
        self.with(|inner| {
            inner.scoreboard.arm();
            self.rendezvous.clear();
            inner.waiter = true;
            inner.refresh();
        });

        let _waiter = WaiterGuard { arbiter: self };

        self.rendezvous.receive().await
    }

    /// Switches every output off. Round bookkeeping is kept.
    pub fn blank(&self) {
        self.with(|inner| {
            inner.scoreboard.blank();
            inner.refresh();
        })
    }

    /// Writes an explicit frame, bypassing the round. Used by bring-up and
    /// teardown, which do not own a round.
    pub(crate) fn force_frame(&self, frame: LedFrame) {
        self.with(|inner| inner.sink.show(frame))
    }

    /// Every edge seen so far: judged, ignored and dropped alike.
    pub fn edge_count(&self) -> u32 {
        self.with(|inner| inner.edges)
    }

    pub fn dropped_count(&self) -> u32 {
        self.with(|inner| inner.dropped)
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.with(|inner| inner.scoreboard)
    }

    pub fn waiter_pending(&self) -> bool {
        self.with(|inner| inner.waiter)
    }

    pub fn winner_ready(&self) -> bool {
        self.rendezvous.is_loaded()
    }

    pub fn with_sink<U>(&self, f: impl FnOnce(&S) -> U) -> U {
        self.with(|inner| f(&inner.sink))
    }

    /// Gives the output sink back, ending the arbiter.
    pub fn into_sink(self) -> S {
        self.inner.into_inner().into_inner().sink
    }
}

struct WaiterGuard<'a, M: RawMutex, S: LightSink> {
    arbiter: &'a Arbiter<M, S>,
}

impl<M: RawMutex, S: LightSink> Drop for WaiterGuard<'_, M, S> {
    fn drop(&mut self) {
        self.arbiter.with(|inner| inner.waiter = false);
    }
}
