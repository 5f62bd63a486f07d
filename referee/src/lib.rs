#![cfg_attr(not(test), no_std)]

mod arbiter;
mod device;
mod lights;
mod rendezvous;
mod round;
mod session;

use defmt::Format;

pub use arbiter::{Arbiter, Ruling};
pub use device::{Device, InitError, InitStage, Platform};
pub use lights::{LedFrame, LightSink, PlayerLight};
pub use round::{Scoreboard, Verdict};
pub use session::{MESSAGE_CAPACITY, Session, SessionError, WINNER_PAYLOAD_LEN};

/// One of the two contestants, identified by the button they own.
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// Maps a raw line identity (1 or 2) to a player.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// A rising edge on one of the button lines.
///
/// `ticks` is whatever monotonic clock the edge source has at hand. It is only
/// carried for logging: the first edge delivered wins, regardless of stamps.
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub player: Player,
    pub ticks: u64,
}

impl Edge {
    pub fn new(player: Player, ticks: u64) -> Self {
        Self { player, ticks }
    }
}
