use defmt::Format;

use crate::{LedFrame, Player, PlayerLight};

/// Outcome of feeding one edge to the scoreboard.
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// First press of the round. The round is now decided.
    Won(Player),
    /// The pressing player's light was not in standby (duplicate or late edge,
    /// or the lights were switched off).
    NotArmed,
    /// The opponent already won. The standby check normally catches late
    /// edges first, so this only shows up if lights and win flags disagree.
    AlreadyDecided,
}

#[derive(Format, Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RoundState {
    standby: [bool; 2],
    won: [bool; 2],
}

/// The per-round state machine: standby and win flags plus the lights shown
/// for each player. Each player goes Standby -> Decided at most once per
/// round, and only [`Scoreboard::arm`] brings them back.
///
/// This type does no locking of its own. The check-and-commit in
/// [`Scoreboard::press`] is only atomic if the caller serializes access, which
/// [`crate::Arbiter`] does with a critical section.
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    round: RoundState,
    lights: [PlayerLight; 2],
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    pub const fn new() -> Self {
        Self {
            round: RoundState {
                standby: [false; 2],
                won: [false; 2],
            },
            lights: [PlayerLight::Off; 2],
        }
    }

    /// Starts a fresh round: both players in standby, nobody has won.
    pub fn arm(&mut self) {
        self.round = RoundState {
            standby: [true; 2],
            won: [false; 2],
        };
        self.lights = [PlayerLight::Standby; 2];
    }

    /// Turns the lights off. The round bookkeeping is left alone, but with the
    /// lights dark no edge is accepted until the next [`Scoreboard::arm`].
    pub fn blank(&mut self) {
        self.lights = [PlayerLight::Off; 2];
    }

    pub fn press(&mut self, player: Player) -> Verdict {
        let me = player.index();
        let them = player.other().index();

        if self.lights[me] != PlayerLight::Standby {
            return Verdict::NotArmed;
        }

        if self.round.won[them] {
            return Verdict::AlreadyDecided;
        }

        self.round.won[me] = true;
        self.round.standby = [false; 2];
        self.lights[me] = PlayerLight::Won;
        self.lights[them] = PlayerLight::Lost;

        Verdict::Won(player)
    }

    pub fn light(&self, player: Player) -> PlayerLight {
        self.lights[player.index()]
    }

    pub fn lights(&self) -> [PlayerLight; 2] {
        self.lights
    }

    pub fn frame(&self) -> LedFrame {
        LedFrame::from_lights(self.lights)
    }

    pub fn in_standby(&self, player: Player) -> bool {
        self.round.standby[player.index()]
    }

    pub fn has_won(&self, player: Player) -> bool {
        self.round.won[player.index()]
    }

    pub fn winner(&self) -> Option<Player> {
        Player::ALL.into_iter().find(|p| self.has_won(*p))
    }
}

#[cfg(test)]
mod test;
