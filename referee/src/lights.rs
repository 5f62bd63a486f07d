use defmt::Format;

use crate::Player;

/// What a player's three LEDs currently show.
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerLight {
    Off,
    /// Blue. Armed, waiting for the first press of the round.
    Standby,
    /// Red.
    Lost,
    /// Green.
    Won,
}

/// The six output lines, red/green/blue for each player.
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedFrame {
    pub red: [bool; 2],
    pub green: [bool; 2],
    pub blue: [bool; 2],
}

impl LedFrame {
    pub const OFF: LedFrame = LedFrame {
        red: [false; 2],
        green: [false; 2],
        blue: [false; 2],
    };

    pub fn from_lights(lights: [PlayerLight; 2]) -> Self {
        let mut frame = Self::OFF;
        for (i, light) in lights.iter().enumerate() {
            match light {
                PlayerLight::Off => {}
                PlayerLight::Standby => frame.blue[i] = true,
                PlayerLight::Lost => frame.red[i] = true,
                PlayerLight::Won => frame.green[i] = true,
            }
        }
        frame
    }

    /// The (red, green, blue) triple for one player.
    pub fn rgb(&self, player: Player) -> (bool, bool, bool) {
        let i = player.index();
        (self.red[i], self.green[i], self.blue[i])
    }

    pub fn is_dark(&self) -> bool {
        *self == Self::OFF
    }
}

/// The physical output sink. Implementations write all six lines before
/// returning and must not block, since the arbiter calls this with its
/// critical section held.
pub trait LightSink {
    fn show(&mut self, frame: LedFrame);
}
