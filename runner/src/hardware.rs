use defmt::{Format, info};
use embassy_stm32::{
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
};
use referee::{LedFrame, LightSink, Platform};

#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum Polarity {
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    fn level(self, on: bool) -> Level {
        match self {
            Polarity::ActiveHigh => Level::from(on),
            Polarity::ActiveLow => Level::from(!on),
        }
    }
}

#[cfg(feature = "leds-active-low")]
const LED_POLARITY: Polarity = Polarity::ActiveLow;
#[cfg(not(feature = "leds-active-low"))]
const LED_POLARITY: Polarity = Polarity::ActiveHigh;

/// Red, green and blue LEDs for both players.
pub struct LedBank<'a> {
    red: [Output<'a>; 2],
    green: [Output<'a>; 2],
    blue: [Output<'a>; 2],
}

impl LightSink for LedBank<'_> {
    fn show(&mut self, frame: LedFrame) {
        for i in 0..2 {
            self.red[i].set_level(LED_POLARITY.level(frame.red[i]));
            self.green[i].set_level(LED_POLARITY.level(frame.green[i]));
            self.blue[i].set_level(LED_POLARITY.level(frame.blue[i]));
        }
    }
}

/// The two push-buttons, wired so a press is a rising edge.
pub struct EdgeLines<'a> {
    pub button_one: ExtiInput<'a>,
    pub button_two: ExtiInput<'a>,
}

#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    AlreadyRegistered,
    AlreadyTaken,
}

/// Every pin the referee uses, configured but not yet handed out.
pub struct Board<'a> {
    registered: bool,
    leds: Option<LedBank<'a>>,
    buttons: Option<EdgeLines<'a>>,
}

impl<'a> Board<'a> {
    pub fn get() -> Board<'a> {
        info!("Initializing");
        let peripherals = embassy_stm32::init(Default::default());

        let off = LED_POLARITY.level(false);

        let leds = LedBank {
            red: [
                Output::new(peripherals.PB14, off, Speed::Low),
                Output::new(peripherals.PD12, off, Speed::Low),
            ],
            green: [
                Output::new(peripherals.PB0, off, Speed::Low),
                Output::new(peripherals.PD13, off, Speed::Low),
            ],
            blue: [
                Output::new(peripherals.PE1, off, Speed::Low),
                Output::new(peripherals.PD14, off, Speed::Low),
            ],
        };

        let buttons = EdgeLines {
            button_one: ExtiInput::new(peripherals.PC13, peripherals.EXTI13, Pull::Down),
            button_two: ExtiInput::new(peripherals.PF3, peripherals.EXTI3, Pull::Down),
        };

        Board {
            registered: false,
            leds: Some(leds),
            buttons: Some(buttons),
        }
    }
}

impl<'a> Platform for Board<'a> {
    type Sink = LedBank<'a>;
    type EdgeLines = EdgeLines<'a>;
    type Error = BoardError;

    fn register_device(&mut self) -> Result<(), BoardError> {
        if self.registered {
            return Err(BoardError::AlreadyRegistered);
        }
        self.registered = true;
        info!("Referee device registered");
        Ok(())
    }

    fn reserve_outputs(&mut self) -> Result<LedBank<'a>, BoardError> {
        let leds = self.leds.take().ok_or(BoardError::AlreadyTaken)?;
        info!("Reserved 6 LED outputs");
        Ok(leds)
    }

    fn reserve_edge_lines(&mut self) -> Result<EdgeLines<'a>, BoardError> {
        let buttons = self.buttons.take().ok_or(BoardError::AlreadyTaken)?;
        info!("Reserved 2 button edge lines");
        Ok(buttons)
    }

    // Dropping a pin driver puts the pin back into its reset state.
    fn release_edge_lines(&mut self, lines: EdgeLines<'a>) {
        drop(lines);
        info!("Released button edge lines");
    }

    fn release_outputs(&mut self, leds: LedBank<'a>) {
        drop(leds);
        info!("Released LED outputs");
    }

    fn unregister_device(&mut self) {
        self.registered = false;
        info!("Referee device unregistered");
    }
}
