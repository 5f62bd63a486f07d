use core::str;

use defmt::{info, warn};
use embassy_time::{Duration, Instant, Timer};
use referee::{Session, WINNER_PAYLOAD_LEN};

use crate::arbiter_task::BoardArbiter;

const ANSWER_DELAY: Duration = Duration::from_secs(10);
const ROUND_PAUSE: Duration = Duration::from_secs(5);

/// Questions are picked by the display side from a coarse uptime bucket: ten
/// seconds wide, two digits.
fn question_key(uptime_secs: u64) -> u8 {
    ((uptime_secs / 10) % 100) as u8
}

/// Plays rounds forever: arm, wait for the first buzz, show the answer, go
/// dark, repeat.
#[embassy_executor::task]
pub async fn game_task(arbiter: &'static BoardArbiter) {
    info!("Game: task starting");

    let mut round: u32 = 0;

    loop {
        let mut session = Session::open(arbiter);

        let key = question_key(Instant::now().as_secs());
        info!("Round {}: question {}", round, key);

        let mut buf = [0u8; WINNER_PAYLOAD_LEN];
        match session.read(&mut buf).await {
            Ok(len) => info!(
                "First pressed: {}",
                str::from_utf8(&buf[..len]).unwrap_or("?")
            ),
            Err(err) => warn!("Winner not delivered: {} (status {})", err, err.status()),
        }

        let accepted = session.write(b"answer shown");
        info!("Game: {} ({} bytes)", session.message(), accepted);

        Timer::after(ANSWER_DELAY).await;
        info!("Round {}: answer {}", round, key);

        session.close();
        Timer::after(ROUND_PAUSE).await;

        round = round.wrapping_add(1);
    }
}
