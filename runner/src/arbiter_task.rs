use defmt::{debug, info};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use referee::{Arbiter, Ruling, Verdict};

use crate::{edge_task::EDGE_CHANNEL, hardware::LedBank};

pub type BoardArbiter = Arbiter<CriticalSectionRawMutex, LedBank<'static>>;

#[embassy_executor::task]
pub async fn arbiter_task(arbiter: &'static BoardArbiter) {
    info!("Arbiter: task starting");

    let receiver = EDGE_CHANNEL.receiver();

    loop {
        let edge = receiver.receive().await;

        match arbiter.judge(edge) {
            Ruling {
                verdict: Verdict::Won(player),
                edge_number,
            } => info!(
                "Button {} pressed first (edge #{} at {} ticks)",
                player.id(),
                edge_number,
                edge.ticks
            ),
            Ruling {
                verdict,
                edge_number,
            } => debug!(
                "Button {} ignored: {} (edge #{}, {} dropped so far)",
                edge.player.id(),
                verdict,
                edge_number,
                arbiter.dropped_count()
            ),
        }
    }
}
