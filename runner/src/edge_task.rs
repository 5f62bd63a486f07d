use defmt::{info, warn};
use embassy_stm32::exti::ExtiInput;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_time::Instant;
use referee::{Edge, Player};
use static_cell::StaticCell;

use crate::{arbiter_task::BoardArbiter, hardware::EdgeLines};

pub const EDGE_CHANNEL_SIZE: usize = 8;

pub static EDGE_CHANNEL: Channel<CriticalSectionRawMutex, Edge, EDGE_CHANNEL_SIZE> =
    Channel::new();

pub struct EdgeTaskState<'a> {
    button: ExtiInput<'a>,
    player: Player,
    arbiter: &'static BoardArbiter,
}

impl<'a> EdgeTaskState<'a> {
    pub fn new(button: ExtiInput<'a>, player: Player, arbiter: &'static BoardArbiter) -> Self {
        Self {
            button,
            player,
            arbiter,
        }
    }
}

static BUTTON_ONE_STATE: StaticCell<EdgeTaskState> = StaticCell::new();
static BUTTON_TWO_STATE: StaticCell<EdgeTaskState> = StaticCell::new();

pub fn spawn_edge_tasks(
    spawner: &embassy_executor::Spawner,
    lines: EdgeLines<'static>,
    arbiter: &'static BoardArbiter,
) {
    spawner
        .spawn(edge_task(BUTTON_ONE_STATE.init(EdgeTaskState::new(
            lines.button_one,
            Player::One,
            arbiter,
        ))))
        .unwrap();

    spawner
        .spawn(edge_task(BUTTON_TWO_STATE.init(EdgeTaskState::new(
            lines.button_two,
            Player::Two,
            arbiter,
        ))))
        .unwrap();
}

/// Turns rising edges into queued [`Edge`]s. Never waits on the queue: an edge
/// that finds it full is dropped, but still counted by the arbiter.
#[embassy_executor::task(pool_size = 2)]
pub async fn edge_task(state: &'static mut EdgeTaskState<'static>) {
    info!("Edge task started (button {})", state.player.id());

    let sender = EDGE_CHANNEL.sender();

    loop {
        state.button.wait_for_rising_edge().await;

        let edge = Edge::new(state.player, Instant::now().as_ticks());
        if sender.try_send(edge).is_err() {
            let number = state.arbiter.record_dropped();
            warn!("Edge queue full, dropped {} (edge #{})", edge, number);
        }
    }
}
