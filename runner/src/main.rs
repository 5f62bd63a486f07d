#![no_std]
#![no_main]

mod arbiter_task;
mod edge_task;
mod game_task;
mod hardware;

use defmt::info;
use embassy_executor::Executor;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use referee::Device;
use static_cell::StaticCell;

use defmt_rtt as _;
use panic_probe as _;

use crate::hardware::Board;

type BoardDevice = Device<CriticalSectionRawMutex, Board<'static>>;

static EXECUTOR: StaticCell<Executor> = StaticCell::new();
static DEVICE: StaticCell<BoardDevice> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    let board = Board::get();

    let (device, edge_lines) = match BoardDevice::init(board) {
        Ok(parts) => parts,
        Err(err) => defmt::panic!("Referee init failed: {} (status {})", err, err.status()),
    };
    let device: &'static BoardDevice = DEVICE.init(device);
    let arbiter = device.arbiter();

    info!("Referee ready");

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        edge_task::spawn_edge_tasks(&spawner, edge_lines, arbiter);
        spawner.spawn(arbiter_task::arbiter_task(arbiter)).unwrap();
        spawner.spawn(game_task::game_task(arbiter)).unwrap();
    })
}
