#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_time::{Duration, Ticker, Timer};
use embedded_io_async::{Read, Write};
use flight_config_rp2040::{
    restart, ConfigPort, FlightConfig, FlightEngine, ParamStore, FLASH_SIZE, PARAM_COUNT,
    UART_BAUDRATE,
};
use param_core::{ParamDescriptor, Registry, TransferGuard};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// Listing and heartbeat cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration values and the parameter table over them.
static CONFIG: StaticCell<FlightConfig> = StaticCell::new();
static PARAMS: StaticCell<[ParamDescriptor<'static>; PARAM_COUNT]> = StaticCell::new();
static REGISTRY: StaticCell<Registry<'static>> = StaticCell::new();

/// Raised while a parameter listing is being sent.
static TRANSFER_GUARD: TransferGuard = TransferGuard::new();

/// UART ring buffers.
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Flight configuration starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Parameters ---
    let config: &'static FlightConfig = CONFIG.init(FlightConfig::new());
    let params = PARAMS.init(config.params());
    let registry: &'static Registry<'static> = REGISTRY.init(Registry::new(params));

    let flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(p.FLASH);
    let mut engine = FlightEngine::new(config, ParamStore::new(flash));
    engine.restore(registry);

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = UART_BAUDRATE;

    let uart = BufferedUart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        TX_BUF.init([0; 256]),
        RX_BUF.init([0; 256]),
        uart_config,
    );

    let port = ConfigPort::new(registry, engine, &TRANSFER_GUARD);

    spawner.spawn(serial_task(uart, port).unwrap());

    info!("Flight configuration ready, {} parameters", registry.len());
}

/// Serial task - owns the UART and drives the console and MAVLink link.
#[embassy_executor::task]
async fn serial_task(mut uart: BufferedUart, mut port: ConfigPort<'static>) {
    let mut ticker = Ticker::every(TICK_INTERVAL);
    let mut buf = [0u8; 64];

    loop {
        match select(uart.read(&mut buf), ticker.next()).await {
            Either::First(Ok(n)) => {
                for &byte in &buf[..n] {
                    port.receive(byte);
                }
            }
            Either::First(Err(e)) => warn!("UART read error: {:?}", e),
            Either::Second(()) => port.tick(),
        }

        if !port.pending().is_empty() {
            if let Err(e) = uart.write_all(port.pending()).await {
                warn!("UART write error: {:?}", e);
            }
            port.written();
        }

        if let Some(kind) = port.take_reset() {
            let _ = uart.flush().await;
            // Let the last byte leave the shift register.
            Timer::after_millis(10).await;
            restart(kind);
        }
    }
}
