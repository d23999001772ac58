#![no_std]
#![no_main]

use cortex_m::peripheral::SCB;
use cortex_m_rt::entry;
use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{PIO0, USB};
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::usb::Driver;
use embassy_time::{block_for, Duration, Instant, Ticker};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use encoder_paddles::{
    configure_gamepad_hid, configure_mouse_hid, run_leds, sample_mode, wait_hid_ready,
    ButtonPins, ColorSignal, Controller, CounterReader, EncoderCell, HidSink, Mode, PaddleHid,
    QuadratureDecoder, SignalFeedback, UsbGamepad, UsbMouse, CONTROLLER_CONFIG, LED_COUNT,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

/// Controller loop period.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Settling time for the internal pull-ups before the mode line is read.
const PULL_UP_SETTLE: Duration = Duration::from_micros(100);

/// Encoder counters, shared between the encoder tasks and the controller loop.
static ENCODER_X: EncoderCell = EncoderCell::new();
static ENCODER_Y: EncoderCell = EncoderCell::new();

/// Latest LED colors from the controller loop to the LED task.
static LED_SIGNAL: ColorSignal = ColorSignal::new();

/// Encoder tasks run here, preempting the thread executor.
static EXECUTOR_ENCODERS: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MAIN: StaticCell<Executor> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_ENCODERS.on_interrupt()
}

#[entry]
fn main() -> ! {
    info!("Encoder paddles starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Mode select (sampled once; any later change resets the chip) ---
    let mut mode_pin = Input::new(p.PIN_13, Pull::Up);
    block_for(PULL_UP_SETTLE);
    let mode = sample_mode(&mut mode_pin).unwrap_or_else(|e| {
        warn!("mode pin unreadable ({:?}), defaulting to mouse", e);
        Mode::Mouse
    });
    info!("selected {:?} mode", mode);

    // --- Encoders ---
    let (decoder_x, reader_x) = ENCODER_X.split().unwrap();
    let (decoder_y, reader_y) = ENCODER_Y.split().unwrap();

    let x_a = Input::new(p.PIN_2, Pull::Up);
    let x_b = Input::new(p.PIN_3, Pull::Up);
    let y_a = Input::new(p.PIN_4, Pull::Up);
    let y_b = Input::new(p.PIN_5, Pull::Up);

    // --- Buttons ---
    let pins = ButtonPins {
        fire: [
            Input::new(p.PIN_6, Pull::Up),
            Input::new(p.PIN_7, Pull::Up),
            Input::new(p.PIN_8, Pull::Up),
            Input::new(p.PIN_9, Pull::Up),
        ],
        settings: [Input::new(p.PIN_10, Pull::Up), Input::new(p.PIN_11, Pull::Up)],
        center: Some(Input::new(p.PIN_12, Pull::Up)),
    };

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Rust Paddles");
    usb_config.product = Some("Set1 - Paddles");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Only the interface for the selected mode is ever enumerated.
    let hid_state = HID_STATE.init(State::new());
    let hid: PaddleHid = match mode {
        Mode::Mouse => HidSink::Mouse(UsbMouse::new(configure_mouse_hid(&mut builder, hid_state))),
        Mode::Gamepad => {
            HidSink::Gamepad(UsbGamepad::new(configure_gamepad_hid(&mut builder, hid_state)))
        }
    };

    let usb_device = builder.build();

    // --- Status LEDs ---
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let ws2812 = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_16, &program);

    // --- Encoder executor ---
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let encoder_spawner = EXECUTOR_ENCODERS.start(interrupt::SWI_IRQ_1);
    encoder_spawner.spawn(encoder_task(decoder_x, x_a, x_b).unwrap());
    encoder_spawner.spawn(encoder_task(decoder_y, y_a, y_b).unwrap());

    // --- Main executor ---
    let executor = EXECUTOR_MAIN.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(usb_task(usb_device).unwrap());
        spawner.spawn(led_task(ws2812, &LED_SIGNAL).unwrap());
        spawner.spawn(mode_watch_task(mode_pin).unwrap());
        spawner.spawn(
            controller_task(hid, SignalFeedback::new(&LED_SIGNAL), reader_x, reader_y, pins)
                .unwrap(),
        );

        info!("Encoder paddles initialized");
    })
}

/// Encoder task - counts phase-A rising edges of one encoder.
#[embassy_executor::task(pool_size = 2)]
async fn encoder_task(
    decoder: QuadratureDecoder<'static>,
    phase_a: Input<'static>,
    phase_b: Input<'static>,
) {
    decoder.run(phase_a, phase_b).await
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// LED task - writes the latest feedback colors to the WS2812 chain.
#[embassy_executor::task]
async fn led_task(
    mut ws2812: PioWs2812<'static, PIO0, 0, LED_COUNT>,
    signal: &'static ColorSignal,
) {
    run_leds(&mut ws2812, signal).await
}

/// Mode watch task - the mode is fixed per boot, so any change restarts the
/// firmware and lets the new mode enumerate from scratch.
#[embassy_executor::task]
async fn mode_watch_task(mut mode_pin: Input<'static>) {
    mode_pin.wait_for_any_edge().await;
    info!("mode select changed, resetting");
    SCB::sys_reset();
}

/// Controller task - polls buttons and encoders and drives the HID output.
#[embassy_executor::task]
async fn controller_task(
    mut hid: PaddleHid,
    feedback: SignalFeedback,
    reader_x: CounterReader<'static>,
    reader_y: CounterReader<'static>,
    mut pins: ButtonPins<Input<'static>>,
) {
    // Wait for USB to be ready
    wait_hid_ready(&mut hid).await;
    info!("USB HID ready, running controller loop...");

    // Turns made before enumeration are not reported.
    let mut controller = Controller::new(CONTROLLER_CONFIG, hid, feedback, reader_x, reader_y);

    let mut ticker = Ticker::every(POLL_INTERVAL);
    loop {
        if let Err(e) = controller.poll(&mut pins, Instant::now()).await {
            error!("Controller error: {:?}", e);
        }
        ticker.next().await;
    }
}
