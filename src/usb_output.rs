//! USB HID mouse and gamepad outputs.

use defmt::Format;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{self, HidBootProtocol, HidSubclass, HidWriter, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;
use paddle_core::{
    AbsoluteGamepad, Axis, GamepadButton, MouseButton, OutputError, RelativePointer,
};
use usbd_hid::descriptor::{MouseReport, SerializedDescriptor};

/// USB driver for the RP2040 controller.
pub type UsbDriver<'d> = Driver<'d, USB>;

/// Size of a serialized [`MouseReport`] (buttons, x, y, wheel, pan).
pub const MOUSE_REPORT_SIZE: usize = 5;

/// USB HID gamepad report structure.
///
/// Matches [`GAMEPAD_REPORT_DESCRIPTOR`]: 16 buttons followed by full
/// 16-bit X and Y.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Format)]
#[repr(C)]
pub struct GamepadReport {
    /// Button bitfield, button 1 in bit 0.
    pub buttons: u16,
    pub x: i16,
    pub y: i16,
}

impl GamepadReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 6;

    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let buttons = self.buttons.to_le_bytes();
        let x = self.x.to_le_bytes();
        let y = self.y.to_le_bytes();
        [buttons[0], buttons[1], x[0], x[1], y[0], y[1]]
    }

    fn button_bit(button: GamepadButton) -> u16 {
        match button.0 {
            n @ 1..=16 => 1 << (n - 1),
            _ => 0,
        }
    }
}

/// HID gamepad descriptor with 16 buttons and signed 16-bit X/Y.
pub const GAMEPAD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (16 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x10, //   Report Count (16)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Paddle axes ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x16, 0x00, 0x80, //   Logical Minimum (-32768)
    0x26, 0xFF, 0x7F, //   Logical Maximum (32767)
    0x95, 0x02, //   Report Count (2)
    0x75, 0x10, //   Report Size (16)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

fn endpoint_error_to_output_error(e: EndpointError) -> OutputError {
    match e {
        EndpointError::Disabled => OutputError::NotReady,
        EndpointError::BufferOverflow => OutputError::Dropped,
    }
}

/// Wire layout of [`MouseReport`], in descriptor order.
fn mouse_report_bytes(report: &MouseReport) -> [u8; MOUSE_REPORT_SIZE] {
    [
        report.buttons,
        report.x as u8,
        report.y as u8,
        report.wheel as u8,
        report.pan as u8,
    ]
}

/// Clamp a displacement into one report's `i8` range.
fn report_step(remaining: i32) -> i8 {
    remaining.clamp(i32::from(i8::MIN), i32::from(i8::MAX)) as i8
}

/// USB HID relative mouse.
///
/// Displacements larger than one report can carry are split over several
/// consecutive reports.
pub struct UsbMouse<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, MOUSE_REPORT_SIZE>,
    buttons: u8,
}

impl<'d> UsbMouse<'d> {
    pub fn new(writer: HidWriter<'d, UsbDriver<'d>, MOUSE_REPORT_SIZE>) -> Self {
        Self { writer, buttons: 0 }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
    }

    async fn send(&mut self, x: i8, y: i8, wheel: i8) -> Result<(), OutputError> {
        let report = MouseReport {
            buttons: self.buttons,
            x,
            y,
            wheel,
            pan: 0,
        };
        self.writer
            .write(&mouse_report_bytes(&report))
            .await
            .map_err(endpoint_error_to_output_error)
    }
}

impl RelativePointer for UsbMouse<'_> {
    async fn press(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.buttons |= button.mask();
        self.send(0, 0, 0).await
    }

    async fn release(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.buttons &= !button.mask();
        self.send(0, 0, 0).await
    }

    async fn move_by(&mut self, dx: i32, dy: i32, dz: i32) -> Result<(), OutputError> {
        let (mut dx, mut dy, mut dz) = (dx, dy, dz);
        while dx != 0 || dy != 0 || dz != 0 {
            let (x, y, wheel) = (report_step(dx), report_step(dy), report_step(dz));
            self.send(x, y, wheel).await?;
            dx -= i32::from(x);
            dy -= i32::from(y);
            dz -= i32::from(wheel);
        }
        Ok(())
    }
}

/// USB HID absolute gamepad.
///
/// Button and axis changes are staged in a [`GamepadReport`] and sent on
/// [`commit`](AbsoluteGamepad::commit), only when the report differs from
/// the last one the host received.
pub struct UsbGamepad<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, { GamepadReport::SIZE }>,
    staged: GamepadReport,
    sent: Option<GamepadReport>,
}

impl<'d> UsbGamepad<'d> {
    pub fn new(writer: HidWriter<'d, UsbDriver<'d>, { GamepadReport::SIZE }>) -> Self {
        Self {
            writer,
            staged: GamepadReport::default(),
            sent: None,
        }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
    }
}

impl AbsoluteGamepad for UsbGamepad<'_> {
    async fn press(&mut self, button: GamepadButton) -> Result<(), OutputError> {
        self.staged.buttons |= GamepadReport::button_bit(button);
        Ok(())
    }

    async fn release(&mut self, button: GamepadButton) -> Result<(), OutputError> {
        self.staged.buttons &= !GamepadReport::button_bit(button);
        Ok(())
    }

    async fn set_axis(&mut self, axis: Axis, value: i16) -> Result<(), OutputError> {
        match axis {
            Axis::X => self.staged.x = value,
            Axis::Y => self.staged.y = value,
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), OutputError> {
        if self.sent == Some(self.staged) {
            return Ok(());
        }
        self.writer
            .write(&self.staged.as_bytes())
            .await
            .map_err(endpoint_error_to_output_error)?;
        self.sent = Some(self.staged);
        Ok(())
    }
}

/// Configure the mouse HID class in the USB builder.
///
/// Reports always use the [`MouseReport`] descriptor layout, so the interface
/// does not advertise boot-protocol support.
pub fn configure_mouse_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
) -> HidWriter<'d, UsbDriver<'d>, MOUSE_REPORT_SIZE> {
    let config = hid::Config {
        report_descriptor: MouseReport::desc(),
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 8,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}

/// Configure the gamepad HID class in the USB builder.
pub fn configure_gamepad_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
) -> HidWriter<'d, UsbDriver<'d>, { GamepadReport::SIZE }> {
    let config = hid::Config {
        report_descriptor: GAMEPAD_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 8,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
