//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`]
//! struct for communicating with the display controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The controller needs:
//! - SPI bus (MOSI + SCK)
//! - 2 GPIO pins:
//!   - **CD**: Command/Data select (output, low = command, high = data)
//!   - **RST**: Reset (output, active low)
//!
//! The core depends only on the trait: anything that can frame a byte
//! sequence as command or data qualifies, including the
//! [`Simulator`](crate::sim::Simulator).
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use dogs102::{DisplayInterface, Interface, MessageKind};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin);
//!
//! // Send a command frame
//! let _ = interface.send(MessageKind::Command, &[0xE2]);
//!
//! // Send pixel data
//! let _ = interface.send(MessageKind::Data, &[0xFF, 0x00, 0xFF]);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::queue::MessageKind;

/// Duration of the hardware reset pulse in milliseconds
pub const RESET_PULSE_MS: u32 = 10;

/// Trait for the transport between the core and a display
///
/// Implementations must frame `bytes` as a single transfer in the mode given
/// by `kind`. For SPI hardware that means driving the CD line before
/// clocking the payload out.
pub trait DisplayInterface {
    /// Error type for transport operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send one message with the given framing
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails; the message is then dropped.
    fn send(&mut self, kind: MessageKind, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Perform a hardware reset
    ///
    /// The implementation must hold the reset condition for at least
    /// [`RESET_PULSE_MS`] and give the controller the same time to come back
    /// up before returning.
    fn reset<D: DelayNs>(&mut self, delay: &mut D);
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// SPI + GPIO interface implementation
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `CD` - Command/Data pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
pub struct Interface<SPI, CD, RST> {
    /// SPI device for communication
    spi: SPI,
    /// Command/Data select pin (low = command, high = data)
    cd: CD,
    /// Reset pin (active low)
    rst: RST,
}

impl<SPI, CD, RST> Interface<SPI, CD, RST>
where
    SPI: SpiDevice,
    CD: OutputPin,
    RST: OutputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `cd` - Command/Data pin (output, low = command, high = data)
    /// * `rst` - Reset pin (output, active low)
    pub fn new(spi: SPI, cd: CD, rst: RST) -> Self {
        Self { spi, cd, rst }
    }
}

impl<SPI, CD, RST, PinErr> DisplayInterface for Interface<SPI, CD, RST>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    CD: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send(&mut self, kind: MessageKind, bytes: &[u8]) -> Result<(), Self::Error> {
        match kind {
            MessageKind::Command => self.cd.set_low(),
            MessageKind::Data => self.cd.set_high(),
        }
        .map_err(InterfaceError::Pin)?;
        self.spi.write(bytes).map_err(InterfaceError::Spi)?;
        // Park the CD line low between transfers
        self.cd.set_low().map_err(InterfaceError::Pin)?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        // Reset sequence: LOW -> wait -> HIGH -> wait
        let _ = self.rst.set_low();
        delay.delay_ms(RESET_PULSE_MS);
        let _ = self.rst.set_high();
        delay.delay_ms(RESET_PULSE_MS);
    }
}
