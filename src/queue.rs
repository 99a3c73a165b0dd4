//! Outbound message queue
//!
//! Both the display controller and the simulator funnel their traffic through
//! a FIFO of [`Message`]s guarded by an in-flight flag, so at most one
//! transfer reaches the interface at a time. Interleaving a command frame
//! into a half-sent data frame would corrupt the protocol; the queue makes
//! that impossible regardless of how callers are structured.
//!
//! A failed transfer does not stall the queue: the flag is released on every
//! path, the failure is logged, draining continues with the next message,
//! and the first error is reported to the caller.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::interface::DisplayInterface;

/// Whether a message carries command bytes or pixel data
///
/// Maps to the CD line on real hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// Configuration bytes, CD low
    Command,
    /// Pixel payload bytes, CD high
    Data,
}

/// One outbound transfer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Command or data framing
    pub kind: MessageKind,
    /// The bytes to send
    pub payload: Vec<u8>,
}

impl Message {
    /// Build a command message
    pub fn command(payload: Vec<u8>) -> Self {
        Self {
            kind: MessageKind::Command,
            payload,
        }
    }

    /// Build a data message
    pub fn data(payload: Vec<u8>) -> Self {
        Self {
            kind: MessageKind::Data,
            payload,
        }
    }
}

/// FIFO of pending transfers with an at-most-one-in-flight guarantee
#[derive(Debug, Default)]
pub struct TransferQueue {
    messages: VecDeque<Message>,
    in_flight: bool,
}

impl TransferQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the back of the queue
    pub fn enqueue(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a transfer is currently in flight
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Send queued messages through the interface, oldest first
    ///
    /// A re-entrant call while a transfer is in flight returns immediately;
    /// the active drain finishes the queue. Transfer failures are logged and
    /// draining continues; the first failure is returned once the queue is
    /// empty.
    pub fn drain<I: DisplayInterface>(&mut self, interface: &mut I) -> Result<(), I::Error> {
        if self.in_flight {
            return Ok(());
        }
        let mut first_error = None;
        while let Some(message) = self.messages.pop_front() {
            self.in_flight = true;
            let result = interface.send(message.kind, &message.payload);
            self.in_flight = false;
            if let Err(error) = result {
                log::warn!(
                    "{:?} transfer of {} bytes failed: {:?}",
                    message.kind,
                    message.payload.len(),
                    error
                );
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
