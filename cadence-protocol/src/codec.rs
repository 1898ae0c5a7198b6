//! Postcard encoding of host messages
//!
//! Messages are serialized with postcard and COBS-encoded so that a zero
//! byte always terminates a frame and never appears inside one.

use serde::{Deserialize, Serialize};

use crate::messages::{HostCommand, StatusEvent};

/// Errors from encoding or decoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Output buffer too small for the encoded message
    BufferTooSmall,
    /// Frame is not valid COBS or carries an unknown message
    InvalidFrame,
}

impl From<postcard::Error> for CodecError {
    fn from(error: postcard::Error) -> Self {
        match error {
            postcard::Error::SerializeBufferFull => CodecError::BufferTooSmall,
            _ => CodecError::InvalidFrame,
        }
    }
}

fn encode<'a, T: Serialize>(message: &T, buffer: &'a mut [u8]) -> Result<&'a mut [u8], CodecError> {
    Ok(postcard::to_slice_cobs(message, buffer)?)
}

fn decode<'a, T: Deserialize<'a>>(frame: &'a mut [u8]) -> Result<T, CodecError> {
    Ok(postcard::from_bytes_cobs(frame)?)
}

/// Encode a status event into `buffer`, returning the written frame
pub fn encode_event<'a>(event: &StatusEvent, buffer: &'a mut [u8]) -> Result<&'a mut [u8], CodecError> {
    encode(event, buffer)
}

/// Decode a status event frame (decoded in place)
pub fn decode_event(frame: &mut [u8]) -> Result<StatusEvent, CodecError> {
    decode(frame)
}

/// Encode a host command into `buffer`, returning the written frame
pub fn encode_command<'a>(
    command: &HostCommand,
    buffer: &'a mut [u8],
) -> Result<&'a mut [u8], CodecError> {
    encode(command, buffer)
}

/// Decode a host command frame (decoded in place)
pub fn decode_command(frame: &mut [u8]) -> Result<HostCommand, CodecError> {
    decode(frame)
}
