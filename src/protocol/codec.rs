//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Len (4)  │ CRC (4)  │      Body (bincode)         │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! The body is the bincode encoding of a `Request` or `Response`. A frame
//! is rejected if the body exceeds `MAX_BODY_SIZE`, the checksum does not
//! match, or the body does not decode to the expected type.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{KvError, Result};
use super::{Request, Response};

/// Header size: 4 bytes body length + 4 bytes CRC32
pub const HEADER_SIZE: usize = 8;

/// Maximum body size (16 MB)
pub const MAX_BODY_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Framing
// =============================================================================

fn encode_frame<T: Serialize>(message: &T) -> Result<Bytes> {
    let body = bincode::serialize(message)?;
    if body.len() > MAX_BODY_SIZE as usize {
        return Err(KvError::Protocol(format!(
            "Body too large: {} bytes (max {})",
            body.len(),
            MAX_BODY_SIZE
        )));
    }

    let mut frame = BytesMut::with_capacity(HEADER_SIZE + body.len());
    frame.put_u32(body.len() as u32);
    frame.put_u32(crc32fast::hash(&body));
    frame.extend_from_slice(&body);

    Ok(frame.freeze())
}

/// Parse the header, returning (body_len, crc)
fn parse_header(mut header: &[u8]) -> Result<(usize, u32)> {
    if header.len() < HEADER_SIZE {
        return Err(KvError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            header.len()
        )));
    }

    let body_len = header.get_u32();
    let crc = header.get_u32();

    if body_len > MAX_BODY_SIZE {
        return Err(KvError::Protocol(format!(
            "Body too large: {} bytes (max {})",
            body_len, MAX_BODY_SIZE
        )));
    }

    Ok((body_len as usize, crc))
}

fn decode_body<T: DeserializeOwned>(body: &[u8], crc: u32) -> Result<T> {
    let actual = crc32fast::hash(body);
    if actual != crc {
        return Err(KvError::Protocol(format!(
            "Checksum mismatch: expected 0x{:08x}, got 0x{:08x}",
            crc, actual
        )));
    }

    bincode::deserialize(body)
        .map_err(|e| KvError::Protocol(format!("Malformed body: {}", e)))
}

fn decode_frame<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (body_len, crc) = parse_header(bytes)?;

    let total_len = HEADER_SIZE + body_len;
    if bytes.len() < total_len {
        return Err(KvError::Protocol(format!(
            "Incomplete body: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    decode_body(&bytes[HEADER_SIZE..total_len], crc)
}

/// Read one frame from a stream
///
/// I/O errors (EOF, reset, timeout) surface as `KvError::Io` so callers can
/// tell a vanished peer from a malformed frame.
fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let (body_len, crc) = parse_header(&header)?;

    let mut body = vec![0u8; body_len];
    if body_len > 0 {
        reader.read_exact(&mut body)?;
    }

    decode_body(&body, crc)
}

fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    writer.write_all(frame)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to a frame
pub fn encode_request(request: &Request) -> Result<Bytes> {
    encode_frame(request)
}

/// Decode a request from a complete frame
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    decode_frame(bytes)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to a frame
pub fn encode_response(response: &Response) -> Result<Bytes> {
    encode_frame(response)
}

/// Decode a response from a complete frame
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    decode_frame(bytes)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete request from a stream
///
/// Blocks until a complete request is received or an error occurs
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    read_frame(reader)
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let frame = encode_request(request)?;
    write_frame(writer, &frame)
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    read_frame(reader)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let frame = encode_response(response)?;
    write_frame(writer, &frame)
}
