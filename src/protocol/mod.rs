//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Len (4)  │ CRC (4)  │      Body (bincode)         │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//! Both header fields are big-endian. `Len` counts body bytes only and
//! `CRC` is the CRC32 of the body.
//!
//! ### Requests
//! - GET    { key }
//! - SET    { key, value }
//! - DELETE { key }
//! - STREAM
//!
//! ### Responses
//! - status: OK | ERROR
//! - items:  optional list of key/value pairs
//!
//! Exactly one response is written per request.

mod request;
mod response;
mod codec;

pub use request::{Request, RequestType};
pub use response::{Item, Response, Status};
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, HEADER_SIZE, MAX_BODY_SIZE,
};
