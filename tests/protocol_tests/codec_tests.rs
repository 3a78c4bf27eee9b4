//! Codec Tests
//!
//! Tests for request and response framing.

use std::io::Cursor;

use lrukv::protocol::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, Item, Request, RequestType, Response, Status,
    HEADER_SIZE, MAX_BODY_SIZE,
};
use lrukv::KvError;

// =============================================================================
// Request Tests
// =============================================================================

#[test]
fn test_encode_decode_each_request_type() {
    let requests = vec![
        Request::Get { key: "hello".into() },
        Request::Set {
            key: "mykey".into(),
            value: "myvalue".into(),
        },
        Request::Delete {
            key: "todelete".into(),
        },
        Request::Stream,
    ];

    for request in requests {
        let encoded = encode_request(&request).unwrap();
        assert_eq!(decode_request(&encoded).unwrap(), request);
    }
}

#[test]
fn test_request_type_and_key() {
    let set = Request::Set {
        key: "k".into(),
        value: "v".into(),
    };
    assert_eq!(set.request_type(), RequestType::Set);
    assert_eq!(set.key(), Some("k"));
    assert_eq!(Request::Stream.request_type(), RequestType::Stream);
    assert_eq!(Request::Stream.key(), None);
    assert_eq!(RequestType::Delete.to_string(), "DELETE");
}

#[test]
fn test_header_declares_body_length() {
    let encoded = encode_request(&Request::Get { key: "abc".into() }).unwrap();

    let declared = u32::from_be_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]) as usize;
    assert_eq!(declared, encoded.len() - HEADER_SIZE);
}

#[test]
fn test_empty_value_and_unicode() {
    let request = Request::Set {
        key: "ключ".into(),
        value: String::new(),
    };
    let encoded = encode_request(&request).unwrap();
    assert_eq!(decode_request(&encoded).unwrap(), request);
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_encode_decode_responses() {
    let responses = vec![
        Response::ok(),
        Response::error(),
        Response::ok_with(vec![Item::new("foo", "")]),
        Response::ok_with(vec![Item::new("b", "2"), Item::new("a", "1")]),
    ];

    for response in responses {
        let encoded = encode_response(&response).unwrap();
        assert_eq!(decode_response(&encoded).unwrap(), response);
    }
}

#[test]
fn test_ok_with_empty_list_is_absent() {
    let response = Response::ok_with(Vec::new());
    assert_eq!(response.status, Status::Ok);
    assert!(response.items.is_none());
    assert!(response.items().is_empty());
}

#[test]
fn test_item_without_value() {
    let response = Response {
        status: Status::Ok,
        items: Some(vec![Item {
            key: "k".into(),
            value: None,
        }]),
    };
    let decoded = decode_response(&encode_response(&response).unwrap()).unwrap();
    assert_eq!(decoded.items()[0].value, None);
    assert_eq!(decoded.items()[0].value_str(), "");
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_decode_incomplete_header() {
    let result = decode_request(&[0x00, 0x00, 0x01]);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_incomplete_body() {
    let encoded = encode_request(&Request::Get { key: "hello".into() }).unwrap();
    let truncated = &encoded[..encoded.len() - 2];
    assert!(matches!(decode_request(truncated), Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_corrupted_body_fails_checksum() {
    let mut encoded = encode_request(&Request::Get { key: "hello".into() })
        .unwrap()
        .to_vec();
    let last = encoded.len() - 1;
    encoded[last] ^= 0xFF;

    match decode_request(&encoded) {
        Err(KvError::Protocol(msg)) => assert!(msg.contains("Checksum")),
        other => panic!("Expected checksum error, got {:?}", other),
    }
}

#[test]
fn test_decode_oversized_body_rejected() {
    let mut frame = Vec::new();
    frame.extend_from_slice(&(MAX_BODY_SIZE + 1).to_be_bytes());
    frame.extend_from_slice(&0u32.to_be_bytes());

    assert!(matches!(decode_request(&frame), Err(KvError::Protocol(_))));
    assert!(matches!(
        read_request(&mut Cursor::new(frame)),
        Err(KvError::Protocol(_))
    ));
}

#[test]
fn test_decode_garbage_body() {
    let body = [0xFFu8; 6];
    let mut frame = Vec::new();
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&crc32fast::hash(&body).to_be_bytes());
    frame.extend_from_slice(&body);

    assert!(matches!(decode_request(&frame), Err(KvError::Protocol(_))));
}

#[test]
fn test_response_frame_is_not_a_request() {
    // A response body with items does not parse as a request variant
    let encoded = encode_response(&Response::ok_with(vec![Item::new("k", "v")])).unwrap();
    assert!(decode_request(&encoded).is_err());
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_requests() {
    let mut buffer = Vec::new();
    write_request(&mut buffer, &Request::Set {
        key: "a".into(),
        value: "1".into(),
    })
    .unwrap();
    write_request(&mut buffer, &Request::Stream).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(
        read_request(&mut cursor).unwrap(),
        Request::Set {
            key: "a".into(),
            value: "1".into()
        }
    );
    assert_eq!(read_request(&mut cursor).unwrap(), Request::Stream);

    // Nothing left: clean EOF is an I/O error, not a protocol error
    let err = read_request(&mut cursor).unwrap_err();
    assert!(err.is_disconnect());
}

#[test]
fn test_stream_write_read_response() {
    let response = Response::ok_with(vec![Item::new("foo", "bar")]);
    let mut buffer = Vec::new();
    write_response(&mut buffer, &response).unwrap();

    let decoded = read_response(&mut Cursor::new(buffer)).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn test_stream_truncated_body_is_io_error() {
    let encoded = encode_request(&Request::Get { key: "hello".into() }).unwrap();
    let truncated = encoded[..encoded.len() - 1].to_vec();

    let err = read_request(&mut Cursor::new(truncated)).unwrap_err();
    assert!(matches!(err, KvError::Io(_)));
}
