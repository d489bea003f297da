//! Checksum sensitivity and rejection of malformed buffers.

use super::helpers::*;
use legal_frame_codec::checksum::checksum;
use legal_frame_codec::layout::{batch_v1, node_batch_v1, BATCH_HEADER_SIZE, NODE_BATCH_HEADER_SIZE};
use legal_frame_codec::storage::{BatchFramer, DecodeError, NodeBatchCodec, RecordCodec};
use legal_frame_codec::FrameError;

#[test]
fn test_every_payload_byte_flip_is_an_integrity_error() {
    let framer = BatchFramer::new();
    let bytes = framer.pack_at(&documents(2), 1, TS).expect("pack");

    let mut failures = 0usize;
    for offset in BATCH_HEADER_SIZE..bytes.len() {
        match framer.unpack(&flipped(&bytes, offset)) {
            Err(DecodeError::IntegrityError { .. }) => failures += 1,
            other => panic!("flip at {offset}: expected IntegrityError, got {other:?}"),
        }
    }

    println!("AFTER: {failures} flips rejected");
    assert_eq!(failures, bytes.len() - BATCH_HEADER_SIZE);
}

#[test]
fn test_magic_flip_is_invalid_format() {
    let framer = BatchFramer::new();
    let bytes = framer.pack_at(&documents(1), 1, TS).expect("pack");

    for offset in batch_v1::MAGIC.range() {
        let result = framer.unpack(&flipped(&bytes, offset));
        assert!(
            matches!(result, Err(DecodeError::InvalidFormat { .. })),
            "magic byte {offset}: {result:?}"
        );
    }
}

#[test]
fn test_stored_checksum_flip_is_an_integrity_error() {
    let framer = BatchFramer::new();
    let bytes = framer.pack_at(&documents(1), 1, TS).expect("pack");

    let result = framer.unpack(&flipped(&bytes, batch_v1::CHECKSUM.offset));
    assert!(matches!(result, Err(DecodeError::IntegrityError { .. })));
}

#[test]
fn test_truncated_batch_is_truncated_buffer() {
    let framer = BatchFramer::new();
    let bytes = framer.pack_at(&documents(2), 1, TS).expect("pack");

    let result = framer.unpack(&bytes[..bytes.len() - 1]);
    assert!(matches!(result, Err(DecodeError::TruncatedBuffer { .. })));

    let result = framer.unpack(&bytes[..BATCH_HEADER_SIZE - 1]);
    assert!(matches!(result, Err(DecodeError::TruncatedBuffer { .. })));
}

#[test]
fn test_trailing_bytes_with_valid_checksum_are_invalid_format() {
    let framer = BatchFramer::new();
    let mut bytes = framer.pack_at(&documents(1), 1, TS).expect("pack");
    bytes.extend_from_slice(&[0u8; 16]);
    let crc = checksum(&bytes[BATCH_HEADER_SIZE..]);
    batch_v1::CHECKSUM.write_u32(&mut bytes, crc);

    let result = framer.unpack(&bytes);
    assert!(matches!(result, Err(DecodeError::InvalidFormat { .. })), "{result:?}");
}

#[test]
fn test_record_checksum_detects_frame_corruption() {
    let codec = RecordCodec::new();
    let bytes = codec.encode(&document(1), 1).expect("encode");

    // Flip a byte inside the embedding region.
    let result = codec.decode(&flipped(&bytes, 500));
    assert!(matches!(result, Err(DecodeError::IntegrityError { .. })));

    let lenient = RecordCodec::without_checksum_verification();
    assert!(lenient.decode(&flipped(&bytes, 500)).is_ok());
}

#[test]
fn test_record_checksum_covers_header_identity_fields() {
    let codec = RecordCodec::new();
    let bytes = codec.encode(&document(3), 1).expect("encode");

    // content_id, feature_flags, created_at
    for offset in [8usize, 20, 27] {
        let result = codec.decode(&flipped(&bytes, offset));
        println!("flip at {offset}: {:?}", result.as_ref().map(|r| r.content_id));
        assert!(
            matches!(result, Err(DecodeError::IntegrityError { .. })),
            "flip at {offset} decoded"
        );
    }
}

#[test]
fn test_every_node_payload_byte_flip_is_an_integrity_error() {
    let codec = NodeBatchCodec::new();
    let bytes = codec.encode_at(&nodes(3), TS).expect("encode");

    for offset in NODE_BATCH_HEADER_SIZE..bytes.len() {
        let result = codec.decode(&flipped(&bytes, offset));
        assert!(
            matches!(result, Err(DecodeError::IntegrityError { .. })),
            "flip at {offset}: {result:?}"
        );
    }
}

#[test]
fn test_node_magic_flip_is_invalid_format() {
    let codec = NodeBatchCodec::new();
    let bytes = codec.encode_at(&nodes(2), TS).expect("encode");

    let result = codec.decode(&flipped(&bytes, node_batch_v1::MAGIC.offset));
    assert!(matches!(result, Err(DecodeError::InvalidFormat { .. })));
}

#[test]
fn test_decode_errors_are_corruption() {
    let framer = BatchFramer::new();
    let bytes = framer.pack_at(&documents(1), 1, TS).expect("pack");

    let error: FrameError = framer
        .unpack(&flipped(&bytes, BATCH_HEADER_SIZE + 1))
        .expect_err("corrupted")
        .into();
    assert!(error.is_corruption());
    println!("AFTER: {error}");
}
