//! KISS解帧随机化测试

use bytes::{BufMut, BytesMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ssdv_link::kiss::{deframe, encode_data_frame, encode_frame, KissDeframer};

/// 生成大量包含C0/DB的随机净荷
fn random_payload(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut payload = vec![0u8; len];
    rng.fill_bytes(&mut payload);
    for byte in payload.iter_mut() {
        *byte = match *byte % 4 {
            0 => 0xC0,
            1 => 0xDB,
            _ => *byte,
        };
    }
    payload
}

#[test]
fn test_random_payloads_survive_escaping() {
    let mut rng = StdRng::seed_from_u64(0x55D7);
    let mut capture = BytesMut::new();
    let mut expected = Vec::new();

    for _ in 0..200 {
        let len = 1 + (rng.next_u32() % 300) as usize;
        let payload = random_payload(&mut rng, len);
        capture.put_slice(&encode_data_frame(0, &payload));
        expected.push(payload);
    }

    let frames = deframe(&capture, None);
    assert_eq!(frames.len(), expected.len());
    for (frame, payload) in frames.iter().zip(&expected) {
        assert_eq!(&frame[..], &payload[..]);
    }
}

#[test]
fn test_fixed_size_filter_with_interleaved_control_frames() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut capture = BytesMut::new();
    let mut expected = Vec::new();

    for i in 0..64 {
        let payload = random_payload(&mut rng, 256);
        capture.put_slice(&encode_data_frame(0, &payload));
        expected.push(payload);

        // 控制帧和长度不符的数据帧都应被丢弃
        capture.put_slice(&encode_frame(0x06, &[i as u8]));
        capture.put_slice(&encode_data_frame(0, &random_payload(&mut rng, 255)));
    }

    let frames = deframe(&capture, Some(256));
    assert_eq!(frames.len(), expected.len());
    assert!(frames.iter().zip(&expected).all(|(f, p)| f[..] == p[..]));
}

#[test]
fn test_random_chunking_matches_batch() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut capture = BytesMut::new();
    for _ in 0..50 {
        let len = 1 + (rng.next_u32() % 64) as usize;
        capture.put_slice(&encode_data_frame(0, &random_payload(&mut rng, len)));
    }
    let expected = deframe(&capture, None);

    let mut deframer = KissDeframer::new(None);
    let mut frames = Vec::new();
    let mut rest = &capture[..];
    while !rest.is_empty() {
        let take = (1 + rng.next_u32() % 17) as usize;
        let (chunk, tail) = rest.split_at(take.min(rest.len()));
        frames.extend(deframer.push(chunk));
        rest = tail;
    }

    assert_eq!(frames, expected);
    assert_eq!(deframer.finish().trailing_bytes_discarded, 0);
}

#[test]
fn test_truncated_capture_drops_last_frame() {
    let mut capture = BytesMut::new();
    capture.put_slice(&encode_data_frame(0, &[0x01, 0x02]));
    let last = encode_data_frame(0, &[0x03, 0x04]);
    // 去掉最后一个帧结束标记
    capture.put_slice(&last[..last.len() - 1]);

    let frames = deframe(&capture, None);
    assert_eq!(frames.len(), 1);
    assert_eq!(&frames[0][..], &[0x01, 0x02]);
}
