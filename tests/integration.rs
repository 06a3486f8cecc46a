//! Integration test: full encode session from configuration through
//! end-of-stream finalize, driven through the public API with the G.711
//! backend.

use framepack::codec::g711::{G711Encoder, Law};
use framepack::{EncoderConfig, EncoderError, EncoderSession, Packet, SessionRegistry};

const FRAME_SIZE: usize = 160;

fn make_session(frames_per_packet: usize) -> EncoderSession {
    let config = EncoderConfig {
        frames_per_packet,
        ..Default::default()
    };
    let encoder = G711Encoder::new(Law::ULaw, 1, 8000).expect("g711 backend");
    EncoderSession::new(config, Box::new(encoder)).expect("session")
}

/// Encode one frame of silence and return the emitted packet, if any.
fn encode_silence(session: &mut EncoderSession, out: &mut [u8]) -> Option<Packet> {
    let samples = vec![0i16; FRAME_SIZE];
    session.encode_frame(&samples, out).expect("encode frame")
}

#[test]
fn one_frame_per_packet_stream() {
    let mut session = make_session(1);
    let mut out = [0u8; 1024];

    // 3 frames of 160 samples, no lookahead: packets at pts 0, 160, 320.
    for expected_pts in [0i64, 160, 320] {
        let pkt = encode_silence(&mut session, &mut out).expect("packet per frame");
        assert_eq!(pkt.pts, expected_pts);
        assert_eq!(pkt.len, FRAME_SIZE);
        assert!(out[..pkt.len].iter().all(|&b| b == 0xFF), "µ-law silence");
    }

    // Exact multiple of frames_per_packet: nothing left to flush.
    assert!(session.finish(&mut out).expect("finish").is_none());
}

#[test]
fn two_frames_per_packet_with_padded_tail() {
    let mut session = make_session(2);
    let mut out = [0u8; 1024];

    // Frame 1 accumulates, frame 2 completes the first packet at pts 0.
    assert!(encode_silence(&mut session, &mut out).is_none());
    let first = encode_silence(&mut session, &mut out).expect("first packet");
    assert_eq!(first.pts, 0);
    assert_eq!(first.len, 2 * FRAME_SIZE);

    // Frame 3 accumulates; finalize pads the missing slot and emits.
    assert!(encode_silence(&mut session, &mut out).is_none());
    let last = session.finish(&mut out).expect("finish").expect("padded packet");
    assert_eq!(last.pts, 320);
    // One real frame plus one 8-bit terminator (the µ-law silence byte).
    assert_eq!(last.len, FRAME_SIZE + 1);
    assert_eq!(out[FRAME_SIZE], 0xFF);

    // Second finish finds clean state.
    assert!(session.finish(&mut out).expect("second finish").is_none());
}

#[test]
fn packet_cadence_across_configurations() {
    for k in 1..=8usize {
        let mut session = make_session(k);
        let mut out = [0u8; 4096];
        let n = 20usize;
        let mut emitted = 0;
        let mut last_pts = i64::MIN;

        for _ in 0..n {
            if let Some(pkt) = encode_silence(&mut session, &mut out) {
                assert!(pkt.pts >= last_pts, "timestamps non-decreasing");
                last_pts = pkt.pts;
                emitted += 1;
            }
        }
        assert_eq!(emitted, n / k, "floor(N/k) packets before finalize");

        let tail = session.finish(&mut out).expect("finish");
        assert_eq!(tail.is_some(), n % k != 0);
        if let Some(pkt) = tail {
            assert!(pkt.pts >= last_pts);
            // r real frames plus one terminator byte per unused slot.
            let r = n % k;
            assert_eq!(pkt.len, r * FRAME_SIZE + (k - r));
        }
    }
}

#[test]
fn too_small_output_buffer_recovers_on_retry() {
    let mut session = make_session(1);
    let mut small = [0u8; 16];

    let samples = vec![0i16; FRAME_SIZE];
    let err = session.encode_frame(&samples, &mut small).unwrap_err();
    assert!(matches!(
        err,
        EncoderError::OutputBufferTooSmall {
            needed: FRAME_SIZE,
            capacity: 16
        }
    ));

    // The frame is counted; submitting another before draining is rejected.
    assert!(matches!(
        session.encode_frame(&samples, &mut small),
        Err(EncoderError::PacketPending)
    ));

    let mut big = [0u8; 1024];
    let pkt = session
        .retry_drain(&mut big)
        .expect("retry")
        .expect("pending packet");
    assert_eq!(pkt.pts, 0);
    assert_eq!(pkt.len, FRAME_SIZE);
    assert!(big[..pkt.len].iter().all(|&b| b == 0xFF));

    // The stream continues normally after recovery.
    let next = encode_silence(&mut session, &mut big).expect("next packet");
    assert_eq!(next.pts, 160);
}

#[test]
fn registry_drives_a_full_session() {
    let registry = SessionRegistry::new();
    let encoder = G711Encoder::new(Law::ALaw, 1, 8000).expect("g711 backend");
    let handle = registry
        .create_session(
            EncoderConfig {
                frames_per_packet: 2,
                ..Default::default()
            },
            Box::new(encoder),
        )
        .expect("session");
    let id = handle.lock().id().to_string();

    let mut out = [0u8; 1024];
    {
        let mut session = handle.lock();
        assert_eq!(&session.extradata()[..4], b"G711");

        let samples = vec![0i16; FRAME_SIZE];
        assert!(session.encode_frame(&samples, &mut out).expect("frame 1").is_none());
        let pkt = session
            .encode_frame(&samples, &mut out)
            .expect("frame 2")
            .expect("completed packet");
        assert_eq!(pkt.pts, 0);
        assert!(out[..pkt.len].iter().all(|&b| b == 0xD5), "A-law silence");

        assert!(session.finish(&mut out).expect("finish").is_none());
    }

    registry.remove_session(&id).expect("remove");
    assert!(registry.get_session(&id).is_none());
}
