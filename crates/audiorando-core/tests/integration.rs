//! Integration tests for audiorando-core.
//!
//! These drive the full pipeline through the public API:
//! frame → quality gate → whitening → pool → withdrawal → derivation.

use audiorando_core::{
    DigestAlgorithm, Engine, EngineConfig, EngineError, EntropyPool, FrameVerdict,
    OutputDeriver, OutputRequest, SampleFrame, roll_many, whiten,
};

/// Deterministic "microphone": distinct bins, no zero leaders.
fn frame(seed: u8, size: usize) -> SampleFrame {
    SampleFrame::new(
        (0..size)
            .map(|i| ((i as u32 * 31 + seed as u32 * 7) % 250) as u8 + 1)
            .collect(),
    )
}

fn engine() -> Engine {
    Engine::new(EngineConfig {
        pool_capacity: 256,
        frame_size: 32,
        chunk_size: 16,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn pipeline_admits_and_generates() {
    let engine = engine();
    let mut level = 0;
    for seed in 0..4 {
        let outcome = engine.on_frame(&frame(seed, 32));
        assert!(matches!(outcome.verdict, FrameVerdict::Admitted { .. }));
        assert!(outcome.pool_level > level);
        level = outcome.pool_level;
    }

    let out = engine
        .generate(&OutputRequest::HexString { bytes: 64 })
        .unwrap();
    assert_eq!(out.to_string().len(), 128);
    assert_eq!(out.consumed, 16);
    assert_eq!(engine.available_entropy(), level - 16);
}

#[test]
fn pool_capacity_example() {
    let pool = EntropyPool::new(8);
    assert_eq!(pool.admit(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]), 8);
    assert_eq!(pool.withdraw(8).unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn hex_from_fixed_chunk_is_reproducible() {
    let deriver = OutputDeriver::default();
    let chunk = [0x01, 0x02, 0x03, 0x04];
    let request = OutputRequest::HexString { bytes: 4 };
    let first = deriver.derive(&request, &chunk).unwrap();
    let second = deriver.derive(&request, &chunk).unwrap();
    assert_eq!(first.to_string().len(), 8);
    assert_eq!(first, second);
}

#[test]
fn dice_from_fixed_chunk_is_reproducible() {
    let chunk: Vec<u8> = (100u8..116).collect();
    let a = roll_many(2, 1, 6, &chunk).unwrap();
    let b = roll_many(2, 1, 6, &chunk).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.rolls.len(), 2);
    assert!(a.rolls.iter().all(|r| (1..=6).contains(r)));
    assert_eq!(a.total, (a.rolls[0] + a.rolls[1]) as i128);
}

#[test]
fn zero_size_request_consumes_nothing() {
    let engine = engine();
    engine.on_frame(&frame(1, 32));
    let before = engine.available_entropy();
    let err = engine
        .generate(&OutputRequest::Password { length: 0 })
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRequest(_)));
    assert_eq!(engine.available_entropy(), before);
}

#[test]
fn insufficient_entropy_reports_counts() {
    let engine = engine();
    match engine.generate(&OutputRequest::DiceRoll { count: 4, min: 1, max: 20 }) {
        Err(EngineError::InsufficientEntropy { needed, available }) => {
            assert_eq!(needed, 32);
            assert_eq!(available, 0);
        }
        other => panic!("expected InsufficientEntropy, got {other:?}"),
    }
}

#[test]
fn consecutive_requests_use_distinct_chunks() {
    let engine = engine();
    for seed in 0..8 {
        engine.on_frame(&frame(seed, 32));
    }
    let request = OutputRequest::Password { length: 24 };
    let a = engine.generate(&request).unwrap();
    let b = engine.generate(&request).unwrap();
    assert_ne!(a, b);
}

#[test]
fn whitening_properties_hold_on_frames() {
    for seed in 0..32u8 {
        let bins = frame(seed, 33);
        let out = whiten(bins.as_bytes());
        assert!(out.len() <= 16);
        assert!(!out.contains(&0));
    }
}

#[test]
fn sha512_engine_differs_from_sha256() {
    let make = |digest| {
        let engine = Engine::new(EngineConfig {
            frame_size: 32,
            digest,
            ..Default::default()
        })
        .unwrap();
        for seed in 0..2 {
            engine.on_frame(&frame(seed, 32));
        }
        engine
            .generate(&OutputRequest::Number { bytes: 16, width: None })
            .unwrap()
    };
    assert_ne!(make(DigestAlgorithm::Sha256), make(DigestAlgorithm::Sha512));
}

#[test]
fn engine_shared_between_threads() {
    let engine = engine();
    std::thread::scope(|s| {
        s.spawn(|| {
            for seed in 0..200u32 {
                engine.on_frame(&frame((seed % 256) as u8, 32));
            }
        });
        s.spawn(|| {
            for _ in 0..200 {
                let _ = engine.generate(&OutputRequest::HexString { bytes: 8 });
                assert!(engine.available_entropy() <= 256);
            }
        });
    });
    let stats = engine.pool_stats();
    assert_eq!(
        stats.total_admitted - stats.total_withdrawn,
        stats.available as u64
    );
}
