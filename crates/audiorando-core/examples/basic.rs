//! Basic engine walkthrough.
//!
//! Feeds synthetic analyser frames into an engine, then pulls one of each
//! output kind.
//!
//! Run: `cargo run --example basic`

use audiorando_core::{Engine, EngineConfig, OutputRequest, SampleFrame};

fn main() {
    let engine = Engine::new(EngineConfig::default()).expect("default config is valid");

    // Stand-in for a microphone: a cheap xorshift over 128 bins per tick
    let mut state = 0x2545_f491_u32;
    for _ in 0..64 {
        let bins: Vec<u8> = (0..engine.config().frame_size)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect();
        engine.on_frame(&SampleFrame::new(bins));
    }
    println!("Pooled entropy: {} bytes", engine.available_entropy());

    let requests = [
        OutputRequest::Number { bytes: 2, width: Some(5) },
        OutputRequest::DiceRoll { count: 3, min: 1, max: 6 },
        OutputRequest::Password { length: 20 },
        OutputRequest::HexString { bytes: 16 },
    ];
    for request in &requests {
        match engine.generate(request) {
            Ok(out) => println!("{:<9} {out}  ({} bytes used)", request.kind(), out.consumed),
            Err(e) => println!("{:<9} error: {e}", request.kind()),
        }
    }
    println!("Remaining: {} bytes", engine.available_entropy());
}
