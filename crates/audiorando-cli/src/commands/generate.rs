use audiorando_core::{EngineConfig, EngineError, FrameVerdict, OutputRequest};
use serde::Serialize;

use super::FrameReader;

/// Raw request flags from the command line.
pub struct GenerateArgs<'a> {
    pub kind: &'a str,
    pub length: usize,
    pub bytes: usize,
    pub width: Option<usize>,
    pub count: usize,
    pub min: i64,
    pub max: i64,
}

/// Map CLI flags onto an [`OutputRequest`].
pub fn build_request(args: &GenerateArgs<'_>) -> Result<OutputRequest, String> {
    match args.kind {
        "password" => Ok(OutputRequest::Password {
            length: args.length,
        }),
        "hex" => Ok(OutputRequest::HexString { bytes: args.bytes }),
        "number" => Ok(OutputRequest::Number {
            bytes: args.bytes,
            width: args.width,
        }),
        "dice" => Ok(OutputRequest::DiceRoll {
            count: args.count,
            min: args.min,
            max: args.max,
        }),
        other => Err(format!("unknown output kind '{other}'")),
    }
}

#[derive(Serialize)]
struct GenerateReport<'a> {
    kind: &'a str,
    #[serde(flatten)]
    output: &'a audiorando_core::DerivedOutput,
    frames: u64,
    frames_admitted: u64,
    pool_remaining: usize,
}

pub fn run(config: EngineConfig, args: GenerateArgs<'_>, input: &str, json: bool) {
    let request = build_request(&args).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    });

    let engine = super::make_engine(config);
    let reader = super::open_input(input).unwrap_or_else(|e| {
        eprintln!("Error opening {input}: {e}");
        std::process::exit(1);
    });
    let mut frames = FrameReader::new(reader, engine.config().frame_size);

    let mut total = 0u64;
    let mut admitted = 0u64;
    loop {
        match frames.next_frame() {
            Ok(Some(frame)) => {
                total += 1;
                if let FrameVerdict::Admitted { .. } = engine.on_frame(&frame).verdict {
                    admitted += 1;
                }
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error reading frames: {e}");
                std::process::exit(1);
            }
        }
    }
    log::info!(
        "fed {total} frames ({admitted} admitted), pool holds {} bytes",
        engine.available_entropy()
    );

    match engine.generate(&request) {
        Ok(output) if json => {
            let report = GenerateReport {
                kind: request.kind(),
                output: &output,
                frames: total,
                frames_admitted: admitted,
                pool_remaining: engine.available_entropy(),
            };
            match serde_json::to_string_pretty(&report) {
                Ok(s) => println!("{s}"),
                Err(e) => {
                    eprintln!("Error encoding JSON: {e}");
                    std::process::exit(1);
                }
            }
        }
        Ok(output) => println!("{output}"),
        Err(EngineError::InsufficientEntropy { needed, available }) => {
            eprintln!(
                "Not enough entropy has been gathered: need {needed} bytes, have {available}. \
                 Feed more frames ({total} read, {admitted} admitted) and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
