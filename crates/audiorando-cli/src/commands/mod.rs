pub mod config;
pub mod generate;
pub mod listen;

use std::fs::File;
use std::io::{self, BufReader, Read};

use audiorando_core::{Engine, EngineConfig, SampleFrame};

/// Load the engine config from `path`, or defaults when none is given.
/// Exits the process on a bad config.
pub fn load_config(path: Option<&str>) -> EngineConfig {
    match path {
        Some(p) => EngineConfig::from_json_file(p).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }),
        None => EngineConfig::default(),
    }
}

/// Build an engine, exiting on an invalid config.
pub fn make_engine(config: EngineConfig) -> Engine {
    Engine::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

/// Open `input` for reading; `-` is stdin.
pub fn open_input(input: &str) -> io::Result<Box<dyn Read + Send>> {
    if input == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(BufReader::new(File::open(input)?)))
    }
}

/// Splits a byte stream into fixed-size frames. A trailing partial frame is
/// dropped.
pub struct FrameReader<R> {
    inner: R,
    frame_size: usize,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, frame_size: usize) -> Self {
        Self { inner, frame_size }
    }

    /// Next complete frame, `Ok(None)` at end of input.
    pub fn next_frame(&mut self) -> io::Result<Option<SampleFrame>> {
        let mut buf = vec![0u8; self.frame_size];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => Ok(Some(SampleFrame::new(buf))),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}
