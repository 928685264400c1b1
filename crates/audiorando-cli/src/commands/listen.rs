use std::io::{self, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use audiorando_core::{Engine, EngineConfig, SampleFrame};

use super::FrameReader;

/// Longest the loop waits for a frame before rechecking the stop flag.
const WAKEUP: Duration = Duration::from_millis(100);

pub fn run(config: EngineConfig, input: &str) {
    let engine = super::make_engine(config);
    let reader = super::open_input(input).unwrap_or_else(|e| {
        eprintln!("Error opening {input}: {e}");
        std::process::exit(1);
    });

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        log::warn!("could not install Ctrl+C handler: {e}");
    }

    let frames = spawn_reader(FrameReader::new(reader, engine.config().frame_size));
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let ticks = tick_loop(&engine, &frames, &running, &mut out);

    // A reader still blocked on input is left behind; exiting ends it.
    let stats = engine.pool_stats();
    eprintln!(
        "Stopped after {ticks} frames: {}/{} bytes pooled, {} admitted in total",
        stats.available, stats.capacity, stats.total_admitted
    );
}

/// Read frames on their own thread so a blocking read never delays
/// cancellation. The channel closes at end of input or after a read error.
fn spawn_reader<R: Read + Send + 'static>(
    mut frames: FrameReader<R>,
) -> Receiver<io::Result<SampleFrame>> {
    let (tx, rx) = mpsc::sync_channel(16);
    thread::spawn(move || {
        loop {
            let item = match frames.next_frame() {
                Ok(Some(frame)) => Ok(frame),
                Ok(None) => break,
                Err(e) => Err(e),
            };
            let failed = item.is_err();
            if tx.send(item).is_err() || failed {
                break;
            }
        }
        log::debug!("frame reader finished");
    });
    rx
}

/// Feed frames until input ends, `running` clears, or `out` breaks.
/// `running` is rechecked at least every [`WAKEUP`] even while no frame
/// arrives. Returns the number of frames processed.
fn tick_loop<W: Write>(
    engine: &Engine,
    frames: &Receiver<io::Result<SampleFrame>>,
    running: &AtomicBool,
    out: &mut W,
) -> u64 {
    let mut ticks = 0u64;
    while running.load(Ordering::SeqCst) {
        let frame = match frames.recv_timeout(WAKEUP) {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => {
                log::warn!("frame read failed: {e}");
                break;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        ticks += 1;
        let outcome = engine.on_frame(&frame);
        let line = match serde_json::to_string(&outcome) {
            Ok(line) => line,
            Err(e) => {
                log::warn!("cannot encode frame outcome: {e}");
                continue;
            }
        };
        if writeln!(out, "{line}").is_err() {
            break; // Broken pipe
        }
        let _ = out.flush();
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Instant;

    /// Input that never produces a byte, like an idle stdin.
    struct Silent;

    impl Read for Silent {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            loop {
                thread::park();
            }
        }
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig {
            frame_size: 4,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_one_json_line_per_frame() {
        let engine = engine();
        let data = vec![10, 20, 30, 40, 5, 5, 5, 5, 1, 2];
        let mut out = Vec::new();
        let ticks = tick_loop(
            &engine,
            &spawn_reader(FrameReader::new(Cursor::new(data), 4)),
            &AtomicBool::new(true),
            &mut out,
        );
        assert_eq!(ticks, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["verdict"], "admitted");
        assert_eq!(lines[0]["pool_level"], 2);
        assert_eq!(lines[1]["verdict"], "below_threshold");
        assert_eq!(lines[1]["pool_level"], 2);
    }

    #[test]
    fn test_stops_when_cancelled() {
        let engine = engine();
        let mut out = Vec::new();
        let ticks = tick_loop(
            &engine,
            &spawn_reader(FrameReader::new(Cursor::new(vec![1u8; 64]), 4)),
            &AtomicBool::new(false),
            &mut out,
        );
        assert_eq!(ticks, 0);
        assert!(out.is_empty());
        assert_eq!(engine.available_entropy(), 0);
    }

    #[test]
    fn test_cancel_while_input_blocks() {
        let engine = engine();
        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            r.store(false, Ordering::SeqCst);
        });

        let input = Cursor::new(vec![10u8, 20, 30, 40, 5, 5, 5, 5]).chain(Silent);
        let mut out = Vec::new();
        let started = Instant::now();
        let ticks = tick_loop(
            &engine,
            &spawn_reader(FrameReader::new(input, 4)),
            &running,
            &mut out,
        );
        canceller.join().unwrap();

        assert_eq!(ticks, 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_read_error_ends_loop() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("device unplugged"))
            }
        }
        let engine = engine();
        let mut out = Vec::new();
        let ticks = tick_loop(
            &engine,
            &spawn_reader(FrameReader::new(Broken, 4)),
            &AtomicBool::new(true),
            &mut out,
        );
        assert_eq!(ticks, 0);
        assert!(out.is_empty());
    }
}
