//! CLI for audiorando: feed microphone frames, pull numbers, dice, passwords and hex.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "audiorando")]
#[command(about = "audiorando: reproducible randomness from ambient noise")]
#[command(version = audiorando_core::VERSION)]
struct Cli {
    /// JSON engine config (pool_capacity, frame_size, quality_threshold, digest, ...)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed every frame from the input, then derive one output.
    /// Frames are raw byte magnitudes, `frame_size` bytes each.
    Generate {
        /// Output kind
        #[arg(value_parser = ["password", "hex", "number", "dice"])]
        kind: String,

        /// Password length in characters
        #[arg(long, default_value = "16")]
        length: usize,

        /// Output bytes for hex and number
        #[arg(long, default_value = "16")]
        bytes: usize,

        /// Zero-pad numbers to at least this many digits
        #[arg(long)]
        width: Option<usize>,

        /// Number of dice
        #[arg(long, default_value = "1")]
        count: usize,

        /// Lowest die face (inclusive)
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        min: i64,

        /// Highest die face (inclusive)
        #[arg(long, default_value = "6", allow_hyphen_values = true)]
        max: i64,

        /// Frame source: a file path, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,

        /// Print the result and pool counters as JSON
        #[arg(long)]
        json: bool,
    },

    /// Tick loop: print one JSON line per frame (pool level, quality, verdict).
    /// Stops at end of input or on Ctrl+C.
    Listen {
        /// Frame source: a file path, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },

    /// Print the effective engine configuration as JSON
    Config,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Generate {
            kind,
            length,
            bytes,
            width,
            count,
            min,
            max,
            input,
            json,
        } => commands::generate::run(
            config,
            commands::generate::GenerateArgs {
                kind: &kind,
                length,
                bytes,
                width,
                count,
                min,
                max,
            },
            &input,
            json,
        ),
        Commands::Listen { input } => commands::listen::run(config, &input),
        Commands::Config => commands::config::run(&config),
    }
}
