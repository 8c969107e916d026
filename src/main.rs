use std::fs;
use std::process;

use clap::{Parser, Subcommand};

use chordtrack::annotation::format_clock;
use chordtrack::{
    AnnotationStore, ChordTrackError, Millis, ParsedChord, Session, SyncConfig,
};

/// chordtrack - inspect chord annotations produced by the analysis process
#[derive(Parser)]
#[command(name = "chordtrack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the annotation table
    Table {
        /// Analysis output file
        file: String,
    },

    /// Show the chord active at a playback position
    At {
        /// Analysis output file
        file: String,

        /// Playback position in milliseconds
        position: Millis,

        /// YAML sync configuration
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Resolve chord symbols to their notes
    Chord {
        /// Chord symbols such as C#m7 or Gmaj7
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Simulate a playback clock and print every chord change
    Replay {
        /// Analysis output file
        file: String,

        /// Interval between simulated position updates in milliseconds
        #[arg(short, long, default_value_t = 100)]
        step: Millis,

        /// YAML sync configuration
        #[arg(short, long)]
        config: Option<String>,

        /// Print one JSON object per chord change
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), ChordTrackError> {
    match command {
        Commands::Table { file } => {
            let store = AnnotationStore::parse(&read_file(&file)?)?;
            println!("{:<10} {:<10} chord", "begin", "end");
            for [begin, end, chord] in store.rows() {
                println!("{:<10} {:<10} {}", begin, end, chord);
            }
        }
        Commands::At {
            file,
            position,
            config,
        } => {
            let mut session = Session::new(load_config(config.as_deref())?);
            session.open_source(file.as_str());
            session.install_annotations(&read_file(&file)?)?;

            match session.on_position_update(position) {
                Some(update) => println!(
                    "{} {} [{}]",
                    format_clock(position),
                    update.chord,
                    update.highlight
                ),
                None => println!("{} no active chord", format_clock(position)),
            }
        }
        Commands::Chord { symbols } => {
            for symbol in symbols {
                let parsed = ParsedChord::parse(&symbol);
                if !parsed.is_recognized() {
                    println!("{}: not a chord symbol", symbol);
                    continue;
                }
                match (parsed.resolved_quality(), parsed.components()) {
                    (Some(quality), Some(notes)) => {
                        println!("{}: {} {} [{}]", symbol, parsed.root, quality, notes)
                    }
                    _ => println!(
                        "{}: root '{}', quality '{}' has no template",
                        symbol, parsed.root, parsed.quality
                    ),
                }
            }
        }
        Commands::Replay {
            file,
            step,
            config,
            json,
        } => {
            if step <= 0 {
                return Err(ChordTrackError::ConfigError(
                    "step must be a positive number of milliseconds".to_string(),
                ));
            }
            let mut session = Session::new(load_config(config.as_deref())?);
            session.open_source(file.as_str());
            session.install_annotations(&read_file(&file)?)?;

            let last = session.snapshot().last_end().unwrap_or(0);
            for position in clock_ticks(last, step) {
                if let Some(update) = session.on_position_update(position) {
                    if json {
                        let line = serde_json::json!({ "position": position, "update": update });
                        println!("{}", line);
                    } else {
                        println!("{} {:<8} [{}]", format_clock(position), update.chord, update.highlight);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Positions `0, step, 2 * step, ...` up to and including `last`.
/// Stops instead of overflowing when `last` is near `Millis::MAX`.
fn clock_ticks(last: Millis, step: Millis) -> impl Iterator<Item = Millis> {
    std::iter::successors(Some(0), move |&position: &Millis| position.checked_add(step))
        .take_while(move |&position| position <= last)
}

fn read_file(path: &str) -> Result<String, ChordTrackError> {
    fs::read_to_string(path).map_err(|e| ChordTrackError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn load_config(path: Option<&str>) -> Result<SyncConfig, ChordTrackError> {
    match path {
        Some(path) => SyncConfig::from_yaml(&read_file(path)?),
        None => Ok(SyncConfig::default()),
    }
}
