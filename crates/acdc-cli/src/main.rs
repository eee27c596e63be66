use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;

mod commands;

#[derive(Parser)]
#[command(name = "acdc")]
#[command(
    about = "Read, rewrite and inspect turbine module input decks and mode-shape snapshots",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in input file schemas.
    Schemas,

    /// Parse an input deck and print it as JSON.
    Read {
        /// Schema name, e.g. AeroDyn14.
        #[arg(short, long)]
        schema: String,

        input: PathBuf,
    },

    /// Parse an input deck and write it back out in canonical layout.
    Format {
        #[arg(short, long)]
        schema: String,

        input: PathBuf,

        /// Output file; stdout when omitted.
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,

        /// JSON file with writer layout options.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Parse mode-shape snapshots (one per frame, in order) and report tip deflection.
    Modes {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Only report this component.
        #[arg(short, long)]
        component: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn setup_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("acdc_cli={level},acdc_fio={level},acdc_viz={level}"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("logging initialized at level {level}");
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match cli.cmd {
        Commands::Schemas => commands::list_schemas(&mut stdout),
        Commands::Read { schema, input } => commands::read_deck(&schema, &input, &mut stdout),
        Commands::Format {
            schema,
            input,
            out,
            config,
        } => {
            let text = commands::format_deck(&schema, &input, config.as_deref())?;
            match out {
                Some(path) => commands::write_output(&path, &text),
                None => {
                    use std::io::Write;
                    stdout.write_all(text.as_bytes())?;
                    Ok(())
                }
            }
        }
        Commands::Modes {
            files,
            component,
            json,
        } => {
            let data = commands::load_mode_data(&files)?;
            commands::report_tips(&data, component.as_deref(), json, &mut stdout)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
