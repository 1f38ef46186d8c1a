use clap::{ArgAction, Parser, Subcommand};
use rulebook_chunker::{archive, config, dataset, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; main calls this a single time.
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "rulebook-chunker")]
#[command(about = "Slice a Markdown rulebook into access-tagged chunks")]
#[command(long_about = "\
Slice a Markdown rulebook into access-tagged chunks

Every markdown file under the source directory is split at headings into
chunks, and each chunk is tagged with an access level. The chunks are written
as one JSON array for the site's browser scripts.

Source structure:

  source/
  ├── config.toml              # Build config (optional)
  ├── public/                  # Level 0: readable by everyone
  │   ├── 01-basics.md
  │   └── rules/combat.md
  ├── gm/                      # Any other folder: level 1 by default
  │   └── npcs.md
  └── scenarios/
      └── sunken-lab.md

Inline markers change the level for everything after them:

  <!-- SECRET: level3 -->

Run 'rulebook-chunker gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory
    #[arg(long, default_value = "source", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// More diagnostic logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk the source tree and write the dataset
    Build {
        /// Also package the dataset into this ZIP file
        #[arg(long)]
        archive: Option<PathBuf>,
    },
    /// Chunk the source tree and report, without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build { archive } => {
            println!("==> Building {}", cli.source.display());
            let build_config = config::load_config(&cli.source)?;
            let result = run_pipeline(&cli.source, &build_config)?;

            if result.report.discovered() == 0 {
                output::print_summary(&result.dataset, &result.report, None);
                return Ok(());
            }

            let path = dataset::write_dataset(&result.dataset, &cli.output, &build_config)?;
            println!();
            output::print_summary(&result.dataset, &result.report, Some(&path));

            if let Some(archive_path) = archive {
                archive::write_archive(&path, &archive_path)?;
                println!("Archived → {}", archive_path.display());
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let build_config = config::load_config(&cli.source)?;
            let result = dataset::build(&cli.source, &build_config, None)?;
            if result.report.discovered() > 0 {
                output::print_report(&result.report);
                println!();
            }
            output::print_summary(&result.dataset, &result.report, None);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run the pipeline, printing progress events as they arrive.
fn run_pipeline(
    source: &std::path::Path,
    build_config: &config::BuildConfig,
) -> Result<dataset::BuildOutput, dataset::BuildError> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        let mut formatter = output::EventFormatter::default();
        for event in rx {
            for line in formatter.format(&event) {
                println!("{}", line);
            }
        }
    });
    let result = dataset::build(source, build_config, Some(tx));
    // The sender is dropped with `build`'s frame, so the printer drains and exits.
    if printer.join().is_err() {
        eprintln!("progress printer panicked");
    }
    result
}

/// Initialize diagnostic logging on stderr.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "rulebook_chunker=warn",
        1 => "rulebook_chunker=debug",
        _ => "rulebook_chunker=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
