//! lunrgen CLI
//!
//! Generates the client-side search store for a static documentation site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use lunrgen::cmd::build::BuildOptions;
use lunrgen_generator::StoreFormat;

/// Command-line interface for lunrgen.
#[derive(Parser)]
#[command(
    name = "lunrgen",
    version,
    about = "Generate client-side search stores for static sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the search store
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Content directory (defaults to build.content_dir)
        #[arg(long)]
        content: Option<std::path::PathBuf>,
        /// Include draft pages
        #[arg(long)]
        drafts: bool,
        /// Override site base path (e.g., /sampling)
        #[arg(long)]
        base_path: Option<String>,
        /// Store format (js or json)
        #[arg(long, default_value = "js")]
        format: StoreFormat,
    },
    /// Validate configuration and content
    Check {
        /// Content directory (defaults to build.content_dir)
        #[arg(long)]
        content: Option<std::path::PathBuf>,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    lunrgen::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            content,
            drafts,
            base_path,
            format,
        } => {
            let options = BuildOptions {
                output,
                content,
                drafts,
                base_path,
                format,
            };
            lunrgen::cmd::build::run(&cli.config, &options)?;
        }
        Commands::Check { content, strict } => {
            lunrgen::cmd::check::run(&cli.config, content.as_deref(), strict)?;
        }
    }

    Ok(())
}
