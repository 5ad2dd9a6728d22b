use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lockscope::export::{self, ExportData, ExportFormat};
use lockscope::parser::yarn;

#[derive(Parser)]
#[command(name = "lockscope")]
#[command(version)]
#[command(about = "Extract pinned dependencies from yarn lockfiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract dependency records from a lockfile
    Extract {
        /// Path to the yarn.lock file
        #[arg(short, long, default_value = "yarn.lock")]
        lockfile: PathBuf,

        /// Path to package.json for direct/transitive classification
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output format (json or text)
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            lockfile,
            manifest,
            format,
        } => {
            let records = yarn::parse_file(&lockfile, manifest.as_deref())?;
            let data = ExportData::new(lockfile.display().to_string(), records);
            export::export(format, &data, &mut io::stdout())?;
        }
    }

    Ok(())
}
