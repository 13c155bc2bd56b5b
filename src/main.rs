//! formbuilder - Dynamic form builder
//!
//! Add typed fields, edit them with live validation, preview and clear.

use clap::{Parser, Subcommand};

use formbuilder::commands::{self, OutputFormat};
use formbuilder::config::{load_config, FormbuilderPaths};
use formbuilder::logging;

#[derive(Parser)]
#[command(name = "formbuilder")]
#[command(author, version, about = "A local-first dynamic form builder with live validation")]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize formbuilder (first-time setup)
    Init,

    /// Launch the interactive form builder (default)
    Tui,

    /// Add a field
    Add {
        /// Field type: text, email, or number
        field_type: String,
    },

    /// Set a field's value (validated)
    Set {
        /// Field ID or unique prefix
        id: String,

        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Remove a field
    Remove {
        /// Field ID or unique prefix
        id: String,
    },

    /// List fields with validation state
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit the form and show the preview
    Preview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear the form and persisted state
    Clear,

    /// Validate a value without touching the form
    Check {
        /// Field type: text, email, or number
        field_type: String,

        /// Value to validate
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

fn output_format(json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        OutputFormat::Summary
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => FormbuilderPaths::at(dir),
        None => FormbuilderPaths::new()?,
    };
    let config = load_config(&paths)?;
    let _log_guard = logging::init_logging(&paths, &config.log_level)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Init => commands::init(&paths)?,
        Commands::Tui => commands::tui(&paths)?,
        Commands::Add { field_type } => {
            commands::add(&paths, &field_type)?;
        }
        Commands::Set { id, value } => commands::set(&paths, &id, &value)?,
        Commands::Remove { id } => commands::remove(&paths, &id)?,
        Commands::List { json } => commands::list(&paths, output_format(json))?,
        Commands::Preview { json } => commands::preview(&paths, output_format(json))?,
        Commands::Clear => commands::clear(&paths)?,
        Commands::Check { field_type, value } => commands::check(&field_type, &value)?,
    }

    Ok(())
}
