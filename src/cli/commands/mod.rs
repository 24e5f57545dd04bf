use std::path::PathBuf;

use clap::Subcommand;

pub mod msbt;

#[derive(Subcommand)]
pub enum Commands {
    /// List entries in an MSBT file
    List {
        /// MSBT file to read
        path: PathBuf,

        /// Maximum entries to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Sort entries by name instead of container order
        #[arg(short, long)]
        sorted: bool,
    },

    /// Get an entry's text by label name
    Get {
        /// MSBT file to read
        path: PathBuf,

        /// Label name, or a partial name to search for
        name: String,
    },

    /// Add a new entry
    Add {
        /// MSBT file to edit
        path: PathBuf,

        /// Label name for the new entry
        name: String,

        /// Entry text
        text: String,

        /// Create the file if it does not exist
        #[arg(long)]
        create: bool,
    },

    /// Replace an existing entry's text
    Set {
        /// MSBT file to edit
        path: PathBuf,

        /// Label name of the entry
        name: String,

        /// New entry text
        text: String,
    },

    /// Rename an entry
    Rename {
        /// MSBT file to edit
        path: PathBuf,

        /// Current label name
        name: String,

        /// New label name
        new_name: String,
    },

    /// Delete an entry and its text
    Delete {
        /// MSBT file to edit
        path: PathBuf,

        /// Label name of the entry
        name: String,
    },

    /// Check whether a file parses as an MSBT container
    Check {
        /// File to probe
        path: PathBuf,
    },

    /// Show MSBT file statistics
    Stats {
        /// MSBT file(s) to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::List {
                path,
                limit,
                sorted,
            } => msbt::list(path, *limit, *sorted),
            Commands::Get { path, name } => msbt::get(path, name),
            Commands::Add {
                path,
                name,
                text,
                create,
            } => msbt::add(path, name, text, *create),
            Commands::Set { path, name, text } => msbt::set(path, name, text),
            Commands::Rename {
                path,
                name,
                new_name,
            } => msbt::rename(path, name, new_name),
            Commands::Delete { path, name } => msbt::delete(path, name),
            Commands::Check { path } => msbt::check(path),
            Commands::Stats { paths } => msbt::stats(paths),
        }
    }
}
