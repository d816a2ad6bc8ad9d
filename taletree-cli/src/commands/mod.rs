use clap::Subcommand;
use std::path::PathBuf;
use std::str::FromStr;

use taletree::loca::SheetFormat;

pub mod lang;
pub mod play;
pub mod sheet;

/// Sheet format argument (tsv or csv)
#[derive(Debug, Clone, Copy)]
pub struct FormatArg(pub SheetFormat);

impl FromStr for FormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(FormatArg(SheetFormat::Tsv)),
            "csv" => Ok(FormatArg(SheetFormat::Csv)),
            _ => Err(format!("Invalid format '{s}'. Valid values: tsv, csv")),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a dialogue graph in the terminal
    Play {
        /// Dialogue graph JSON file
        graph: PathBuf,

        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language to start in (defaults to the first loaded)
        #[arg(short = 'L', long)]
        language: Option<String>,
    },

    /// Language file operations
    Lang {
        #[command(subcommand)]
        command: LangCommands,
    },

    /// Translation sheet operations
    Sheet {
        #[command(subcommand)]
        command: SheetCommands,
    },
}

/// Language file commands
#[derive(Subcommand)]
pub enum LangCommands {
    /// List languages and their entry counts
    List {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,
    },

    /// List every key across all languages (flat, duplicates included)
    Keys {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,
    },

    /// Print the value stored for a key
    Get {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language name
        language: String,

        /// Key to look up
        key: String,
    },

    /// Set the value of an existing key
    Set {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language name
        language: String,

        /// Key to update
        key: String,

        /// New value
        value: String,
    },

    /// Add a key to a language, then sync key sets across languages
    AddKey {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language name
        language: String,

        /// Key to add
        key: String,

        /// Initial value
        #[arg(default_value = "")]
        value: String,
    },

    /// Remove a key from a language, then sync key sets across languages
    RemoveKey {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language name
        language: String,

        /// Key to remove
        key: String,
    },

    /// Rename a key in a language, then sync key sets across languages
    RenameKey {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language name
        language: String,

        /// Current key
        old_key: String,

        /// New key (may get a _1/_2 suffix on collision)
        new_key: String,
    },

    /// Make every other language's key set match one language
    Sync {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language whose key set wins
        language: String,
    },
}

/// Translation sheet commands
#[derive(Subcommand)]
pub enum SheetCommands {
    /// Export a language to a translation sheet
    Export {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language to export
        language: String,

        /// Output sheet file
        #[arg(short, long)]
        output: PathBuf,

        /// Sheet format (tsv, csv)
        #[arg(short, long, default_value = "tsv")]
        format: FormatArg,

        /// Fill the translation column from this language
        #[arg(long)]
        with_existing: Option<String>,
    },

    /// Import a filled translation sheet into a language
    Import {
        /// Directory containing language XML files
        #[arg(short, long)]
        languages: PathBuf,

        /// Language to update
        language: String,

        /// Sheet file to import
        input: PathBuf,

        /// Sheet format (tsv, csv)
        #[arg(short, long, default_value = "tsv")]
        format: FormatArg,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Play {
                graph,
                languages,
                language,
            } => play::execute(graph, languages, language.as_deref()),
            Commands::Lang { command } => command.execute(),
            Commands::Sheet { command } => command.execute(),
        }
    }
}

impl LangCommands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            LangCommands::List { languages } => lang::list(languages),
            LangCommands::Keys { languages } => lang::keys(languages),
            LangCommands::Get {
                languages,
                language,
                key,
            } => lang::get(languages, language, key),
            LangCommands::Set {
                languages,
                language,
                key,
                value,
            } => lang::set(languages, language, key, value),
            LangCommands::AddKey {
                languages,
                language,
                key,
                value,
            } => lang::add_key(languages, language, key, value),
            LangCommands::RemoveKey {
                languages,
                language,
                key,
            } => lang::remove_key(languages, language, key),
            LangCommands::RenameKey {
                languages,
                language,
                old_key,
                new_key,
            } => lang::rename_key(languages, language, old_key, new_key),
            LangCommands::Sync { languages, language } => lang::sync(languages, language),
        }
    }
}

impl SheetCommands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            SheetCommands::Export {
                languages,
                language,
                output,
                format,
                with_existing,
            } => sheet::export(languages, language, output, format.0, with_existing.as_deref()),
            SheetCommands::Import {
                languages,
                language,
                input,
                format,
            } => sheet::import(languages, language, input, format.0),
        }
    }
}
