// LeadGrid CLI - contact CSV enrichment

mod adapters;
mod app;
mod enrich;
mod exit_codes;
mod keys;
mod preview;
mod table;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use leadgrid_config::CONFIG_DIR_ENV;
use leadgrid_engine::NoCsvLoaded;

use exit_codes::{EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "lgrid")]
#[command(about = "Enrich contact CSVs with Apollo, ContactOut and ZeroBounce emails")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Configuration directory (settings.json, keys.json, handoff.csv)
    #[arg(long, global = true, env = CONFIG_DIR_ENV, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG overrides when not set)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV and print it as a table
    #[command(after_help = "\
Examples:
  lgrid show contacts.csv
  cat contacts.csv | lgrid show -")]
    Show {
        /// Input CSV (- for stdin)
        csv: PathBuf,
    },

    /// Look up emails and merge them into the table
    #[command(after_help = "\
Examples:
  lgrid enrich apollo contacts.csv
  lgrid enrich contactout contacts.csv --out enriched.csv
  lgrid enrich all contacts.csv --out -
  APOLLO_KEY=... lgrid enrich apollo contacts.csv

Keys are resolved as --api-key, then APOLLO_KEY / CONTACTOUT_KEY /
ZEROBOUNCE_KEY, then keys.json (see `lgrid keys set`).")]
    Enrich {
        /// Which service to call
        adapter: AdapterChoice,

        /// Input CSV (- for stdin)
        csv: PathBuf,

        /// Write the enriched CSV here (- for stdout; default: print a table)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// API key for the chosen service (not valid with `all`)
        #[arg(long)]
        api_key: Option<String>,

        /// Suppress status lines on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Write the normalized CSV
    #[command(after_help = "\
Examples:
  lgrid export contacts.csv
  lgrid export contacts.csv --out clean.csv
  lgrid export contacts.csv --out -")]
    Export {
        /// Input CSV (- for stdin)
        csv: PathBuf,

        /// Output path (- for stdout; default: export.fileName from settings)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// List recipient addresses and keep the table for `lgrid preview`
    Emails {
        /// Input CSV, usually an enriched one (- for stdin)
        csv: PathBuf,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Fill a subject/body template for every data row
    #[command(after_help = "\
Placeholders are header names in braces, e.g. {Name} or {Apollo Email}.
Without a CSV the table saved by `lgrid emails` is used.

Examples:
  lgrid preview contacts.csv --subject 'Hi {Name}' --body 'Loved {Org}.'
  lgrid preview --list-variables
  lgrid preview --subject 'Hi {Name}' --json")]
    Preview {
        /// Input CSV (- for stdin; default: the saved hand-off table)
        csv: Option<PathBuf>,

        /// Subject template
        #[arg(long, short = 's')]
        subject: Option<String>,

        /// Body template
        #[arg(long, short = 'b')]
        body: Option<String>,

        /// Print the available {Header} placeholders and exit
        #[arg(long)]
        list_variables: bool,

        /// Output previews as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage stored API keys
    #[command(subcommand)]
    Keys(KeysCommands),
}

#[derive(Subcommand)]
enum KeysCommands {
    /// Show which keys are available and where they come from
    Show,

    /// Store keys in keys.json (an empty value clears a key)
    #[command(after_help = "\
Examples:
  lgrid keys set --apollo ak_... --zerobounce zb_...
  lgrid keys set --contactout ''")]
    Set {
        #[arg(long, value_name = "KEY")]
        apollo: Option<String>,

        #[arg(long, value_name = "KEY")]
        contactout: Option<String>,

        #[arg(long, value_name = "KEY")]
        zerobounce: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AdapterChoice {
    Apollo,
    Contactout,
    Zerobounce,
    /// All three; calls run in parallel, merges apply in the order above
    All,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  leadgrid-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Install the stderr log subscriber. `log` records from the library crates
/// are bridged in by tracing-subscriber.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app = app::App::new(cli.config_dir);

    let result = match cli.command {
        Commands::Show { csv } => table::cmd_show(&app, &csv),
        Commands::Enrich { adapter, csv, out, api_key, quiet } => {
            enrich::cmd_enrich(&app, adapter, &csv, out, api_key, quiet)
        }
        Commands::Export { csv, out, quiet } => table::cmd_export(&app, &csv, out, quiet),
        Commands::Emails { csv, quiet } => table::cmd_emails(&app, &csv, quiet),
        Commands::Preview { csv, subject, body, list_variables, json } => {
            preview::cmd_preview(&app, csv, subject, body, list_variables, json)
        }
        Commands::Keys(KeysCommands::Show) => keys::cmd_keys_show(&app),
        Commands::Keys(KeysCommands::Set { apollo, contactout, zerobounce }) => {
            keys::cmd_keys_set(&app, apollo, contactout, zerobounce)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<NoCsvLoaded> for CliError {
    fn from(err: NoCsvLoaded) -> Self {
        CliError::args(err.to_string())
    }
}
