use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use storefront_core::VERSION;

/// Storefront - list, filter and edit storefront data snapshots
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the JSON snapshots
    #[arg(short, long, global = true, env = "STOREFRONT_DATA", value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search, filter, sort and page through records
    List(ListArgs),

    /// Dashboard metrics over the full collection
    Stats(StatsArgs),

    /// Apply a change to a snapshot
    Apply(ApplyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Record collection to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Products,
    Orders,
    Coupons,
    Reviews,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    #[arg(value_enum, value_name = "KIND")]
    pub kind: Kind,

    /// Case-insensitive text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Field filter: field=value, field=a,b, field>=n, field<=n
    #[arg(short, long, value_name = "EXPR")]
    pub filter: Vec<String>,

    /// Stock level (in, low, out)
    #[arg(long, value_name = "LEVEL")]
    pub stock: Option<String>,

    /// Time window on the date field (e.g., "7d", "24h")
    #[arg(long, conflicts_with = "today")]
    pub last: Option<String>,

    /// Only records from the current UTC day
    #[arg(long)]
    pub today: bool,

    /// Date field for --last and --today
    #[arg(long, value_name = "FIELD", default_value = "createdAt")]
    pub date_field: String,

    /// Sort key, "-" prefix for descending (e.g., "-createdAt")
    #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Use the storefront grid page size
    #[arg(long)]
    pub customer: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `stats` command
#[derive(Args)]
pub struct StatsArgs {
    #[arg(value_enum, value_name = "KIND")]
    pub kind: Kind,

    /// Low-stock threshold override
    #[arg(long, value_name = "N")]
    pub low_stock: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `apply` command
#[derive(Args)]
pub struct ApplyArgs {
    #[arg(value_enum, value_name = "KIND")]
    pub kind: Kind,

    #[command(subcommand)]
    pub action: ApplyAction,

    /// Show the outcome without writing the snapshot
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ApplyAction {
    /// Flip a boolean field
    Toggle {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_name = "FIELD")]
        field: String,
    },

    /// Set a field; an empty value clears optional fields
    Set {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_name = "FIELD")]
        field: String,
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },

    /// Remove a record
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Remove every record
    Clear,

    /// Append a copy of a record under a new id
    Duplicate {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Append a record given as JSON ("-" reads stdin)
    Append {
        #[arg(value_name = "JSON")]
        record: String,
    },
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}
