use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for attendlog
/// School attendance tracking over QR codes, backed by SQLite
#[derive(Parser)]
#[command(
    name = "attendlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "School attendance engine: QR check-ins, late classification and daily reports on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Show only the newest N rows")]
        limit: Option<usize>,
    },

    /// Start the HTTP API server
    Serve {
        #[arg(long, help = "Bind address (overrides server.host)")]
        host: Option<String>,

        #[arg(long, help = "Port (overrides server.port)")]
        port: Option<u16>,
    },

    /// Record a scan for a student or teacher code
    Scan {
        /// Student or teacher code (the QR payload)
        code: String,

        #[arg(long, help = "Scan date (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long, help = "Scan time (HH:MM or HH:MM:SS), default now")]
        time: Option<String>,
    },

    /// List the attendance events of a day, newest first
    List {
        #[arg(long, help = "Date (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long, help = "Academic year id, or 'all' (default: active year)")]
        year: Option<String>,
    },

    /// Show the daily report with counts and absent students
    Report {
        #[arg(long, help = "Date (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long, help = "Academic year id, or 'all' (default: active year)")]
        year: Option<String>,
    },

    /// Show or change the school start/end times
    Settings {
        #[arg(long, value_name = "HH:MM", requires = "end", help = "School start time")]
        start: Option<String>,

        #[arg(long, value_name = "HH:MM", requires = "start", help = "School end time")]
        end: Option<String>,
    },

    /// Manage academic years
    Year {
        #[arg(long = "list", help = "List academic years")]
        list: bool,

        #[arg(
            long = "add",
            value_name = "NAME",
            requires_all = ["start", "end"],
            help = "Create an academic year (e.g. 2025-2026)"
        )]
        add: Option<String>,

        #[arg(long, value_name = "YYYY", help = "First calendar year (with --add)")]
        start: Option<i32>,

        #[arg(long, value_name = "YYYY", help = "Second calendar year (with --add)")]
        end: Option<i32>,

        #[arg(long = "activate", value_name = "ID", help = "Make this year the active one")]
        activate: Option<i64>,
    },

    /// Register or list students
    Student {
        #[arg(long = "list", help = "List students")]
        list: bool,

        #[arg(
            long = "add",
            value_name = "NAME",
            requires_all = ["class", "phone"],
            help = "Register a student"
        )]
        add: Option<String>,

        #[arg(long, help = "Class label (with --add)")]
        class: Option<String>,

        #[arg(long, help = "Parent phone number (with --add)")]
        phone: Option<String>,

        #[arg(long, help = "Academic year id, or 'all' for --list (default: active year)")]
        year: Option<String>,

        #[arg(long = "del", value_name = "ID", help = "Delete a student and their attendance")]
        del: Option<i64>,
    },

    /// Register or list teachers
    Teacher {
        #[arg(long = "list", help = "List teachers")]
        list: bool,

        #[arg(
            long = "add",
            value_name = "NAME",
            requires_all = ["id_card", "phone", "sex"],
            help = "Register a teacher"
        )]
        add: Option<String>,

        #[arg(long = "id-card", help = "ID card number (with --add)")]
        id_card: Option<String>,

        #[arg(long, help = "Phone number (with --add)")]
        phone: Option<String>,

        #[arg(long, help = "Sex (with --add)")]
        sex: Option<String>,

        #[arg(long = "del", value_name = "ID", help = "Delete a teacher and their attendance")]
        del: Option<i64>,
    },

    /// Delete attendance events in bulk
    Purge {
        #[arg(long, help = "Academic year id, or 'all' (default: active year)")]
        year: Option<String>,

        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },

    /// Export the daily report
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "A date, a year/month, or a custom range YYYY-MM-DD:YYYY-MM-DD (default today)"
        )]
        range: Option<String>,

        #[arg(long, help = "Academic year id, or 'all' (default: active year)")]
        year: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
