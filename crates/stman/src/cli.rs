//! Clap derive structures for the `stman` CLI.
//!
//! Defines the complete command tree, global flags, and shared value enums.
//! Only depends on clap and clap_complete so build.rs can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stman -- manage Syncthing devices and folders from the command line
#[derive(Debug, Parser)]
#[command(
    name = "stman",
    version,
    about = "Manage Syncthing devices and folders from the command line",
    long_about = "Talks to a running Syncthing daemon through its REST API.\n\n\
        Run `stman configure` once to store the daemon's API key, then list,\n\
        add, share and tune devices and folders.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile file to use instead of the per-user default
    #[arg(long, env = "STMAN_CONFIG", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Configured daemon (profile) to talk to; DEFAULT selects the default profile
    #[arg(
        long = "device",
        env = "STMAN_DEVICE",
        value_name = "PROFILE",
        global = true
    )]
    pub profile: Option<String>,

    /// Output format
    #[arg(long, env = "STMAN_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API access for a Syncthing daemon
    Configure(ConfigureArgs),

    /// List configured profiles
    Profiles,

    /// Manage remote devices
    #[command(alias = "dev")]
    Device(DeviceArgs),

    /// Manage synchronized folders
    Folder(FolderArgs),

    /// Pause or resume synchronization
    Daemon(DaemonArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── configure ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    /// The daemon's API key (read from its config.xml when omitted)
    #[arg(long, short = 'k', value_name = "APIKEY")]
    pub apikey: Option<String>,

    /// Hostname or IP of the daemon GUI
    #[arg(long, short = 'a', default_value = "localhost")]
    pub hostname: String,

    /// Port of the daemon GUI
    #[arg(long, short = 'p', default_value_t = 8384)]
    pub port: u16,

    /// Profile name (defaults to the hostname)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Make this the default profile
    #[arg(long)]
    pub default: bool,

    /// Connect over HTTPS
    #[arg(long)]
    pub https: bool,

    /// Accept the daemon's self-signed certificate
    #[arg(long, requires = "https")]
    pub insecure: bool,

    /// Syncthing config.xml to read the API key from
    #[arg(long, value_name = "PATH", conflicts_with = "apikey")]
    pub syncthing_config: Option<PathBuf>,
}

// ── device ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// List devices, connected first
    #[command(alias = "ls")]
    List,

    /// Show details of one device
    Info {
        /// Device ID or name
        device: String,
    },

    /// Add a device
    Add(DeviceAddArgs),

    /// Remove a device
    #[command(alias = "rm")]
    Remove {
        /// Device ID or name
        device: String,
    },

    /// Change a device's settings
    Edit(DeviceEditArgs),
}

#[derive(Debug, Args)]
pub struct DeviceAddArgs {
    /// The device ID to add
    #[arg(value_name = "DEVICEID")]
    pub device_id: String,

    /// A short name for the device
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// An address to reach the device at, e.g. tcp://192.168.1.2:22000
    #[arg(long, short = 'a', value_name = "ADDRESS")]
    pub address: Vec<String>,

    /// Also discover addresses dynamically (the default when no address is given)
    #[arg(long, short = 'd')]
    pub dynamic: bool,

    /// Trust this device to introduce others
    #[arg(long, short = 'i')]
    pub introducer: bool,
}

#[derive(Debug, Args)]
pub struct DeviceEditArgs {
    /// Device ID or name
    pub device: String,

    /// Set or change the device name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Add an address
    #[arg(long, value_name = "ADDRESS")]
    pub add_address: Vec<String>,

    /// Remove an address
    #[arg(long, value_name = "ADDRESS")]
    pub remove_address: Vec<String>,

    /// Wire compression
    #[arg(long, short = 'c')]
    pub compression: Option<CompressionArg>,

    /// Make the device an introducer
    #[arg(long, conflicts_with = "no_introducer")]
    pub introducer: bool,

    /// Stop treating the device as an introducer
    #[arg(long)]
    pub no_introducer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    Always,
    Metadata,
    Never,
}

// ── folder ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List folders with sync state
    #[command(alias = "ls")]
    List,

    /// Show details of one folder, including non-default settings
    Info {
        /// Folder ID or label
        folder: String,
    },

    /// Add a folder
    Add(FolderAddArgs),

    /// Remove a folder (files on disk are kept)
    #[command(alias = "rm")]
    Remove {
        /// Folder ID or label
        folder: String,
    },

    /// Share a folder with a device
    Share {
        /// Folder ID or label
        folder: String,
        /// Device ID or name
        device: String,
    },

    /// Stop sharing a folder with a device
    Unshare {
        /// Folder ID or label
        folder: String,
        /// Device ID or name
        device: String,
    },

    /// Change a folder's settings
    Edit(FolderEditArgs),

    /// Set the folder's versioning strategy
    Versioning(VersioningArgs),
}

#[derive(Debug, Args)]
pub struct FolderAddArgs {
    /// Path to the folder, absolute or relative to the current directory
    pub path: PathBuf,

    /// Folder ID; must be the same on every device sharing it
    #[arg(value_name = "ID")]
    pub folder_id: String,

    /// A local name for the folder
    #[arg(long, short = 'l')]
    pub label: Option<String>,

    /// Folder type
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub folder_type: Option<FolderTypeArg>,

    /// Rescan interval in seconds
    #[arg(long, short = 'r', value_name = "SECS")]
    pub rescan_interval: Option<u32>,
}

#[derive(Debug, Args)]
pub struct FolderEditArgs {
    /// Folder ID or label
    pub folder: String,

    /// Set or change the label
    #[arg(long, short = 'n', value_name = "LABEL")]
    pub label: Option<String>,

    /// Rescan interval in seconds
    #[arg(long, short = 'r', value_name = "SECS")]
    pub rescan: Option<u32>,

    /// Minimum free disk space, in percent
    #[arg(long, short = 'm', value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub minfree: Option<u8>,

    /// Folder type
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub folder_type: Option<FolderTypeArg>,

    /// File pull order
    #[arg(long, short = 'o')]
    pub order: Option<PullOrderArg>,

    /// Do not sync file permissions
    #[arg(long, conflicts_with = "sync_permissions")]
    pub ignore_permissions: bool,

    /// Sync file permissions (the daemon default)
    #[arg(long)]
    pub sync_permissions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FolderTypeArg {
    #[value(name = "sendreceive")]
    SendReceive,
    #[value(name = "sendonly")]
    SendOnly,
    #[value(name = "receiveonly")]
    ReceiveOnly,
    #[value(name = "receiveencrypted")]
    ReceiveEncrypted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PullOrderArg {
    Random,
    Alphabetic,
    #[value(name = "smallestFirst")]
    SmallestFirst,
    #[value(name = "largestFirst")]
    LargestFirst,
    #[value(name = "oldestFirst")]
    OldestFirst,
    #[value(name = "newestFirst")]
    NewestFirst,
}

#[derive(Debug, Args)]
pub struct VersioningArgs {
    /// Folder ID or label
    pub folder: String,

    #[command(subcommand)]
    pub strategy: VersioningCommand,
}

#[derive(Debug, Subcommand)]
pub enum VersioningCommand {
    /// Move deleted and replaced files to .stversions
    Trashcan {
        /// Days to keep files in the trash can (0 keeps them forever)
        #[arg(long, default_value_t = 0)]
        cleanout: u32,
    },

    /// Keep a fixed number of old versions in .stversions
    Simple {
        /// Number of versions to keep
        #[arg(long, default_value_t = 5)]
        versions: u32,
    },

    /// Keep versions with decreasing density up to a maximum age
    Staggered {
        /// Maximum age of versions, in days
        #[arg(long, value_name = "DAYS", default_value_t = 365)]
        maxage: u32,

        /// Custom path for storing versions
        #[arg(long, default_value = "")]
        path: String,
    },

    /// Hand versioning to an external command
    External {
        /// The command to run
        command: String,
    },

    /// Turn versioning off
    None,
}

// ── daemon ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(group(
    clap::ArgGroup::new("action")
        .required(true)
        .multiple(true)
        .args(["pause", "resume", "pause_all", "resume_all"])
))]
pub struct DaemonArgs {
    /// Pause syncing with a device (ID or name)
    #[arg(long, value_name = "DEVICE")]
    pub pause: Option<String>,

    /// Resume syncing with a device (ID or name)
    #[arg(long, value_name = "DEVICE")]
    pub resume: Option<String>,

    /// Pause syncing with all devices
    #[arg(long, conflicts_with = "resume_all")]
    pub pause_all: bool,

    /// Resume syncing with all devices
    #[arg(long)]
    pub resume_all: bool,
}

// ── completions ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
