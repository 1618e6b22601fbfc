// sshman command-line arguments
// (c) 2024 Ross Younger

use std::{collections::BTreeMap, path::PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;

/// Parses `key=value`. The value may be empty.
fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_owned(), v.trim().to_owned())),
        _ => Err(format!("expected KEY=VALUE, got `{arg}`")),
    }
}

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(env!("SSHMAN_VERSION_STRING")),
    about,
    before_help = "e.g.   sshman add web1 alice@10.0.0.1:2222",
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
pub(crate) struct CliArgs {
    /// The ssh config file to manage [default: ~/.ssh/config]
    #[arg(short = 'f', long, global = true, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Quiet mode
    ///
    /// Reports only errors, and the output of `get` and `list --onname`
    #[arg(short, long, action, global = true, conflicts_with("debug"))]
    pub quiet: bool,

    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=sshman=trace` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, global = true, help_heading("Debug"))]
    pub debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(
        short('l'),
        long,
        action,
        global = true,
        help_heading("Debug"),
        value_name("FILE")
    )]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub(crate) enum Command {
    /// Adds a new alias
    #[command(visible_alias = "a")]
    Add(AddArgs),
    /// Lists all aliases, or those matching keywords
    #[command(visible_alias = "l")]
    List(ListArgs),
    /// Prints one setting of an alias
    #[command(visible_alias = "g")]
    Get(GetArgs),
    /// Renames an alias or changes its settings
    #[command(visible_alias = "u")]
    Update(UpdateArgs),
    /// Deletes one or more aliases
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),
    /// Copies every config file to a directory
    #[command(visible_alias = "b")]
    Backup(BackupArgs),
    /// Outputs the sshman configuration, and where each value came from
    ShowConfig,
}

/// Settings given on the command line
#[derive(Debug, Args, Clone)]
pub(crate) struct SettingArgs {
    /// Sets an ssh option for the alias. Repeat for more than one.
    ///
    /// With `update`, an empty value removes the option.
    #[arg(short = 'c', long = "config", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub config: Vec<(String, String)>,

    /// Identity file; shorthand for `-c identityfile=PATH`
    #[arg(short = 'i', long = "identityfile", value_name = "PATH")]
    pub identity_file: Option<String>,
}

impl SettingArgs {
    pub(crate) fn settings(&self) -> BTreeMap<String, String> {
        let mut settings: BTreeMap<_, _> = self.config.iter().cloned().collect();
        if let Some(id) = self.identity_file.as_ref().filter(|s| !s.is_empty()) {
            let _ = settings.insert("identityfile".into(), id.clone());
        }
        settings
    }
}

#[derive(Debug, Args, Clone)]
pub(crate) struct AddArgs {
    /// The alias, optionally followed by a connection string `[user@]host[:port]`
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    #[command(flatten)]
    pub settings: SettingArgs,

    /// Writes the new alias to this file, instead of the main ssh config file
    #[arg(short = 'a', long = "addpath", value_name = "FILE")]
    pub add_path: Option<String>,

    /// Shows the files each alias is declared in
    #[arg(short = 'p', long = "pathshow", action)]
    pub show_path: bool,
}

#[derive(Debug, Args, Clone)]
pub(crate) struct ListArgs {
    /// Regular expressions to match against alias names and their own settings
    pub keywords: Vec<String>,

    /// Matches keywords case-insensitively [default: true]
    #[arg(
        short = 'I',
        long = "ignorecase",
        num_args(0..=1),
        require_equals(true),
        default_missing_value("true"),
        value_name = "BOOL"
    )]
    pub ignore_case: Option<bool>,

    /// Prints only alias names
    #[arg(short = 'n', long = "onname", action)]
    pub on_name: bool,

    /// Shows the files each alias is declared in
    #[arg(short = 'p', long = "pathshow", action)]
    pub show_path: bool,
}

#[derive(Debug, Args, Clone)]
pub(crate) struct GetArgs {
    /// The alias, then the option to look up
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub(crate) struct UpdateArgs {
    /// The alias, optionally followed by a connection string `[user@]host[:port]`
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Renames the alias
    #[arg(short = 'r', long = "rename", value_name = "NEW_ALIAS")]
    pub rename: Option<String>,

    #[command(flatten)]
    pub settings: SettingArgs,

    /// Shows the files each alias is declared in
    #[arg(short = 'p', long = "pathshow", action)]
    pub show_path: bool,
}

#[derive(Debug, Args, Clone)]
pub(crate) struct DeleteArgs {
    /// The aliases to delete
    #[arg(value_name = "ALIAS")]
    pub aliases: Vec<String>,

    /// Shows the files each alias was declared in
    #[arg(short = 'p', long = "pathshow", action)]
    pub show_path: bool,
}

#[derive(Debug, Args, Clone)]
pub(crate) struct BackupArgs {
    /// Destination directory [default: current directory]
    #[arg(value_name = "DIR")]
    pub args: Vec<String>,
}

impl CliArgs {
    /// The configuration fields set on the command line
    pub(crate) fn overrides(&self) -> Overrides {
        let (show_path, add_path, ignore_case) = match &self.command {
            Command::Add(a) => (a.show_path, a.add_path.clone(), None),
            Command::List(l) => (l.show_path, None, l.ignore_case),
            Command::Update(u) => (u.show_path, None, None),
            Command::Delete(d) => (d.show_path, None, None),
            Command::Get(_) | Command::Backup(_) | Command::ShowConfig => (false, None, None),
        };
        Overrides {
            ssh_config: self.file.clone(),
            add_path,
            show_path: show_path.then_some(true),
            ignore_case,
        }
    }
}
