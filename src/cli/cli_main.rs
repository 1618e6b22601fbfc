// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::{path::PathBuf, process::ExitCode};

use anstream::println;
use clap::Parser;
use tracing::error;

use super::{
    args::{CliArgs, Command},
    print::Printer,
};
use crate::{
    check_argument_count,
    config::{Configuration, Manager},
    ops::{AliasManager, CreateOptions, ListOptions, UpdateOptions},
    util::setup_tracing,
};

/// Main CLI entrypoint
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    let trace_level = if args.debug {
        "trace"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    setup_tracing(trace_level, args.log_file.as_deref()).inspect_err(|e| eprintln!("{e:?}"))?;

    let mut config = Manager::new();
    config.merge_provider(args.overrides());

    run(&args, &config)
        .map(|()| ExitCode::SUCCESS)
        .or_else(|e| {
            error!("{e:#}");
            Ok(ExitCode::FAILURE)
        })
}

fn run(args: &CliArgs, config: &Manager) -> anyhow::Result<()> {
    if matches!(args.command, Command::ShowConfig) {
        println!("{config}");
        return Ok(());
    }
    let config: Configuration = config.get()?;
    let manager = AliasManager::new(&config.ssh_config)?;
    let out = Printer::new(args.quiet, config.show_path);

    match &args.command {
        Command::Add(add) => {
            check_argument_count(add.args.len(), 1, 2)?;
            let settings = add.settings.settings();
            let connect = add.args.get(1).filter(|c| !c.is_empty()).cloned();
            if settings.is_empty() && connect.is_none() {
                anyhow::bail!("nothing to add: give a connection string or at least one option");
            }
            let target = (!config.add_path.is_empty()).then(|| PathBuf::from(&config.add_path));
            let alias = manager.create(&CreateOptions {
                alias: add.args[0].clone(),
                connect,
                settings,
                target,
            })?;
            out.success("added successfully");
            out.alias(&alias);
        }
        Command::List(list) => {
            let aliases = manager.list(&ListOptions {
                keywords: list.keywords.clone(),
                ignore_case: config.ignore_case,
            })?;
            if list.on_name {
                for a in aliases.iter().filter(|a| a.alias != crate::resolve::FALLBACK_PATTERN) {
                    println!("{}", a.alias);
                }
            } else {
                out.success(&format!("total records: {}", aliases.len()));
                println!();
                out.aliases(&aliases);
            }
        }
        Command::Get(get) => {
            check_argument_count(get.args.len(), 2, 2)?;
            println!("{}", manager.get_option(&get.args[0], &get.args[1])?);
        }
        Command::Update(update) => {
            check_argument_count(update.args.len(), 1, 2)?;
            let alias = manager.update(&UpdateOptions {
                alias: update.args[0].clone(),
                new_alias: update.rename.clone(),
                connect: update.args.get(1).cloned(),
                changes: update.settings.settings(),
            })?;
            out.success("updated successfully");
            out.alias(&alias);
        }
        Command::Delete(delete) => {
            check_argument_count(delete.aliases.len(), 1, 0)?;
            let deleted = manager.delete(&delete.aliases)?;
            out.success("deleted successfully");
            out.aliases(&deleted);
        }
        Command::Backup(backup) => {
            check_argument_count(backup.args.len(), 0, 1)?;
            let dest = backup.args.first().map_or(".", String::as_str);
            let written = manager.backup(dest)?;
            out.success(&format!(
                "backed up {} file(s) to [{dest}]",
                written.len()
            ));
        }
        Command::ShowConfig => (),
    }
    Ok(())
}
