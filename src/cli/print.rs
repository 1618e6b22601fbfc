// Human-readable output of aliases
// (c) 2024 Ross Younger

use std::{fmt::Write as _, path::Path};

use anstream::println;

use super::styles::{ALIAS, EXPLICIT, SUCCESS};
use crate::resolve::ResolvedAlias;

/// Prints results to stdout, unless quiet
#[derive(Debug, Clone)]
pub(crate) struct Printer {
    quiet: bool,
    show_path: bool,
    home: Option<String>,
}

impl Printer {
    pub(crate) fn new(quiet: bool, show_path: bool) -> Self {
        Self {
            quiet,
            show_path,
            home: dirs::home_dir().map(|h| h.to_string_lossy().into_owned()),
        }
    }

    pub(crate) fn success(&self, message: &str) {
        if !self.quiet {
            println!("{SUCCESS}✔{SUCCESS:#} {message}");
        }
    }

    /// Prints aliases with a connection string first, then the rest; each group sorted by name.
    pub(crate) fn aliases(&self, aliases: &[ResolvedAlias]) {
        for a in ordered(aliases) {
            self.alias(a);
        }
    }

    pub(crate) fn alias(&self, alias: &ResolvedAlias) {
        if !self.quiet {
            println!("{}", self.render(alias));
        }
    }

    /// Abbreviates the home directory to `~`
    fn tidy_path(&self, path: &Path) -> String {
        let path = path.to_string_lossy();
        match &self.home {
            Some(home) if path.starts_with(home.as_str()) => path.replacen(home.as_str(), "~", 1),
            _ => path.into_owned(),
        }
    }

    fn render(&self, alias: &ResolvedAlias) -> String {
        let mut out = format!("\t{ALIAS}{}{ALIAS:#}", alias.alias);
        if self.show_path && !alias.occurrences.is_empty() {
            let mut paths: Vec<_> = alias.paths().map(|p| self.tidy_path(p)).collect();
            paths.sort();
            let _ = write!(out, "({})", paths.join(" "));
        }
        if let Some(connect) = alias.connection_string() {
            let _ = write!(out, " -> {connect}");
        }
        out.push('\n');
        for (key, value) in alias.explicit.iter().filter(|(_, v)| !v.is_empty()) {
            let _ = writeln!(out, "\t    {EXPLICIT}{key} = {value}{EXPLICIT:#}");
        }
        for (key, value) in alias.inherited.iter().filter(|(_, v)| !v.is_empty()) {
            let _ = writeln!(out, "\t    {key} = {value}");
        }
        out
    }
}

fn ordered(aliases: &[ResolvedAlias]) -> impl Iterator<Item = &ResolvedAlias> {
    let (mut connectable, mut others): (Vec<_>, Vec<_>) =
        aliases.iter().partition(|a| a.is_displayable());
    connectable.sort_by(|a, b| a.alias.cmp(&b.alias));
    others.sort_by(|a, b| a.alias.cmp(&b.alias));
    connectable.into_iter().chain(others)
}
