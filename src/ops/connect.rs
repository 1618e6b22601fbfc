//! Connection string parsing
// (c) 2024 Ross Younger

use std::{collections::BTreeMap, convert::Infallible, str::FromStr};

/// A connection target given as `[user@]host[:port]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectString {
    /// Remote user name, if given
    pub user: Option<String>,
    /// Remote host name or address, if given
    pub hostname: Option<String>,
    /// Remote port, if given and numeric
    pub port: Option<String>,
}

impl From<&str> for ConnectString {
    fn from(s: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_owned());
        let (user, rest) = match s.split_once('@') {
            Some((user, rest)) => (non_empty(user), rest),
            None => (None, s),
        };
        let (hostname, port) = match rest.split_once(':') {
            // A port which isn't a number is dropped
            Some((host, port)) => (
                non_empty(host),
                port.parse::<u16>().is_ok().then(|| port.to_owned()),
            ),
            None => (non_empty(rest), None),
        };
        Self {
            user,
            hostname,
            port,
        }
    }
}

impl FromStr for ConnectString {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl ConnectString {
    /// Adds our fields to `settings`, without replacing anything the caller already set
    pub(crate) fn fill_into(&self, settings: &mut BTreeMap<String, String>) {
        for (key, value) in [
            ("user", &self.user),
            ("hostname", &self.hostname),
            ("port", &self.port),
        ] {
            if let Some(v) = value {
                let _ = settings.entry(key.to_owned()).or_insert_with(|| v.clone());
            }
        }
    }
}
