// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! URL redaction for telemetry.
//!
//! Request paths are recorded only for recognized authorities, and never with the
//! tenant segment (the first path component).

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use url::Url;

/// Authorities recognized out of the box.
pub const DEFAULT_KNOWN_HOSTS: &[&str] = &[
    "login.windows.net",
    "login.microsoftonline.com",
    "login.chinacloudapi.cn",
    "login.microsoftonline.de",
    "login-us.microsoftonline.com",
    "login.microsoftonline.us",
];

/// Membership predicate over URL authorities.
#[cfg_attr(test, mockall::automock)]
pub trait HostAllowlist {
    /// Whether `authority` (host, plus `:port` when explicit) is recognized.
    fn is_known_host(&self, authority: &str) -> bool;
}

impl<F> HostAllowlist for F
where
    F: Fn(&str) -> bool,
{
    fn is_known_host(&self, authority: &str) -> bool {
        self(authority)
    }
}

/// Case-insensitive set of recognized authorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownHosts {
    hosts: HashSet<String>,
}

impl KnownHosts {
    /// An empty allowlist; nothing is recognized.
    pub fn empty() -> Self {
        Self {
            hosts: HashSet::new(),
        }
    }

    /// Build an allowlist from the given authorities.
    pub fn from_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known = Self::empty();
        known.extend(hosts);
        known
    }

    /// Add authorities to the allowlist.
    pub fn extend<I, S>(&mut self, hosts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.hosts.extend(
            hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty()),
        );
    }

    pub fn contains(&self, authority: &str) -> bool {
        self.hosts.contains(&authority.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Authorities in sorted order.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.hosts.iter().cloned().collect();
        hosts.sort();
        hosts
    }
}

impl Default for KnownHosts {
    fn default() -> Self {
        Self::from_hosts(DEFAULT_KNOWN_HOSTS)
    }
}

impl Serialize for KnownHosts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_sorted_vec().serialize(serializer)
    }
}

impl HostAllowlist for KnownHosts {
    fn is_known_host(&self, authority: &str) -> bool {
        self.contains(authority)
    }
}

/// Authority of `url`: the host, with `:port` appended when the port is explicit.
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Build the loggable form of `url`, or `None` if its authority is not recognized.
///
/// The result is `scheme://authority/` followed by every path segment after the
/// tenant, each terminated by `/`.
pub fn sanitize_path(url: &Url, hosts: &dyn HostAllowlist) -> Option<String> {
    let authority = authority(url);
    if !hosts.is_known_host(&authority) {
        return None;
    }

    let mut segments: Vec<&str> = url.path().split('/').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    let mut path = format!("{}://{}/", url.scheme(), authority);
    // Index 0 is the empty segment before the leading slash, index 1 the tenant.
    for segment in segments.iter().skip(2) {
        path.push_str(segment);
        path.push('/');
    }
    Some(path)
}
