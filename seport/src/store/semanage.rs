//! Policy store backed by the `semanage` utility.
//!
//! This is the production [`BindingStore`]: it shells out to
//! `semanage port` from policycoreutils, which owns the durable policy
//! store and the reload of the active policy. Listing output is parsed
//! into [`BindingKey`]s; backend rejections surface verbatim as
//! [`StoreError::Backend`] so the reconciler's classifier can inspect
//! their text.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::binding::{Binding, BindingKey};
use crate::config::Config;
use crate::port::PortRange;

use super::{BindingStore, StoreError};

/// A [`BindingStore`] that drives `semanage port`.
///
/// The reload policy defaults to on; [`set_reload`](BindingStore::set_reload)
/// toggles whether mutations carry `--noreload`.
#[derive(Debug, Clone)]
pub struct SemanageStore {
    semanage_path: PathBuf,
    reload: bool,
}

impl SemanageStore {
    /// Creates a store using `semanage` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path("semanage")
    }

    /// Creates a store using the given `semanage` binary.
    #[must_use]
    pub fn with_path(semanage_path: impl Into<PathBuf>) -> Self {
        Self {
            semanage_path: semanage_path.into(),
            reload: true,
        }
    }

    /// Creates a store configured from a [`Config`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut store = Self::with_path(config.semanage_path.clone());
        store.reload = config.reload;
        store
    }

    /// Returns the path of the `semanage` binary in use.
    #[must_use]
    pub fn semanage_path(&self) -> &Path {
        &self.semanage_path
    }

    /// Lists current bindings with their type labels, for presentation.
    ///
    /// The listing does not carry MLS/MCS ranges, so each binding reports
    /// the default range.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if `semanage` cannot be spawned,
    /// [`StoreError::Backend`] if it exits non-zero, and
    /// [`StoreError::Listing`] if its output does not parse.
    pub fn list_bindings(&mut self) -> Result<Vec<Binding>, StoreError> {
        let args = list_args();
        let output = self.run(&args)?;
        parse_bindings(&output)
    }

    fn run(&self, args: &[String]) -> Result<String, StoreError> {
        let command = format!("{} {}", self.semanage_path.display(), args.join(" "));
        log::debug!("running {command}");

        let output = Command::new(&self.semanage_path)
            .args(args)
            .output()
            .map_err(|source| StoreError::Io {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = match (stderr.trim(), stdout.trim()) {
                ("", "") => format!("'{command}' exited with {}", output.status),
                ("", out) => out.to_string(),
                (err, _) => err.to_string(),
            };
            Err(StoreError::Backend { message })
        }
    }
}

impl Default for SemanageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingStore for SemanageStore {
    fn list_all(&mut self) -> Result<HashSet<BindingKey>, StoreError> {
        let bindings = self.list_bindings()?;
        Ok(bindings.into_iter().map(|binding| binding.key).collect())
    }

    fn set_reload(&mut self, reload: bool) {
        self.reload = reload;
    }

    fn add(&mut self, binding: &Binding) -> Result<(), StoreError> {
        let args = add_args(binding, self.reload);
        self.run(&args).map(|_| ())
    }

    fn remove(&mut self, key: &BindingKey) -> Result<(), StoreError> {
        let args = remove_args(key, self.reload);
        self.run(&args).map(|_| ())
    }
}

fn list_args() -> Vec<String> {
    vec!["port".into(), "--list".into(), "--noheading".into()]
}

fn add_args(binding: &Binding, reload: bool) -> Vec<String> {
    let mut args = vec![
        "port".into(),
        "--add".into(),
        "--type".into(),
        binding.setype.clone(),
        "--proto".into(),
        binding.key.protocol.to_string(),
        "--range".into(),
        binding.mls_range.clone(),
    ];
    if !reload {
        args.push("--noreload".into());
    }
    args.push(binding.key.range.to_string());
    args
}

fn remove_args(key: &BindingKey, reload: bool) -> Vec<String> {
    let mut args = vec![
        "port".into(),
        "--delete".into(),
        "--proto".into(),
        key.protocol.to_string(),
    ];
    if !reload {
        args.push("--noreload".into());
    }
    args.push(key.range.to_string());
    args
}

/// Parses `semanage port --list --noheading` output.
///
/// Each line has the shape
/// `http_port_t  tcp  80, 81, 443, 8008, 10000-10100`; one binding is
/// produced per port entry. Blank lines and a stray header line are
/// skipped.
fn parse_bindings(output: &str) -> Result<Vec<Binding>, StoreError> {
    let mut bindings = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("SELinux Port Type") {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let (Some(setype), Some(proto)) = (tokens.next(), tokens.next()) else {
            return Err(StoreError::Listing { line: line.into() });
        };
        let protocol = proto
            .parse()
            .map_err(|_| StoreError::Listing { line: line.into() })?;

        let ports = tokens.collect::<Vec<_>>().join(" ");
        if ports.is_empty() {
            return Err(StoreError::Listing { line: line.into() });
        }
        for spec in ports.split(',') {
            let range = PortRange::parse(spec)
                .map_err(|_| StoreError::Listing { line: line.into() })?;
            let binding = Binding::new(BindingKey::new(range, protocol), setype)
                .map_err(|_| StoreError::Listing { line: line.into() })?;
            bindings.push(binding);
        }
    }
    Ok(bindings)
}
