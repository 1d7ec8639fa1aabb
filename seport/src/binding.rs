//! Binding identity types for SELinux port-to-type bindings.
//!
//! A binding associates a port range and protocol with an SELinux type.
//! The `(range, protocol)` pair is the binding's identity; the type label
//! and MLS range ride along for add operations only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::port::PortRange;

/// The default MLS/MCS range applied to new bindings.
pub const DEFAULT_MLS_RANGE: &str = "s0";

/// Network protocol of a port binding.
///
/// # Examples
///
/// ```
/// use seport::Protocol;
///
/// let proto: Protocol = "tcp".parse().unwrap();
/// assert_eq!(proto, Protocol::Tcp);
/// assert_eq!(proto.to_string(), "tcp");
///
/// assert!("icmp".parse::<Protocol>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Transmission Control Protocol.
    Tcp,
    /// User Datagram Protocol.
    Udp,
}

impl Protocol {
    /// Returns the lowercase protocol name used by the policy store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for unrecognized protocol names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid protocol '{value}': expected 'tcp' or 'udp'")]
pub struct ProtocolParseError {
    /// The unrecognized protocol string.
    pub value: String,
}

impl FromStr for Protocol {
    type Err = ProtocolParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            _ => Err(ProtocolParseError { value: s.into() }),
        }
    }
}

/// The structural identity of a port binding.
///
/// Two keys are equal only when their ranges and protocols are equal;
/// ranges are matched whole. A binding for `8080` does not satisfy a
/// desired `8080-8090`, and overlap or containment never count as a match.
///
/// # Examples
///
/// ```
/// use seport::{BindingKey, PortRange, Protocol};
///
/// let single = BindingKey::new(PortRange::parse("8080").unwrap(), Protocol::Tcp);
/// let range = BindingKey::new(PortRange::parse("8080-8090").unwrap(), Protocol::Tcp);
/// assert_ne!(single, range);
/// assert_eq!(format!("{single}"), "tcp/8080");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingKey {
    /// The normalized port range.
    pub range: PortRange,
    /// The network protocol.
    pub protocol: Protocol,
}

impl BindingKey {
    /// Creates a new binding key.
    #[must_use]
    pub const fn new(range: PortRange, protocol: Protocol) -> Self {
        Self { range, protocol }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.protocol, self.range)
    }
}

/// Error type for invalid binding fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation error for '{field}': {message}")]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

/// A port binding: a key plus the SELinux type it maps to.
///
/// The type label and MLS range are only meaningful when adding a binding;
/// they never participate in existence checks or removal, which operate on
/// the [`BindingKey`] alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// The binding's identity.
    pub key: BindingKey,
    /// The SELinux type label (e.g. `http_port_t`).
    pub setype: String,
    /// The MLS/MCS range, `"s0"` unless overridden.
    pub mls_range: String,
}

impl Binding {
    /// Creates a new binding with the default MLS range.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `setype` is empty after trimming
    /// whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use seport::{Binding, BindingKey, PortRange, Protocol};
    ///
    /// let key = BindingKey::new(PortRange::parse("8888").unwrap(), Protocol::Tcp);
    /// let binding = Binding::new(key, "http_port_t").unwrap();
    /// assert_eq!(binding.mls_range, "s0");
    ///
    /// assert!(Binding::new(key, "  ").is_err());
    /// ```
    pub fn new(key: BindingKey, setype: impl Into<String>) -> Result<Self, ValidationError> {
        let setype = setype.into();
        if setype.trim().is_empty() {
            return Err(ValidationError {
                field: "setype".into(),
                message: "SELinux type must be non-empty".into(),
            });
        }
        Ok(Self {
            key,
            setype,
            mls_range: DEFAULT_MLS_RANGE.into(),
        })
    }

    /// Replaces the MLS range, keeping `"s0"` when given an empty string.
    #[must_use]
    pub fn with_mls_range(mut self, mls_range: impl Into<String>) -> Self {
        let mls_range = mls_range.into();
        if !mls_range.trim().is_empty() {
            self.mls_range = mls_range;
        }
        self
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key, self.setype)
    }
}
