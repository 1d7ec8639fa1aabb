//! Port and port range types for SELinux port bindings.
//!
//! This module provides validated port types and the parser for
//! user-supplied port specifications such as `"8888"` or `"10000-10100"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A valid network port number (1-65535).
///
/// Port 0 is rejected as it has special meaning in networking contexts and
/// is never a valid subject of an SELinux port binding.
///
/// # Examples
///
/// ```
/// use seport::Port;
///
/// let port = Port::try_from(8080).unwrap();
/// assert_eq!(port.value(), 8080);
///
/// assert!(Port::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// The minimum valid port number.
    pub const MIN: u16 = 1;

    /// The maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Returns the underlying port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Port {
    type Error = PortSpecError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(PortSpecError::OutOfBounds {
                component: value.to_string(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid port specifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortSpecError {
    /// The spec is not of the form `PORT` or `LOW-HIGH`.
    #[error("malformed port spec '{spec}': expected PORT or LOW-HIGH")]
    Malformed {
        /// The offending spec string.
        spec: String,
    },

    /// A component is non-numeric or outside 1-65535.
    #[error("port '{component}' out of bounds: expected an integer in {}-{}", Port::MIN, Port::MAX)]
    OutOfBounds {
        /// The offending component string.
        component: String,
    },

    /// The low bound exceeds the high bound.
    #[error("inverted port range {low}-{high}: low must not exceed high")]
    Inverted {
        /// The parsed low bound.
        low: u16,
        /// The parsed high bound.
        high: u16,
    },
}

/// An inclusive range of ports, possibly a single port.
///
/// This is the normalized form of a user-supplied port spec. A single port
/// is represented as a range with `low == high`. Display renders the
/// canonical spec handed to the policy store: `"8888"` for a single port,
/// `"10000-10100"` for a range.
///
/// # Examples
///
/// ```
/// use seport::PortRange;
///
/// let single = PortRange::parse("8888").unwrap();
/// assert_eq!(single.low().value(), 8888);
/// assert_eq!(single.high().value(), 8888);
/// assert_eq!(single.to_string(), "8888");
///
/// let range = PortRange::parse("10000-10100").unwrap();
/// assert_eq!(range.to_string(), "10000-10100");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortRange {
    low: Port,
    high: Port,
}

impl PortRange {
    /// Creates a new port range.
    ///
    /// # Errors
    ///
    /// Returns [`PortSpecError::Inverted`] if `low` exceeds `high`.
    pub fn new(low: Port, high: Port) -> Result<Self, PortSpecError> {
        if low > high {
            Err(PortSpecError::Inverted {
                low: low.value(),
                high: high.value(),
            })
        } else {
            Ok(Self { low, high })
        }
    }

    /// Creates a range covering a single port.
    #[must_use]
    pub const fn single(port: Port) -> Self {
        Self {
            low: port,
            high: port,
        }
    }

    /// Parses a user-supplied port spec.
    ///
    /// A spec without a `-` separator is a single port. A spec of the form
    /// `LOW-HIGH` with exactly one separator is an inclusive range. Any
    /// other shape is rejected; validation never touches the policy store.
    ///
    /// # Errors
    ///
    /// - [`PortSpecError::Malformed`] for an empty spec or a wrong number
    ///   of components;
    /// - [`PortSpecError::OutOfBounds`] for a non-numeric component or one
    ///   outside 1-65535;
    /// - [`PortSpecError::Inverted`] when the low bound exceeds the high.
    ///
    /// # Examples
    ///
    /// ```
    /// use seport::port::{PortRange, PortSpecError};
    ///
    /// assert!(PortRange::parse("8080").is_ok());
    /// assert!(PortRange::parse("10000-10100").is_ok());
    /// assert!(matches!(
    ///     PortRange::parse("10100-10000").unwrap_err(),
    ///     PortSpecError::Inverted { .. }
    /// ));
    /// assert!(matches!(
    ///     PortRange::parse("70000").unwrap_err(),
    ///     PortSpecError::OutOfBounds { .. }
    /// ));
    /// assert!(matches!(
    ///     PortRange::parse("80-90-100").unwrap_err(),
    ///     PortSpecError::Malformed { .. }
    /// ));
    /// ```
    pub fn parse(spec: &str) -> Result<Self, PortSpecError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(PortSpecError::Malformed { spec: spec.into() });
        }

        match spec.split_once('-') {
            None => Ok(Self::single(parse_component(spec)?)),
            Some((low, high)) => {
                if low.is_empty() || high.is_empty() || high.contains('-') {
                    return Err(PortSpecError::Malformed { spec: spec.into() });
                }
                Self::new(parse_component(low)?, parse_component(high)?)
            }
        }
    }

    /// Returns the low bound of the range.
    #[must_use]
    pub const fn low(&self) -> Port {
        self.low
    }

    /// Returns the high bound of the range.
    #[must_use]
    pub const fn high(&self) -> Port {
        self.high
    }

    /// Returns `true` if this range covers exactly one port.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.low.value() == self.high.value()
    }
}

fn parse_component(component: &str) -> Result<Port, PortSpecError> {
    let component = component.trim();
    component
        .parse::<u16>()
        .map_err(|_| PortSpecError::OutOfBounds {
            component: component.into(),
        })
        .and_then(Port::try_from)
}

impl FromStr for PortRange {
    type Err = PortSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}
