//! PingDirectory product versions understood by the provider.

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// A four-component PingDirectory version such as `9.3.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductVersion([u16; 4]);

impl ProductVersion {
    pub const V9_1_0_0: Self = Self::new(9, 1, 0, 0);
    pub const V9_1_0_1: Self = Self::new(9, 1, 0, 1);
    pub const V9_1_0_2: Self = Self::new(9, 1, 0, 2);
    pub const V9_2_0_0: Self = Self::new(9, 2, 0, 0);
    pub const V9_2_0_1: Self = Self::new(9, 2, 0, 1);
    pub const V9_3_0_0: Self = Self::new(9, 3, 0, 0);

    /// Versions the provider has been built against, oldest first.
    pub const SUPPORTED: &'static [ProductVersion] = &[
        Self::V9_1_0_0,
        Self::V9_1_0_1,
        Self::V9_1_0_2,
        Self::V9_2_0_0,
        Self::V9_2_0_1,
        Self::V9_3_0_0,
    ];

    pub const fn new(major: u16, minor: u16, patch: u16, build: u16) -> Self {
        Self([major, minor, patch, build])
    }

    /// Parse a version and check that the provider supports it.
    ///
    /// Two to four numeric components are accepted; missing trailing
    /// components are zero (`9.3` is `9.3.0.0`).
    pub fn parse(input: &str) -> Result<Self, ProviderError> {
        let trimmed = input.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() < 2 || parts.len() > 4 {
            return Err(invalid_version(input));
        }

        let mut components = [0u16; 4];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid_version(input))?;
        }

        let version = Self(components);
        if !Self::SUPPORTED.contains(&version) {
            return Err(ProviderError::Configuration(format!(
                "PingDirectory version '{}' is not supported. Supported versions are: {}",
                trimmed,
                supported_list()
            )));
        }
        Ok(version)
    }

    /// Whether this version is at least `other`.
    pub fn at_least(&self, other: ProductVersion) -> bool {
        *self >= other
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, build] = self.0;
        write!(f, "{}.{}.{}.{}", major, minor, patch, build)
    }
}

impl FromStr for ProductVersion {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid_version(input: &str) -> ProviderError {
    ProviderError::Configuration(format!(
        "Invalid product_version '{}': expected a version such as '9.3.0.0'",
        input
    ))
}

fn supported_list() -> String {
    ProductVersion::SUPPORTED
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
