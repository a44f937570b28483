//! Account addresses that select a signing identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of an account address in bytes
pub const ADDRESS_SIZE: usize = 20;

/// A validated account address: `0x` followed by 40 hex digits
///
/// Stored lowercased so that checksummed and plain spellings of the same
/// account compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| Error::InvalidAddress(format!("missing 0x prefix: {:?}", input)))?;

        if digits.len() != ADDRESS_SIZE * 2 {
            return Err(Error::InvalidAddress(format!(
                "expected {} hex digits, got {}",
                ADDRESS_SIZE * 2,
                digits.len()
            )));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidAddress(format!("not hex: {:?}", input)));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Build an address from raw bytes
    pub fn from_bytes(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// The normalized `0x`-prefixed lowercase form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
