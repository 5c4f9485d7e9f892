//! Network form input validation.

use super::ipv4::{parse_address, parse_prefix_length, Address};
use crate::error::CidrError;
use std::fmt;

/// Raw network form fields as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInput {
    pub address: String,
    pub prefix: String,
}

/// Per-field validation failures. A field without an error is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputErrors {
    pub address: Option<CidrError>,
    pub prefix: Option<CidrError>,
}

impl NetworkInput {
    pub fn new(address: &str, prefix: &str) -> Self {
        NetworkInput {
            address: address.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// Split `a.b.c.d/n` into the two form fields.
    pub fn from_cidr_text(text: &str) -> Self {
        match text.trim().split_once('/') {
            Some((address, prefix)) => NetworkInput::new(address, prefix),
            None => NetworkInput::new(text.trim(), ""),
        }
    }

    /// Validate both fields independently.
    ///
    /// The address is checked the same way whatever prefix accompanies it.
    pub fn validate(&self) -> Result<(Address, u8), InputErrors> {
        let address = parse_address(self.address.trim());
        let prefix = parse_prefix_length(self.prefix.trim());
        match (address, prefix) {
            (Ok(address), Ok(prefix)) => Ok((address, prefix)),
            (address, prefix) => Err(InputErrors {
                address: address.err(),
                prefix: prefix.err(),
            }),
        }
    }
}

impl fmt::Display for InputErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = [&self.address, &self.prefix]
            .into_iter()
            .flatten()
            .map(|e| e.to_string())
            .collect();
        write!(f, "{}", msgs.join("; "))
    }
}

impl std::error::Error for InputErrors {}
