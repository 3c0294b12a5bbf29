//! Customer account identifiers

use std::fmt;

/// Advertiser account id in normalized form (no surrounding whitespace, no hyphens).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Strip every hyphen, then surrounding whitespace: `" 123-456 "` becomes `"123456"`.
pub fn normalize(raw: &str) -> String {
    raw.replace('-', "").trim().to_string()
}
