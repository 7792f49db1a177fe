use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of decimal digits in each half of a generated ECID.
const ECID_BLOCK_DIGITS: usize = 19;

/// Modulus producing at most 19 decimal digits per random block.
const ECID_BLOCK_MOD: u64 = 10_000_000_000_000_000_000;

/// Experience Cloud ID: the locally generated, durable device/install
/// identifier.
///
/// Opaque string form, compared and persisted by value. Once assigned it is
/// never recomputed except through an explicit full reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ecid(String);

impl Ecid {
    /// Generate a new identifier: two independent random 19-digit blocks,
    /// zero-padded, concatenated into a 38-character decimal string.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let high = rng.gen::<u64>() % ECID_BLOCK_MOD;
        let low = rng.gen::<u64>() % ECID_BLOCK_MOD;
        Self(format!(
            "{high:0width$}{low:0width$}",
            width = ECID_BLOCK_DIGITS
        ))
    }

    /// Wrap an existing identifier value (e.g. loaded from persistence or
    /// migrated from the direct identity component).
    #[must_use]
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The string form of this identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ecid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
