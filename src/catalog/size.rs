use serde::{Deserialize, Serialize};

/// Octet count used for fields whose true length is only known at run time.
pub const UNBOUNDED_OCTETS: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSize {
    pub octets: Option<i32>,
    pub bits: Option<u32>,
    pub repeat_count: u32,
    pub repeat_max: u32,
    pub getnext_required: bool,
}

impl Default for AttributeSize {
    fn default() -> Self {
        Self {
            octets: None,
            bits: None,
            repeat_count: 1,
            repeat_max: 1,
            getnext_required: false,
        }
    }
}

impl AttributeSize {
    pub fn from_octets(octets: i32) -> Self {
        Self {
            octets: Some(octets),
            ..Self::default()
        }
    }

    pub fn from_bits(bits: u32) -> Self {
        Self {
            bits: Some(bits),
            ..Self::default()
        }
    }

    pub fn incremental(octets: i32) -> Self {
        Self {
            octets: Some(octets),
            getnext_required: true,
            ..Self::default()
        }
    }

    /// Octet length, derived from the bit length when only bits were given.
    /// Partial octets round up.
    pub fn derived_octets(&self) -> Option<i32> {
        if let Some(octets) = self.octets {
            return Some(octets);
        }
        self.bits
            .map(|bits| i32::try_from(bits.div_ceil(8)).unwrap_or(i32::MAX))
    }
}
