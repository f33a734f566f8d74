use serde::{Deserialize, Serialize};

/// Embedded address sub-document shared by patient and staff records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

/// Base offset for the human-readable sequential references assigned to
/// patients and staff (`ASTRA-PT-1001`, `ASTRA-NR-1003`, ...).
pub const SEQUENTIAL_REF_BASE: i64 = 1000;

/// `PREFIX-(base+count)`: the reference assigned when `count` records
/// already exist, so the first record gets `PREFIX-1000`. Derived from a
/// row count, so concurrent inserts can collide; the source system
/// defines no stronger contract.
pub fn sequential_ref(prefix: &str, count: i64) -> String {
    format!("{}-{}", prefix, SEQUENTIAL_REF_BASE + count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_refs_follow_prefix_base_count() {
        assert_eq!(sequential_ref("ASTRA-PT", 0), "ASTRA-PT-1000");
        assert_eq!(sequential_ref("ASTRA-PT", 1), "ASTRA-PT-1001");
        assert_eq!(sequential_ref("ASTRA-NR", 57), "ASTRA-NR-1057");
    }
}
