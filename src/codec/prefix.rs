//! Type Prefix Module
//!
//! The tag table that marks which kind a stored string encodes.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

// == Type Prefixes ==
/// Prefix strings for every non-string value kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePrefixes {
    pub date: String,
    pub bigint: String,
    pub object: String,
    pub int: String,
    pub float: String,
}

impl Default for TypePrefixes {
    fn default() -> Self {
        Self {
            date: "__date".to_string(),
            bigint: "__bigint".to_string(),
            object: "__object".to_string(),
            int: "__int".to_string(),
            float: "__float".to_string(),
        }
    }
}

// == Prefix Kind ==
/// Kinds that carry a prefix, listed in matching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrefixKind {
    Object,
    Int,
    Float,
    Date,
    BigInt,
}

impl PrefixKind {
    pub(crate) const MATCH_ORDER: [PrefixKind; 5] = [
        PrefixKind::Object,
        PrefixKind::Int,
        PrefixKind::Float,
        PrefixKind::Date,
        PrefixKind::BigInt,
    ];
}

impl TypePrefixes {
    fn raw(&self, kind: PrefixKind) -> &str {
        match kind {
            PrefixKind::Object => &self.object,
            PrefixKind::Int => &self.int,
            PrefixKind::Float => &self.float,
            PrefixKind::Date => &self.date,
            PrefixKind::BigInt => &self.bigint,
        }
    }

    // == Resolve ==
    /// Suffixes every prefix with `delimiter` and checks they are distinct.
    ///
    /// Returns the suffixed prefixes in matching order.
    pub(crate) fn resolve(&self, delimiter: &str) -> Result<Vec<(PrefixKind, String)>, StoreError> {
        let resolved: Vec<(PrefixKind, String)> = PrefixKind::MATCH_ORDER
            .iter()
            .map(|&kind| (kind, format!("{}{}", self.raw(kind), delimiter)))
            .collect();

        for (i, (kind_a, a)) in resolved.iter().enumerate() {
            for (kind_b, b) in resolved.iter().skip(i + 1) {
                if a == b {
                    return Err(StoreError::Config(format!(
                        "type prefixes for {:?} and {:?} are both {:?}",
                        kind_a, kind_b, a
                    )));
                }
            }
        }

        Ok(resolved)
    }
}
