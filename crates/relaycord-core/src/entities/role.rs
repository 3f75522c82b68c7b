//! Role entity - a named permission set inside a guild

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub position: i32,
    /// Raw permission bit set
    #[serde(default)]
    pub permissions: u64,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub color: u32,
}

impl Role {
    /// Check whether every bit of `mask` is granted by this role
    #[inline]
    pub fn grants(&self, mask: u64) -> bool {
        self.permissions & mask == mask
    }
}
