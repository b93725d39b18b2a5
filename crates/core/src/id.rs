//! Strongly-typed identifiers used across the sync.
//!
//! All identifiers are opaque strings owned by external systems. `SkuBatchId`
//! is the join key between the application and inventory datasets.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a SkuBatch (join key across every record kind).
///
/// Deserialization goes through [`FromStr`]: surrounding whitespace is trimmed
/// and blank values are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SkuBatchId(String);

/// Identifier of a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuId(String);

/// Warehouse-management-system identifier assigned to a SkuBatch.
///
/// Serialized as a string; deserializes from a string or a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WmsId(String);

/// Identifier of a physical warehouse. Trimmed and non-blank, like [`SkuBatchId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WarehouseId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier from any string-like value.
            ///
            /// Does not validate; use `parse` / `FromStr` for untrusted input.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_string_newtype!(SkuBatchId, "SkuBatchId");
impl_string_newtype!(SkuId, "SkuId");
impl_string_newtype!(WmsId, "WmsId");
impl_string_newtype!(WarehouseId, "WarehouseId");

impl From<u64> for WmsId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Join keys deserialize through `FromStr` (trimmed, blank rejected).
macro_rules! impl_parsed_deserialize {
    ($t:ty) => {
        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_parsed_deserialize!(SkuBatchId);
impl_parsed_deserialize!(WarehouseId);

impl<'de> Deserialize<'de> for WmsId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct WmsIdVisitor;

        impl serde::de::Visitor<'_> for WmsIdVisitor {
            type Value = WmsId;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a wms id as a string or non-negative integer")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<WmsId, E> {
                Ok(WmsId::from(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<WmsId, E> {
                u64::try_from(v)
                    .map(WmsId::from)
                    .map_err(|_| E::custom(format!("wms id cannot be negative: {v}")))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<WmsId, E> {
                Ok(WmsId::new(v))
            }

            fn visit_string<E: serde::de::Error>(self, v: String) -> Result<WmsId, E> {
                Ok(WmsId(v))
            }
        }

        deserializer.deserialize_any(WmsIdVisitor)
    }
}
