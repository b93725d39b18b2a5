//! `skusync-core`: shared primitives for the SkuBatch inventory sync.
//!
//! Strongly-typed identifiers and the domain error model. No IO lives here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{SkuBatchId, SkuId, WarehouseId, WmsId};
