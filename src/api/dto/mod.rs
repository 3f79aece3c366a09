//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain records are serialized as-is; the types here cover request
//! bodies and query strings that have no domain counterpart, plus the
//! page-surface document.

pub mod common_dto;
pub mod page_dto;

pub use common_dto::*;
pub use page_dto::*;
