//! Output schema types.
//!
//! Rows handed out by the record reader have a fixed shape, described by a
//! list of [`FieldDescriptor`]s so that output writers can render headers
//! and type listings without knowing the row struct.
//!
//! ```rust
//! use pcapdns_core::schema::{DataKind, FieldDescriptor};
//!
//! let fields = vec![
//!     FieldDescriptor::new("transaction_id", DataKind::UInt16),
//!     FieldDescriptor::nullable("answer_data", DataKind::String),
//! ];
//! assert!(fields[1].nullable);
//! ```

mod field;
mod kind;
mod value;

pub use field::FieldDescriptor;
pub use kind::DataKind;
pub use value::FieldValue;
