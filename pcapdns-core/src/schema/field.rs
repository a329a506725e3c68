//! Column descriptors.

use super::DataKind;

/// One column of an output row.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Column name (snake_case, e.g., "src_ip")
    pub name: &'static str,

    /// Data type
    pub kind: DataKind,

    /// Whether the column can be NULL
    pub nullable: bool,

    /// Optional description for documentation
    pub description: Option<&'static str>,
}

impl FieldDescriptor {
    /// Create a new non-nullable field.
    pub const fn new(name: &'static str, kind: DataKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            description: None,
        }
    }

    /// Create a new nullable field.
    pub const fn nullable(name: &'static str, kind: DataKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
            description: None,
        }
    }

    /// Add a description to the field.
    pub const fn with_description(mut self, desc: &'static str) -> Self {
        self.description = Some(desc);
        self
    }

    /// The leading key column carried by every emitted row.
    pub const fn key() -> Self {
        Self::new("key", DataKind::Int64).with_description("Capture time in whole seconds since the epoch")
    }
}
