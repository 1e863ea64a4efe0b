use thiserror::Error;
use miette::Diagnostic;

/// Errors that can occur while populating the type registry.
///
/// Every variant is a generation-time defect in the input schema: the builder
/// records all of them and `RegistryBuilder::finish` fails with the complete
/// list rather than stopping at the first one.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A field, parameter, or return type names a type that is not a
    /// registered struct, enum, string representation, or known primitive.
    #[error("Unknown type: `{type_name}` referenced by `{owner}.{field}` is not registered")]
    #[diagnostic(code(girder_schema::unknown_type))]
    UnknownType {
        /// The unresolved native type name.
        type_name: String,
        /// Native name of the struct whose field references the type.
        owner: String,
        /// The referencing field.
        field: String,
        #[help("Was the struct or enum definition for `{type_name}` loaded before finish()?")]
        help: Option<String>,
    },

    /// A struct's field positions are not exactly `0..n` in declaration
    /// order. Field order mirrors the native layout (vtable slot order for
    /// class-equivalent structs), so a gap or permutation here would emit
    /// ABI-incompatible bindings.
    #[error("Layout order violation: field `{field}` of `{owner}` is at position {found}, expected {expected}")]
    #[diagnostic(code(girder_schema::layout_order))]
    LayoutOrder {
        owner: String,
        field: String,
        expected: usize,
        found: usize,
    },

    /// A function-pointer field declared no parameters. The first parameter
    /// of every slot is the owning object; a slot without it cannot be
    /// invoked or implemented.
    #[error("Malformed slot: function-pointer field `{owner}.{field}` has no owning-object parameter")]
    #[diagnostic(code(girder_schema::missing_self))]
    MissingSelfParameter {
        owner: String,
        field: String,
    },

    /// The same native type name was registered twice. The parser collaborator
    /// deduplicates its output, so a duplicate here means two conflicting
    /// definitions, not a harmless repeat.
    #[error("Duplicate definition: `{type_name}` is registered more than once")]
    #[diagnostic(code(girder_schema::duplicate_definition))]
    DuplicateDefinition {
        /// The native type name registered twice.
        type_name: String,
    },
}
