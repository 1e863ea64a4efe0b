use thiserror::Error;
use miette::Diagnostic;

/// Errors produced while resolving marshalling strategies.
///
/// Both variants are generation-time defects in the input schema or the rule
/// table, never runtime conditions. The generator accumulates them across a
/// run and reports all of them at once; no fragment is emitted for a field
/// that produced one, because guessing a strategy would silently produce an
/// ABI-incompatible binding that only fails at runtime.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The parameter or return type shape is not covered by any marshalling
    /// rule.
    #[error("Unhandled conversion: `{owner}.{field}` parameter `{param}` has type `{type_text}` with no marshalling rule")]
    #[diagnostic(code(girder_resolve::unhandled_conversion))]
    UnhandledConversion {
        /// Native name of the struct owning the field.
        owner: String,
        /// The field being generated.
        field: String,
        /// The offending parameter, or `(return)` for the return type.
        param: String,
        /// Native type text of the unhandled shape.
        type_text: String,
        #[help("No strategy is ever guessed; extend the rule table or fix the declaration")]
        help: Option<String>,
    },

    /// The type name is absent from the registry. Normally caught at
    /// population; reported here as well so a resolver called with a
    /// hand-built registry still refuses to emit an invalid cast.
    #[error("Unknown type: `{type_name}` in `{owner}.{field}` parameter `{param}` is not registered")]
    #[diagnostic(code(girder_resolve::unknown_type))]
    UnknownType {
        owner: String,
        field: String,
        param: String,
        type_name: String,
    },
}
