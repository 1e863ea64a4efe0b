//! The marshalling rule resolver.
//!
//! A pure function from (type descriptor, direction, registry) to a
//! [`MarshallStrategy`]. Rules are tried in a fixed precedence: string
//! representations first, then registered structs and enums, the untyped
//! buffer, the string array, and finally the primitive table. Anything left
//! over fails resolution; the resolver never guesses.

use girder_schema::{
    primitive_ffi_type, primitive_managed_type, Field, Registry, StructDef, TypeDescriptor,
};

use crate::error::ResolveError;
use crate::strategy::{Direction, MarshallStrategy};

/// One resolved non-self parameter of a function-pointer field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParam {
    /// Parameter name as declared in the native header.
    pub name: String,
    pub strategy: MarshallStrategy,
    /// Managed-side type text.
    pub managed: String,
    /// Native type text, used verbatim in emitted C.
    pub native: String,
}

/// The resolved return value of a function-pointer field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReturn {
    pub strategy: MarshallStrategy,
    pub managed: String,
    pub native: String,
}

/// Everything the emitters need for one function-pointer field: all non-self
/// parameters plus the optional return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub params: Vec<ResolvedParam>,
    pub ret: Option<ResolvedReturn>,
}

/// Resolves every non-self parameter and the return type of a
/// function-pointer field.
///
/// `args_direction` is the direction the arguments cross: `ToNative` for the
/// managed proxy, `FromNative` for the callback adapter. The return value
/// always crosses the opposite way. All failures for the field are collected
/// and returned together; the caller emits nothing for the field when any
/// were recorded.
pub fn resolve_field(
    owner: &StructDef,
    field: &Field,
    args_direction: Direction,
    registry: &Registry,
) -> Result<ResolvedField, Vec<ResolveError>> {
    let mut errors = Vec::new();
    let mut params = Vec::new();

    for var in field.var.params.iter().skip(1) {
        match resolve_value(owner, field.name(), &var.name, var, args_direction, registry) {
            Ok(strategy) => params.push(ResolvedParam {
                name: var.name.clone(),
                managed: strategy.managed_param_type(),
                native: var.c_native_type.clone(),
                strategy,
            }),
            Err(err) => errors.push(err),
        }
    }

    let ret = if field.var.is_void() {
        None
    } else {
        match resolve_return(owner, field, args_direction.reversed(), registry) {
            Ok(ret) => Some(ret),
            Err(err) => {
                errors.push(err);
                None
            }
        }
    };

    if errors.is_empty() {
        log::trace!(
            "resolved {}.{}: {} params, return {}",
            owner.native_name,
            field.name(),
            params.len(),
            ret.is_some()
        );
        Ok(ResolvedField { params, ret })
    } else {
        Err(errors)
    }
}

/// Resolves the strategy for a plain (non-function-pointer) field, as used
/// by the struct copy emitter and the accessor getters.
pub fn resolve_plain_field(
    owner: &StructDef,
    field: &Field,
    direction: Direction,
    registry: &Registry,
) -> Result<MarshallStrategy, ResolveError> {
    resolve_value(owner, field.name(), field.name(), &field.var, direction, registry)
}

fn resolve_return(
    owner: &StructDef,
    field: &Field,
    direction: Direction,
    registry: &Registry,
) -> Result<ResolvedReturn, ResolveError> {
    // The slot descriptor carries the return type in its base/depth; viewed
    // as a value it is not itself a function pointer.
    let var = TypeDescriptor {
        is_function_pointer: false,
        params: Vec::new(),
        ..field.var.clone()
    };
    let strategy = resolve_value(owner, field.name(), "(return)", &var, direction, registry)?;
    // A return value cannot be written through a caller-owned buffer, and a
    // string array cannot be reassembled on the way out: both shapes only
    // exist for arguments.
    let representable = !matches!(strategy, MarshallStrategy::StringArray)
        && !(direction == Direction::ToNative && strategy == MarshallStrategy::BorrowedString);
    if !representable {
        return Err(unhandled(owner, field.name(), "(return)", &var));
    }
    Ok(ResolvedReturn {
        managed: strategy.managed_return_type(),
        native: var.c_native_type.clone(),
        strategy,
    })
}

/// The rule table. Precedence: inline string, borrowed string, user-freed
/// string, class-equivalent pointer, value-equivalent struct, enum, opaque
/// buffer, string array, primitive.
fn resolve_value(
    owner: &StructDef,
    field: &str,
    param: &str,
    var: &TypeDescriptor,
    direction: Direction,
    registry: &Registry,
) -> Result<MarshallStrategy, ResolveError> {
    // A nested function pointer has no marshalling rule.
    if var.is_function_pointer {
        return Err(unhandled(owner, field, param, var));
    }

    if var.base_type == registry.strings.inline {
        return match var.pointer_depth {
            0 => Ok(MarshallStrategy::InlineString),
            1 => Ok(MarshallStrategy::BorrowedString),
            _ => Err(unhandled(owner, field, param, var)),
        };
    }

    if var.base_type == registry.strings.userfree {
        return if var.pointer_depth == 0 {
            Ok(MarshallStrategy::UserFreeString)
        } else {
            Err(unhandled(owner, field, param, var))
        };
    }

    if let Some(def) = registry.struct_def(&var.base_type) {
        return if def.is_class_equivalent() {
            match var.pointer_depth {
                1 | 2 => Ok(MarshallStrategy::ClassPtr {
                    native: def.native_name.clone(),
                    managed: def.managed_name.clone(),
                    depth: var.pointer_depth,
                }),
                // Class-equivalent instances are never copied by value.
                _ => Err(unhandled(owner, field, param, var)),
            }
        } else {
            match var.pointer_depth {
                0 | 1 => Ok(MarshallStrategy::ValueStruct {
                    native: def.native_name.clone(),
                    managed: def.managed_name.clone(),
                    by_ref: var.pointer_depth == 1,
                }),
                _ => Err(unhandled(owner, field, param, var)),
            }
        };
    }

    if let Some(def) = registry.enum_def(&var.base_type) {
        return match var.pointer_depth {
            0 | 1 => Ok(MarshallStrategy::EnumCast {
                native: def.native_name.clone(),
                managed: def.managed_name.clone(),
                by_ptr: var.pointer_depth == 1,
            }),
            _ => Err(unhandled(owner, field, param, var)),
        };
    }

    if var.base_type == "void" && var.pointer_depth >= 1 {
        return Ok(MarshallStrategy::OpaquePtr { depth: var.pointer_depth });
    }

    if var.base_type == "char" && var.pointer_depth == 2 {
        return match direction {
            Direction::ToNative => Ok(MarshallStrategy::StringArray),
            // Only the forward direction is defined for string arrays.
            Direction::FromNative => Err(unhandled(owner, field, param, var)),
        };
    }

    if let Some(managed) = primitive_managed_type(&var.base_type) {
        let ffi = primitive_ffi_type(&var.base_type)
            .expect("ffi table covers the managed table");
        return if var.pointer_depth <= 1 {
            Ok(MarshallStrategy::Primitive { managed, ffi, depth: var.pointer_depth })
        } else {
            Err(unhandled(owner, field, param, var))
        };
    }

    if !registry.knows(&var.base_type) {
        return Err(ResolveError::UnknownType {
            owner: owner.native_name.clone(),
            field: field.to_string(),
            param: param.to_string(),
            type_name: var.base_type.clone(),
        });
    }
    Err(unhandled(owner, field, param, var))
}

fn unhandled(owner: &StructDef, field: &str, param: &str, var: &TypeDescriptor) -> ResolveError {
    ResolveError::UnhandledConversion {
        owner: owner.native_name.clone(),
        field: field.to_string(),
        param: param.to_string(),
        type_text: if var.is_function_pointer {
            format!("{} (*)(...)", var.c_native_type)
        } else {
            var.c_native_type.clone()
        },
        help: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_schema::{EnumDef, Field, IntWidth, RegistryBuilder, StructDef, StructKind};

    fn registry() -> Registry {
        let mut builder = RegistryBuilder::new();
        builder.add_struct(StructDef {
            native_name: "cef_view_t".into(),
            managed_name: String::new(),
            kind: StructKind::ClassEquivalent,
            fields: vec![],
        });
        builder.add_struct(StructDef {
            native_name: "cef_rect_t".into(),
            managed_name: String::new(),
            kind: StructKind::ValueEquivalent,
            fields: vec![
                Field::new(TypeDescriptor::parse("x", "int"), 0),
                Field::new(TypeDescriptor::parse("y", "int"), 1),
            ],
        });
        builder.add_enum(EnumDef {
            native_name: "cef_state_t".into(),
            managed_name: String::new(),
            underlying: IntWidth::I32,
        });
        builder.finish().unwrap()
    }

    fn owner(registry: &Registry) -> &StructDef {
        registry.struct_def("cef_view_t").unwrap()
    }

    fn resolve(type_text: &str, direction: Direction) -> Result<MarshallStrategy, ResolveError> {
        let registry = registry();
        resolve_value(owner(&registry), "f", "p", &TypeDescriptor::parse("p", type_text), direction, &registry)
    }

    #[test]
    fn string_rules_take_precedence_by_depth() {
        assert_eq!(resolve("cef_string_t", Direction::ToNative).unwrap(), MarshallStrategy::InlineString);
        assert_eq!(resolve("const cef_string_t *", Direction::ToNative).unwrap(), MarshallStrategy::BorrowedString);
        assert_eq!(resolve("cef_string_userfree_t", Direction::FromNative).unwrap(), MarshallStrategy::UserFreeString);
    }

    #[test]
    fn class_equivalent_struct_resolves_to_pointer_reinterpretation() {
        match resolve("struct _cef_view_t *", Direction::ToNative).unwrap() {
            MarshallStrategy::ClassPtr { managed, depth, .. } => {
                assert_eq!(managed, "View");
                assert_eq!(depth, 1);
            }
            other => panic!("expected ClassPtr, got {other:?}"),
        }
        // By value a class-equivalent struct has no rule: never copied.
        assert!(resolve("struct _cef_view_t", Direction::ToNative).is_err());
    }

    #[test]
    fn value_equivalent_struct_resolves_to_field_copy() {
        match resolve("cef_rect_t", Direction::FromNative).unwrap() {
            MarshallStrategy::ValueStruct { managed, by_ref, .. } => {
                assert_eq!(managed, "Rect");
                assert!(!by_ref);
            }
            other => panic!("expected ValueStruct, got {other:?}"),
        }
        assert!(matches!(
            resolve("cef_rect_t *", Direction::ToNative).unwrap(),
            MarshallStrategy::ValueStruct { by_ref: true, .. }
        ));
    }

    #[test]
    fn enum_void_and_primitive_rules() {
        assert!(matches!(
            resolve("cef_state_t", Direction::ToNative).unwrap(),
            MarshallStrategy::EnumCast { by_ptr: false, .. }
        ));
        assert_eq!(resolve("void *", Direction::ToNative).unwrap(), MarshallStrategy::OpaquePtr { depth: 1 });
        assert!(matches!(
            resolve("size_t", Direction::ToNative).unwrap(),
            MarshallStrategy::Primitive { managed: "usize", .. }
        ));
        assert!(matches!(
            resolve("int *", Direction::FromNative).unwrap(),
            MarshallStrategy::Primitive { depth: 1, .. }
        ));
    }

    #[test]
    fn string_array_is_forward_only() {
        assert_eq!(resolve("char **", Direction::ToNative).unwrap(), MarshallStrategy::StringArray);
        assert!(resolve("char **", Direction::FromNative).is_err());
    }

    #[test]
    fn nested_function_pointer_fails_with_exact_location() {
        let registry = registry();
        let nested = TypeDescriptor::function("on_done", "void", &[("self", "struct _cef_view_t *")]);
        let owner = owner(&registry);
        let field = Field::new(
            TypeDescriptor {
                name: "set_handler".into(),
                base_type: "void".into(),
                pointer_depth: 0,
                c_native_type: "void".into(),
                is_function_pointer: true,
                params: vec![TypeDescriptor::parse("self", "struct _cef_view_t *"), nested],
            },
            0,
        );
        let errors = resolve_field(owner, &field, Direction::ToNative, &registry).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ResolveError::UnhandledConversion { owner, field, param, .. } => {
                assert_eq!(owner, "cef_view_t");
                assert_eq!(field, "set_handler");
                assert_eq!(param, "on_done");
            }
            other => panic!("expected UnhandledConversion, got {other:?}"),
        }
    }

    #[test]
    fn resolved_field_skips_self_and_keeps_order() {
        let registry = registry();
        let field = Field::new(
            TypeDescriptor::function(
                "move_to",
                "int",
                &[
                    ("self", "struct _cef_view_t *"),
                    ("bounds", "const cef_rect_t *"),
                    ("state", "cef_state_t"),
                ],
            ),
            0,
        );
        let resolved = resolve_field(owner(&registry), &field, Direction::ToNative, &registry).unwrap();
        let names: Vec<_> = resolved.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["bounds", "state"]);
        assert_eq!(resolved.params[0].managed, "&Rect");
        assert_eq!(resolved.ret.as_ref().unwrap().managed, "i32");
    }

    #[test]
    fn borrowed_string_cannot_be_a_callback_return() {
        let registry = registry();
        let field = Field::new(
            TypeDescriptor::function("get_id", "cef_string_t *", &[("self", "struct _cef_view_t *")]),
            0,
        );
        // Proxy side: the native return is decoded, fine.
        assert!(resolve_field(owner(&registry), &field, Direction::ToNative, &registry).is_ok());
        // Callback side: returning a pointer to a managed temporary has no rule.
        assert!(resolve_field(owner(&registry), &field, Direction::FromNative, &registry).is_err());
    }
}
