//! Fixture builders shared by unit and integration tests.

use girder_schema::{
    EnumDef, Field, IntWidth, Registry, RegistryBuilder, StructDef, StructKind, TypeDescriptor,
};

/// A registry holding a single value-equivalent struct `widget` with one
/// 4-byte integer field.
pub fn widget_registry() -> Registry {
    let mut builder = RegistryBuilder::new();
    builder.add_struct(StructDef {
        native_name: "widget".to_string(),
        managed_name: String::new(),
        kind: StructKind::ValueEquivalent,
        fields: vec![Field::new(TypeDescriptor::parse("count", "int"), 0)],
    });
    builder.finish().expect("widget registry is well-formed")
}

/// A registry exercising most strategies: an enum, a value-equivalent
/// rectangle, and a class-equivalent view whose slots cover inline-string
/// returns, class-pointer arguments, user-freed string arguments, and mixed
/// value-struct/enum/primitive signatures.
pub fn view_registry() -> Registry {
    let mut builder = RegistryBuilder::new();
    builder.add_enum(EnumDef {
        native_name: "cef_state_t".to_string(),
        managed_name: String::new(),
        underlying: IntWidth::I32,
    });
    builder.add_struct(StructDef {
        native_name: "cef_rect_t".to_string(),
        managed_name: String::new(),
        kind: StructKind::ValueEquivalent,
        fields: vec![
            Field::new(TypeDescriptor::parse("x", "int"), 0),
            Field::new(TypeDescriptor::parse("y", "int"), 1),
        ],
    });
    builder.add_struct(StructDef {
        native_name: "cef_view_t".to_string(),
        managed_name: String::new(),
        kind: StructKind::ClassEquivalent,
        fields: vec![
            Field::new(
                TypeDescriptor::function(
                    "get_title",
                    "cef_string_t",
                    &[("self", "struct _cef_view_t *")],
                ),
                0,
            ),
            Field::new(
                TypeDescriptor::function(
                    "set_parent",
                    "void",
                    &[("self", "struct _cef_view_t *"), ("parent", "struct _cef_view_t *")],
                ),
                1,
            ),
            Field::new(
                TypeDescriptor::function(
                    "on_query",
                    "void",
                    &[("self", "struct _cef_view_t *"), ("query", "cef_string_userfree_t")],
                ),
                2,
            ),
            Field::new(
                TypeDescriptor::function(
                    "move_to",
                    "int",
                    &[
                        ("self", "struct _cef_view_t *"),
                        ("bounds", "const cef_rect_t *"),
                        ("state", "cef_state_t"),
                    ],
                ),
                3,
            ),
        ],
    });
    builder.finish().expect("view registry is well-formed")
}

/// A registry whose single slot takes a nested function-pointer parameter,
/// a shape with no marshalling rule.
pub fn unresolvable_registry() -> Registry {
    let nested = TypeDescriptor::function("on_done", "void", &[("self", "struct _cef_view_t *")]);
    let mut builder = RegistryBuilder::new();
    builder.add_struct(StructDef {
        native_name: "cef_view_t".to_string(),
        managed_name: String::new(),
        kind: StructKind::ClassEquivalent,
        fields: vec![Field::new(
            TypeDescriptor {
                name: "set_handler".to_string(),
                base_type: "void".to_string(),
                pointer_depth: 0,
                c_native_type: "void".to_string(),
                is_function_pointer: true,
                params: vec![TypeDescriptor::parse("self", "struct _cef_view_t *"), nested],
            },
            0,
        )],
    });
    builder.finish().expect("population succeeds; only resolution fails")
}

/// The named struct, which must exist in the registry.
pub fn def<'reg>(registry: &'reg Registry, native_name: &str) -> &'reg StructDef {
    registry
        .struct_def(native_name)
        .unwrap_or_else(|| panic!("fixture struct {native_name} missing"))
}
