//! The forward-call emitter.
//!
//! For a function-pointer field this produces the managed proxy method: it
//! marshals every non-self argument to native form, invokes the field's
//! trampoline with the owning object's handle, the marshalled arguments, and
//! the raw function-pointer value read from the vtable slot, then marshals
//! the native return value back. For a plain field of a class-equivalent
//! struct it produces a getter that reads through the native handle.

use girder_resolve::{MarshallStrategy, ResolvedField, ResolvedParam};
use girder_schema::{Field, Registry, StructDef};

use crate::code::{ffi_type, rust_ident, Block};

/// Emits the managed proxy method for one function-pointer field.
pub fn emit_proxy(
    owner: &StructDef,
    field: &Field,
    resolved: &ResolvedField,
    registry: &Registry,
) -> String {
    let mut prologue = Block::new();
    let mut args = Vec::with_capacity(resolved.params.len());
    for param in &resolved.params {
        args.push(marshal_arg(param, &mut prologue, registry));
    }

    let trampoline = registry.naming.trampoline_symbol(&owner.native_name, field.name());
    let mut call = format!("{trampoline}(self.as_ptr()");
    for arg in &args {
        call.push_str(", ");
        call.push_str(arg);
    }
    call.push_str(&format!(", (*self.as_ptr()).{})", field.name()));

    let mut body = Block::new();
    match &resolved.ret {
        None => body.expr(call),
        Some(ret) => unmarshal_return(&ret.strategy, call, &mut body),
    }

    let mut signature = format!("pub fn {}(&self", rust_ident(field.name()));
    for param in &resolved.params {
        signature.push_str(&format!(", {}: {}", rust_ident(&param.name), param.managed));
    }
    signature.push(')');
    if let Some(ret) = &resolved.ret {
        signature.push_str(&format!(" -> {}", ret.managed));
    }

    let mut text = format!("{signature} {{\n");
    text.push_str(&prologue.render(1));
    text.push_str("    unsafe {\n");
    text.push_str(&body.render(2));
    text.push_str("    }\n}\n");
    text
}

/// Marshals one argument to native form. Temporaries land in `prologue`;
/// the returned expression is what the trampoline call passes.
fn marshal_arg(param: &ResolvedParam, prologue: &mut Block, registry: &Registry) -> String {
    let name = rust_ident(&param.name);
    match &param.strategy {
        MarshallStrategy::InlineString | MarshallStrategy::BorrowedString => {
            prologue.decl(
                format!("{name}__"),
                format!("{}::default()", registry.strings.inline),
                true,
            );
            prologue.expr(format!("set_native_str({name}, &mut {name}__)"));
            format!("&mut {name}__")
        }
        MarshallStrategy::UserFreeString => format!("new_userfree_str(&{name})"),
        MarshallStrategy::ClassPtr { depth, .. } => {
            if *depth == 2 {
                prologue.decl(format!("{name}__"), format!("{name}.as_ptr()"), true);
                format!("&mut {name}__")
            } else {
                format!("{name}.as_ptr()")
            }
        }
        MarshallStrategy::ValueStruct { native, by_ref, .. } => {
            prologue.decl(format!("{name}__"), format!("{native}::default()"), true);
            prologue.expr(format!("{name}.to_native(&mut {name}__)"));
            if *by_ref {
                format!("&mut {name}__")
            } else {
                format!("{name}__")
            }
        }
        MarshallStrategy::EnumCast { native, by_ptr, .. } => {
            if *by_ptr {
                prologue.decl(format!("{name}__"), format!("*{name} as {native}"), true);
                format!("&mut {name}__")
            } else {
                format!("{name} as {native}")
            }
        }
        MarshallStrategy::OpaquePtr { .. } => name,
        MarshallStrategy::StringArray => {
            prologue.decl(format!("{name}__"), format!("new_cstr_array({name})"), false);
            format!("{name}__")
        }
        MarshallStrategy::Primitive { ffi, depth, .. } => {
            if *depth == 1 {
                name
            } else {
                format!("{name} as {ffi}")
            }
        }
    }
}

/// Marshals the native return value of `call` back to managed form.
fn unmarshal_return(strategy: &MarshallStrategy, call: String, body: &mut Block) {
    match strategy {
        MarshallStrategy::InlineString => {
            body.decl("ret__", call, false);
            body.tail("native_str_to_string(&ret__)");
        }
        MarshallStrategy::BorrowedString => body.tail(format!("native_str_to_string({call})")),
        // The consuming helper copies the content out and releases the
        // native buffer exactly once.
        MarshallStrategy::UserFreeString => body.tail(format!("userfree_str_to_string({call})")),
        MarshallStrategy::ValueStruct { managed, .. } => {
            body.decl("native__", call, false);
            body.decl("result__", format!("{managed}::default()"), true);
            body.expr("result__.from_native(&native__)");
            body.tail("result__");
        }
        MarshallStrategy::ClassPtr { managed, .. } => {
            body.tail(format!("{managed}::from_ptr({call})"));
        }
        MarshallStrategy::EnumCast { managed, .. } => body.tail(format!("{call} as {managed}")),
        MarshallStrategy::OpaquePtr { .. } => body.tail(call),
        MarshallStrategy::Primitive { managed, depth, .. } => {
            if *depth == 1 {
                body.tail(format!("{call} as *mut {managed}"));
            } else {
                body.tail(format!("{call} as {managed}"));
            }
        }
        // String arrays never resolve in the from-native direction.
        MarshallStrategy::StringArray => unreachable!("string array as return value"),
    }
}

/// Emits a managed getter for a plain (non-function-pointer) field of a
/// class-equivalent struct.
///
/// Returns `None` for fields whose read would consume the native value: a
/// user-freed string can only be released once, so no getter is generated
/// for it.
pub fn emit_accessor(
    _owner: &StructDef,
    field: &Field,
    strategy: &MarshallStrategy,
    registry: &Registry,
) -> Option<String> {
    let read = format!("(*self.as_ptr()).{}", field.name());
    let mut body = Block::new();
    let ret;
    match strategy {
        MarshallStrategy::UserFreeString | MarshallStrategy::StringArray => return None,
        MarshallStrategy::InlineString => {
            ret = "String".to_string();
            body.tail(format!("native_str_to_string(&{read})"));
        }
        MarshallStrategy::BorrowedString => {
            ret = "String".to_string();
            body.tail(format!("native_str_to_string({read})"));
        }
        MarshallStrategy::ClassPtr { managed, depth: 1, .. } => {
            ret = managed.clone();
            body.tail(format!("{managed}::from_ptr({read})"));
        }
        MarshallStrategy::ValueStruct { managed, by_ref, .. } => {
            ret = managed.clone();
            body.decl("result__", format!("{managed}::default()"), true);
            if *by_ref {
                body.expr(format!("result__.from_native({read})"));
            } else {
                body.expr(format!("result__.from_native(&{read})"));
            }
            body.tail("result__");
        }
        MarshallStrategy::EnumCast { managed, by_ptr: false, .. } => {
            ret = managed.clone();
            body.tail(format!("{read} as {managed}"));
        }
        MarshallStrategy::Primitive { managed, depth: 0, .. } => {
            ret = (*managed).to_string();
            body.tail(format!("{read} as {managed}"));
        }
        // Pointer-shaped oddballs are handed out raw.
        other => {
            ret = ffi_type(other, registry);
            body.tail(read);
        }
    }

    let mut text = format!(
        "pub fn {}(&self) -> {ret} {{\n    unsafe {{\n",
        rust_ident(field.name())
    );
    text.push_str(&body.render(2));
    text.push_str("    }\n}\n");
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_resolve::{resolve_plain_field, Direction};
    use girder_schema::{Field, RegistryBuilder, StructKind, TypeDescriptor};

    fn display_registry() -> Registry {
        let mut builder = RegistryBuilder::new();
        builder.add_struct(girder_schema::StructDef {
            native_name: "cef_rect_t".into(),
            managed_name: String::new(),
            kind: StructKind::ValueEquivalent,
            fields: vec![Field::new(TypeDescriptor::parse("x", "int"), 0)],
        });
        builder.add_struct(girder_schema::StructDef {
            native_name: "cef_display_t".into(),
            managed_name: String::new(),
            kind: StructKind::ClassEquivalent,
            fields: vec![
                Field::new(TypeDescriptor::parse("id", "int64"), 0),
                Field::new(TypeDescriptor::parse("bounds", "cef_rect_t"), 1),
                Field::new(TypeDescriptor::parse("name", "cef_string_t"), 2),
                Field::new(TypeDescriptor::parse("last_error", "cef_string_userfree_t"), 3),
            ],
        });
        builder.finish().unwrap()
    }

    fn accessor_for(index: usize) -> Option<String> {
        let registry = display_registry();
        let display = registry.struct_def("cef_display_t").unwrap();
        let field = &display.fields[index];
        let strategy =
            resolve_plain_field(display, field, Direction::FromNative, &registry).unwrap();
        emit_accessor(display, field, &strategy, &registry)
    }

    #[test]
    fn primitive_accessor_reads_through_the_handle() {
        expect_test::expect![[r#"
            pub fn id(&self) -> i64 {
                unsafe {
                    (*self.as_ptr()).id as i64
                }
            }
        "#]]
        .assert_eq(&accessor_for(0).unwrap());
    }

    #[test]
    fn value_struct_accessor_copies_out() {
        expect_test::expect![[r#"
            pub fn bounds(&self) -> Rect {
                unsafe {
                    let mut result__ = Rect::default();
                    result__.from_native(&(*self.as_ptr()).bounds);
                    result__
                }
            }
        "#]]
        .assert_eq(&accessor_for(1).unwrap());
    }

    #[test]
    fn string_accessor_decodes_without_consuming() {
        expect_test::expect![[r#"
            pub fn name(&self) -> String {
                unsafe {
                    native_str_to_string(&(*self.as_ptr()).name)
                }
            }
        "#]]
        .assert_eq(&accessor_for(2).unwrap());
    }

    #[test]
    fn userfree_field_gets_no_accessor() {
        // Reading a user-freed string releases its buffer; a getter callable
        // twice would double-free.
        assert!(accessor_for(3).is_none());
    }
}
