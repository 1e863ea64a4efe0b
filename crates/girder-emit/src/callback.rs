//! The callback emitter.
//!
//! The reverse bridge: for each function-pointer field this produces the
//! `extern "C"` function a managed handler implementation plugs into the
//! vtable slot, so native code can call back into managed logic. Each native
//! argument is converted to a managed-typed local, the corresponding method
//! on the handler is invoked with the owning object's handle first, and the
//! return value (if any) is converted back to native form. Native struct
//! pointers handed to the handler are borrowed for the duration of the call
//! unless the type is an ownership-transferring string.

use girder_resolve::{MarshallStrategy, ResolvedField, ResolvedParam};
use girder_schema::{Field, Registry, StructDef};

use crate::code::{ffi_type, rust_ident, Block};

/// Emits the native-callable adapter for one function-pointer field.
pub fn emit_callback(
    owner: &StructDef,
    field: &Field,
    resolved: &ResolvedField,
    registry: &Registry,
) -> String {
    let symbol = registry.naming.callback_symbol(&owner.native_name, field.name());
    let self_name = rust_ident(&field.var.params[0].name);

    let mut signature = format!(
        "#[no_mangle]\npub unsafe extern \"C\" fn {symbol}({self_name}: *mut {}",
        owner.native_name
    );
    for param in &resolved.params {
        signature.push_str(&format!(
            ", {}: {}",
            rust_ident(&param.name),
            ffi_type(&param.strategy, registry)
        ));
    }
    signature.push(')');
    if let Some(ret) = &resolved.ret {
        signature.push_str(&format!(" -> {}", ffi_type(&ret.strategy, registry)));
    }

    let mut body = Block::new();
    body.decl(
        "handler__",
        format!(
            "{}({self_name})",
            registry.naming.handler_lookup_symbol(&owner.native_name)
        ),
        false,
    );

    let mut args = Vec::with_capacity(resolved.params.len());
    for param in &resolved.params {
        args.push(unmarshal_arg(param, &mut body, registry));
    }

    let mut call = format!(
        "handler__.{}({}::from_ptr({self_name})",
        rust_ident(field.name()),
        owner.managed_name
    );
    for arg in &args {
        call.push_str(", ");
        call.push_str(arg);
    }
    call.push(')');

    match &resolved.ret {
        None => body.expr(call),
        Some(ret) => marshal_return(&ret.strategy, call, &mut body, registry),
    }

    let mut text = format!("{signature} {{\n");
    text.push_str(&body.render(1));
    text.push_str("}\n");
    text
}

/// Converts one native argument to a managed-typed value. Locals land in
/// `body`; the returned expression is what the handler call passes.
fn unmarshal_arg(param: &ResolvedParam, body: &mut Block, _registry: &Registry) -> String {
    let name = rust_ident(&param.name);
    match &param.strategy {
        MarshallStrategy::InlineString => {
            body.decl(format!("{name}__"), format!("native_str_to_string(&{name})"), false);
            format!("&{name}__")
        }
        MarshallStrategy::BorrowedString => {
            body.decl(format!("{name}__"), format!("native_str_to_string({name})"), false);
            format!("&{name}__")
        }
        // Decodes the content and releases the native buffer exactly once.
        MarshallStrategy::UserFreeString => {
            body.decl(format!("{name}__"), format!("userfree_str_to_string({name})"), false);
            format!("{name}__")
        }
        MarshallStrategy::ClassPtr { managed, depth, .. } => {
            if *depth == 2 {
                body.decl(format!("{name}__"), format!("{managed}::from_ptr(*{name})"), true);
                format!("&mut {name}__")
            } else {
                format!("{managed}::from_ptr({name})")
            }
        }
        MarshallStrategy::ValueStruct { managed, by_ref, .. } => {
            body.decl(format!("{name}__"), format!("{managed}::default()"), true);
            if *by_ref {
                body.expr(format!("{name}__.from_native({name})"));
            } else {
                body.expr(format!("{name}__.from_native(&{name})"));
            }
            format!("&{name}__")
        }
        MarshallStrategy::EnumCast { managed, by_ptr, .. } => {
            if *by_ptr {
                body.decl(format!("{name}__"), format!("*{name} as {managed}"), true);
                format!("&mut {name}__")
            } else {
                format!("{name} as {managed}")
            }
        }
        MarshallStrategy::OpaquePtr { .. } => name,
        MarshallStrategy::Primitive { managed, depth, .. } => {
            if *depth == 1 {
                name
            } else {
                format!("{name} as {managed}")
            }
        }
        // Only the forward direction is defined for string arrays; the
        // resolver rejects them before this emitter runs.
        MarshallStrategy::StringArray => unreachable!("string array in from-native direction"),
    }
}

/// Converts the handler's return value back to native form.
fn marshal_return(strategy: &MarshallStrategy, call: String, body: &mut Block, registry: &Registry) {
    match strategy {
        MarshallStrategy::ValueStruct { native, .. } => {
            body.decl("call__", call, false);
            body.decl("result__", format!("{native}::default()"), true);
            body.expr("call__.to_native(&mut result__)");
            body.tail("result__");
        }
        MarshallStrategy::InlineString => {
            body.decl("call__", call, false);
            body.decl(
                "result__",
                format!("{}::default()", registry.strings.inline),
                true,
            );
            body.expr("set_native_str(&call__, &mut result__)");
            body.tail("result__");
        }
        MarshallStrategy::UserFreeString => {
            body.decl("call__", call, false);
            body.tail("new_userfree_str(&call__)");
        }
        MarshallStrategy::ClassPtr { .. } => body.tail(format!("{call}.as_ptr()")),
        MarshallStrategy::EnumCast { native, .. } => body.tail(format!("{call} as {native}")),
        MarshallStrategy::OpaquePtr { .. } => body.tail(call),
        MarshallStrategy::Primitive { ffi, depth, .. } => {
            if *depth == 1 {
                body.tail(call);
            } else {
                body.tail(format!("{call} as {ffi}"));
            }
        }
        // Rejected by the resolver: a borrowed pointer cannot outlive the
        // call, and a string array has no reverse rule.
        MarshallStrategy::BorrowedString | MarshallStrategy::StringArray => {
            unreachable!("unrepresentable callback return")
        }
    }
}
