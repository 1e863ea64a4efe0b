//! The struct copy emitter.
//!
//! For every value-equivalent struct this produces the `to_native` /
//! `from_native` pair, each visiting every field in declaration order and
//! applying its strategy recursively: nested value-equivalent structs go
//! through their own generated pair, class-equivalent structs copy only the
//! pointer, strings apply their representation rule. The two functions are
//! exact inverses for every field whose strategy is lossless; user-freed
//! strings are the only exception, consumed on one direction and not
//! reproducible on the other without a fresh allocation.

use girder_resolve::{resolve_plain_field, Direction, MarshallStrategy, ResolveError};
use girder_schema::{Registry, StructDef};

use crate::code::Block;

/// The generated conversion pair for one value-equivalent struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPair {
    pub to_native: String,
    pub from_native: String,
}

/// Emits both conversion functions for a value-equivalent struct.
///
/// Every field is resolved in both directions first; all failures are
/// returned together and no fragment is produced when any were recorded.
pub fn emit_conversion_pair(
    def: &StructDef,
    registry: &Registry,
) -> Result<ConversionPair, Vec<ResolveError>> {
    let mut errors = Vec::new();
    let mut resolved = Vec::with_capacity(def.fields.len());
    for field in &def.fields {
        let to = resolve_plain_field(def, field, Direction::ToNative, registry);
        let from = resolve_plain_field(def, field, Direction::FromNative, registry);
        match (to, from) {
            (Ok(to), Ok(from)) => resolved.push((field, to, from)),
            (to, from) => {
                errors.extend(to.err());
                errors.extend(from.err());
            }
        }
    }
    if !errors.is_empty() {
        errors.dedup();
        return Err(errors);
    }

    let mut to_body = Block::new();
    let mut from_body = Block::new();
    for (field, to, from) in &resolved {
        field_to_native(field.name(), to, &mut to_body);
        field_from_native(field.name(), from, &mut from_body);
    }

    Ok(ConversionPair {
        to_native: render_fn(
            def,
            &format!("pub fn to_native(&self, native: *mut {})", def.native_name),
            &to_body,
        ),
        from_native: render_fn(
            def,
            &format!("pub fn from_native(&mut self, native: *const {})", def.native_name),
            &from_body,
        ),
    })
}

fn render_fn(def: &StructDef, signature: &str, body: &Block) -> String {
    let mut text = format!("impl {} {{\n    {signature} {{\n        unsafe {{\n", def.managed_name);
    text.push_str(&body.render(3));
    text.push_str("        }\n    }\n}\n");
    text
}

fn field_to_native(name: &str, strategy: &MarshallStrategy, body: &mut Block) {
    let target = format!("(*native).{name}");
    match strategy {
        MarshallStrategy::InlineString => {
            body.expr(format!("set_native_str(&self.{name}, &mut {target})"));
        }
        MarshallStrategy::BorrowedString => {
            // Written through the caller-owned buffer, never reallocated.
            body.expr(format!("set_native_str(&self.{name}, {target})"));
        }
        MarshallStrategy::UserFreeString => {
            body.assign(target, format!("new_userfree_str(&self.{name})"));
        }
        MarshallStrategy::ClassPtr { depth: 1, .. } => {
            body.assign(target, format!("self.{name}.as_ptr()"));
        }
        MarshallStrategy::ValueStruct { by_ref, .. } => {
            if *by_ref {
                body.expr(format!("self.{name}.to_native({target})"));
            } else {
                body.expr(format!("self.{name}.to_native(&mut {target})"));
            }
        }
        MarshallStrategy::EnumCast { native, by_ptr: false, .. } => {
            body.assign(target, format!("self.{name} as {native}"));
        }
        MarshallStrategy::Primitive { ffi, depth: 0, .. } => {
            body.assign(target, format!("self.{name} as {ffi}"));
        }
        MarshallStrategy::StringArray => {
            body.assign(target, format!("new_cstr_array(&self.{name})"));
        }
        // Raw pointer-shaped fields copy bitwise.
        _ => body.assign(target, format!("self.{name}")),
    }
}

fn field_from_native(name: &str, strategy: &MarshallStrategy, body: &mut Block) {
    let source = format!("(*native).{name}");
    let target = format!("self.{name}");
    match strategy {
        MarshallStrategy::InlineString => {
            body.assign(target, format!("native_str_to_string(&{source})"));
        }
        MarshallStrategy::BorrowedString => {
            body.assign(target, format!("native_str_to_string({source})"));
        }
        // Consumes the native buffer; the lone lossy direction.
        MarshallStrategy::UserFreeString => {
            body.assign(target, format!("userfree_str_to_string({source})"));
        }
        MarshallStrategy::ClassPtr { managed, depth: 1, .. } => {
            body.assign(target, format!("{managed}::from_ptr({source})"));
        }
        MarshallStrategy::ValueStruct { by_ref, .. } => {
            if *by_ref {
                body.expr(format!("{target}.from_native({source})"));
            } else {
                body.expr(format!("{target}.from_native(&{source})"));
            }
        }
        MarshallStrategy::EnumCast { managed, by_ptr: false, .. } => {
            body.assign(target, format!("{source} as {managed}"));
        }
        MarshallStrategy::Primitive { managed, depth: 0, .. } => {
            body.assign(target, format!("{source} as {managed}"));
        }
        // The resolver never produces a string array in this direction.
        MarshallStrategy::StringArray => unreachable!("string array in from-native direction"),
        _ => body.assign(target, source),
    }
}
