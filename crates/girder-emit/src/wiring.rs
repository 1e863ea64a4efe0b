//! The vtable wiring emitter.
//!
//! For each struct with at least one function-pointer field this produces
//! the C function that installs the generated callback adapters into a
//! native instance's vtable slots, one assignment per slot in declaration
//! order.

use girder_schema::{Registry, StructDef};

use crate::code::Block;

/// Emits the wiring function for one struct. Returns `None` when the struct
/// has no function-pointer fields.
pub fn emit_wiring(def: &StructDef, registry: &Registry) -> Option<String> {
    if def.slots().next().is_none() {
        return None;
    }

    let mut body = Block::new();
    // Exported callbacks cannot keep qualifiers such as 'const' on their
    // parameter signatures, hence the (void *) casts.
    body.raw("/* (void *) casts: exported callbacks drop 'const' from their signatures. */");
    for slot in def.slots() {
        body.assign(
            format!("self->{}", slot.name()),
            format!(
                "(void *)&{}",
                registry.naming.callback_symbol(&def.native_name, slot.name())
            ),
        );
    }

    let mut text = format!(
        "void {}({} *self) {{\n",
        registry.naming.wiring_symbol(&def.native_name),
        def.native_name
    );
    text.push_str(&body.render(1));
    text.push_str("}\n");
    Some(text)
}
