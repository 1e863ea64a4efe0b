//! The trampoline emitter.
//!
//! The managed runtime cannot invoke an arbitrary native function-pointer
//! value obtained at runtime without a native call site of matching
//! signature. The trampoline is that call site: one minimal C function per
//! function-pointer field that receives the full native argument list (self
//! first) plus the function-pointer value itself as its final parameter, and
//! does nothing but invoke the pointer with the given arguments and return
//! its result unchanged.

use girder_schema::{Field, Registry, StructDef};

/// Emits the C trampoline for one function-pointer field.
///
/// The symbol derives deterministically from the owning struct's name and
/// the field's name, so repeated generation runs are idempotent and
/// collision-free.
pub fn emit_trampoline(owner: &StructDef, field: &Field, registry: &Registry) -> String {
    let var = &field.var;
    let ret = var.c_native_type.as_str();
    let symbol = registry.naming.trampoline_symbol(&owner.native_name, field.name());
    let convention = registry.naming.calling_convention.as_str();

    let mut decl_params = String::new();
    let mut type_list = String::new();
    let mut arg_names = String::new();
    for (i, param) in var.params.iter().enumerate() {
        if i != 0 {
            decl_params.push_str(", ");
            type_list.push_str(", ");
            arg_names.push_str(", ");
        }
        decl_params.push_str(&format!("{} {}", param.c_native_type, param.name));
        type_list.push_str(&param.c_native_type);
        arg_names.push_str(&param.name);
    }

    format!(
        "{ret} {symbol}({decl_params}, {ret} ({convention} *callback__)({type_list})) {{ return callback__({arg_names}); }}\n"
    )
}
