//! Normalized representation of one C declarator.
//!
//! A [`TypeDescriptor`] is produced for every struct field and every function
//! parameter the parser collaborator hands over. Normalization separates the
//! pointer depth from the base type name, strips `const` qualifiers and
//! `struct` tags, and keeps the full native type text around for C-side
//! emission, where the original spelling matters.

/// Normalized description of one field's or parameter's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Variable, field, or parameter name as declared in the native header.
    pub name: String,
    /// Base type name with qualifiers and tags stripped, e.g. `cef_view_t`.
    pub base_type: String,
    /// Number of pointer levels on top of the base type.
    pub pointer_depth: usize,
    /// Full native type text (minus `const`), e.g. `struct _cef_view_t *`.
    /// Used verbatim when emitting C.
    pub c_native_type: String,
    /// True for vtable slots: the field holds a callable function pointer.
    pub is_function_pointer: bool,
    /// Parameter list when `is_function_pointer`. `params[0]` is always the
    /// owning object ("self") and is excluded from managed-facing lists.
    pub params: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Builds a descriptor for a plain (non-function-pointer) declarator.
    ///
    /// `type_text` is the declarator as it appears in the header, e.g.
    /// `"const cef_string_t *"` or `"struct _cef_view_t*"`.
    pub fn parse(name: &str, type_text: &str) -> Self {
        let (base_type, pointer_depth, c_native_type) = normalize(type_text);
        TypeDescriptor {
            name: name.to_string(),
            base_type,
            pointer_depth,
            c_native_type,
            is_function_pointer: false,
            params: Vec::new(),
        }
    }

    /// Builds a descriptor for a function-pointer field.
    ///
    /// `return_text` is the declarator of the slot's return type (`"void"`
    /// for none); `params` lists every parameter as `(name, type_text)`
    /// pairs, self first.
    pub fn function(name: &str, return_text: &str, params: &[(&str, &str)]) -> Self {
        let (base_type, pointer_depth, c_native_type) = normalize(return_text);
        TypeDescriptor {
            name: name.to_string(),
            base_type,
            pointer_depth,
            c_native_type,
            is_function_pointer: true,
            params: params
                .iter()
                .map(|(n, t)| TypeDescriptor::parse(n, t))
                .collect(),
        }
    }

    /// `"*"`-repetition spelling of the pointer depth, as it appears in C.
    pub fn ptrs(&self) -> String {
        "*".repeat(self.pointer_depth)
    }

    /// True when the declarator is `void` with no indirection, i.e. the
    /// absence of a return value.
    pub fn is_void(&self) -> bool {
        self.base_type == "void" && self.pointer_depth == 0
    }
}

/// Splits a declarator into `(base_type, pointer_depth, c_native_type)`.
///
/// `const` is dropped entirely; generated callbacks cannot carry it in their
/// signatures, and it never affects marshalling. A `struct _name` tag is
/// reduced to `name` for the base type but kept in the native text.
fn normalize(type_text: &str) -> (String, usize, String) {
    let mut text = type_text.trim().to_string();
    while let Some(pos) = text.find("const ") {
        text.replace_range(pos..pos + 6, "");
    }
    let pointer_depth = text.chars().filter(|&c| c == '*').count();
    let mut base = text.replace('*', " ");
    base = base.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(stripped) = base.strip_prefix("struct ") {
        base = stripped.to_string();
    }
    if let Some(stripped) = base.strip_prefix('_') {
        base = stripped.to_string();
    }

    // Canonical native spelling: single spaces, pointers gathered at the end.
    let mut native: String = text
        .replace('*', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if pointer_depth > 0 {
        native.push(' ');
        native.push_str(&"*".repeat(pointer_depth));
    }
    (base, pointer_depth, native)
}

/// Maps a C primitive base type to its managed (Rust-side) spelling.
///
/// Returns `None` for anything that is not a plain numeric or boolean type;
/// the resolver then consults the registry for structs, enums, and the
/// string representations before giving up.
pub fn primitive_managed_type(base_type: &str) -> Option<&'static str> {
    Some(match base_type {
        "int" | "int32" | "int32_t" => "i32",
        "unsigned" | "uint32" | "uint32_t" => "u32",
        "int64" | "int64_t" | "long long" => "i64",
        "uint64" | "uint64_t" | "time_t" => "u64",
        "int16" | "int16_t" | "short" => "i16",
        "uint16" | "uint16_t" => "u16",
        "char" | "uint8" | "uint8_t" => "u8",
        "int8" | "int8_t" => "i8",
        "size_t" => "usize",
        "float" => "f32",
        "double" => "f64",
        "bool" => "bool",
        _ => return None,
    })
}

/// Maps a C primitive base type to the FFI spelling used in emitted Rust
/// casts (`c_int`, `usize`, ...). Must cover everything
/// [`primitive_managed_type`] covers.
pub fn primitive_ffi_type(base_type: &str) -> Option<&'static str> {
    Some(match base_type {
        "int" | "int32" | "int32_t" => "c_int",
        "unsigned" | "uint32" | "uint32_t" => "c_uint",
        "int64" | "int64_t" | "long long" => "c_longlong",
        "uint64" | "uint64_t" | "time_t" => "u64",
        "int16" | "int16_t" | "short" => "c_short",
        "uint16" | "uint16_t" => "c_ushort",
        "char" | "uint8" | "uint8_t" => "c_uchar",
        "int8" | "int8_t" => "c_char",
        "size_t" => "usize",
        "float" => "f32",
        "double" => "f64",
        "bool" => "bool",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_const_and_struct_tags() {
        let var = TypeDescriptor::parse("view", "const struct _cef_view_t *");
        assert_eq!(var.base_type, "cef_view_t");
        assert_eq!(var.pointer_depth, 1);
        assert_eq!(var.c_native_type, "struct _cef_view_t *");
        assert!(!var.is_function_pointer);
    }

    #[test]
    fn normalizes_packed_pointer_spelling() {
        let var = TypeDescriptor::parse("argv", "char**");
        assert_eq!(var.base_type, "char");
        assert_eq!(var.pointer_depth, 2);
        assert_eq!(var.c_native_type, "char **");
        assert_eq!(var.ptrs(), "**");
    }

    #[test]
    fn plain_value_type_has_no_pointers() {
        let var = TypeDescriptor::parse("count", "int");
        assert_eq!(var.base_type, "int");
        assert_eq!(var.pointer_depth, 0);
        assert_eq!(var.c_native_type, "int");
    }

    #[test]
    fn function_descriptor_keeps_self_first() {
        let var = TypeDescriptor::function(
            "set_parent",
            "void",
            &[("self", "struct _cef_panel_t *"), ("parent", "struct _cef_view_t *")],
        );
        assert!(var.is_function_pointer);
        assert!(var.is_void());
        assert_eq!(var.params.len(), 2);
        assert_eq!(var.params[0].name, "self");
        assert_eq!(var.params[1].base_type, "cef_view_t");
    }

    #[test]
    fn primitive_table_round_trips_ffi_spellings() {
        for base in ["int", "size_t", "uint32", "double", "char"] {
            assert!(primitive_managed_type(base).is_some(), "{base}");
            assert!(primitive_ffi_type(base).is_some(), "{base}");
        }
        assert_eq!(primitive_managed_type("cef_view_t"), None);
    }
}
