//! Naming rules shared by every emitter.
//!
//! All generated symbols derive deterministically from the owning struct's
//! native name and the field name, so repeated generation runs are idempotent
//! and collision-free.

/// Configuration for deriving managed type names and generated C symbols
/// from native type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConfig {
    /// Prefix stripped from native type names, e.g. `cef_`.
    pub type_prefix: String,
    /// Suffix stripped from native type names, e.g. `_t`.
    pub type_suffix: String,
    /// Prefix applied to every generated C-visible symbol.
    pub symbol_prefix: String,
    /// Calling-convention macro applied to native function-pointer
    /// declarations in emitted C.
    pub calling_convention: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig {
            type_prefix: "cef_".to_string(),
            type_suffix: "_t".to_string(),
            symbol_prefix: "girder_".to_string(),
            calling_convention: "CEF_CALLBACK".to_string(),
        }
    }
}

impl NamingConfig {
    /// Native name with the configured prefix and suffix stripped:
    /// `cef_browser_host_t` -> `browser_host`.
    pub fn trimmed(&self, native_name: &str) -> String {
        let without_prefix = native_name
            .strip_prefix(self.type_prefix.as_str())
            .unwrap_or(native_name);
        without_prefix
            .strip_suffix(self.type_suffix.as_str())
            .unwrap_or(without_prefix)
            .to_string()
    }

    /// Managed type name: the trimmed native name in PascalCase,
    /// `cef_browser_host_t` -> `BrowserHost`.
    pub fn managed_type_name(&self, native_name: &str) -> String {
        pascal_case(&self.trimmed(native_name))
    }

    /// Symbol of the C trampoline for one function-pointer field.
    pub fn trampoline_symbol(&self, struct_native: &str, field: &str) -> String {
        format!("{}call_{}_{}", self.symbol_prefix, self.trimmed(struct_native), field)
    }

    /// Symbol of the exported managed callback adapter for one
    /// function-pointer field. Distinct from the trampoline symbol: both are
    /// C-visible and may coexist in one binary.
    pub fn callback_symbol(&self, struct_native: &str, field: &str) -> String {
        format!("{}{}_{}", self.symbol_prefix, self.trimmed(struct_native), field)
    }

    /// Symbol of the per-struct wiring function that installs the callback
    /// adapters into a native instance's vtable slots.
    pub fn wiring_symbol(&self, struct_native: &str) -> String {
        format!("{}set_{}_proxy", self.symbol_prefix, self.trimmed(struct_native))
    }

    /// Symbol of the runtime helper that looks up the managed handler bound
    /// to a native instance. Implemented by the runtime collaborator.
    pub fn handler_lookup_symbol(&self, struct_native: &str) -> String {
        format!("{}_handler", self.trimmed(struct_native))
    }
}

/// Native type names of the string representations.
///
/// The inline name at pointer depth one is the borrowed representation; the
/// userfree name is the ownership-transferring one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringModel {
    /// Self-contained string struct, e.g. `cef_string_t`.
    pub inline: String,
    /// Ownership-transferring string pointer, e.g. `cef_string_userfree_t`.
    pub userfree: String,
}

impl Default for StringModel {
    fn default() -> Self {
        StringModel {
            inline: "cef_string_t".to_string(),
            userfree: "cef_string_userfree_t".to_string(),
        }
    }
}

fn pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
