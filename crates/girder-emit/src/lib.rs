//! Code emission for the vtable-binding generator.
//!
//! Four emitters consume the resolver's strategy tags and produce
//! independent, composable text fragments: the managed proxy method, the C
//! trampoline, the native-callable adapter for the reverse direction, and
//! the conversion pair for value-equivalent structs. The [`Generator`]
//! driver walks the registry in declaration order and collects every
//! fragment, accumulating diagnostics across the whole run; when any were
//! recorded it returns them all and no fragments, so a partially-correct
//! binding is never emitted.

pub mod callback;
pub mod code;
pub mod convert;
pub mod forward;
pub mod tests;
pub mod trampoline;
pub mod wiring;

use girder_resolve::{resolve_field, resolve_plain_field, Direction, ResolveError};
use girder_schema::{Registry, StructDef, StructKind};

pub use callback::emit_callback;
pub use convert::{emit_conversion_pair, ConversionPair};
pub use forward::{emit_accessor, emit_proxy};
pub use trampoline::emit_trampoline;
pub use wiring::emit_wiring;

/// The three fragments generated for one function-pointer field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBindings {
    /// The field the fragments belong to.
    pub field: String,
    /// Managed proxy method calling through the native function pointer.
    pub proxy: String,
    /// C trampoline providing the native call site for the pointer value.
    pub trampoline: String,
    /// `extern "C"` adapter dispatching into a managed handler.
    pub callback: String,
}

/// Everything generated for one registered struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructBindings {
    pub native_name: String,
    pub managed_name: String,
    /// One entry per function-pointer field, in declaration order.
    pub slots: Vec<FieldBindings>,
    /// Getters for plain fields of class-equivalent structs.
    pub accessors: Vec<String>,
    /// Vtable wiring function; present when the struct has any slots.
    pub wiring: Option<String>,
    /// Conversion pair; present for value-equivalent structs.
    pub conversion: Option<ConversionPair>,
}

/// All fragments produced by one generation run, in declaration order.
/// Plain text meant to be concatenated into larger source files by the
/// file-assembly collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub structs: Vec<StructBindings>,
}

/// The top-level driver: a single-threaded batch pass over the immutable
/// registry. Output order is declaration order, byte-identical across runs
/// given identical input.
pub struct Generator<'reg> {
    registry: &'reg Registry,
    errors: Vec<ResolveError>,
}

impl<'reg> Generator<'reg> {
    pub fn new(registry: &'reg Registry) -> Self {
        Generator { registry, errors: Vec::new() }
    }

    /// Generates fragments for every registered struct.
    ///
    /// Diagnostics accumulate across the whole run; if any were recorded,
    /// all of them are returned and no module is produced.
    pub fn generate(mut self) -> Result<GeneratedModule, Vec<ResolveError>> {
        let registry = self.registry;
        let mut structs = Vec::new();
        for def in registry.structs() {
            structs.push(self.generate_struct(def));
        }
        if self.errors.is_empty() {
            Ok(GeneratedModule { structs })
        } else {
            log::debug!("generation failed with {} diagnostics", self.errors.len());
            Err(self.errors)
        }
    }

    fn generate_struct(&mut self, def: &StructDef) -> StructBindings {
        log::debug!("generating bindings for {}", def.native_name);
        let mut slots = Vec::new();
        let mut accessors = Vec::new();
        let mut conversion = None;
        let mut wiring = None;

        match def.kind {
            StructKind::ClassEquivalent => {
                for field in &def.fields {
                    if field.var.is_function_pointer {
                        log::trace!("slot {}.{}", def.native_name, field.name());
                        let proxy = resolve_field(def, field, Direction::ToNative, self.registry);
                        let callback = resolve_field(def, field, Direction::FromNative, self.registry);
                        match (proxy, callback) {
                            (Ok(proxy), Ok(callback)) => slots.push(FieldBindings {
                                field: field.name().to_string(),
                                proxy: emit_proxy(def, field, &proxy, self.registry),
                                trampoline: emit_trampoline(def, field, self.registry),
                                callback: emit_callback(def, field, &callback, self.registry),
                            }),
                            // No partial output for a field that failed on
                            // either side.
                            (proxy, callback) => {
                                if let Err(errors) = proxy {
                                    self.push_errors(errors);
                                }
                                if let Err(errors) = callback {
                                    self.push_errors(errors);
                                }
                            }
                        }
                    } else {
                        match resolve_plain_field(def, field, Direction::FromNative, self.registry) {
                            Ok(strategy) => {
                                accessors.extend(emit_accessor(def, field, &strategy, self.registry));
                            }
                            Err(error) => self.push_errors(vec![error]),
                        }
                    }
                }
                wiring = emit_wiring(def, self.registry);
            }
            StructKind::ValueEquivalent => match emit_conversion_pair(def, self.registry) {
                Ok(pair) => conversion = Some(pair),
                Err(errors) => self.push_errors(errors),
            },
        }

        StructBindings {
            native_name: def.native_name.clone(),
            managed_name: def.managed_name.clone(),
            slots,
            accessors,
            wiring,
            conversion,
        }
    }

    /// The proxy and callback sides resolve the same parameters in opposite
    /// directions; a shape with no rule in either fails identically on both,
    /// so exact duplicates are reported once.
    fn push_errors(&mut self, errors: Vec<ResolveError>) {
        for error in errors {
            if !self.errors.contains(&error) {
                self.errors.push(error);
            }
        }
    }
}
