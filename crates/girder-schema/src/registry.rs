//! The process-wide type registry.
//!
//! Population is a prerequisite barrier for codegen: a field's parameter or
//! return type may reference a struct or enum declared later in the input, or
//! recursively reference its own owning struct, so nothing downstream runs
//! until every definition is loaded. [`RegistryBuilder::finish`] enforces the
//! closed-world invariant and freezes the result; after that the [`Registry`]
//! is an immutable snapshot passed by shared reference into every resolver
//! and emitter call.

use fxhash::FxHashMap;

use crate::defs::{EnumDef, StructDef};
use crate::descriptor::{primitive_managed_type, TypeDescriptor};
use crate::error::SchemaError;
use crate::naming::{NamingConfig, StringModel};

/// Immutable lookup tables for every native type known to a generation run.
#[derive(Debug)]
pub struct Registry {
    structs_by_name: FxHashMap<String, StructDef>,
    enums_by_name: FxHashMap<String, EnumDef>,
    /// Struct names in declaration order. Generation walks this so output
    /// is byte-identical across runs given identical input.
    struct_order: Vec<String>,
    pub naming: NamingConfig,
    pub strings: StringModel,
}

impl Registry {
    pub fn struct_def(&self, native_name: &str) -> Option<&StructDef> {
        self.structs_by_name.get(native_name)
    }

    pub fn enum_def(&self, native_name: &str) -> Option<&EnumDef> {
        self.enums_by_name.get(native_name)
    }

    /// Registered structs in declaration order.
    pub fn structs(&self) -> impl Iterator<Item = &StructDef> {
        self.struct_order
            .iter()
            .map(move |name| &self.structs_by_name[name])
    }

    /// True when `base_type` names anything the resolver can marshal: a
    /// registered struct or enum, a string representation, `void`, or a
    /// primitive.
    pub fn knows(&self, base_type: &str) -> bool {
        self.structs_by_name.contains_key(base_type)
            || self.enums_by_name.contains_key(base_type)
            || base_type == self.strings.inline
            || base_type == self.strings.userfree
            || base_type == "void"
            || primitive_managed_type(base_type).is_some()
    }
}

/// Accumulates definitions during the population phase.
pub struct RegistryBuilder {
    structs_by_name: FxHashMap<String, StructDef>,
    enums_by_name: FxHashMap<String, EnumDef>,
    struct_order: Vec<String>,
    naming: NamingConfig,
    strings: StringModel,
    errors: Vec<SchemaError>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder {
            structs_by_name: FxHashMap::default(),
            enums_by_name: FxHashMap::default(),
            struct_order: Vec::new(),
            naming: NamingConfig::default(),
            strings: StringModel::default(),
            errors: Vec::new(),
        }
    }

    pub fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_strings(mut self, strings: StringModel) -> Self {
        self.strings = strings;
        self
    }

    /// Registers one struct definition. An empty `managed_name` is filled in
    /// from the naming rules. Duplicate native names are recorded as errors
    /// and surfaced by `finish`.
    pub fn add_struct(&mut self, mut def: StructDef) -> &mut Self {
        if self.structs_by_name.contains_key(&def.native_name) {
            self.errors.push(SchemaError::DuplicateDefinition {
                type_name: def.native_name.clone(),
            });
            return self;
        }
        if def.managed_name.is_empty() {
            def.managed_name = self.naming.managed_type_name(&def.native_name);
        }
        self.struct_order.push(def.native_name.clone());
        self.structs_by_name.insert(def.native_name.clone(), def);
        self
    }

    /// Registers one enum definition.
    pub fn add_enum(&mut self, mut def: EnumDef) -> &mut Self {
        if self.enums_by_name.contains_key(&def.native_name) {
            self.errors.push(SchemaError::DuplicateDefinition {
                type_name: def.native_name.clone(),
            });
            return self;
        }
        if def.managed_name.is_empty() {
            def.managed_name = self.naming.managed_type_name(&def.native_name);
        }
        self.enums_by_name.insert(def.native_name.clone(), def);
        self
    }

    /// Runs the population-phase checks and freezes the registry.
    ///
    /// Fails with the complete list of defects: duplicate definitions,
    /// layout-order violations, and every type name referenced transitively
    /// by any field that does not resolve (the closed-world invariant).
    /// Proceeding past an unknown reference would silently emit an invalid
    /// cast, so no registry is produced when any error was recorded.
    pub fn finish(mut self) -> Result<Registry, Vec<SchemaError>> {
        let registry = Registry {
            structs_by_name: std::mem::take(&mut self.structs_by_name),
            enums_by_name: std::mem::take(&mut self.enums_by_name),
            struct_order: std::mem::take(&mut self.struct_order),
            naming: self.naming,
            strings: self.strings,
        };
        let mut errors = self.errors;

        for def in registry.structs() {
            for (expected, field) in def.fields.iter().enumerate() {
                if field.declaration_position != expected {
                    errors.push(SchemaError::LayoutOrder {
                        owner: def.native_name.clone(),
                        field: field.name().to_string(),
                        expected,
                        found: field.declaration_position,
                    });
                }
                if field.var.is_function_pointer && field.var.params.is_empty() {
                    errors.push(SchemaError::MissingSelfParameter {
                        owner: def.native_name.clone(),
                        field: field.name().to_string(),
                    });
                }
                check_known(&registry, def, field.name(), &field.var, &mut errors);
            }
        }

        if errors.is_empty() {
            log::debug!(
                "registry populated: {} structs, {} enums",
                registry.struct_order.len(),
                registry.enums_by_name.len()
            );
            Ok(registry)
        } else {
            Err(errors)
        }
    }
}

/// Recursively verifies that every base type reachable from `var` resolves.
fn check_known(
    registry: &Registry,
    owner: &StructDef,
    field: &str,
    var: &TypeDescriptor,
    errors: &mut Vec<SchemaError>,
) {
    if !registry.knows(&var.base_type) {
        errors.push(SchemaError::UnknownType {
            type_name: var.base_type.clone(),
            owner: owner.native_name.clone(),
            field: field.to_string(),
            help: None,
        });
    }
    for param in &var.params {
        check_known(registry, owner, field, param, errors);
    }
}
