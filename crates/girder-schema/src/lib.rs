//! Data model for the vtable-binding generator.
//!
//! This crate holds the normalized description of a native C API built on
//! reference-counted structs with function-pointer fields: type descriptors,
//! struct/field/enum definitions, the naming rules, and the write-once
//! [`Registry`] every downstream pass reads from. All entities are created
//! during a single population pass and are immutable for the remainder of
//! generation.

pub mod defs;
pub mod descriptor;
pub mod error;
pub mod naming;
pub mod registry;

pub use defs::{EnumDef, Field, IntWidth, StructDef, StructKind};
pub use descriptor::{primitive_ffi_type, primitive_managed_type, TypeDescriptor};
pub use error::SchemaError;
pub use naming::{NamingConfig, StringModel};
pub use registry::{Registry, RegistryBuilder};
