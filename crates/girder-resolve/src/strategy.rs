//! The closed set of marshalling strategies.
//!
//! A [`MarshallStrategy`] is computed once per type descriptor by the
//! resolver; emitters match exhaustively on the variant and never on raw
//! type-name strings, so the strategy tags are the single source of
//! branching truth for all four emitters.

/// Which way a value crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Managed value converted into native representation.
    ToNative,
    /// Native value converted into managed representation.
    FromNative,
}

impl Direction {
    /// The opposite direction. A call's return value always crosses opposite
    /// to its arguments.
    pub fn reversed(self) -> Direction {
        match self {
            Direction::ToNative => Direction::FromNative,
            Direction::FromNative => Direction::ToNative,
        }
    }
}

/// How one value crosses the native/managed boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarshallStrategy {
    /// Self-contained native string buffer; conversion copies content in
    /// both directions.
    InlineString,
    /// Pointer to a caller-owned string buffer; written through, never
    /// freed by the receiver.
    BorrowedString,
    /// Ownership-transferring string pointer; the receiver releases the
    /// native buffer exactly once after copying its content out.
    UserFreeString,
    /// Class-equivalent struct pointer: direct pointer reinterpretation, no
    /// allocation, no field copy. `depth` is 1 for a plain handle, 2 for a
    /// pointer-to-handle out-parameter.
    ClassPtr {
        native: String,
        managed: String,
        depth: usize,
    },
    /// Value-equivalent struct: recursive field-by-field conversion through
    /// the generated `to_native`/`from_native` pair. `by_ref` is true when
    /// the native side passes a pointer rather than the struct itself.
    ValueStruct {
        native: String,
        managed: String,
        by_ref: bool,
    },
    /// Numeric cast to/from the enum's underlying width; no allocation.
    EnumCast {
        native: String,
        managed: String,
        by_ptr: bool,
    },
    /// Untyped pointer passed through unchanged, no interpretation.
    OpaquePtr { depth: usize },
    /// `char **`: a native array of pointers populated by the inline-owned
    /// string rule. Forward direction only; the reverse fails resolution.
    StringArray,
    /// Direct numeric/boolean cast. `depth` 1 is a raw-pointer cast at the
    /// same depth.
    Primitive {
        managed: &'static str,
        ffi: &'static str,
        depth: usize,
    },
}

impl MarshallStrategy {
    /// Managed-side type text when the value appears as a parameter.
    pub fn managed_param_type(&self) -> String {
        match self {
            MarshallStrategy::InlineString | MarshallStrategy::BorrowedString => "&str".into(),
            MarshallStrategy::UserFreeString => "String".into(),
            MarshallStrategy::ClassPtr { managed, depth, .. } => {
                if *depth == 2 {
                    format!("&mut {managed}")
                } else {
                    format!("&{managed}")
                }
            }
            MarshallStrategy::ValueStruct { managed, .. } => format!("&{managed}"),
            MarshallStrategy::EnumCast { managed, by_ptr, .. } => {
                if *by_ptr {
                    format!("&mut {managed}")
                } else {
                    managed.clone()
                }
            }
            MarshallStrategy::OpaquePtr { depth } => opaque_type(*depth),
            MarshallStrategy::StringArray => "&[String]".into(),
            MarshallStrategy::Primitive { managed, depth, .. } => {
                if *depth == 1 {
                    format!("*mut {managed}")
                } else {
                    (*managed).into()
                }
            }
        }
    }

    /// Managed-side type text when the value is a return value.
    pub fn managed_return_type(&self) -> String {
        match self {
            MarshallStrategy::InlineString
            | MarshallStrategy::BorrowedString
            | MarshallStrategy::UserFreeString => "String".into(),
            MarshallStrategy::ClassPtr { managed, .. }
            | MarshallStrategy::ValueStruct { managed, .. }
            | MarshallStrategy::EnumCast { managed, .. } => managed.clone(),
            MarshallStrategy::OpaquePtr { depth } => opaque_type(*depth),
            MarshallStrategy::StringArray => "Vec<String>".into(),
            MarshallStrategy::Primitive { managed, depth, .. } => {
                if *depth == 1 {
                    format!("*mut {managed}")
                } else {
                    (*managed).into()
                }
            }
        }
    }
}

fn opaque_type(depth: usize) -> String {
    let mut text = String::from("c_void");
    for _ in 0..depth {
        text = format!("*mut {text}");
    }
    text
}
