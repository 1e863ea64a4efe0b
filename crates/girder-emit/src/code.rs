//! A small typed statement tree for emitted fragments.
//!
//! Emitters build [`Block`]s of [`Stmt`]s instead of concatenating strings
//! through interleaved conditionals; a single renderer turns a block into
//! text. Tests can then compare rendered fragments without every emitter
//! carrying its own formatting rules. Expressions stay plain strings; the
//! structure that matters for correctness is at the statement level.

/// One emitted statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `let [mut] name[: ty] = init;`
    Decl {
        name: String,
        ty: Option<String>,
        init: String,
        mutable: bool,
    },
    /// `target = value;` (valid in both emitted Rust and emitted C).
    Assign { target: String, value: String },
    /// `expr;`
    Expr(String),
    /// A trailing expression: rendered without a semicolon, producing the
    /// enclosing block's value.
    Tail(String),
    /// Pre-formatted line emitted as-is (already punctuated).
    Raw(String),
}

/// An ordered sequence of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    stmts: Vec<Stmt>,
}

impl Block {
    pub fn new() -> Self {
        Block::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn decl(&mut self, name: impl Into<String>, init: impl Into<String>, mutable: bool) {
        self.stmts.push(Stmt::Decl {
            name: name.into(),
            ty: None,
            init: init.into(),
            mutable,
        });
    }

    pub fn assign(&mut self, target: impl Into<String>, value: impl Into<String>) {
        self.stmts.push(Stmt::Assign { target: target.into(), value: value.into() });
    }

    pub fn expr(&mut self, expr: impl Into<String>) {
        self.stmts.push(Stmt::Expr(expr.into()));
    }

    pub fn tail(&mut self, expr: impl Into<String>) {
        self.stmts.push(Stmt::Tail(expr.into()));
    }

    pub fn raw(&mut self, line: impl Into<String>) {
        self.stmts.push(Stmt::Raw(line.into()));
    }

    /// Renders the block, one statement per line, at the given indentation
    /// level (four spaces per level).
    pub fn render(&self, indent: usize) -> String {
        let pad = "    ".repeat(indent);
        let mut out = String::new();
        for stmt in &self.stmts {
            out.push_str(&pad);
            match stmt {
                Stmt::Decl { name, ty, init, mutable } => {
                    out.push_str("let ");
                    if *mutable {
                        out.push_str("mut ");
                    }
                    out.push_str(name);
                    if let Some(ty) = ty {
                        out.push_str(": ");
                        out.push_str(ty);
                    }
                    out.push_str(" = ");
                    out.push_str(init);
                    out.push(';');
                }
                Stmt::Assign { target, value } => {
                    out.push_str(target);
                    out.push_str(" = ");
                    out.push_str(value);
                    out.push(';');
                }
                Stmt::Expr(expr) => {
                    out.push_str(expr);
                    out.push(';');
                }
                Stmt::Tail(expr) => out.push_str(expr),
                Stmt::Raw(line) => out.push_str(line),
            }
            out.push('\n');
        }
        out
    }
}

/// Rust spelling of a value's native type, as used in `extern "C"` adapter
/// signatures and raw accessors.
pub(crate) fn ffi_type(
    strategy: &girder_resolve::MarshallStrategy,
    registry: &girder_schema::Registry,
) -> String {
    use girder_resolve::MarshallStrategy as S;
    match strategy {
        S::InlineString => registry.strings.inline.clone(),
        S::BorrowedString => format!("*mut {}", registry.strings.inline),
        S::UserFreeString => registry.strings.userfree.clone(),
        S::ClassPtr { native, depth, .. } => pointer_to(native, *depth),
        S::ValueStruct { native, by_ref, .. } => pointer_to(native, usize::from(*by_ref)),
        S::EnumCast { native, by_ptr, .. } => pointer_to(native, usize::from(*by_ptr)),
        S::OpaquePtr { depth } => pointer_to("c_void", *depth),
        S::StringArray => "*mut *mut c_char".to_string(),
        S::Primitive { ffi, depth, .. } => pointer_to(ffi, *depth),
    }
}

fn pointer_to(base: &str, depth: usize) -> String {
    let mut text = base.to_string();
    for _ in 0..depth {
        text = format!("*mut {text}");
    }
    text
}

/// Rust keywords that need escaping when a native identifier collides with
/// them. `self` cannot be a raw identifier, so it gets a trailing underscore.
const RESERVED: &[&str] = &[
    "as", "box", "break", "const", "continue", "else", "enum", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct",
    "trait", "type", "unsafe", "use", "where", "while", "async", "await", "dyn",
];

/// Spells a native identifier as a legal Rust identifier.
pub fn rust_ident(name: &str) -> String {
    if name == "self" || name == "Self" || name == "super" || name == "crate" {
        format!("{name}_")
    } else if RESERVED.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}
