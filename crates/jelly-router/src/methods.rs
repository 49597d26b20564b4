//! Per-path method table.

use http::Method;

/// Maps HTTP methods to handler ids for a single path pattern.
///
/// Unlike a fixed struct of well-known verbs, the table keeps methods in
/// registration order and accepts extension methods such as `UPDATE`. The
/// order is what a `405` response reports in its `Allow` header.
///
/// # Example
///
/// ```rust
/// use jelly_router::MethodTable;
/// use http::Method;
///
/// let mut table = MethodTable::new();
/// table.insert(Method::POST, "create_user");
/// table.insert(Method::GET, "list_users");
///
/// assert_eq!(table.handler(&Method::GET), Some("list_users"));
/// assert_eq!(table.allowed_methods(), vec![Method::POST, Method::GET]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodTable {
    entries: Vec<Binding>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    method: Method,
    handler_id: String,
    /// Position among every route of the owning table.
    seq: usize,
}

impl MethodTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `method` to `handler_id`.
    ///
    /// Returns `false` without touching the table when the method is already
    /// bound; the first registration wins.
    pub fn insert(&mut self, method: Method, handler_id: impl Into<String>) -> bool {
        let seq = self.entries.len();
        self.bind(method, handler_id.into(), seq)
    }

    /// Like [`MethodTable::insert`], recording `seq` as the registration
    /// position across a whole route table.
    pub(crate) fn bind(&mut self, method: Method, handler_id: String, seq: usize) -> bool {
        if self.contains(&method) {
            return false;
        }
        self.entries.push(Binding {
            method,
            handler_id,
            seq,
        });
        true
    }

    /// Returns the handler id bound to `method`.
    #[must_use]
    pub fn handler(&self, method: &Method) -> Option<&str> {
        self.entries
            .iter()
            .find(|b| b.method == *method)
            .map(|b| b.handler_id.as_str())
    }

    /// Returns true if `method` is bound.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.entries.iter().any(|b| b.method == *method)
    }

    /// Returns the bound methods in registration order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.entries.iter().map(|b| b.method.clone()).collect()
    }

    pub(crate) fn bindings(&self) -> impl Iterator<Item = (usize, &Method)> {
        self.entries.iter().map(|b| (b.seq, &b.method))
    }

    /// Returns true if no method is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
