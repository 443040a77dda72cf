//! Finder-capable types.
//!
//! A [`Finder`] resolves a call by name in two steps. Explicitly
//! registered methods win. Any other name is handed to the compiler, and
//! names the compiler rejects as non-finders go to the fallback resolver.
//!
//! ```
//! use finder::{Finder, Found, MemoryStore};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.insert_json("users", json!({"id": 2, "name": "mike"})).unwrap();
//!
//! let users = Finder::new("users", store);
//! let found = users.call("findOneById", vec![2.into()]).unwrap();
//! assert!(matches!(found, Found::One(_)));
//! ```

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::ast::{Found, QueryDescriptor, Value};
use crate::compiler::compile;
use crate::error::{FinderError, FinderResult};
use crate::store::QueryDelegate;

/// An explicitly defined method.
pub type Method<D> = Box<dyn Fn(&D, &[Value]) -> FinderResult<Found> + Send + Sync>;

/// Handler for names that are neither registered nor finder names.
pub type Fallback = Box<dyn Fn(&str, &[Value]) -> FinderResult<Found> + Send + Sync>;

/// A table exposed through virtual `find...` methods.
pub struct Finder<D> {
    table: String,
    delegate: D,
    methods: HashMap<String, Method<D>>,
    fallback: Option<Fallback>,
}

impl<D: QueryDelegate> Finder<D> {
    pub fn new(table: impl Into<String>, delegate: D) -> Self {
        Self {
            table: table.into(),
            delegate,
            methods: HashMap::new(),
            fallback: None,
        }
    }

    /// Register an explicit method. It shadows any finder of the same name.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&D, &[Value]) -> FinderResult<Found> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Box::new(f));
        self
    }

    /// Set the resolver for names that are not finder methods.
    pub fn fallback<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &[Value]) -> FinderResult<Found> + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(f));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Resolve and invoke `name` with positional `args`.
    pub fn call(&self, name: &str, args: Vec<Value>) -> FinderResult<Found> {
        if let Some(method) = self.methods.get(name) {
            return method(&self.delegate, &args);
        }

        match self.compile(name, args.clone()) {
            Ok(query) => self.find(&query),
            Err(FinderError::NotAFinderMethod(_)) => match &self.fallback {
                Some(fallback) => {
                    debug!(table = %self.table, method = name, "delegating to fallback");
                    fallback(name, &args)
                }
                None => Err(FinderError::NoSuchMethod(name.to_string())),
            },
            Err(e) => Err(e),
        }
    }

    /// Compile `name` without executing it.
    pub fn compile(&self, name: &str, args: Vec<Value>) -> FinderResult<QueryDescriptor> {
        compile(name, args)
    }

    /// Run a descriptor through the delegate.
    pub fn find(&self, query: &QueryDescriptor) -> FinderResult<Found> {
        self.delegate.find(&self.table, query)
    }
}

impl<D> fmt::Debug for Finder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&String> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("Finder")
            .field("table", &self.table)
            .field("methods", &methods)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
