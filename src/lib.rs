//! # finder — virtual find methods
//!
//! Compiles camel-case method names such as `findOneById` or
//! `findIdNameEmailByNameOrderedByIdAsc` into query descriptors, and
//! runs them through a pluggable delegate.
//!
//! ## Quick Example
//!
//! ```rust
//! use finder::prelude::*;
//!
//! let query = finder::compile("findIdNameByNameAndStatus", vec!["mike".into(), "active".into()])?;
//! assert_eq!(query.select, "id,name");
//! assert_eq!(query.filter, "name=? AND status=?");
//!
//! let sql = query.on("users").to_sql()?;
//! assert_eq!(sql, "SELECT id, name FROM users WHERE name = ? AND status = ?");
//! # Ok::<(), FinderError>(())
//! ```
//!
//! ## Keywords
//!
//! | Word      | Effect                                         |
//! |-----------|------------------------------------------------|
//! | `All`     | Select every column                            |
//! | `One`     | Select every column, limit 1                   |
//! | `By`      | Following fields become `field=?` predicates   |
//! | `And`     | The next field becomes a predicate             |
//! | `Ordered` | `OrderedBy<Field>[Asc\|Desc]`                  |
//!
//! Words before the first keyword are selected columns.

pub mod ast;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod finder;
pub mod grammar;
pub mod keywords;
pub mod store;
pub mod tokens;
pub mod transpiler;

pub use ast::{FindOptions, Found, QueryDescriptor, Record, Value};
pub use compiler::compile;
pub use error::{FinderError, FinderResult};
pub use finder::Finder;
pub use store::{MemoryStore, QueryDelegate};

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::compiler::compile;
    pub use crate::config::{FinderConfig, OutputFormat};
    pub use crate::engine::FinderDB;
    pub use crate::error::*;
    pub use crate::finder::Finder;
    pub use crate::keywords::{Keyword, RESERVED};
    pub use crate::store::{MemoryStore, QueryDelegate};
    pub use crate::tokens::tokenize;
    pub use crate::transpiler::{Placeholder, ToSql};
}
