//! Finder name compiler: tokenize, run the grammar, assemble.

use tracing::debug;

use crate::ast::{FindOptions, QueryDescriptor, Value};
use crate::error::FinderResult;
use crate::grammar;
use crate::tokens::tokenize;

/// Compile a finder name and its positional arguments into a descriptor.
///
/// Argument count is not checked against the generated placeholders;
/// that is left to the delegate executing the descriptor.
///
/// ```
/// use finder::{compile, Value};
///
/// let query = compile("findOneById", vec![Value::Int(2)]).unwrap();
/// assert_eq!(query.select, "*");
/// assert_eq!(query.filter, "id=?");
/// assert_eq!(query.limit, 1);
/// ```
pub fn compile(name: &str, args: Vec<Value>) -> FinderResult<QueryDescriptor> {
    let tokens = tokenize(name)?;
    let mut opts = FindOptions::new();
    grammar::parse_tokens(&tokens, &mut opts)?;

    let query = opts.assemble(args);
    debug!(
        method = name,
        ?tokens,
        select = %query.select,
        filter = %query.filter,
        order = %query.order,
        limit = query.limit,
        "compiled finder"
    );
    Ok(query)
}
