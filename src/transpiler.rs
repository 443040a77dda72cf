//! SQL rendering for query descriptors.
//!
//! Converts a [`QueryDescriptor`] bound to a table into a `SELECT` string.
//! Column names are pasted into the SQL text, so every selected, filtered
//! and ordered field must be a plain `[a-z0-9_]+` identifier.

use crate::ast::{QueryDescriptor, SortOrder};
use crate::error::{FinderError, FinderResult};

/// Trait for converting queries to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> FinderResult<String>;
}

/// True for a non-empty run of lowercase ASCII letters, digits and `_`.
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn check_identifier(clause: &str, field: &str) -> FinderResult<()> {
    if is_identifier(field) {
        return Ok(());
    }
    Err(FinderError::Execution(format!(
        "invalid {} field '{}'",
        clause, field
    )))
}

/// Placeholder style for bound values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `?` (MySQL, SQLite).
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL).
    Dollar,
}

impl Placeholder {
    /// Pick the placeholder style for a connection URL.
    pub fn for_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Placeholder::Dollar
        } else {
            Placeholder::Question
        }
    }
}

/// A descriptor paired with the table it reads from.
#[derive(Debug, Clone, Copy)]
pub struct TableQuery<'a> {
    pub table: &'a str,
    pub query: &'a QueryDescriptor,
    pub placeholder: Placeholder,
}

impl QueryDescriptor {
    /// Bind this descriptor to `table` for SQL rendering.
    pub fn on<'a>(&'a self, table: &'a str) -> TableQuery<'a> {
        TableQuery {
            table,
            query: self,
            placeholder: Placeholder::default(),
        }
    }
}

impl<'a> TableQuery<'a> {
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Reject any selected, filtered or ordered field that is not an identifier.
    pub fn check_identifiers(&self) -> FinderResult<()> {
        for column in self.query.columns() {
            check_identifier("select", column)?;
        }
        for field in self.query.filter_fields() {
            check_identifier("where", field)?;
        }
        for (field, _) in self.query.order_fields() {
            check_identifier("order", field)?;
        }
        Ok(())
    }

    fn where_sql(&self) -> String {
        match self.placeholder {
            Placeholder::Question => self.query.filter.clone(),
            Placeholder::Dollar => {
                let mut out = String::with_capacity(self.query.filter.len() + 8);
                let mut n = 0;
                for c in self.query.filter.chars() {
                    if c == '?' {
                        n += 1;
                        out.push_str(&format!("${}", n));
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

impl ToSql for TableQuery<'_> {
    fn to_sql(&self) -> FinderResult<String> {
        self.check_identifiers()?;

        let mut sql = String::from("SELECT ");

        // Columns
        if self.query.select.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.query.select.replace(',', ", "));
        }

        // FROM
        sql.push_str(" FROM ");
        sql.push_str(self.table);

        if !self.query.filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_sql().replace("=", " = "));
        }

        if !self.query.order.is_empty() {
            sql.push_str(" ORDER BY ");
            let entries: Vec<String> = self
                .query
                .order_fields()
                .iter()
                .map(|(field, dir)| match dir {
                    Some(SortOrder::Asc) => format!("{} ASC", field),
                    Some(SortOrder::Desc) => format!("{} DESC", field),
                    None => field.to_string(),
                })
                .collect();
            sql.push_str(&entries.join(", "));
        }

        if self.query.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.query.limit));
        }

        if self.query.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.query.offset));
        }

        Ok(sql)
    }
}
