//! Grammar rules for finder names.
//!
//! ```text
//! call      ::= field* keyword-chain?
//! all-chain ::= "all" keyword-chain?
//! one-chain ::= "one" keyword-chain?
//! by-chain  ::= "by" field* keyword-chain?
//! and-chain ::= "and" (field | keyword-chain)?
//! ord-chain ::= "ordered" "by" (field ("asc" | "desc")? | keyword-chain)
//! ```
//!
//! Each rule consumes a prefix of the remaining tokens, writes into the
//! shared [`FindOptions`], and hands the rest to the next keyword's rule.
//! The rules are deliberately uneven: `by` keeps collecting fields until
//! the next keyword, `and` takes a single field and stops, and `ordered`
//! stops after its field and direction.

use tracing::{trace, warn};

use crate::ast::FindOptions;
use crate::error::{FinderError, FinderResult};
use crate::keywords::Keyword;

/// Run the grammar over a full token list.
///
/// Leading non-keyword tokens become selected columns. The first keyword
/// takes over the rest of the tokens.
pub fn parse_tokens(tokens: &[String], opts: &mut FindOptions) -> FinderResult<()> {
    for (i, token) in tokens.iter().enumerate() {
        match Keyword::from_token(token) {
            None => opts.select.push(token.clone()),
            Some(kw) => return dispatch(kw, &tokens[i + 1..], opts),
        }
    }
    Ok(())
}

/// Invoke the rule for `kw` with the tokens following it.
pub fn dispatch(kw: Keyword, commands: &[String], opts: &mut FindOptions) -> FinderResult<()> {
    trace!(keyword = %kw, remaining = ?commands, "finder rule");
    match kw {
        Keyword::All => find_all(commands, opts),
        Keyword::One => find_one(commands, opts),
        Keyword::By => find_by(commands, opts),
        Keyword::And => find_and(commands, opts),
        Keyword::Ordered => find_ordered(commands, opts),
    }
}

/// Continue with `commands[0]` as a keyword, or fail naming it.
fn continue_with(commands: &[String], opts: &mut FindOptions) -> FinderResult<()> {
    let Some((next, rest)) = commands.split_first() else {
        return Ok(());
    };
    match Keyword::from_token(next) {
        Some(kw) => dispatch(kw, rest, opts),
        None => Err(FinderError::unknown(next.as_str())),
    }
}

/// `all`: select every column. Anything after it must be a keyword.
fn find_all(commands: &[String], opts: &mut FindOptions) -> FinderResult<()> {
    opts.select.push("*".to_string());
    continue_with(commands, opts)
}

/// `one`: select every column, limit to a single row.
fn find_one(commands: &[String], opts: &mut FindOptions) -> FinderResult<()> {
    opts.select.push("*".to_string());
    opts.limit = Some(1);
    continue_with(commands, opts)
}

/// `by`: every field up to the next keyword becomes a predicate.
fn find_by(commands: &[String], opts: &mut FindOptions) -> FinderResult<()> {
    for (i, token) in commands.iter().enumerate() {
        match Keyword::from_token(token) {
            None => opts.filters.push(format!("{}=?", token)),
            Some(kw) => return dispatch(kw, &commands[i + 1..], opts),
        }
    }
    Ok(())
}

/// `and`: a keyword continues the chain, otherwise only the first field
/// becomes a predicate.
fn find_and(commands: &[String], opts: &mut FindOptions) -> FinderResult<()> {
    let Some((first, rest)) = commands.split_first() else {
        return Ok(());
    };
    if let Some(kw) = Keyword::from_token(first) {
        return dispatch(kw, rest, opts);
    }
    opts.filters.push(format!("{}=?", first));
    if !rest.is_empty() {
        warn!(field = %first, ignored = ?rest, "tokens after 'and' field are ignored");
    }
    Ok(())
}

/// `ordered`: requires `by`, then either a keyword or an order field with
/// an optional `asc`/`desc`.
fn find_ordered(commands: &[String], opts: &mut FindOptions) -> FinderResult<()> {
    let Some(("by", rest)) = commands.split_first().map(|(by, rest)| (by.as_str(), rest)) else {
        return Err(FinderError::MalformedOrderedClause);
    };
    let Some((field, rest)) = rest.split_first() else {
        return Err(FinderError::MalformedOrderedClause);
    };
    if let Some(kw) = Keyword::from_token(field) {
        return dispatch(kw, rest, opts);
    }

    let (entry, rest) = match rest.split_first() {
        Some((dir, rest)) if dir == "asc" || dir == "desc" => (format!("{} {}", field, dir), rest),
        _ => (field.clone(), rest),
    };
    opts.order.push(entry);
    if !rest.is_empty() {
        warn!(ignored = ?rest, "tokens after 'ordered by' clause are ignored");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn run(words: &[&str]) -> FinderResult<FindOptions> {
        let mut opts = FindOptions::new();
        parse_tokens(&toks(words), &mut opts)?;
        Ok(opts)
    }

    #[test]
    fn test_leading_fields_are_selected() {
        let opts = run(&["id", "name", "email"]).unwrap();
        assert_eq!(opts.select, toks(&["id", "name", "email"]));
        assert!(opts.filters.is_empty());
    }

    #[test]
    fn test_all_terminal() {
        let opts = run(&["all"]).unwrap();
        assert_eq!(opts.select, toks(&["*"]));
        assert_eq!(opts.limit, None);
    }

    #[test]
    fn test_all_requires_keyword_continuation() {
        match run(&["all", "xyz"]) {
            Err(FinderError::UnknownFindMethod(token)) => assert_eq!(token, "xyz"),
            other => panic!("expected UnknownFindMethod, got {other:?}"),
        }
    }

    #[test]
    fn test_one_sets_limit() {
        let opts = run(&["one", "by", "id"]).unwrap();
        assert_eq!(opts.select, toks(&["*"]));
        assert_eq!(opts.filters, toks(&["id=?"]));
        assert_eq!(opts.limit, Some(1));
    }

    #[test]
    fn test_one_terminal_and_bad_continuation() {
        assert_eq!(run(&["one"]).unwrap().limit, Some(1));
        assert!(matches!(
            run(&["one", "email"]),
            Err(FinderError::UnknownFindMethod(t)) if t == "email"
        ));
    }

    #[test]
    fn test_by_collects_until_keyword() {
        let opts = run(&["by", "name", "status", "ordered", "by", "id"]).unwrap();
        assert_eq!(opts.filters, toks(&["name=?", "status=?"]));
        assert_eq!(opts.order, toks(&["id"]));
    }

    #[test]
    fn test_and_takes_single_field() {
        let opts = run(&["by", "name", "and", "status", "email"]).unwrap();
        assert_eq!(opts.filters, toks(&["name=?", "status=?"]));
    }

    #[test]
    fn test_and_field_ends_the_chain() {
        // The ordered clause after an `and` field is never reached.
        let opts = run(&["all", "by", "name", "and", "status", "ordered", "by", "id"]).unwrap();
        assert_eq!(opts.filters, toks(&["name=?", "status=?"]));
        assert!(opts.order.is_empty());
    }

    #[test]
    fn test_and_with_keyword_continues() {
        let opts = run(&["by", "name", "and", "ordered", "by", "id", "desc"]).unwrap();
        assert_eq!(opts.filters, toks(&["name=?"]));
        assert_eq!(opts.order, toks(&["id desc"]));
    }

    #[test]
    fn test_and_empty_is_noop() {
        let opts = run(&["by", "name", "and"]).unwrap();
        assert_eq!(opts.filters, toks(&["name=?"]));
    }

    #[test]
    fn test_ordered_directions() {
        assert_eq!(run(&["all", "ordered", "by", "id", "asc"]).unwrap().order, toks(&["id asc"]));
        assert_eq!(run(&["all", "ordered", "by", "id", "desc"]).unwrap().order, toks(&["id desc"]));
        assert_eq!(run(&["all", "ordered", "by", "id"]).unwrap().order, toks(&["id"]));
    }

    #[test]
    fn test_ordered_stops_after_field() {
        let opts = run(&["all", "ordered", "by", "id", "asc", "by", "name"]).unwrap();
        assert_eq!(opts.order, toks(&["id asc"]));
        assert!(opts.filters.is_empty());
    }

    #[test]
    fn test_ordered_by_keyword_continues() {
        let opts = run(&["ordered", "by", "one"]).unwrap();
        assert!(opts.order.is_empty());
        assert_eq!(opts.limit, Some(1));
    }

    #[test]
    fn test_ordered_requires_by() {
        assert!(matches!(run(&["ordered", "id"]), Err(FinderError::MalformedOrderedClause)));
        assert!(matches!(run(&["all", "ordered"]), Err(FinderError::MalformedOrderedClause)));
        assert!(matches!(run(&["all", "ordered", "by"]), Err(FinderError::MalformedOrderedClause)));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let opts = run(&["id", "id", "by", "id", "id"]).unwrap();
        assert_eq!(opts.select, toks(&["id", "id"]));
        assert_eq!(opts.filters, toks(&["id=?", "id=?"]));
    }
}
