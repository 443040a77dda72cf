//! Finder name tokenizer using nom.
//!
//! ```text
//! findIdNameByNameOrderedByIdAsc
//! ─┬── ─┬───┬───┬─────┬───────────
//!  │    │   │   │     └── more words
//!  │    │   │   └── field
//!  │    │   └── keyword
//!  │    └── words, split at each uppercase letter
//!  └── prefix
//! ```

use nom::{
    bytes::complete::{tag, take_while, take_while1},
    character::complete::satisfy,
    combinator::{all_consuming, peek, recognize},
    multi::many1,
    sequence::pair,
    IResult,
};

use crate::error::{FinderError, FinderResult};

/// Split a finder name into lowercase word tokens.
///
/// The name must match `^find[A-Z][a-z]+.*`, otherwise
/// [`FinderError::NotAFinderMethod`] is returned.
///
/// ```
/// use finder::tokens::tokenize;
///
/// let tokens = tokenize("findOneById").unwrap();
/// assert_eq!(tokens, vec!["one", "by", "id"]);
/// ```
pub fn tokenize(name: &str) -> FinderResult<Vec<String>> {
    let rest = match parse_entry(name) {
        Ok((rest, _)) => rest,
        Err(_) => return Err(FinderError::NotAFinderMethod(name.to_string())),
    };

    // The entry check guarantees `rest` opens with an uppercase letter,
    // so every character lands in some word.
    match all_consuming(many1(parse_word))(rest) {
        Ok((_, words)) => Ok(words.into_iter().map(|w| w.to_ascii_lowercase()).collect()),
        Err(_) => Err(FinderError::NotAFinderMethod(name.to_string())),
    }
}

/// True if `name` would be routed to the finder compiler.
pub fn is_finder_name(name: &str) -> bool {
    parse_entry(name).is_ok()
}

/// Consume the `find` prefix and check that an uppercase letter followed by
/// at least one lowercase letter comes next.
fn parse_entry(input: &str) -> IResult<&str, &str> {
    let (input, prefix) = tag("find")(input)?;
    let (input, _) = peek(pair(
        satisfy(|c| c.is_ascii_uppercase()),
        take_while1(|c: char| c.is_ascii_lowercase()),
    ))(input)?;
    Ok((input, prefix))
}

/// Parse one word: an uppercase letter and everything up to the next one.
fn parse_word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_uppercase()),
        take_while(|c: char| !c.is_ascii_uppercase()),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(name: &str) -> Vec<String> {
        tokenize(name).unwrap()
    }

    #[test]
    fn test_simple_tokens() {
        assert_eq!(words("findAll"), vec!["all"]);
        assert_eq!(words("findOneById"), vec!["one", "by", "id"]);
    }

    #[test]
    fn test_complex_tokens() {
        assert_eq!(
            words("findIdNameEmailByNameOrderedByIdAsc"),
            vec!["id", "name", "email", "by", "name", "ordered", "by", "id", "asc"]
        );
    }

    #[test]
    fn test_digits_and_underscores_stay_in_word() {
        assert_eq!(words("findByUser_idAndZip5"), vec!["by", "user_id", "and", "zip5"]);
    }

    #[test]
    fn test_consecutive_capitals_split() {
        // The entry pattern only looks at the first word.
        assert_eq!(words("findByURL"), vec!["by", "u", "r", "l"]);
    }

    #[test]
    fn test_rejects_non_finder_names() {
        for name in ["save", "find", "findall", "findA", "findABy", "FindAll", "find_all", "getAll"] {
            match tokenize(name) {
                Err(FinderError::NotAFinderMethod(n)) => assert_eq!(n, name),
                other => panic!("{name}: expected NotAFinderMethod, got {other:?}"),
            }
            assert!(!is_finder_name(name));
        }
    }

    #[test]
    fn test_tokens_reassemble_name() {
        for name in ["findAll", "findIdNameByNameAndStatus", "findAllOrderedByCreated_atDesc"] {
            let rebuilt: String = words(name)
                .iter()
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                        None => String::new(),
                    }
                })
                .collect();
            assert_eq!(format!("find{rebuilt}"), name);
        }
    }
}
