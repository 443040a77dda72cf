//! Reserved keywords of the finder grammar.

use std::fmt;

/// Every token that triggers a grammar rule instead of naming a field.
pub const RESERVED: [&str; 5] = ["all", "one", "by", "and", "ordered"];

/// A reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    All,
    One,
    By,
    And,
    Ordered,
}

impl Keyword {
    /// Look up a lowercase token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "all" => Some(Keyword::All),
            "one" => Some(Keyword::One),
            "by" => Some(Keyword::By),
            "and" => Some(Keyword::And),
            "ordered" => Some(Keyword::Ordered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::All => "all",
            Keyword::One => "one",
            Keyword::By => "by",
            Keyword::And => "and",
            Keyword::Ordered => "ordered",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// True if `token` is one of [`RESERVED`].
pub fn is_reserved(token: &str) -> bool {
    RESERVED.contains(&token)
}
