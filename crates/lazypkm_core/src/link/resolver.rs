//! Three-tier token resolver: ordinal, unique id prefix, not found.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Token resolution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No ordinal or id prefix matched.
    NotFound(String),
    /// More than one id starts with the token.
    Ambiguous { token: String, matches: usize },
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(token) => write!(f, "no record matches `{token}`"),
            Self::Ambiguous { token, matches } => {
                write!(f, "`{token}` is ambiguous: {matches} ids share this prefix")
            }
        }
    }
}

impl Error for ResolveError {}

/// Resolves `token` against `items` in displayed order.
///
/// 1. A positive integer within `[1, items.len()]` selects that position.
/// 2. Otherwise the single item whose id text starts with the token wins.
/// 3. Anything else fails.
///
/// Surrounding whitespace is ignored; a blank token never resolves.
pub fn resolve_token<T, I, F>(token: &str, items: &[T], id_of: F) -> Result<I, ResolveError>
where
    I: Display,
    F: Fn(&T) -> I,
{
    let token = token.trim();
    if token.is_empty() {
        return Err(ResolveError::NotFound(String::new()));
    }

    if let Ok(ordinal) = token.parse::<usize>() {
        if (1..=items.len()).contains(&ordinal) {
            return Ok(id_of(&items[ordinal - 1]));
        }
    }

    let mut matched = items
        .iter()
        .map(&id_of)
        .filter(|id| id.to_string().starts_with(token));
    match (matched.next(), matched.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(ResolveError::NotFound(token.to_string())),
        (Some(_), Some(_)) => Err(ResolveError::Ambiguous {
            token: token.to_string(),
            matches: 2 + matched.count(),
        }),
    }
}
