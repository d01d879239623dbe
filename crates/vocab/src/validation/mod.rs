//! Lookup validation against a reference vocabulary.

mod rules;
mod scan;
mod validator;
mod verdict;

pub use rules::MatchRules;
pub use validator::{EnumLookupValidator, FormatValidator};
pub use verdict::Verdict;
