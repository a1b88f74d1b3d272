use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest root listed on US exchanges (`GOOGL`).
const MAX_ROOT_LEN: usize = 5;
const MAX_CLASS_LEN: usize = 2;
const CLASS_SEPARATOR: char = '.';

/// Exchange ticker as listed in the constituent table, e.g. `MMM` or `BRK.B`.
///
/// A ticker is a root of up to five letters or digits starting with a letter,
/// optionally followed by a one- or two-letter share class. The class may be
/// written with `.` or `-`; it is always stored with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let (root, class) = match normalized.find(|ch: char| ch == '.' || ch == '-') {
            Some(at) => (&normalized[..at], Some(&normalized[at + 1..])),
            None => (normalized.as_str(), None),
        };

        let first = root.chars().next().ok_or(match normalized.chars().next() {
            Some(ch) => ValidationError::SymbolInvalidStart { ch },
            None => ValidationError::EmptySymbol,
        })?;
        if !first.is_ascii_alphabetic() {
            return Err(ValidationError::SymbolInvalidStart { ch: first });
        }
        if let Some((index, ch)) = root
            .chars()
            .enumerate()
            .find(|(_, ch)| !ch.is_ascii_alphanumeric())
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }
        if root.len() > MAX_ROOT_LEN {
            return Err(ValidationError::SymbolTooLong {
                len: root.len(),
                max: MAX_ROOT_LEN,
            });
        }

        match class {
            None => Ok(Self(root.to_owned())),
            Some(class)
                if (1..=MAX_CLASS_LEN).contains(&class.len())
                    && class.chars().all(|ch| ch.is_ascii_alphabetic()) =>
            {
                Ok(Self(format!("{root}{CLASS_SEPARATOR}{class}")))
            }
            Some(class) => Err(ValidationError::SymbolInvalidShareClass {
                class: class.to_owned(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ticker without its share class.
    pub fn root(&self) -> &str {
        self.0
            .split_once(CLASS_SEPARATOR)
            .map_or(self.as_str(), |(root, _)| root)
    }

    pub fn share_class(&self) -> Option<&str> {
        self.0.split_once(CLASS_SEPARATOR).map(|(_, class)| class)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
