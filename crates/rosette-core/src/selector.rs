//! Scoping of right-click targets.
//!
//! Supports compound selectors (`tag`, `*`, `#id`, `.class`, combined as in
//! `label.header#title`) separated by commas. Combinators are not supported.

use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One element of a pointer target's ancestor chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Selector is empty")]
    Empty,
    #[error("Expected a name after '{0}'")]
    MissingName(char),
    #[error("Unexpected character '{0}' in selector")]
    UnexpectedChar(char),
    #[error("Selector part '{0}' has more than one id")]
    DuplicateId(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        self.tag
            .as_ref()
            .is_none_or(|t| t.eq_ignore_ascii_case(&element.tag))
            && self
                .id
                .as_ref()
                .is_none_or(|id| element.id.as_ref() == Some(id))
            && self
                .classes
                .iter()
                .all(|c| element.classes.iter().any(|ec| ec == c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }

    /// First element of `chain` (innermost first) matched by this selector.
    pub fn closest<'a>(&self, chain: &'a [Element]) -> Option<&'a Element> {
        chain.iter().find(|e| self.matches(e))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alternatives = s
            .split(',')
            .map(parse_compound)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: s.trim().to_string(),
            alternatives,
        })
    }
}

fn take_ident(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len());
    s.split_at(end)
}

fn parse_compound(part: &str) -> Result<Compound, SelectorError> {
    let part = part.trim();
    if part.is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut compound = Compound::default();
    let mut rest = match part.strip_prefix('*') {
        Some(r) => r,
        None => {
            let (tag, r) = take_ident(part);
            if !tag.is_empty() {
                compound.tag = Some(tag.to_string());
            }
            r
        }
    };

    while let Some(marker) = rest.chars().next() {
        if marker != '#' && marker != '.' {
            return Err(SelectorError::UnexpectedChar(marker));
        }
        let (name, r) = take_ident(&rest[1..]);
        if name.is_empty() {
            return Err(SelectorError::MissingName(marker));
        }
        if marker == '#' {
            if compound.id.is_some() {
                return Err(SelectorError::DuplicateId(part.to_string()));
            }
            compound.id = Some(name.to_string());
        } else {
            compound.classes.push(name.to_string());
        }
        rest = r;
    }

    Ok(compound)
}
