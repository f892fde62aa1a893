use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions rendered as embedded vector graphics instead of literal text.
pub const VECTOR_EXTENSIONS: &[&str] = &["svg"];

#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ItemName(String);

crate::impl_string_newtype!(ItemName);

#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ItemImage(String);

crate::impl_string_newtype!(ItemImage);

impl ItemImage {
    pub fn display(&self) -> ItemDisplay {
        let raw = self.0.trim();
        if raw.is_empty() {
            return ItemDisplay::Blank;
        }

        let is_vector = Path::new(raw)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| VECTOR_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)));

        if is_vector {
            ItemDisplay::Image(PathBuf::from(raw))
        } else {
            ItemDisplay::Glyph(raw.to_string())
        }
    }
}

/// How an item's `image` is drawn inside its wedge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDisplay {
    Glyph(String),
    Image(PathBuf),
    Blank,
}

/// A node of the menu tree.
///
/// Field names follow the `name`/`image`/`children` convention. The
/// `key`/`value`/`items` spelling is accepted on input and maps one to one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, alias = "key")]
    pub name: ItemName,
    #[serde(default, alias = "value")]
    pub image: ItemImage,
    #[serde(default, alias = "items", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn leaf(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: ItemName::new(name),
            image: ItemImage::new(image),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn display(&self) -> ItemDisplay {
        self.image.display()
    }
}

/// Child indices from the root list down to one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deref, From, Into)]
pub struct ItemPath(Vec<usize>);

impl ItemPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        let parts: Vec<String> = self.0.iter().map(usize::to_string).collect();
        write!(f, "{}", parts.join("/"))
    }
}

pub fn resolve<'a>(items: &'a [MenuItem], path: &ItemPath) -> Option<&'a MenuItem> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(items.get(*first)?, |item, &i| item.children.get(i))
}

/// The list shown when `path` is the entered parent. The root path yields `items`.
pub fn children_at<'a>(items: &'a [MenuItem], path: &ItemPath) -> &'a [MenuItem] {
    if path.is_empty() {
        return items;
    }
    resolve(items, path)
        .map(|item| item.children.as_slice())
        .unwrap_or(&[])
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("Item at {0} has an empty name")]
    EmptyName(ItemPath),
    #[error("Item '{name}' at {path} has no image or glyph")]
    MissingDisplay { name: ItemName, path: ItemPath },
}

/// Walks the whole tree and reports every malformed entry, depth first.
pub fn validate(items: &[MenuItem]) -> Vec<ItemError> {
    let mut errors = Vec::new();
    validate_level(items, &ItemPath::root(), &mut errors);
    errors
}

fn validate_level(items: &[MenuItem], parent: &ItemPath, errors: &mut Vec<ItemError>) {
    for (i, item) in items.iter().enumerate() {
        let path = parent.child(i);
        if item.name.trim().is_empty() {
            errors.push(ItemError::EmptyName(path.clone()));
        }
        if item.display() == ItemDisplay::Blank {
            errors.push(ItemError::MissingDisplay {
                name: item.name.clone(),
                path: path.clone(),
            });
        }
        validate_level(&item.children, &path, errors);
    }
}
