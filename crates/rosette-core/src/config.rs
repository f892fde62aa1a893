use crate::item::{self, ItemError, MenuItem};
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_RADIUS: f64 = 150.0;

/// Options of one radial menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Root ring.
    #[serde(default, alias = "itemsSource")]
    pub items: Vec<MenuItem>,
    /// Restricts which right-click targets open the menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Selector>,
    /// Popup half-size in pixels.
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Reject malformed items instead of rendering them blank.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

fn default_strict() -> bool {
    cfg!(debug_assertions)
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selector: None,
            radius: default_radius(),
            strict: default_strict(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Radius must be a positive number, got {0}")]
    InvalidRadius(f64),
    #[error(transparent)]
    Item(#[from] ItemError),
}

impl MenuConfig {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Checks the radius and every item. In lenient mode malformed items are
    /// only logged; they render blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.radius));
        }

        let mut errors = item::validate(&self.items).into_iter();
        if self.strict {
            return errors.next().map_or(Ok(()), |e| Err(e.into()));
        }
        for e in errors {
            log::warn!("{}", e);
        }
        Ok(())
    }
}
