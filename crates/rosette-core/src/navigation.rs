use crate::item::{self, ItemPath, MenuItem};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Root,
    Nested(usize),
}

/// Glyph shown by the center control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CenterGlyph {
    #[strum(serialize = "←")]
    Back,
    #[strum(serialize = "×")]
    Close,
}

/// Breadcrumb trail of entered parents, stored as child indices from the root list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<usize>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.stack.clear();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn state(&self) -> NavState {
        match self.depth() {
            0 => NavState::Root,
            depth => NavState::Nested(depth),
        }
    }

    pub fn glyph(&self) -> CenterGlyph {
        match self.state() {
            NavState::Root => CenterGlyph::Close,
            NavState::Nested(_) => CenterGlyph::Back,
        }
    }

    /// Path of the entered parent; the root path when nothing is entered.
    pub fn path(&self) -> ItemPath {
        ItemPath::from(self.stack.clone())
    }

    pub fn item_path(&self, index: usize) -> ItemPath {
        self.path().child(index)
    }

    pub fn current_items<'a>(&self, root: &'a [MenuItem]) -> &'a [MenuItem] {
        item::children_at(root, &self.path())
    }

    /// Entered parents from the outermost to the innermost.
    pub fn breadcrumbs<'a>(&self, root: &'a [MenuItem]) -> Vec<&'a MenuItem> {
        (1..=self.stack.len())
            .filter_map(|n| item::resolve(root, &ItemPath::from(self.stack[..n].to_vec())))
            .collect()
    }

    /// Pushes the item at `index` of the current ring. Leaves and missing
    /// indices are refused.
    pub fn enter(&mut self, root: &[MenuItem], index: usize) -> bool {
        let enterable = self
            .current_items(root)
            .get(index)
            .is_some_and(MenuItem::has_children);
        if enterable {
            self.stack.push(index);
        }
        enterable
    }

    pub fn back(&mut self) -> bool {
        self.stack.pop().is_some()
    }
}
