use crate::geometry::Point;
use crate::selector::Element;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum ListenerKind {
    ContextMenu,
    Click,
    Hover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Where pointer events come from. A menu registers what it listens to on
/// `init` and removes every registration on `destroy`.
pub trait EventSource {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Secondary click. `target` is the ancestor chain under the pointer,
    /// innermost first.
    ContextMenu {
        position: Point,
        target: Vec<Element>,
    },
    Click {
        position: Point,
    },
    Move {
        position: Point,
    },
    /// The pointer left the surface.
    Leave,
}

impl PointerEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            PointerEvent::ContextMenu { .. } => ListenerKind::ContextMenu,
            PointerEvent::Click { .. } => ListenerKind::Click,
            PointerEvent::Move { .. } | PointerEvent::Leave => ListenerKind::Hover,
        }
    }
}

#[derive(Debug, Default)]
struct Registrations {
    next_id: u64,
    active: HashMap<ListenerId, ListenerKind>,
}

/// Shared listener table. Clones see the same registrations, so a host can
/// keep one handle and give another to each menu.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Registrations>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.inner.borrow().active.values().any(|k| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSource for ListenerRegistry {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.active.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.inner.borrow_mut().active.remove(&id);
    }
}
