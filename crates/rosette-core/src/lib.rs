//! Radial context menu core: wedge geometry, navigation stack and a
//! toolkit-independent controller that maintains a retained scene.
//!
//! Hosts supply an [`EventSource`] and a [`Scheduler`], forward pointer events
//! to [`RadialMenu::handle`], run scheduled [`Task`]s, and draw the [`Scene`].

pub mod config;
pub mod events;
pub mod geometry;
pub mod item;
pub mod macros;
pub mod menu;
pub mod navigation;
pub mod scene;
pub mod schedule;
pub mod selector;

pub use config::{ConfigError, MenuConfig};
pub use events::{EventSource, ListenerId, ListenerKind, ListenerRegistry, PointerEvent};
pub use geometry::{Point, PopupFrame};
pub use item::{ItemDisplay, ItemPath, MenuItem};
pub use menu::{Hooks, RadialMenu};
pub use navigation::{CenterGlyph, NavState};
pub use scene::{Direction, NodeId, Pose, Scene};
pub use schedule::{ManualScheduler, Scheduler, Task};
pub use selector::{Element, Selector};
