use crate::config::{ConfigError, MenuConfig};
use crate::events::{EventSource, ListenerId, ListenerKind, PointerEvent};
use crate::geometry::{self, Point, PopupFrame, Zone};
use crate::item::{self, ItemPath, MenuItem};
use crate::navigation::{NavState, Navigator};
use crate::scene::{Direction, NodeId, Pose, Scene};
use crate::schedule::{CLOSE_DELAY, RING_SWAP_DELAY, Scheduler, Task};
use crate::selector::Element;
use std::collections::HashMap;
use std::fmt;
use strum::IntoEnumIterator;

pub type ItemHook = Box<dyn FnMut(&MenuItem)>;
pub type MenuHook = Box<dyn FnMut(&RadialMenu)>;

/// Optional callbacks. A missing hook is a no-op.
#[derive(Default)]
pub struct Hooks {
    on_select: Option<ItemHook>,
    on_hover: Option<ItemHook>,
    on_open: Option<MenuHook>,
    on_close: Option<MenuHook>,
    on_init: Option<MenuHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_select(mut self, f: impl FnMut(&MenuItem) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn on_hover(mut self, f: impl FnMut(&MenuItem) + 'static) -> Self {
        self.on_hover = Some(Box::new(f));
        self
    }

    pub fn on_open(mut self, f: impl FnMut(&RadialMenu) + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl FnMut(&RadialMenu) + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn on_init(mut self, f: impl FnMut(&RadialMenu) + 'static) -> Self {
        self.on_init = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_select", &self.on_select.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_init", &self.on_init.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Ready,
    Destroyed,
}

/// A radial context menu: navigation state, scene and pointer handling.
pub struct RadialMenu {
    config: MenuConfig,
    hooks: Hooks,
    events: Box<dyn EventSource>,
    scheduler: Box<dyn Scheduler>,
    nav: Navigator,
    scene: Scene,
    segment_items: HashMap<NodeId, ItemPath>,
    listeners: Vec<(ListenerKind, ListenerId)>,
    is_open: bool,
    lifecycle: Lifecycle,
}

impl fmt::Debug for RadialMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadialMenu")
            .field("is_open", &self.is_open)
            .field("depth", &self.nav.depth())
            .field("lifecycle", &self.lifecycle)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl RadialMenu {
    pub fn new(
        config: MenuConfig,
        hooks: Hooks,
        events: impl EventSource + 'static,
        scheduler: impl Scheduler + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            hooks,
            events: Box::new(events),
            scheduler: Box::new(scheduler),
            nav: Navigator::new(),
            scene: Scene::new(),
            segment_items: HashMap::new(),
            listeners: Vec::new(),
            is_open: false,
            lifecycle: Lifecycle::Created,
        })
    }

    /// Creates the popup shell and registers listeners. Runs once.
    pub fn init(&mut self) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }

        self.scene.create_popup(self.config.radius);
        for kind in ListenerKind::iter() {
            let id = self.events.add_listener(kind);
            self.listeners.push((kind, id));
        }
        self.lifecycle = Lifecycle::Ready;
        log::debug!("Radial menu initialized with {} root items", self.config.items.len());

        self.fire_menu_hook(|h| &mut h.on_init);
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    pub fn depth(&self) -> usize {
        self.nav.depth()
    }

    pub fn nav_state(&self) -> NavState {
        self.nav.state()
    }

    pub fn current_items(&self) -> &[MenuItem] {
        self.nav.current_items(&self.config.items)
    }

    pub fn breadcrumbs(&self) -> Vec<&MenuItem> {
        self.nav.breadcrumbs(&self.config.items)
    }

    /// Item behind a segment node of any attached ring.
    pub fn item_for(&self, node: NodeId) -> Option<&MenuItem> {
        self.segment_items
            .get(&node)
            .and_then(|path| item::resolve(&self.config.items, path))
    }

    fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    fn is_listening(&self, kind: ListenerKind) -> bool {
        self.is_ready() && self.listeners.iter().any(|(k, _)| *k == kind)
    }

    pub fn open(&mut self, position: Point) {
        if !self.is_ready() {
            return;
        }

        self.nav.reset();
        self.render(Direction::In);

        let radius = self.config.radius;
        let glyph = self.nav.glyph();
        if let Some(popup) = self.scene.popup_mut() {
            popup.frame = PopupFrame::centered_at(position, radius);
            popup.glyph = glyph;
            popup.visible = true;
            popup.active = true;
        }
        self.is_open = true;
        log::debug!("Opened at ({}, {})", position.x, position.y);

        self.fire_menu_hook(|h| &mut h.on_open);
    }

    /// Deactivates at once; the popup is hidden when the close delay expires.
    pub fn close(&mut self) {
        if !self.is_ready() {
            return;
        }

        self.set_hover(None);
        if let Some(popup) = self.scene.popup_mut() {
            popup.active = false;
        }
        self.is_open = false;
        self.scheduler.set_timeout(CLOSE_DELAY, Task::FinishClose);
        log::debug!("Closing");
    }

    pub fn back(&mut self) {
        if !self.is_ready() || !self.nav.back() {
            return;
        }
        log::debug!("Back to depth {}", self.nav.depth());
        self.render(Direction::Out);
    }

    /// Selects the item at `index` of the current ring.
    pub fn select(&mut self, index: usize) {
        let path = self.nav.item_path(index);
        self.select_path(&path);
    }

    /// Drills into a parent or reports a leaf and closes. Paths outside the
    /// current ring are ignored.
    pub fn select_path(&mut self, path: &ItemPath) {
        if !self.is_ready() {
            return;
        }
        let Some((&index, parent)) = path.split_last() else {
            return;
        };
        if parent != self.nav.path().as_slice() {
            return;
        }
        let Some(item) = item::resolve(&self.config.items, path) else {
            return;
        };

        if item.has_children() {
            log::debug!("Entering '{}'", item.name);
            self.nav.enter(&self.config.items, index);
            self.render(Direction::In);
        } else {
            log::info!("Selected '{}'", item.name);
            self.fire_item_hook(|h| &mut h.on_select, path);
            self.close();
        }
    }

    /// Removes listeners and every node. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }

        for (_, id) in self.listeners.drain(..) {
            self.events.remove_listener(id);
        }
        self.scene.clear();
        self.segment_items.clear();
        self.nav.reset();
        self.is_open = false;
        self.lifecycle = Lifecycle::Destroyed;
        log::debug!("Radial menu destroyed");
    }

    /// Replaces the options in place, keeping listeners. Navigation restarts at
    /// the root.
    pub fn reconfigure(&mut self, config: MenuConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.nav.reset();

        let radius = self.config.radius;
        if let Some(popup) = self.scene.popup_mut() {
            let center = popup.frame.center();
            popup.frame = PopupFrame::centered_at(center, radius);
        }
        if self.is_open {
            self.render(Direction::Out);
        }
        Ok(())
    }

    /// Routes a pointer event. Returns whether the menu consumed it.
    pub fn handle(&mut self, event: &PointerEvent) -> bool {
        if !self.is_listening(event.kind()) {
            return false;
        }

        match event {
            PointerEvent::ContextMenu { position, target } => {
                self.on_context_menu(*position, target)
            }
            PointerEvent::Click { position } => self.on_click(*position),
            PointerEvent::Move { position } => self.on_move(*position),
            PointerEvent::Leave => {
                self.set_hover(None);
                false
            }
        }
    }

    /// Runs a task previously handed to the scheduler.
    pub fn run(&mut self, task: Task) {
        if !self.is_ready() {
            return;
        }

        match task {
            Task::PromoteRing { ring, previous } => self.promote_ring(ring, previous),
            Task::RemoveRing(ring) => self.remove_ring(ring),
            Task::FinishClose => self.finish_close(),
        }
    }

    fn on_context_menu(&mut self, position: Point, target: &[Element]) -> bool {
        if let Some(selector) = &self.config.selector
            && selector.closest(target).is_none()
        {
            return false;
        }

        if self.is_open {
            self.close();
        } else {
            self.open(position);
        }
        true
    }

    fn on_click(&mut self, position: Point) -> bool {
        if !self.is_open {
            return false;
        }

        match self.zone_at(position) {
            Zone::Outside => {
                self.close();
                false
            }
            Zone::Shell => true,
            Zone::Center => {
                match self.nav.state() {
                    NavState::Root => self.close(),
                    NavState::Nested(_) => self.back(),
                }
                true
            }
            Zone::Wedge(index) => {
                if let Some(path) = self
                    .segment_at(index)
                    .and_then(|id| self.segment_items.get(&id))
                    .cloned()
                {
                    self.select_path(&path);
                }
                true
            }
        }
    }

    fn on_move(&mut self, position: Point) -> bool {
        if !self.is_open {
            return false;
        }

        let hovered = match self.zone_at(position) {
            Zone::Wedge(index) => self.segment_at(index),
            _ => None,
        };
        self.set_hover(hovered);
        hovered.is_some()
    }

    fn zone_at(&self, position: Point) -> Zone {
        let Some(popup) = self.scene.popup() else {
            return Zone::Outside;
        };
        let count = self
            .scene
            .current_ring()
            .map_or(0, |ring| ring.segments.len());
        geometry::classify(popup.frame.to_percent(position), count)
    }

    fn segment_at(&self, index: usize) -> Option<NodeId> {
        self.scene
            .current_ring()
            .and_then(|ring| ring.segments.get(index))
            .map(|segment| segment.id)
    }

    fn set_hover(&mut self, node: Option<NodeId>) {
        if self.scene.hovered() == node {
            return;
        }
        self.scene.set_hovered(node);

        let path = node.and_then(|id| self.segment_items.get(&id).cloned());
        let name = path
            .as_ref()
            .and_then(|p| item::resolve(&self.config.items, p))
            .map(|item| item.name.to_string());

        if let Some(popup) = self.scene.popup_mut() {
            match &name {
                Some(text) => {
                    popup.title.text.clone_from(text);
                    popup.title.visible = true;
                    popup.glyph_visible = false;
                }
                None => {
                    popup.title.visible = false;
                    popup.glyph_visible = true;
                }
            }
        }

        if let Some(path) = path {
            self.fire_item_hook(|h| &mut h.on_hover, &path);
        }
    }

    /// Builds the ring for the current items next to the old one. The swap
    /// itself happens on the next frame.
    fn render(&mut self, direction: Direction) {
        let previous = self.scene.current_ring().map(|ring| ring.id);
        let parent = self.nav.path();
        let items = self.nav.current_items(&self.config.items);
        if items.is_empty() {
            log::debug!("Ring at {} is empty, showing the shell only", parent);
        }

        let ring = self.scene.build_ring(items, direction);
        for segment in &ring.segments {
            self.segment_items
                .insert(segment.id, parent.child(segment.index));
        }
        let ring_id = ring.id;
        self.scene.attach_ring(ring);
        self.set_hover(None);

        let glyph = self.nav.glyph();
        if let Some(popup) = self.scene.popup_mut() {
            popup.glyph = glyph;
        }

        self.scheduler.request_frame(Task::PromoteRing {
            ring: ring_id,
            previous,
        });
    }

    fn promote_ring(&mut self, ring: NodeId, previous: Option<NodeId>) {
        let Some(direction) = self.scene.ring(ring).map(|r| r.direction) else {
            return;
        };

        if let Some(old_id) = previous
            && let Some(old) = self.scene.ring_mut(old_id)
        {
            old.pose = direction.exiting_pose();
            self.scheduler
                .set_timeout(RING_SWAP_DELAY, Task::RemoveRing(old_id));
        }

        if let Some(new) = self.scene.ring_mut(ring) {
            new.pose = Pose::Active;
        }
    }

    fn remove_ring(&mut self, ring: NodeId) {
        if let Some(removed) = self.scene.remove_ring(ring) {
            for segment in &removed.segments {
                self.segment_items.remove(&segment.id);
            }
        }
    }

    fn finish_close(&mut self) {
        let Some(popup) = self.scene.popup_mut() else {
            return;
        };
        // reopened while the exit animation was running
        if popup.active || !popup.visible {
            return;
        }
        popup.visible = false;
        log::debug!("Closed");

        self.fire_menu_hook(|h| &mut h.on_close);
    }

    fn fire_menu_hook(&mut self, pick: fn(&mut Hooks) -> &mut Option<MenuHook>) {
        if let Some(mut hook) = pick(&mut self.hooks).take() {
            hook(&*self);
            let slot = pick(&mut self.hooks);
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }

    fn fire_item_hook(&mut self, pick: fn(&mut Hooks) -> &mut Option<ItemHook>, path: &ItemPath) {
        if let Some(hook) = pick(&mut self.hooks)
            && let Some(item) = item::resolve(&self.config.items, path)
        {
            hook(item);
        }
    }
}

impl Drop for RadialMenu {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ListenerRegistry;
    use crate::navigation::CenterGlyph;
    use crate::schedule::ManualScheduler;
    use crate::selector::Selector;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn demo_items() -> Vec<MenuItem> {
        vec![
            MenuItem::leaf("home", "🏠").with_children(vec![
                MenuItem::leaf("A", "a"),
                MenuItem::leaf("B", "b"),
            ]),
            MenuItem::leaf("edit", "✏️").with_children(vec![
                MenuItem::leaf("copy", "📋"),
                MenuItem::leaf("paste", "📥"),
                MenuItem::leaf("cut", "✂️"),
            ]),
            MenuItem::leaf("delete", "🗑️"),
            MenuItem::leaf("share", "🔗"),
            MenuItem::leaf("settings", "⚙️"),
            MenuItem::leaf("profile", "👤"),
        ]
    }

    #[derive(Default)]
    struct Calls {
        selected: Vec<String>,
        hovered: Vec<String>,
        opened: usize,
        closed: usize,
        inits: usize,
    }

    struct Harness {
        menu: RadialMenu,
        scheduler: ManualScheduler,
        registry: ListenerRegistry,
        calls: Rc<RefCell<Calls>>,
    }

    impl Harness {
        fn new(config: MenuConfig) -> Self {
            let calls = Rc::new(RefCell::new(Calls::default()));
            let (c1, c2, c3, c4, c5) = (
                calls.clone(),
                calls.clone(),
                calls.clone(),
                calls.clone(),
                calls.clone(),
            );
            let hooks = Hooks::new()
                .on_select(move |item| c1.borrow_mut().selected.push(item.name.to_string()))
                .on_hover(move |item| c2.borrow_mut().hovered.push(item.name.to_string()))
                .on_open(move |_| c3.borrow_mut().opened += 1)
                .on_close(move |_| c4.borrow_mut().closed += 1)
                .on_init(move |_| c5.borrow_mut().inits += 1);

            let scheduler = ManualScheduler::new();
            let registry = ListenerRegistry::new();
            let mut menu =
                RadialMenu::new(config, hooks, registry.clone(), scheduler.clone()).unwrap();
            menu.init();

            Self {
                menu,
                scheduler,
                registry,
                calls,
            }
        }

        fn demo() -> Self {
            Self::new(MenuConfig::new(demo_items()))
        }

        fn frames(&mut self) {
            loop {
                let tasks = self.scheduler.take_frames();
                if tasks.is_empty() {
                    break;
                }
                for task in tasks {
                    self.menu.run(task);
                }
            }
        }

        fn wait(&mut self, ms: u64) {
            for task in self.scheduler.advance(Duration::from_millis(ms)) {
                self.menu.run(task);
            }
        }

        fn right_click(&mut self, x: f64, y: f64) -> bool {
            self.menu.handle(&PointerEvent::ContextMenu {
                position: Point::new(x, y),
                target: vec![Element::new("window")],
            })
        }

        fn click(&mut self, x: f64, y: f64) -> bool {
            self.menu.handle(&PointerEvent::Click {
                position: Point::new(x, y),
            })
        }

        /// Viewport point in the middle of wedge `index` of the current ring.
        fn wedge_point(&self, index: usize) -> Point {
            let popup = self.menu.scene().popup().unwrap();
            let ring = self.menu.scene().current_ring().unwrap();
            popup.frame.to_px(ring.segments[index].layout.label)
        }

        fn click_wedge(&mut self, index: usize) -> bool {
            let p = self.wedge_point(index);
            self.click(p.x, p.y)
        }

        fn click_center(&mut self) -> bool {
            let c = self.menu.scene().popup().unwrap().frame.center();
            self.click(c.x, c.y)
        }

        fn names(&self) -> Vec<String> {
            self.menu
                .current_items()
                .iter()
                .map(|i| i.name.to_string())
                .collect()
        }

        /// Names drawn by the newest ring in the scene.
        fn ring_names(&self) -> Vec<String> {
            self.menu
                .scene()
                .current_ring()
                .unwrap()
                .segments
                .iter()
                .map(|s| s.name.to_string())
                .collect()
        }
    }

    #[test]
    fn test_init_registers_listeners_and_fires_hook() {
        let mut h = Harness::demo();
        assert_eq!(h.registry.len(), 3);
        assert_eq!(h.calls.borrow().inits, 1);

        h.menu.init();
        assert_eq!(h.registry.len(), 3);
        assert_eq!(h.calls.borrow().inits, 1);

        let popup = h.menu.scene().popup().unwrap();
        assert!(!popup.visible);
        assert_eq!(popup.frame.size(), 300.0);
    }

    #[test]
    fn test_open_scenario() {
        let mut h = Harness::demo();
        assert!(h.right_click(100.0, 100.0));

        assert!(h.menu.is_open());
        assert_eq!(h.calls.borrow().opened, 1);
        let popup = h.menu.scene().popup().unwrap();
        assert_eq!(popup.frame.origin, Point::new(-50.0, -50.0));
        assert!(popup.visible && popup.active);
        assert_eq!(popup.glyph, CenterGlyph::Close);

        let ring = h.menu.scene().current_ring().unwrap();
        assert_eq!(ring.segments.len(), 6);
        for (i, segment) in ring.segments.iter().enumerate() {
            assert!((segment.layout.span.width() - 60.0).abs() < 1e-9);
            assert!((segment.layout.span.start - (i as f64 * 60.0 - 90.0)).abs() < 1e-9);
        }
        assert!((ring.segments[0].layout.span.end + 30.0).abs() < 1e-9);
        assert!(ring.segments[0].has_children);
        assert!(!ring.segments[2].has_children);
    }

    #[test]
    fn test_drill_down_and_back() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.frames();
        let root = h.names();
        assert_eq!(h.ring_names(), root);

        assert!(h.click_wedge(0));
        h.frames();
        assert_eq!(h.ring_names(), h.names());
        assert_eq!(h.menu.depth(), 1);
        assert_eq!(h.menu.breadcrumbs()[0].name.as_str(), "home");
        assert_eq!(h.names(), ["A", "B"]);
        assert_eq!(h.menu.scene().popup().unwrap().glyph, CenterGlyph::Back);
        assert!(h.calls.borrow().selected.is_empty());
        assert!(h.menu.is_open());

        assert!(h.click_center());
        h.frames();
        assert_eq!(h.menu.nav_state(), NavState::Root);
        assert_eq!(h.names(), root);
        assert_eq!(h.ring_names(), root);
        assert_eq!(h.menu.scene().popup().unwrap().glyph, CenterGlyph::Close);
        assert!(h.menu.is_open());
    }

    #[test]
    fn test_leaf_selection_fires_once_and_closes() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.frames();

        assert!(h.click_wedge(2));
        assert_eq!(h.calls.borrow().selected, ["delete"]);
        assert!(!h.menu.is_open());
        assert!(!h.menu.scene().popup().unwrap().active);
        // still visible during the exit animation
        assert!(h.menu.scene().popup().unwrap().visible);
        assert_eq!(h.calls.borrow().closed, 0);

        h.wait(300);
        assert!(!h.menu.scene().popup().unwrap().visible);
        assert_eq!(h.calls.borrow().closed, 1);
        assert_eq!(h.calls.borrow().selected.len(), 1);
    }

    #[test]
    fn test_nested_leaf_selection() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.frames();
        h.click_wedge(1);
        h.frames();
        h.click_wedge(2);
        assert_eq!(h.calls.borrow().selected, ["cut"]);
        assert!(!h.menu.is_open());
    }

    #[test]
    fn test_open_resets_depth() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.frames();
        h.click_wedge(0);
        assert_eq!(h.menu.depth(), 1);

        h.right_click(10.0, 10.0);
        assert!(!h.menu.is_open());
        h.right_click(500.0, 500.0);
        assert!(h.menu.is_open());
        assert_eq!(h.menu.depth(), 0);
        assert_eq!(h.names().len(), 6);
    }

    #[test]
    fn test_outside_click_closes_and_inner_gaps_are_inert() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.frames();

        // between the center control and the wedges
        assert!(h.click(400.0, 300.0 - 0.25 * 300.0));
        assert!(h.menu.is_open());

        assert!(!h.click(0.0, 0.0));
        assert!(!h.menu.is_open());
        h.wait(300);
        assert_eq!(h.calls.borrow().closed, 1);

        // clicks while closed do nothing
        assert!(!h.click(0.0, 0.0));
        h.wait(300);
        assert_eq!(h.calls.borrow().closed, 1);
    }

    #[test]
    fn test_reopen_during_close_keeps_menu_visible() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.right_click(400.0, 300.0);
        assert!(!h.menu.is_open());

        h.wait(100);
        h.right_click(200.0, 200.0);
        h.wait(250);

        let popup = h.menu.scene().popup().unwrap();
        assert!(popup.visible && popup.active);
        assert!(h.menu.is_open());
        assert_eq!(h.calls.borrow().closed, 0);
    }

    #[test]
    fn test_ring_swap_protocol() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.frames();
        h.wait(400);
        assert_eq!(h.menu.scene().rings().len(), 1);
        assert_eq!(h.menu.scene().rings()[0].pose, Pose::Active);

        h.click_wedge(1);
        let rings = h.menu.scene().rings();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].pose, Pose::Active);
        assert_eq!(rings[1].pose, Pose::Outside);
        let old_segment = rings[0].segments[0].id;
        assert!(h.menu.item_for(old_segment).is_some());

        h.frames();
        let rings = h.menu.scene().rings();
        assert_eq!(rings[0].pose, Pose::Inside);
        assert_eq!(rings[1].pose, Pose::Active);

        h.wait(399);
        assert_eq!(h.menu.scene().rings().len(), 2);
        h.wait(1);
        assert_eq!(h.menu.scene().rings().len(), 1);
        assert!(h.menu.item_for(old_segment).is_none());

        // going back swaps the poses around
        h.menu.back();
        let rings = h.menu.scene().rings();
        assert_eq!(rings[1].pose, Pose::Inside);
        h.frames();
        let rings = h.menu.scene().rings();
        assert_eq!(rings[0].pose, Pose::Outside);
        assert_eq!(rings[1].pose, Pose::Active);
    }

    #[test]
    fn test_hover_updates_title_and_fires_hook() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.frames();

        let p = h.wedge_point(3);
        assert!(h.menu.handle(&PointerEvent::Move { position: p }));
        assert!(h.menu.handle(&PointerEvent::Move { position: p }));
        assert_eq!(h.calls.borrow().hovered, ["share"]);
        let popup = h.menu.scene().popup().unwrap();
        assert!(popup.title.visible);
        assert_eq!(popup.title.text, "share");
        assert!(!popup.glyph_visible);

        h.menu.handle(&PointerEvent::Leave);
        let popup = h.menu.scene().popup().unwrap();
        assert!(!popup.title.visible);
        assert!(popup.glyph_visible);

        // hover fires in nested rings too
        h.click_wedge(1);
        h.frames();
        let p = h.wedge_point(0);
        h.menu.handle(&PointerEvent::Move { position: p });
        assert_eq!(h.calls.borrow().hovered, ["share", "copy"]);
    }

    #[test]
    fn test_close_clears_hover_title() {
        let mut h = Harness::demo();
        h.right_click(400.0, 300.0);
        h.frames();

        let p = h.wedge_point(3);
        h.menu.handle(&PointerEvent::Move { position: p });
        assert!(h.menu.scene().hovered().is_some());

        h.menu.close();
        let popup = h.menu.scene().popup().unwrap();
        assert!(!popup.title.visible);
        assert!(popup.glyph_visible);
        assert!(h.menu.scene().hovered().is_none());
        assert_eq!(h.calls.borrow().hovered, ["share"]);
    }

    #[test]
    fn test_selector_scopes_context_menu() {
        let config = MenuConfig::new(demo_items()).with_selector(".header".parse::<Selector>().unwrap());
        let mut h = Harness::new(config);

        assert!(!h.right_click(100.0, 100.0));
        assert!(!h.menu.is_open());

        let target = vec![
            Element::new("label"),
            Element::new("box").with_class("header"),
        ];
        assert!(h.menu.handle(&PointerEvent::ContextMenu {
            position: Point::new(100.0, 100.0),
            target,
        }));
        assert!(h.menu.is_open());
    }

    #[test]
    fn test_empty_ring_shows_shell() {
        let mut h = Harness::new(MenuConfig::new(Vec::new()));
        h.right_click(100.0, 100.0);
        h.frames();

        assert!(h.menu.is_open());
        assert!(h.menu.scene().current_ring().unwrap().segments.is_empty());
        assert!(h.click(100.0, 100.0 - 0.4 * 300.0));
        assert!(h.menu.is_open());
        assert!(h.click_center());
        assert!(!h.menu.is_open());
    }

    #[test]
    fn test_destroy_detaches_everything() {
        let mut h = Harness::demo();
        h.right_click(100.0, 100.0);
        h.menu.destroy();
        h.menu.destroy();

        assert!(h.registry.is_empty());
        assert!(h.menu.is_destroyed());
        assert_eq!(h.menu.scene().node_count(), 0);

        assert!(!h.right_click(100.0, 100.0));
        assert!(!h.click(100.0, 100.0));
        assert!(!h.menu.handle(&PointerEvent::Move {
            position: Point::new(100.0, 100.0)
        }));
        h.frames();
        h.wait(1000);
        h.menu.open(Point::new(1.0, 1.0));

        assert_eq!(h.menu.scene().node_count(), 0);
        assert!(!h.menu.is_open());
        assert_eq!(h.calls.borrow().closed, 0);
    }

    #[test]
    fn test_stale_paths_are_ignored() {
        let mut h = Harness::demo();
        h.right_click(100.0, 100.0);
        h.menu.select_path(&ItemPath::from(vec![0, 1]));
        assert_eq!(h.menu.depth(), 0);
        assert!(h.calls.borrow().selected.is_empty());

        h.menu.select(0);
        h.menu.select_path(&ItemPath::from(vec![2]));
        assert_eq!(h.menu.depth(), 1);
        assert!(h.calls.borrow().selected.is_empty());
    }

    #[test]
    fn test_reconfigure_resets_navigation() {
        let mut h = Harness::demo();
        h.right_click(100.0, 100.0);
        h.menu.select(0);

        let config = MenuConfig::new(vec![MenuItem::leaf("only", "1")]).with_radius(80.0);
        h.menu.reconfigure(config).unwrap();
        assert_eq!(h.menu.depth(), 0);
        assert_eq!(h.names(), ["only"]);
        let frame = h.menu.scene().popup().unwrap().frame;
        assert_eq!(frame.center(), Point::new(100.0, 100.0));
        assert_eq!(frame.radius, 80.0);

        let bad = MenuConfig::default().with_radius(-1.0);
        assert!(h.menu.reconfigure(bad).is_err());
        assert_eq!(h.names(), ["only"]);
    }

    #[test]
    fn test_strict_config_rejects_malformed_items() {
        let config = MenuConfig::new(vec![MenuItem::leaf("", "x")]).with_strict(true);
        let result = RadialMenu::new(
            config,
            Hooks::new(),
            ListenerRegistry::new(),
            ManualScheduler::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_hooks_are_no_ops() {
        let scheduler = ManualScheduler::new();
        let mut menu = RadialMenu::new(
            MenuConfig::new(demo_items()),
            Hooks::new(),
            ListenerRegistry::new(),
            scheduler.clone(),
        )
        .unwrap();
        menu.init();
        menu.open(Point::new(100.0, 100.0));
        menu.select(2);
        for task in scheduler.advance(Duration::from_millis(300)) {
            menu.run(task);
        }
        assert!(!menu.scene().popup().unwrap().visible);
    }
}
