//! Retained node tree read by rendering surfaces.
//!
//! Only [`RadialMenu`](crate::menu::RadialMenu) mutates a scene. Surfaces draw
//! the popup shell, then every attached ring in attachment order.

use crate::geometry::{self, PopupFrame, WedgeLayout};
use crate::item::{ItemDisplay, ItemName, MenuItem};
use crate::navigation::CenterGlyph;
use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct NodeId(pub(crate) u64);

/// Which way the navigation moved when a ring was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Drill-down into a parent item.
    In,
    /// Back towards the root.
    Out,
}

impl Direction {
    /// Pose a freshly built ring starts from.
    pub fn entering_pose(self) -> Pose {
        match self {
            Direction::In => Pose::Outside,
            Direction::Out => Pose::Inside,
        }
    }

    /// Pose the replaced ring moves to.
    pub fn exiting_pose(self) -> Pose {
        match self {
            Direction::In => Pose::Inside,
            Direction::Out => Pose::Outside,
        }
    }
}

/// Visual state of a ring. Surfaces animate between poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    /// Enlarged and transparent.
    Outside,
    Active,
    /// Shrunk and transparent.
    Inside,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: NodeId,
    pub index: usize,
    pub z_index: usize,
    pub name: ItemName,
    pub display: ItemDisplay,
    pub has_children: bool,
    pub layout: WedgeLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: NodeId,
    pub pose: Pose,
    pub direction: Direction,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePop {
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub id: NodeId,
    pub frame: PopupFrame,
    /// Present on the surface at all.
    pub visible: bool,
    /// Shown in its open pose; cleared as soon as a close starts.
    pub active: bool,
    pub glyph: CenterGlyph,
    pub glyph_visible: bool,
    pub title: TitlePop,
}

#[derive(Debug, Default)]
pub struct Scene {
    next_id: u64,
    popup: Option<Popup>,
    rings: Vec<Ring>,
    hovered: Option<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub fn create_popup(&mut self, radius: f64) -> NodeId {
        let id = self.allocate();
        self.popup = Some(Popup {
            id,
            frame: PopupFrame {
                radius,
                ..PopupFrame::default()
            },
            visible: false,
            active: false,
            glyph: CenterGlyph::Close,
            glyph_visible: true,
            title: TitlePop::default(),
        });
        id
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut Popup> {
        self.popup.as_mut()
    }

    /// Builds a detached ring for `items`. Nothing is shown until it is attached.
    pub fn build_ring(&mut self, items: &[MenuItem], direction: Direction) -> Ring {
        let id = self.allocate();
        let segments = geometry::layout_ring(items.len())
            .into_iter()
            .zip(items)
            .enumerate()
            .map(|(index, (layout, item))| Segment {
                id: self.allocate(),
                index,
                z_index: index + 1,
                name: item.name.clone(),
                display: item.display(),
                has_children: item.has_children(),
                layout,
            })
            .collect();

        Ring {
            id,
            pose: direction.entering_pose(),
            direction,
            segments,
        }
    }

    pub fn attach_ring(&mut self, ring: Ring) {
        self.rings.push(ring);
    }

    pub fn remove_ring(&mut self, id: NodeId) -> Option<Ring> {
        let pos = self.rings.iter().position(|r| r.id == id)?;
        let ring = self.rings.remove(pos);
        if self
            .hovered
            .is_some_and(|h| ring.segments.iter().any(|s| s.id == h))
        {
            self.hovered = None;
        }
        Some(ring)
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn ring(&self, id: NodeId) -> Option<&Ring> {
        self.rings.iter().find(|r| r.id == id)
    }

    pub fn ring_mut(&mut self, id: NodeId) -> Option<&mut Ring> {
        self.rings.iter_mut().find(|r| r.id == id)
    }

    /// The most recently attached ring; it shows the current items.
    pub fn current_ring(&self) -> Option<&Ring> {
        self.rings.last()
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn set_hovered(&mut self, id: Option<NodeId>) {
        self.hovered = id;
    }

    pub fn node_count(&self) -> usize {
        self.popup.iter().count()
            + self
                .rings
                .iter()
                .map(|r| 1 + r.segments.len())
                .sum::<usize>()
    }

    pub fn clear(&mut self) {
        self.popup = None;
        self.rings.clear();
        self.hovered = None;
    }
}
