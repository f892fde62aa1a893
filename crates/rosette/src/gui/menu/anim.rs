//! Transitions between ring poses and the popup's open/closed look.

use rosette_core::scene::{Popup, Ring};
use rosette_core::{NodeId, Pose};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const RING_TRANSITION: Duration = Duration::from_millis(400);
pub const POPUP_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub scale: f64,
    pub opacity: f64,
}

impl Look {
    pub const fn new(scale: f64, opacity: f64) -> Self {
        Self { scale, opacity }
    }

    pub fn lerp(self, to: Look, t: f64) -> Look {
        Look::new(
            self.scale + (to.scale - self.scale) * t,
            self.opacity + (to.opacity - self.opacity) * t,
        )
    }

    pub fn of_pose(pose: Pose) -> Look {
        match pose {
            Pose::Outside => Look::new(1.25, 0.0),
            Pose::Active => Look::new(1.0, 1.0),
            Pose::Inside => Look::new(0.75, 0.0),
        }
    }

    pub fn of_popup(active: bool) -> Look {
        if active {
            Look::new(1.0, 1.0)
        } else {
            Look::new(0.85, 0.0)
        }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone)]
struct Track<T> {
    target: T,
    from: Look,
    to: Look,
    started: Instant,
    duration: Duration,
}

impl<T: Copy + PartialEq> Track<T> {
    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn look(&self, now: Instant) -> Look {
        self.from.lerp(self.to, ease_out_cubic(self.progress(now)))
    }

    fn is_done(&self, now: Instant) -> bool {
        self.from == self.to || self.progress(now) >= 1.0
    }

    /// Retargets from wherever the current transition is.
    fn retarget(&mut self, target: T, to: Look, now: Instant) {
        if self.target == target {
            return;
        }
        self.from = self.look(now);
        self.to = to;
        self.target = target;
        self.started = now;
    }
}

#[derive(Debug, Default)]
pub struct Animator {
    rings: HashMap<NodeId, Track<Pose>>,
    popups: HashMap<NodeId, Track<bool>>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ring seen for the first time animates from the pose it was built in.
    pub fn ring_look(&mut self, ring: &Ring, now: Instant) -> Look {
        let track = self.rings.entry(ring.id).or_insert_with(|| {
            let start = ring.direction.entering_pose();
            Track {
                target: start,
                from: Look::of_pose(start),
                to: Look::of_pose(start),
                started: now,
                duration: RING_TRANSITION,
            }
        });
        track.retarget(ring.pose, Look::of_pose(ring.pose), now);
        track.look(now)
    }

    pub fn popup_look(&mut self, popup: &Popup, now: Instant) -> Look {
        let track = self.popups.entry(popup.id).or_insert_with(|| Track {
            target: false,
            from: Look::of_popup(false),
            to: Look::of_popup(false),
            started: now,
            duration: POPUP_TRANSITION,
        });
        track.retarget(popup.active, Look::of_popup(popup.active), now);
        track.look(now)
    }

    /// Forgets rings that are no longer attached.
    pub fn retain_rings(&mut self, alive: impl Fn(NodeId) -> bool) {
        self.rings.retain(|id, _| alive(*id));
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.rings.values().any(|t| !t.is_done(now))
            || self.popups.values().any(|t| !t.is_done(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosette_core::{Direction, MenuItem, Scene};

    fn ring(direction: Direction) -> Ring {
        Scene::new().build_ring(&[MenuItem::leaf("a", "1")], direction)
    }

    fn assert_look(actual: Look, expected: Look) {
        assert!(
            (actual.scale - expected.scale).abs() < 1e-9
                && (actual.opacity - expected.opacity).abs() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_new_ring_animates_in() {
        let mut animator = Animator::new();
        let start = Instant::now();
        let mut ring = ring(Direction::In);

        assert_look(animator.ring_look(&ring, start), Look::of_pose(Pose::Outside));
        assert!(!animator.is_animating(start));

        ring.pose = Pose::Active;
        let early = animator.ring_look(&ring, start);
        assert_look(early, Look::of_pose(Pose::Outside));
        assert!(animator.is_animating(start));

        let mid = animator.ring_look(&ring, start + RING_TRANSITION / 2);
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.scale < 1.25 && mid.scale > 1.0);

        let end = start + RING_TRANSITION;
        assert_look(animator.ring_look(&ring, end), Look::of_pose(Pose::Active));
        assert!(!animator.is_animating(end));
    }

    #[test]
    fn test_first_seen_active_ring_still_enters() {
        let mut animator = Animator::new();
        let now = Instant::now();
        let mut ring = ring(Direction::Out);
        ring.pose = Pose::Active;

        assert_look(animator.ring_look(&ring, now), Look::of_pose(Pose::Inside));
        assert!(animator.is_animating(now));
    }

    #[test]
    fn test_retarget_starts_from_current_look() {
        let mut animator = Animator::new();
        let start = Instant::now();
        let mut ring = ring(Direction::In);
        ring.pose = Pose::Active;
        animator.ring_look(&ring, start);

        let half = start + RING_TRANSITION / 2;
        let before = animator.ring_look(&ring, half);
        ring.pose = Pose::Inside;
        assert_look(animator.ring_look(&ring, half), before);
    }

    #[test]
    fn test_popup_fades_in_and_out() {
        let mut scene = Scene::new();
        scene.create_popup(100.0);
        let mut popup = scene.popup().unwrap().clone();
        let mut animator = Animator::new();
        let start = Instant::now();

        popup.active = true;
        assert_look(animator.popup_look(&popup, start), Look::of_popup(false));
        let open = start + POPUP_TRANSITION;
        assert_look(animator.popup_look(&popup, open), Look::of_popup(true));

        popup.active = false;
        animator.popup_look(&popup, open);
        assert!(animator.is_animating(open));
        assert_look(
            animator.popup_look(&popup, open + POPUP_TRANSITION),
            Look::of_popup(false),
        );
    }

    #[test]
    fn test_retain_rings() {
        let mut animator = Animator::new();
        let now = Instant::now();
        let ring = ring(Direction::In);
        animator.ring_look(&ring, now);
        animator.retain_rings(|_| false);
        assert!(animator.rings.is_empty());
    }
}
