use crate::scene::NodeId;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// How long a replaced ring stays attached while it animates away.
pub const RING_SWAP_DELAY: Duration = Duration::from_millis(400);
/// How long the popup keeps its exit animation before it is hidden.
pub const CLOSE_DELAY: Duration = Duration::from_millis(300);

/// Deferred work handed back to [`RadialMenu::run`](crate::menu::RadialMenu::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Make `ring` active and send `previous` to its exit pose.
    PromoteRing {
        ring: NodeId,
        previous: Option<NodeId>,
    },
    RemoveRing(NodeId),
    FinishClose,
}

/// Deferral hooks of the host surface. Tasks run after the current
/// synchronous work; there is no cancellation.
pub trait Scheduler {
    /// Run `task` on the next animation frame.
    fn request_frame(&mut self, task: Task);
    fn set_timeout(&mut self, delay: Duration, task: Task);
}

#[derive(Debug, Default)]
struct Queue {
    now: Duration,
    seq: u64,
    frames: Vec<Task>,
    timers: Vec<(Duration, u64, Task)>,
}

/// Scheduler driven by hand, with a virtual clock.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame tasks requested so far, in request order.
    pub fn take_frames(&self) -> Vec<Task> {
        std::mem::take(&mut self.queue.borrow_mut().frames)
    }

    /// Moves the clock forward and returns the timers that came due, earliest first.
    pub fn advance(&self, by: Duration) -> Vec<Task> {
        let mut queue = self.queue.borrow_mut();
        queue.now += by;
        let now = queue.now;

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut queue.timers)
            .into_iter()
            .partition(|(at, _, _)| *at <= now);
        queue.timers = pending;

        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, task)| task).collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.queue.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().frames.len()
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self, task: Task) {
        self.queue.borrow_mut().frames.push(task);
    }

    fn set_timeout(&mut self, delay: Duration, task: Task) {
        let mut queue = self.queue.borrow_mut();
        queue.seq += 1;
        let entry = (queue.now + delay, queue.seq, task);
        queue.timers.push(entry);
    }
}
