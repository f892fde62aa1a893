//! GTK-backed scheduling for the menu controllers.

use crate::gui::app::AppMsg;
use gtk::prelude::*;
use gtk4 as gtk;
use rosette_core::{Scheduler, Task};
use std::time::Duration;

/// Routes a menu's deferred tasks back into the component as `AppMsg::Run`.
///
/// `generation` changes on every config reload so tasks of replaced menus are
/// dropped instead of reaching their successors.
pub struct GtkScheduler {
    generation: u64,
    index: usize,
    widget: gtk::DrawingArea,
    sender: relm4::Sender<AppMsg>,
}

impl GtkScheduler {
    pub fn new(
        generation: u64,
        index: usize,
        widget: gtk::DrawingArea,
        sender: relm4::Sender<AppMsg>,
    ) -> Self {
        Self {
            generation,
            index,
            widget,
            sender,
        }
    }

    fn message(&self, task: Task) -> AppMsg {
        AppMsg::Run {
            generation: self.generation,
            index: self.index,
            task,
        }
    }
}

impl Scheduler for GtkScheduler {
    fn request_frame(&mut self, task: Task) {
        let sender = self.sender.clone();
        let msg = self.message(task);
        let pending = std::cell::Cell::new(Some(msg));
        self.widget.add_tick_callback(move |_, _| {
            if let Some(msg) = pending.take() {
                sender.emit(msg);
            }
            glib::ControlFlow::Break
        });
    }

    fn set_timeout(&mut self, delay: Duration, task: Task) {
        let sender = self.sender.clone();
        let msg = self.message(task);
        glib::timeout_add_local_once(delay, move || sender.emit(msg));
    }
}
