//! Model observers that turn model notifications into render deltas.
//!
//! The scheduler is shared through `Rc<RefCell<_>>`: the model, its
//! observers and the event loop all live on one task, and the loop only
//! borrows the scheduler between model calls.

use crate::scheduler::{RenderDelta, RenderScheduler};
use core_model::{CursorObserver, ObserverId, TextEditorModel, TextObserver};
use core_text::Location;
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedScheduler = Rc<RefCell<RenderScheduler>>;

/// Marks `CursorOnly` whenever the cursor moves.
pub struct CursorRepaint {
    scheduler: SharedScheduler,
}

impl CursorRepaint {
    pub fn new(scheduler: SharedScheduler) -> Self {
        Self { scheduler }
    }
}

impl CursorObserver for CursorRepaint {
    fn on_cursor_moved(&mut self, location: Location) {
        tracing::trace!(target: "render", %location, "cursor_moved");
        self.scheduler.borrow_mut().mark(RenderDelta::CursorOnly);
    }
}

/// Marks `Full` whenever the text changes.
pub struct TextRepaint {
    scheduler: SharedScheduler,
}

impl TextRepaint {
    pub fn new(scheduler: SharedScheduler) -> Self {
        Self { scheduler }
    }
}

impl TextObserver for TextRepaint {
    fn on_text_changed(&mut self) {
        self.scheduler.borrow_mut().mark(RenderDelta::Full);
    }
}

/// Handles of the render observers attached to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderObservers {
    pub cursor: ObserverId,
    pub text: ObserverId,
}

impl RenderObservers {
    pub fn detach(self, model: &mut TextEditorModel) {
        model.detach_cursor_observer(self.cursor);
        model.detach_text_observer(self.text);
    }
}

pub fn attach_render_observers(
    model: &mut TextEditorModel,
    scheduler: &SharedScheduler,
) -> RenderObservers {
    let cursor = model.attach_cursor_observer(Box::new(CursorRepaint::new(scheduler.clone())));
    let text = model.attach_text_observer(Box::new(TextRepaint::new(scheduler.clone())));
    RenderObservers { cursor, text }
}
