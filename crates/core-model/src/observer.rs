//! Cursor / text change notification channels.
//!
//! Both channels are synchronous one-to-many broadcasts: the model walks its
//! registry inline, in attach order, after every discrete mutation. There is
//! no batching. Observers receive a copy of the cursor (or nothing at all for
//! text changes) and must re-query the model afterwards; they hold no borrow
//! of the model, so attaching or detaching from inside a callback cannot
//! happen.

use core_text::Location;

/// Handle returned on attach; detaching by handle is the identity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// Notified with the new cursor location after cursor-moving operations.
pub trait CursorObserver {
    fn on_cursor_moved(&mut self, location: Location);
}

/// Notified after content-mutating operations.
pub trait TextObserver {
    fn on_text_changed(&mut self);
}

impl<F> CursorObserver for F
where
    F: FnMut(Location),
{
    fn on_cursor_moved(&mut self, location: Location) {
        self(location)
    }
}

impl<F> TextObserver for F
where
    F: FnMut(),
{
    fn on_text_changed(&mut self) {
        self()
    }
}

/// Ordered subscriber list for one channel.
pub(crate) struct Registry<O: ?Sized> {
    entries: Vec<(ObserverId, Box<O>)>,
}

impl<O: ?Sized> Default for Registry<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<O: ?Sized> Registry<O> {
    pub(crate) fn push(&mut self, id: ObserverId, observer: Box<O>) {
        self.entries.push((id, observer));
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<O>> {
        self.entries.iter_mut().map(|(_, o)| o)
    }
}
