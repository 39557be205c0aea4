use graphon_common::ScreenSize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Callback run on every resize. Takes no arguments; handlers read the new
/// size back from the sizer.
pub type ResizeCallback = Rc<dyn Fn()>;

/// Source of the current screen size and of resize notifications.
pub trait Sizer {
    fn screen_width(&self) -> u32;

    fn screen_height(&self) -> u32;

    fn screen_size(&self) -> ScreenSize {
        ScreenSize::new(self.screen_width(), self.screen_height())
    }

    /// Subscribe to resize events. Callbacks run synchronously, in
    /// subscription order, after the new size is visible.
    fn add_on_resize(&self, callback: ResizeCallback);
}

/// Sizer fed by window resize events.
pub struct WindowSizer {
    size: Cell<ScreenSize>,
    listeners: RefCell<Vec<ResizeCallback>>,
}

impl WindowSizer {
    pub fn new(size: ScreenSize) -> Self {
        Self {
            size: Cell::new(size),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Record a new size and notify every subscriber.
    ///
    /// Dispatch runs over a snapshot of the subscriber list: callbacks added
    /// during dispatch are first called on the next resize.
    pub fn resize(&self, size: ScreenSize) {
        self.size.set(size);
        let listeners: Vec<ResizeCallback> = self.listeners.borrow().clone();
        tracing::debug!(
            width = size.width,
            height = size.height,
            listeners = listeners.len(),
            "dispatching resize"
        );
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Sizer for WindowSizer {
    fn screen_width(&self) -> u32 {
        self.size.get().width
    }

    fn screen_height(&self) -> u32 {
        self.size.get().height
    }

    fn screen_size(&self) -> ScreenSize {
        self.size.get()
    }

    fn add_on_resize(&self, callback: ResizeCallback) {
        self.listeners.borrow_mut().push(callback);
    }
}
