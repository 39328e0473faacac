/// Notifies the application that the map must be redrawn.
pub trait Messenger {
    /// Requests a redraw of the map on the next frame.
    fn request_redraw(&self);
}

impl<F: Fn()> Messenger for F {
    fn request_redraw(&self) {
        self()
    }
}
