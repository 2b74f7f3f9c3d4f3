mod bus;
mod events;

pub use bus::EventBus;
pub use events::DrawEvent;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &DrawEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&DrawEvent) + Send,
{
    fn handle_event(&mut self, event: &DrawEvent) {
        self(event)
    }
}
