use super::types::{AudioError, LoadTicket};

/// The audio platform boundary.
///
/// Every method returns immediately. `load` and `play` complete
/// asynchronously by posting an `AudioEvent` tagged with the ticket they
/// were given; `play` may also refuse synchronously.
pub trait AudioBackend {
    fn load(&mut self, ticket: LoadTicket, url: &str);
    fn cancel(&mut self, ticket: LoadTicket);
    fn play(&mut self, ticket: LoadTicket) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn seek_to_start(&mut self);
    /// Linear volume, 0.0..=1.0.
    fn set_volume(&mut self, volume: f32);
    fn release(&mut self);
}
