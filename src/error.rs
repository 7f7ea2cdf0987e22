/// Errors surfaced by the light endpoint core.
///
/// Every layer returns its error to the caller immediately; nothing in
/// the core retries on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A value was out of range or a payload had the wrong shape.
    ///
    /// Detected before any state is mutated.
    InvalidArgument,
    /// No handler is registered for the addressed attribute.
    ///
    /// A normal "not handled here" outcome: the protocol layer answers
    /// the frame with a not-supported status instead of failing it.
    Unsupported,
    /// The durable store rejected a write or a commit.
    Storage,
    /// The LED bus rejected a pixel write or a frame latch.
    Hardware,
}
