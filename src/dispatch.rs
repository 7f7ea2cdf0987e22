//! Attribute action dispatch.
//!
//! Inbound events are identified by endpoint, cluster, attribute and
//! event kind. The table packs that identity into one integer key and
//! maps it to a plain handler function over a caller-provided context,
//! so handlers stay free of globals and the table stays allocation-free.

use heapless::FnvIndexMap;

use crate::error::Error;

/// Kind of protocol callback that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A coordinator wrote an attribute value.
    AttributeWrite,
    /// A peer reported an attribute value.
    AttributeReport,
    /// A default response to a previously sent command.
    DefaultResponse,
}

impl EventKind {
    const fn as_raw(self) -> u64 {
        match self {
            EventKind::AttributeWrite => 0,
            EventKind::AttributeReport => 1,
            EventKind::DefaultResponse => 2,
        }
    }
}

/// Composite identity of a dispatchable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionKey {
    pub endpoint: u8,
    pub cluster: u16,
    pub attribute: u16,
    pub event: EventKind,
}

impl ActionKey {
    pub const fn new(endpoint: u8, cluster: u16, attribute: u16, event: EventKind) -> Self {
        Self {
            endpoint,
            cluster,
            attribute,
            event,
        }
    }

    /// Pack the key into a single integer.
    ///
    /// The field widths do not overlap, so packing is collision-free over
    /// the full endpoint/cluster/attribute cross product.
    const fn packed(self) -> u64 {
        (self.event.as_raw() << 40)
            | ((self.endpoint as u64) << 32)
            | ((self.cluster as u64) << 16)
            | (self.attribute as u64)
    }
}

/// Decoded attribute payload.
///
/// A closed set of variants instead of an opaque pointer: a handler
/// matches the variant it expects and rejects the rest as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue {
    Bool(bool),
    U8(u8),
    U16(u16),
}

/// Handler invoked for a matching action.
pub type ActionHandler<C> = fn(&mut C, &AttributeValue) -> Result<(), Error>;

/// Fixed-capacity action table.
///
/// `N` must be a power of two. `C` is the context type handed to every
/// handler; the device passes its mutable collaborators through it.
pub struct DispatchTable<C, const N: usize> {
    handlers: FnvIndexMap<u64, ActionHandler<C>, N>,
}

impl<C, const N: usize> DispatchTable<C, N> {
    pub fn new() -> Self {
        Self {
            handlers: FnvIndexMap::new(),
        }
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Register `handler` for `key`.
    ///
    /// Re-registering an existing key silently replaces the previous
    /// handler. The only failure is a full table, which means `N` was
    /// sized too small for the device's cluster set.
    pub fn register(&mut self, key: ActionKey, handler: ActionHandler<C>) -> Result<(), Error> {
        match self.handlers.insert(key.packed(), handler) {
            Ok(_) => Ok(()),
            Err(_) => Err(Error::InvalidArgument),
        }
    }

    /// Look up and invoke the handler for `key`.
    ///
    /// An unregistered key is [`Error::Unsupported`], distinct from a
    /// handler failure: the protocol layer answers such frames with a
    /// not-supported status instead of failing the message.
    pub fn dispatch(
        &self,
        context: &mut C,
        key: ActionKey,
        value: &AttributeValue,
    ) -> Result<(), Error> {
        let handler = self.handlers.get(&key.packed()).ok_or(Error::Unsupported)?;
        handler(context, value)
    }
}

impl<C, const N: usize> Default for DispatchTable<C, N> {
    fn default() -> Self {
        Self::new()
    }
}
