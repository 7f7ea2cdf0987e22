//! Composition root for the light endpoint.
//!
//! Wires the persistent store, the LED actuator and the dispatch table
//! together. The protocol stack hands decoded attribute events to
//! [`LightDevice::handle`]; the matching handler persists the new value
//! first and only drives the hardware once the write is durable.

use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::ColorXY;
use crate::dispatch::{ActionKey, AttributeValue, DispatchTable, EventKind};
use crate::error::Error;
use crate::led::SingleLed;
use crate::store::{LightStore, StorageBackend, StoreDefaults};
use crate::zcl;

/// Dispatch table capacity, sized for the light's cluster set.
const HANDLER_CAPACITY: usize = 8;

/// Power source advertised in the basic cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerSource {
    #[default]
    Unknown,
    Mains,
    Battery,
}

/// Static configuration of the endpoint.
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    pub endpoint: u8,
    pub power_source: PowerSource,
    pub manufacturer: Option<&'static str>,
    pub model: Option<&'static str>,
}

impl DeviceConfig {
    pub const fn new(endpoint: u8) -> Self {
        Self {
            endpoint,
            power_source: PowerSource::Unknown,
            manufacturer: None,
            model: None,
        }
    }

    #[must_use]
    pub const fn with_power_source(mut self, power_source: PowerSource) -> Self {
        self.power_source = power_source;
        self
    }

    #[must_use]
    pub const fn with_manufacturer(mut self, manufacturer: &'static str) -> Self {
        self.manufacturer = Some(manufacturer);
        self
    }

    #[must_use]
    pub const fn with_model(mut self, model: &'static str) -> Self {
        self.model = Some(model);
        self
    }
}

/// Attribute defaults advertised when the endpoint registers with the
/// protocol stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterDefaults {
    pub on_off: bool,
    pub current_level: u8,
    pub current_x: u16,
    pub current_y: u16,
}

/// Basic cluster payload advertised at registration, with names encoded
/// as ZCL character strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicInfo {
    pub power_source: PowerSource,
    pub manufacturer: Vec<u8, { zcl::STRING_ATTR_LEN }>,
    pub model: Vec<u8, { zcl::STRING_ATTR_LEN }>,
}

/// Exposes the cluster surface of a concrete device kind.
pub trait ClusterProvider {
    /// Advertised attribute defaults, seeded from persisted state so a
    /// coordinator discovering the device sees the last known state.
    fn cluster_defaults(&self) -> ClusterDefaults;
}

/// Mutable collaborators handed to action handlers.
pub struct LightContext<D: OutputDriver, S: StorageBackend> {
    pub store: LightStore<S>,
    pub led: SingleLed<D>,
}

/// The light endpoint: persistent state, actuator and action routing.
pub struct LightDevice<D: OutputDriver, S: StorageBackend> {
    config: DeviceConfig,
    context: LightContext<D, S>,
    handlers: DispatchTable<LightContext<D, S>, HANDLER_CAPACITY>,
}

impl<D: OutputDriver, S: StorageBackend> LightDevice<D, S> {
    /// Bring up the endpoint.
    ///
    /// Loads persisted state over `defaults`, seeds the actuator from it
    /// (restoring the light output), then registers the attribute
    /// handlers. The load completes before anything reads the advertised
    /// defaults.
    pub fn new(
        config: DeviceConfig,
        driver: D,
        backend: S,
        defaults: StoreDefaults,
    ) -> Result<Self, Error> {
        let store = LightStore::load(backend, defaults);
        let led = SingleLed::new(
            driver,
            store.active(),
            store.brightness(),
            ColorXY::new(store.color_x(), store.color_y()),
        )?;

        let mut device = Self {
            config,
            context: LightContext { store, led },
            handlers: DispatchTable::new(),
        };
        device.register_handlers()?;
        Ok(device)
    }

    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub const fn store(&self) -> &LightStore<S> {
        &self.context.store
    }

    pub const fn led(&self) -> &SingleLed<D> {
        &self.context.led
    }

    /// Basic cluster attributes for registration.
    pub fn basic_info(&self) -> BasicInfo {
        BasicInfo {
            power_source: self.config.power_source,
            manufacturer: zcl::string_attr(self.config.manufacturer.unwrap_or("")),
            model: zcl::string_attr(self.config.model.unwrap_or("")),
        }
    }

    /// Entry point handed to the protocol stack for decoded events.
    ///
    /// Runs synchronously on the caller's context: lookup, validation,
    /// storage write and hardware push all complete before returning.
    pub fn handle(
        &mut self,
        endpoint: u8,
        cluster: u16,
        attribute: u16,
        event: EventKind,
        value: &AttributeValue,
    ) -> Result<(), Error> {
        #[cfg(feature = "esp32-log")]
        println!(
            "[LightDevice.handle] endpoint={} cluster={:#06x} attribute={:#06x}",
            endpoint, cluster, attribute
        );
        let key = ActionKey::new(endpoint, cluster, attribute, event);
        self.handlers.dispatch(&mut self.context, key, value)
    }

    fn register_handlers(&mut self) -> Result<(), Error> {
        let endpoint = self.config.endpoint;
        self.handlers.register(
            ActionKey::new(
                endpoint,
                zcl::CLUSTER_ON_OFF,
                zcl::ATTR_ON_OFF,
                EventKind::AttributeWrite,
            ),
            handle_on_off,
        )?;
        self.handlers.register(
            ActionKey::new(
                endpoint,
                zcl::CLUSTER_LEVEL_CONTROL,
                zcl::ATTR_CURRENT_LEVEL,
                EventKind::AttributeWrite,
            ),
            handle_current_level,
        )?;
        self.handlers.register(
            ActionKey::new(
                endpoint,
                zcl::CLUSTER_COLOR_CONTROL,
                zcl::ATTR_CURRENT_X,
                EventKind::AttributeWrite,
            ),
            handle_current_x,
        )?;
        self.handlers.register(
            ActionKey::new(
                endpoint,
                zcl::CLUSTER_COLOR_CONTROL,
                zcl::ATTR_CURRENT_Y,
                EventKind::AttributeWrite,
            ),
            handle_current_y,
        )?;
        Ok(())
    }
}

impl<D: OutputDriver, S: StorageBackend> ClusterProvider for LightDevice<D, S> {
    fn cluster_defaults(&self) -> ClusterDefaults {
        let store = &self.context.store;
        ClusterDefaults {
            on_off: store.active(),
            current_level: zcl::brightness_to_level(store.brightness()),
            current_x: zcl::chroma_to_raw(store.color_x()),
            current_y: zcl::chroma_to_raw(store.color_y()),
        }
    }
}

/// On/Off cluster, OnOff attribute write.
fn handle_on_off<D: OutputDriver, S: StorageBackend>(
    context: &mut LightContext<D, S>,
    value: &AttributeValue,
) -> Result<(), Error> {
    let AttributeValue::Bool(active) = value else {
        return Err(Error::InvalidArgument);
    };
    context.store.set_active(*active)?;
    context.led.set_active(*active)
}

/// Level Control cluster, CurrentLevel attribute write.
fn handle_current_level<D: OutputDriver, S: StorageBackend>(
    context: &mut LightContext<D, S>,
    value: &AttributeValue,
) -> Result<(), Error> {
    let AttributeValue::U8(level) = value else {
        return Err(Error::InvalidArgument);
    };
    let brightness = zcl::level_to_brightness(*level);
    context.store.set_brightness(brightness)?;
    context.led.set_brightness(brightness)
}

/// Color Control cluster, CurrentX attribute write. The y coordinate is
/// carried over from the live state.
fn handle_current_x<D: OutputDriver, S: StorageBackend>(
    context: &mut LightContext<D, S>,
    value: &AttributeValue,
) -> Result<(), Error> {
    let AttributeValue::U16(raw) = value else {
        return Err(Error::InvalidArgument);
    };
    let x = zcl::raw_to_chroma(*raw);
    context.store.set_color_x(x)?;
    let y = context.led.color().y;
    context.led.set_color(x, y)
}

/// Color Control cluster, CurrentY attribute write. The x coordinate is
/// carried over from the live state.
fn handle_current_y<D: OutputDriver, S: StorageBackend>(
    context: &mut LightContext<D, S>,
    value: &AttributeValue,
) -> Result<(), Error> {
    let AttributeValue::U16(raw) = value else {
        return Err(Error::InvalidArgument);
    };
    let y = zcl::raw_to_chroma(*raw);
    context.store.set_color_y(y)?;
    let x = context.led.color().x;
    context.led.set_color(x, y)
}
