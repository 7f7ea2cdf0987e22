#![no_std]

pub mod color;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod led;
pub mod store;
pub mod zcl;

pub use color::{ColorXY, Rgb, xy_to_rgb};
pub use device::{
    BasicInfo, ClusterDefaults, ClusterProvider, DeviceConfig, LightContext, LightDevice,
    PowerSource,
};
pub use dispatch::{ActionHandler, ActionKey, AttributeValue, DispatchTable, EventKind};
pub use error::Error;
pub use led::{SingleLed, TRANSITION_STEPS};
pub use store::{LightStore, StorageBackend, StoreDefaults};

pub use embassy_time::Duration;

/// Abstract LED bus driver
///
/// Implement this trait to support different hardware platforms.
/// The actuator is generic over this trait; both operations are
/// fallible because the bus write and the frame latch can fail on
/// real hardware.
pub trait OutputDriver {
    /// Stage the color of one pixel.
    fn set_pixel(&mut self, index: usize, color: color::Rgb) -> Result<(), error::Error>;

    /// Latch the staged pixels onto the bus.
    fn push(&mut self) -> Result<(), error::Error>;
}
