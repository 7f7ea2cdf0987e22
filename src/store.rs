//! Durable mirror of the light state.
//!
//! Each of the four logical fields (active, brightness, color x, color y)
//! maps to one key in a restart-durable key/value backend. Setters write
//! the encoded value, commit, and only then update the in-memory mirror,
//! so a failed commit leaves both the mirror and the durable value as
//! they were.

use heapless::Vec;

use crate::error::Error;

/// Largest encoded value: a fixed-point `u64`.
pub const MAX_VALUE_LEN: usize = 8;

pub const ACTIVE_KEY: &str = "active";
pub const BRIGHTNESS_KEY: &str = "brightness";
pub const COLOR_X_KEY: &str = "color_x";
pub const COLOR_Y_KEY: &str = "color_y";

/// Fixed-point scale for floating values.
///
/// Scaling by 2^53 keeps the full mantissa of values in `[0, 1]` while
/// storing a plain unsigned integer instead of a float byte format.
/// Precision beyond that is truncated at the storage boundary.
const FLOAT_SCALE: f64 = (1u64 << 53) as f64;

/// Restart-durable key/value backend.
///
/// Values are opaque byte strings written under short keys and made
/// durable by an explicit commit. Backend failures map to
/// [`Error::Storage`].
pub trait StorageBackend {
    /// Read the value stored under `key`, if any.
    fn get(&mut self, key: &str) -> Option<Vec<u8, MAX_VALUE_LEN>>;

    /// Stage a value under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), Error>;

    /// Make all staged writes durable.
    fn commit(&mut self) -> Result<(), Error>;
}

/// Compiled-in fallbacks used when the backend has no record of a field.
#[derive(Debug, Clone, Copy)]
pub struct StoreDefaults {
    pub active: bool,
    pub brightness: f64,
    pub color_x: f64,
    pub color_y: f64,
}

impl Default for StoreDefaults {
    fn default() -> Self {
        Self {
            active: false,
            brightness: 1.0,
            color_x: 0.5,
            color_y: 0.5,
        }
    }
}

/// Durable cache of the four light state fields.
pub struct LightStore<S: StorageBackend> {
    backend: S,
    active: bool,
    brightness: f64,
    color_x: f64,
    color_y: f64,
}

impl<S: StorageBackend> LightStore<S> {
    /// Open the store, loading persisted fields over `defaults`.
    ///
    /// A field whose key is absent or undecodable keeps its default; one
    /// missing key never fails the whole load.
    pub fn load(mut backend: S, defaults: StoreDefaults) -> Self {
        let active = get_bool(&mut backend, ACTIVE_KEY).unwrap_or(defaults.active);
        let brightness = get_float(&mut backend, BRIGHTNESS_KEY).unwrap_or(defaults.brightness);
        let color_x = get_float(&mut backend, COLOR_X_KEY).unwrap_or(defaults.color_x);
        let color_y = get_float(&mut backend, COLOR_Y_KEY).unwrap_or(defaults.color_y);

        Self {
            backend,
            active,
            brightness,
            color_x,
            color_y,
        }
    }

    pub const fn active(&self) -> bool {
        self.active
    }

    pub const fn brightness(&self) -> f64 {
        self.brightness
    }

    pub const fn color_x(&self) -> f64 {
        self.color_x
    }

    pub const fn color_y(&self) -> f64 {
        self.color_y
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Persist the on/off state.
    pub fn set_active(&mut self, active: bool) -> Result<(), Error> {
        self.backend.set(ACTIVE_KEY, &[u8::from(active)])?;
        self.backend.commit()?;
        self.active = active;
        Ok(())
    }

    /// Persist the brightness level. Rejects values outside `[0, 1]`
    /// before touching the backend.
    pub fn set_brightness(&mut self, brightness: f64) -> Result<(), Error> {
        self.put_float(BRIGHTNESS_KEY, brightness)?;
        self.brightness = brightness;
        Ok(())
    }

    /// Persist the x chromaticity coordinate. Rejects values outside
    /// `[0, 1]` before touching the backend.
    pub fn set_color_x(&mut self, color_x: f64) -> Result<(), Error> {
        self.put_float(COLOR_X_KEY, color_x)?;
        self.color_x = color_x;
        Ok(())
    }

    /// Persist the y chromaticity coordinate. Rejects values outside
    /// `[0, 1]` before touching the backend.
    pub fn set_color_y(&mut self, color_y: f64) -> Result<(), Error> {
        self.put_float(COLOR_Y_KEY, color_y)?;
        self.color_y = color_y;
        Ok(())
    }

    fn put_float(&mut self, key: &str, value: f64) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::InvalidArgument);
        }
        self.backend.set(key, &encode_float(value))?;
        self.backend.commit()
    }
}

fn get_bool<S: StorageBackend>(backend: &mut S, key: &str) -> Option<bool> {
    let raw = backend.get(key)?;
    match raw.as_slice() {
        [byte] => Some(*byte != 0),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn get_float<S: StorageBackend>(backend: &mut S, key: &str) -> Option<f64> {
    let raw = backend.get(key)?;
    let bytes: [u8; 8] = raw.as_slice().try_into().ok()?;
    Some(u64::from_le_bytes(bytes) as f64 / FLOAT_SCALE)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn encode_float(value: f64) -> [u8; 8] {
    ((value * FLOAT_SCALE) as u64).to_le_bytes()
}
