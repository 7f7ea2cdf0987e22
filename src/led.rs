//! Single addressable LED behind an output driver.
//!
//! Owns the live light state (active flag, brightness, chromaticity) and
//! renders it to the bus. Immediate sets push exactly one frame; timed
//! transitions slice the change into a fixed number of frames and block
//! the caller between pushes. No other attribute write is processed
//! while a transition runs, because the dispatch call that started it
//! has not returned.

use embassy_time::{Duration, block_for};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::{ColorXY, Rgb, xy_to_rgb};
use crate::error::Error;

/// Number of interpolation steps in a timed transition.
///
/// Transition durations must divide evenly into this count so frame
/// spacing never drifts.
pub const TRANSITION_STEPS: u32 = 100;

/// Single-pixel light actuator.
pub struct SingleLed<D: OutputDriver> {
    driver: D,
    active: bool,
    brightness: f64,
    color: ColorXY,
    rgb: Rgb,
}

impl<D: OutputDriver> SingleLed<D> {
    /// Create the actuator and push the initial state to the bus, so the
    /// light comes back in its last persisted state after power loss.
    pub fn new(driver: D, active: bool, brightness: f64, color: ColorXY) -> Result<Self, Error> {
        let mut led = Self {
            driver,
            active,
            brightness,
            color,
            rgb: Rgb::new(0, 0, 0),
        };
        led.refresh()?;
        Ok(led)
    }

    /// Whether the output currently renders the color.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn brightness(&self) -> f64 {
        self.brightness
    }

    pub const fn color(&self) -> ColorXY {
        self.color
    }

    /// The last RGB value pushed to the bus.
    pub const fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// The underlying driver.
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Toggle whether the output renders the color or forces zero.
    pub fn set_active(&mut self, active: bool) -> Result<(), Error> {
        self.active = active;
        self.refresh()
    }

    /// Re-render at a new brightness level immediately, in a single push.
    ///
    /// Rejects levels outside `[0, 1]` before mutating anything.
    pub fn set_brightness(&mut self, brightness: f64) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&brightness) {
            return Err(Error::InvalidArgument);
        }
        self.brightness = brightness;
        self.refresh()
    }

    /// Change chromaticity and re-render immediately.
    pub fn set_color(&mut self, x: f64, y: f64) -> Result<(), Error> {
        self.color = ColorXY::new(x, y);
        self.refresh()
    }

    /// Drive the output to a raw RGB value immediately, bypassing the
    /// chromaticity state. Single push.
    pub fn set_rgb(&mut self, target: Rgb) -> Result<(), Error> {
        self.push(target)
    }

    /// Animate the output from the current RGB value to `target`.
    ///
    /// The change runs in [`TRANSITION_STEPS`] frames, each channel
    /// interpolated linearly, one bus push per frame, blocking for
    /// `duration / TRANSITION_STEPS` between pushes. A zero duration
    /// collapses to [`Self::set_rgb`]. A duration that does not divide
    /// evenly by the step count is rejected with zero pushes issued.
    ///
    /// A driver failure aborts the remaining steps; the output stays at
    /// the last successfully rendered frame.
    pub fn transition_color(&mut self, target: Rgb, duration: Duration) -> Result<(), Error> {
        if duration.as_millis() == 0 {
            return self.set_rgb(target);
        }
        let interval = step_interval(duration)?;

        let from = self.rgb;
        for step in 1..=TRANSITION_STEPS {
            let frame = Rgb::new(
                interpolate(from.r, target.r, step),
                interpolate(from.g, target.g, step),
                interpolate(from.b, target.b, step),
            );
            self.push(frame)?;
            if step < TRANSITION_STEPS {
                block_for(interval);
            }
        }
        Ok(())
    }

    /// Animate brightness from the current level to `target`.
    ///
    /// Same stepping contract as [`Self::transition_color`]; each frame
    /// re-renders the current color at the interpolated level. On a
    /// driver failure the stored level stays at the last frame that
    /// reached the bus.
    pub fn transition_brightness(&mut self, target: f64, duration: Duration) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&target) {
            return Err(Error::InvalidArgument);
        }
        if duration.as_millis() == 0 {
            return self.set_brightness(target);
        }
        let interval = step_interval(duration)?;

        let from = self.brightness;
        for step in 1..=TRANSITION_STEPS {
            let level = from + (target - from) * f64::from(step) / f64::from(TRANSITION_STEPS);
            self.render_level(level)?;
            if step < TRANSITION_STEPS {
                block_for(interval);
            }
        }
        Ok(())
    }

    /// Render the current state: the color at the stored brightness, or
    /// zeros while inactive.
    fn refresh(&mut self) -> Result<(), Error> {
        let rgb = if self.active {
            xy_to_rgb(self.color, self.brightness)
        } else {
            Rgb::new(0, 0, 0)
        };
        self.push(rgb)
    }

    /// Render one brightness step; the stored level only advances once
    /// the frame reached the bus.
    fn render_level(&mut self, level: f64) -> Result<(), Error> {
        let rgb = if self.active {
            xy_to_rgb(self.color, level)
        } else {
            Rgb::new(0, 0, 0)
        };
        self.push(rgb)?;
        self.brightness = level;
        Ok(())
    }

    fn push(&mut self, rgb: Rgb) -> Result<(), Error> {
        #[cfg(feature = "esp32-log")]
        println!("[SingleLed.push] r={} g={} b={}", rgb.r, rgb.g, rgb.b);
        self.driver.set_pixel(0, rgb)?;
        self.driver.push()?;
        self.rgb = rgb;
        Ok(())
    }
}

/// Per-step pause for `duration`.
///
/// Rejects durations that do not divide evenly into the step count
/// rather than letting frame spacing drift.
fn step_interval(duration: Duration) -> Result<Duration, Error> {
    let millis = duration.as_millis();
    if millis % u64::from(TRANSITION_STEPS) != 0 {
        return Err(Error::InvalidArgument);
    }
    Ok(Duration::from_millis(millis / u64::from(TRANSITION_STEPS)))
}

/// Linear interpolation of one channel at `step` of [`TRANSITION_STEPS`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn interpolate(from: u8, to: u8, step: u32) -> u8 {
    let delta = i32::from(to) - i32::from(from);
    let offset = delta * step as i32 / TRANSITION_STEPS as i32;
    (i32::from(from) + offset) as u8
}
