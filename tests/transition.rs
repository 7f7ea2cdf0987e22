mod tests {
    use embassy_time::Duration;
    use zigbee_light_core::color::xy_to_rgb;
    use zigbee_light_core::{ColorXY, Error, OutputDriver, Rgb, SingleLed, TRANSITION_STEPS};

    /// Driver that records every latched frame and can start failing
    /// after a given number of successful pushes.
    struct RecordingDriver {
        staged: Rgb,
        frames: Vec<Rgb>,
        fail_after: Option<usize>,
    }

    impl RecordingDriver {
        fn new() -> Self {
            Self {
                staged: Rgb::new(0, 0, 0),
                frames: Vec::new(),
                fail_after: None,
            }
        }

        fn failing_after(pushes: usize) -> Self {
            Self {
                fail_after: Some(pushes),
                ..Self::new()
            }
        }
    }

    impl OutputDriver for RecordingDriver {
        fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), Error> {
            assert_eq!(index, 0);
            self.staged = color;
            Ok(())
        }

        fn push(&mut self) -> Result<(), Error> {
            if self.fail_after.is_some_and(|limit| self.frames.len() >= limit) {
                return Err(Error::Hardware);
            }
            self.frames.push(self.staged);
            Ok(())
        }
    }

    const COLOR: ColorXY = ColorXY::new(0.5, 0.5);

    fn led_off() -> SingleLed<RecordingDriver> {
        SingleLed::new(RecordingDriver::new(), false, 1.0, COLOR).unwrap()
    }

    #[test]
    fn test_zero_duration_color_is_a_single_push() {
        let mut led = led_off();
        led.transition_color(Rgb::new(10, 20, 30), Duration::from_millis(0))
            .unwrap();

        // One frame from construction, one from the immediate set.
        assert_eq!(led.driver().frames.len(), 2);
        assert_eq!(led.driver().frames[1], Rgb::new(10, 20, 30));
        assert_eq!(led.rgb(), Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_uneven_duration_is_rejected_without_pushes() {
        let mut led = led_off();
        let result = led.transition_color(Rgb::new(255, 0, 0), Duration::from_millis(150));

        assert_eq!(result, Err(Error::InvalidArgument));
        assert_eq!(led.driver().frames.len(), 1);
        assert_eq!(led.rgb(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_color_transition_reaches_target_in_fixed_steps() {
        let mut led = led_off();
        led.transition_color(Rgb::new(200, 100, 0), Duration::from_millis(100))
            .unwrap();

        let frames = &led.driver().frames;
        assert_eq!(frames.len() - 1, TRANSITION_STEPS as usize);
        // Channels ramp independently and linearly.
        assert_eq!(frames[1], Rgb::new(2, 1, 0));
        assert_eq!(frames[50], Rgb::new(100, 50, 0));
        assert_eq!(*frames.last().unwrap(), Rgb::new(200, 100, 0));
        assert_eq!(led.rgb(), Rgb::new(200, 100, 0));
    }

    #[test]
    fn test_driver_failure_aborts_mid_transition() {
        let driver = RecordingDriver::failing_after(41);
        let mut led = SingleLed::new(driver, false, 1.0, COLOR).unwrap();

        let result = led.transition_color(Rgb::new(100, 100, 100), Duration::from_millis(100));
        assert_eq!(result, Err(Error::Hardware));

        // 1 construction frame + 40 transition frames made it out; the
        // live value stays at the last frame that reached the bus.
        assert_eq!(led.driver().frames.len(), 41);
        assert_eq!(led.rgb(), Rgb::new(40, 40, 40));
        assert_eq!(*led.driver().frames.last().unwrap(), led.rgb());
    }

    #[test]
    fn test_brightness_transition_reaches_target() {
        let mut led = SingleLed::new(RecordingDriver::new(), true, 0.0, COLOR).unwrap();
        led.transition_brightness(1.0, Duration::from_millis(100))
            .unwrap();

        assert!((led.brightness() - 1.0).abs() < 1e-12);
        let frames = &led.driver().frames;
        assert_eq!(frames.len() - 1, TRANSITION_STEPS as usize);
        assert_eq!(*frames.last().unwrap(), xy_to_rgb(COLOR, 1.0));
    }

    #[test]
    fn test_brightness_transition_rejects_out_of_range_target() {
        let mut led = led_off();
        let result = led.transition_brightness(1.2, Duration::from_millis(100));

        assert_eq!(result, Err(Error::InvalidArgument));
        assert_eq!(led.driver().frames.len(), 1);
        assert!((led.brightness() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uneven_brightness_duration_is_rejected() {
        let mut led = led_off();
        let result = led.transition_brightness(0.5, Duration::from_millis(42));

        assert_eq!(result, Err(Error::InvalidArgument));
        assert_eq!(led.driver().frames.len(), 1);
    }

    #[test]
    fn test_brightness_failure_keeps_last_rendered_level() {
        let driver = RecordingDriver::failing_after(51);
        let mut led = SingleLed::new(driver, true, 0.0, COLOR).unwrap();

        let result = led.transition_brightness(1.0, Duration::from_millis(100));
        assert_eq!(result, Err(Error::Hardware));

        // 50 steps rendered, so the level stopped at the halfway point.
        assert_eq!(led.driver().frames.len(), 51);
        assert!((led.brightness() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_duration_brightness_equals_immediate_set() {
        let mut led = SingleLed::new(RecordingDriver::new(), true, 1.0, COLOR).unwrap();
        led.transition_brightness(0.3, Duration::from_millis(0))
            .unwrap();

        assert_eq!(led.driver().frames.len(), 2);
        assert_eq!(led.driver().frames[1], xy_to_rgb(COLOR, 0.3));
        assert!((led.brightness() - 0.3).abs() < 1e-12);
    }
}
