use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::pins::{PinController, PinError, PinFunction, Pulse, PulseKind};

pub struct SimulatedPins {
    revision: u8,
    pins: Vec<Mutex<SimPin>>, // keyed by pin index
}

struct SimPin {
    function: PinFunction,
    level: bool,
    pwm: bool,
    pulse: Pulse,
}

impl Default for SimPin {
    fn default() -> Self {
        Self {
            function: PinFunction::In,
            level: false,
            pwm: false,
            pulse: Pulse {
                kind: PulseKind::Ratio,
                value: 0.5,
            },
        }
    }
}

impl SimulatedPins {
    pub fn new(pin_count: usize, revision: u8) -> Self {
        let pins = (0..pin_count).map(|_| Mutex::new(SimPin::default())).collect();
        Self { revision, pins }
    }

    fn pin(&self, pin: usize) -> Result<&Mutex<SimPin>, PinError> {
        self.pins.get(pin).ok_or(PinError::InvalidChannel(pin))
    }
}

impl PinController for SimulatedPins {
    fn pin_count(&self) -> usize {
        self.pins.len()
    }

    fn board_revision(&self) -> u8 {
        self.revision
    }

    fn get_function(&self, pin: usize) -> Result<PinFunction, PinError> {
        Ok(self.pin(pin)?.lock().function)
    }

    fn set_function(&self, pin: usize, function: PinFunction) -> Result<(), PinError> {
        let mut state = self.pin(pin)?.lock();
        state.function = function;
        state.pwm = function == PinFunction::Pwm;
        Ok(())
    }

    fn read_value(&self, pin: usize) -> Result<bool, PinError> {
        // Level register is readable whatever the function.
        Ok(self.pin(pin)?.lock().level)
    }

    fn write_value(&self, pin: usize, level: bool) -> Result<(), PinError> {
        let mut state = self.pin(pin)?.lock();
        if state.function != PinFunction::Out {
            return Err(PinError::InvalidDirection(pin, "OUT"));
        }
        state.level = level;
        Ok(())
    }

    fn pwm_enabled(&self, pin: usize) -> Result<bool, PinError> {
        Ok(self.pin(pin)?.lock().pwm)
    }

    fn enable_pwm(&self, pin: usize) -> Result<(), PinError> {
        let mut state = self.pin(pin)?.lock();
        state.function = PinFunction::Pwm;
        state.pwm = true;
        Ok(())
    }

    fn disable_pwm(&self, pin: usize) -> Result<(), PinError> {
        let mut state = self.pin(pin)?.lock();
        state.pwm = false;
        Ok(())
    }

    fn pulse(&self, pin: usize) -> Result<(), PinError> {
        self.pin(pin)?;
        Ok(())
    }

    fn pulse_ratio(&self, pin: usize, ratio: f64) -> Result<(), PinError> {
        let mut state = self.pin(pin)?.lock();
        state.pulse = Pulse {
            kind: PulseKind::Ratio,
            value: ratio,
        };
        Ok(())
    }

    fn pulse_angle(&self, pin: usize, angle: f64) -> Result<(), PinError> {
        let mut state = self.pin(pin)?.lock();
        state.pulse = Pulse {
            kind: PulseKind::Angle,
            value: angle,
        };
        Ok(())
    }

    fn get_pulse(&self, pin: usize) -> Result<Pulse, PinError> {
        Ok(self.pin(pin)?.lock().pulse)
    }

    fn output_sequence(&self, pin: usize, period_ms: u64, bits: &str) -> Result<(), PinError> {
        for bit in bits.chars() {
            let level = bit != '0';
            {
                let mut state = self.pin(pin)?.lock();
                if state.function != PinFunction::Out {
                    return Err(PinError::InvalidDirection(pin, "OUT"));
                }
                state.level = level;
            }
            thread::sleep(Duration::from_millis(period_ms));
        }
        Ok(())
    }
}
