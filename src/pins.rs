use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinError {
    #[error("Unknown channel {0}")]
    InvalidChannel(usize),
    #[error("Channel {0} is not configured as {1}")]
    InvalidDirection(usize, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    In,
    Out,
    Pwm,
    Alt(u8),
}

impl PinFunction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "in" => Some(PinFunction::In),
            "out" => Some(PinFunction::Out),
            "pwm" => Some(PinFunction::Pwm),
            _ => None,
        }
    }
}

impl fmt::Display for PinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinFunction::In => write!(f, "IN"),
            PinFunction::Out => write!(f, "OUT"),
            PinFunction::Pwm => write!(f, "PWM"),
            PinFunction::Alt(n) => write!(f, "ALT{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseKind {
    Ratio,
    Angle,
}

impl fmt::Display for PulseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PulseKind::Ratio => write!(f, "ratio"),
            PulseKind::Angle => write!(f, "angle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub kind: PulseKind,
    pub value: f64,
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:.2}", self.kind, self.value)
    }
}

pub trait PinController: Send + Sync {
    fn pin_count(&self) -> usize;
    fn board_revision(&self) -> u8;
    fn get_function(&self, pin: usize) -> Result<PinFunction, PinError>;
    fn set_function(&self, pin: usize, function: PinFunction) -> Result<(), PinError>;
    fn read_value(&self, pin: usize) -> Result<bool, PinError>;
    fn write_value(&self, pin: usize, level: bool) -> Result<(), PinError>;
    fn pwm_enabled(&self, pin: usize) -> Result<bool, PinError>;
    fn enable_pwm(&self, pin: usize) -> Result<(), PinError>;
    fn disable_pwm(&self, pin: usize) -> Result<(), PinError>;
    fn pulse(&self, pin: usize) -> Result<(), PinError>;
    fn pulse_ratio(&self, pin: usize, ratio: f64) -> Result<(), PinError>;
    fn pulse_angle(&self, pin: usize, angle: f64) -> Result<(), PinError>;
    fn get_pulse(&self, pin: usize) -> Result<Pulse, PinError>;
    fn output_sequence(&self, pin: usize, period_ms: u64, bits: &str) -> Result<(), PinError>;
}
