use crate::error::GatewayError;
use crate::pins::PinFunction;

// A request path parsed down to one protocol operation. Parsing validates
// everything up front so dispatch never sees a malformed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FullState,
    HeaderMap,
    Version,
    Revision,
    Read { pin: usize, op: ReadOp },
    Write { pin: usize, op: WriteOp },
    CallMacro { name: String, args: Vec<String> },
    ServeFile { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOp {
    Value,
    Function,
    Pwm,
    Pulse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Value(bool),
    Function(PinFunction),
    Sequence { period_ms: u64, bits: String },
    Pwm(Option<PwmSwitch>),
    Pulse,
    PulseRatio { ratio: f64, raw: String },
    PulseAngle { angle: f64, raw: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmSwitch {
    Enable,
    Disable,
}

pub fn parse_get(path: &str) -> Result<Command, GatewayError> {
    match path {
        "*" => return Ok(Command::FullState),
        "map" => return Ok(Command::HeaderMap),
        "version" => return Ok(Command::Version),
        "revision" => return Ok(Command::Revision),
        _ => {}
    }

    if let Some(rest) = path.strip_prefix("GPIO/") {
        let segments: Vec<&str> = rest.split('/').collect();
        let [pin, op] = segments.as_slice() else {
            return Err(GatewayError::PathNotFound);
        };
        let pin = parse_pin(pin)?;
        let op = match *op {
            "value" => ReadOp::Value,
            "function" => ReadOp::Function,
            "pwm" => ReadOp::Pwm,
            "pulse" => ReadOp::Pulse,
            unknown => return Err(GatewayError::NotFound(unknown.to_string())),
        };
        return Ok(Command::Read { pin, op });
    }

    // Anything else falls through to the document tree.
    Ok(Command::ServeFile {
        path: path.to_string(),
    })
}

pub fn parse_post(path: &str) -> Result<Command, GatewayError> {
    if let Some(rest) = path.strip_prefix("GPIO/") {
        let segments: Vec<&str> = rest.split('/').collect();
        let (pin, op, operand) = match segments.as_slice() {
            [pin, op] => (*pin, *op, None),
            [pin, op, operand] => (*pin, *op, Some(*operand)),
            _ => return Err(GatewayError::PathNotFound),
        };
        let pin = parse_pin(pin)?;
        let op = parse_write_op(op, operand)?;
        return Ok(Command::Write { pin, op });
    }

    if let Some(rest) = path.strip_prefix("macros/") {
        let segments: Vec<&str> = rest.split('/').collect();
        let [name, value] = segments.as_slice() else {
            return Err(GatewayError::PathNotFound);
        };
        return Ok(Command::CallMacro {
            name: name.to_string(),
            args: split_macro_args(value),
        });
    }

    Err(GatewayError::PathNotFound)
}

fn parse_pin(s: &str) -> Result<usize, GatewayError> {
    s.parse::<usize>().map_err(|_| GatewayError::BadPin)
}

fn parse_write_op(op: &str, operand: Option<&str>) -> Result<WriteOp, GatewayError> {
    match op {
        "value" => match operand {
            Some("0") => Ok(WriteOp::Value(false)),
            Some("1") => Ok(WriteOp::Value(true)),
            Some(_) => Err(GatewayError::BadValue),
            None => Err(GatewayError::PathNotFound),
        },
        "function" => {
            let operand = operand.ok_or(GatewayError::PathNotFound)?;
            let function = PinFunction::parse(operand).ok_or(GatewayError::BadFunction)?;
            Ok(WriteOp::Function(function))
        }
        "sequence" => {
            let operand = operand.ok_or(GatewayError::PathNotFound)?;
            let Some((period, bits)) = operand.split_once(',') else {
                return Err(GatewayError::BadValue);
            };
            let period_ms = period.parse::<u64>().map_err(|_| GatewayError::BadValue)?;
            if bits.is_empty() || bits.contains(',') {
                return Err(GatewayError::BadValue);
            }
            Ok(WriteOp::Sequence {
                period_ms,
                bits: bits.to_string(),
            })
        }
        "pwm" => {
            let operand = operand.ok_or(GatewayError::PathNotFound)?;
            // Literals other than enable/disable mutate nothing; the
            // response still reports the current state.
            let switch = match operand {
                "enable" => Some(PwmSwitch::Enable),
                "disable" => Some(PwmSwitch::Disable),
                _ => None,
            };
            Ok(WriteOp::Pwm(switch))
        }
        "pulse" => Ok(WriteOp::Pulse),
        "pulseRatio" => {
            let operand = operand.ok_or(GatewayError::PathNotFound)?;
            let ratio = operand.parse::<f64>().map_err(|_| GatewayError::BadValue)?;
            Ok(WriteOp::PulseRatio {
                ratio,
                raw: operand.to_string(),
            })
        }
        "pulseAngle" => {
            let operand = operand.ok_or(GatewayError::PathNotFound)?;
            let angle = operand.parse::<f64>().map_err(|_| GatewayError::BadValue)?;
            Ok(WriteOp::PulseAngle {
                angle,
                raw: operand.to_string(),
            })
        }
        unknown => Err(GatewayError::NotFound(unknown.to_string())),
    }
}

fn split_macro_args(value: &str) -> Vec<String> {
    if value.contains(',') {
        value.split(',').map(str::to_string).collect()
    } else if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}
