use std::sync::Arc;

use actix_web::http::Method;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::auth::AuthGate;
use crate::board::{FUNCTION_GROUPS, header_map};
use crate::command::{self, Command, PwmSwitch, ReadOp, WriteOp};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::files::StaticFiles;
use crate::macros::MacroRegistry;
use crate::pins::{PinController, PinError, PinFunction, Pulse};

pub struct AppState<P: PinController> {
    pub pins: Arc<P>,
    pub macros: Arc<MacroRegistry>,
    pub auth: Arc<AuthGate>,
    pub context: String,
    pub files: Arc<StaticFiles>,
}

impl<P: PinController> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            pins: Arc::clone(&self.pins),
            macros: Arc::clone(&self.macros),
            auth: Arc::clone(&self.auth),
            context: self.context.clone(),
            files: Arc::clone(&self.files),
        }
    }
}

impl<P: PinController> AppState<P> {
    pub fn new(
        config: &GatewayConfig,
        pins: Arc<P>,
        macros: MacroRegistry,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            pins,
            macros: Arc::new(macros),
            auth: Arc::new(config.auth_gate()?),
            context: config.normalized_context(),
            files: Arc::new(StaticFiles::new(config.doc_root.clone(), &config.index)),
        })
    }
}

pub fn register<P: PinController + 'static>(cfg: &mut web::ServiceConfig, state: AppState<P>) {
    cfg.app_data(web::Data::new(state))
        .default_service(web::route().to(entry::<P>));
}

async fn entry<P: PinController + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<P>>,
) -> Result<HttpResponse, GatewayError> {
    let method = req.method();
    if method == Method::GET {
        handle_get(&req, state.get_ref())
    } else if method == Method::POST {
        handle_post(&req, state.get_ref())
    } else {
        Ok(method_not_allowed())
    }
}

fn handle_get<P: PinController>(
    req: &HttpRequest,
    state: &AppState<P>,
) -> Result<HttpResponse, GatewayError> {
    authorize(req, state)?;

    let path = relative_path(req.path(), &state.context);
    match command::parse_get(path)? {
        Command::FullState => {
            let snapshot = full_state(state.pins.as_ref())?;
            Ok(HttpResponse::Ok().json(snapshot))
        }
        Command::HeaderMap => {
            Ok(HttpResponse::Ok().json(header_map(state.pins.board_revision())))
        }
        Command::Version => Ok(text_response(crate::SERVER_VERSION.to_string())),
        Command::Revision => Ok(text_response(state.pins.board_revision().to_string())),
        Command::Read { pin, op } => {
            let text = match op {
                ReadOp::Value => binary_text(state.pins.read_value(pin)?),
                ReadOp::Function => state.pins.get_function(pin)?.to_string(),
                ReadOp::Pwm => pwm_text(state.pins.pwm_enabled(pin)?),
                ReadOp::Pulse => state.pins.get_pulse(pin)?.to_string(),
            };
            Ok(text_response(text))
        }
        Command::ServeFile { path } => {
            let (bytes, content_type) = state.files.resolve(&path)?;
            Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
        }
        Command::Write { .. } | Command::CallMacro { .. } => Err(GatewayError::PathNotFound),
    }
}

fn handle_post<P: PinController>(
    req: &HttpRequest,
    state: &AppState<P>,
) -> Result<HttpResponse, GatewayError> {
    authorize(req, state)?;

    let path = relative_path(req.path(), &state.context);
    match command::parse_post(path)? {
        Command::Write { pin, op } => write_pin(state.pins.as_ref(), pin, op),
        Command::CallMacro { name, args } => {
            let result = state.macros.invoke(&name, &args)?;
            Ok(text_response(result.unwrap_or_default()))
        }
        _ => Err(GatewayError::PathNotFound),
    }
}

// Hardware refusals on the mutation path surface as 403 with the
// controller's message; everywhere else they stay server faults.
fn write_pin<P: PinController>(
    pins: &P,
    pin: usize,
    op: WriteOp,
) -> Result<HttpResponse, GatewayError> {
    let denied = |e: PinError| GatewayError::Denied(e.to_string());

    let text = match op {
        WriteOp::Value(level) => {
            pins.write_value(pin, level).map_err(denied)?;
            binary_text(level)
        }
        WriteOp::Function(function) => {
            pins.set_function(pin, function).map_err(denied)?;
            pins.get_function(pin).map_err(denied)?.to_string()
        }
        WriteOp::Sequence { period_ms, bits } => {
            pins.output_sequence(pin, period_ms, &bits).map_err(denied)?;
            bits.chars().last().map(String::from).unwrap_or_default()
        }
        WriteOp::Pwm(switch) => {
            match switch {
                Some(PwmSwitch::Enable) => pins.enable_pwm(pin).map_err(denied)?,
                Some(PwmSwitch::Disable) => pins.disable_pwm(pin).map_err(denied)?,
                None => {}
            }
            pwm_text(pins.pwm_enabled(pin).map_err(denied)?)
        }
        WriteOp::Pulse => {
            pins.pulse(pin).map_err(denied)?;
            "OK".to_string()
        }
        WriteOp::PulseRatio { ratio, raw } => {
            pins.pulse_ratio(pin, ratio).map_err(denied)?;
            raw
        }
        WriteOp::PulseAngle { angle, raw } => {
            pins.pulse_angle(pin, angle).map_err(denied)?;
            raw
        }
    };

    Ok(text_response(text))
}

fn authorize<P: PinController>(
    req: &HttpRequest,
    state: &AppState<P>,
) -> Result<(), GatewayError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if state.auth.authorize(auth_header) {
        Ok(())
    } else {
        Err(GatewayError::Unauthorized(state.auth.realm().to_string()))
    }
}

// The context prefix is an envelope around the protocol; paths outside it
// still reach the document tree.
fn relative_path<'a>(path: &'a str, context: &str) -> &'a str {
    match path.strip_prefix(context) {
        Some(rest) => rest,
        None => path.trim_start_matches('/'),
    }
}

fn binary_text(level: bool) -> String {
    if level { "1" } else { "0" }.to_string()
}

fn pwm_text(enabled: bool) -> String {
    if enabled { "enabled" } else { "disabled" }.to_string()
}

fn text_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(body)
}

fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().finish()
}

// Snapshot emission order is part of the wire format: the function groups
// in table order, then "GPIO" keyed by ascending pin index. Serialized by
// hand because generic JSON maps reorder keys.
struct FullState {
    groups: Vec<(&'static str, u8)>,
    pins: Vec<PinSnapshot>,
}

struct PinSnapshot {
    pin: usize,
    function: String,
    value: u8,
    pulse: Option<Pulse>,
}

impl Serialize for FullState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        for (name, enabled) in &self.groups {
            map.serialize_entry(name, enabled)?;
        }
        map.serialize_entry("GPIO", &GpioMap { pins: &self.pins })?;
        map.end()
    }
}

struct GpioMap<'a> {
    pins: &'a [PinSnapshot],
}

impl Serialize for GpioMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pins.len()))?;
        for snapshot in self.pins {
            map.serialize_entry(&snapshot.pin.to_string(), &PinEntry { snapshot })?;
        }
        map.end()
    }
}

struct PinEntry<'a> {
    snapshot: &'a PinSnapshot,
}

impl Serialize for PinEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("function", &self.snapshot.function)?;
        map.serialize_entry("value", &self.snapshot.value)?;
        if let Some(pulse) = &self.snapshot.pulse {
            map.serialize_entry(&pulse.kind.to_string(), &pulse.value)?;
        }
        map.end()
    }
}

fn full_state<P: PinController>(pins: &P) -> Result<FullState, GatewayError> {
    let groups = FUNCTION_GROUPS
        .iter()
        .map(|group| (group.name, u8::from(group.enabled)))
        .collect();

    let mut snapshots = Vec::with_capacity(pins.pin_count());
    for pin in 0..pins.pin_count() {
        let function = pins.get_function(pin)?;
        let pulse = if function == PinFunction::Pwm {
            Some(pins.get_pulse(pin)?)
        } else {
            None
        };
        snapshots.push(PinSnapshot {
            pin,
            function: function.to_string(),
            value: u8::from(pins.read_value(pin)?),
            pulse,
        });
    }

    Ok(FullState {
        groups,
        pins: snapshots,
    })
}
