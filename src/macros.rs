use rustc_hash::FxHashMap;

use crate::error::GatewayError;

pub type MacroFn = Box<dyn Fn(&[String]) -> Option<String> + Send + Sync>;

// Registration happens before the server starts; after that the registry
// is only ever read, shared behind an Arc.
#[derive(Default)]
pub struct MacroRegistry {
    callbacks: FxHashMap<String, MacroFn>, // keyed by macro name
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, callback: F)
    where
        F: Fn(&[String]) -> Option<String> + Send + Sync + 'static,
    {
        self.callbacks.insert(name.to_string(), Box::new(callback));
    }

    pub fn invoke(&self, name: &str, args: &[String]) -> Result<Option<String>, GatewayError> {
        match self.callbacks.get(name) {
            Some(callback) => Ok(callback(args)),
            None => Err(GatewayError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invokes_registered_callback_with_args() {
        let mut registry = MacroRegistry::new();
        registry.register("join", |args| Some(args.join("+")));

        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(registry.invoke("join", &args).unwrap(), Some("a+b".to_string()));
    }

    #[test]
    fn unknown_macro_reports_its_name() {
        let registry = MacroRegistry::new();
        let err = registry.invoke("reboot", &[]).unwrap_err();
        assert_eq!(err.to_string(), "reboot Not Found");
    }

    #[test]
    fn callback_may_return_nothing() {
        let mut registry = MacroRegistry::new();
        registry.register("fire", |_| None);
        assert_eq!(registry.invoke("fire", &[]).unwrap(), None);
    }
}
