//! Converter registry for discovery and selection
//!
//! The registry is an ordinary value owned by whoever drives conversions.
//! It keeps converters in registration order and tracks which one is
//! active; having no active converter is a valid state.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::converter::{Conversion, Converter, Diagnostics, NestedXmlConverter};
use crate::error::Error;

const NO_CONVERTER: &str = "No converter selected.";
const CONVERSION_FAILED: &str = "Conversion failed. Check the input or select another strategy.";

/// Registry of conversion strategies
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), mdxml::Error> {
/// let mut registry = mdxml::ConverterRegistry::with_defaults();
/// registry.set_active("nested-xml")?;
/// let result = registry.convert("# Title");
/// assert_eq!(result.output, "<title>\n</title>");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConverterRegistry {
    converters: Vec<Box<dyn Converter>>,
    active: Option<String>,
    last_diagnostics: Option<Diagnostics>,
}

impl ConverterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in converter
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NestedXmlConverter::new());
        registry
    }

    /// Register a converter
    ///
    /// A converter with an id that is already registered replaces the old
    /// one in place. The first converter registered becomes active.
    pub fn register<C: Converter + 'static>(&mut self, converter: C) {
        let id = converter.id().to_string();
        match self.converters.iter().position(|c| c.id() == id) {
            Some(index) => self.converters[index] = Box::new(converter),
            None => self.converters.push(Box::new(converter)),
        }

        if self.active.is_none() {
            self.active = Some(id);
        }
    }

    /// Converters in registration order
    pub fn list_converters(&self) -> Vec<&dyn Converter> {
        self.converters.iter().map(|c| c.as_ref()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&dyn Converter> {
        self.converters
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.as_ref())
    }

    pub fn get_active(&self) -> Option<&dyn Converter> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, id: &str) -> Result<(), Error> {
        if self.get(id).is_none() {
            return Err(Error::UnknownConverter(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Diagnostics of the most recent conversion
    pub fn last_diagnostics(&self) -> Option<&Diagnostics> {
        self.last_diagnostics.as_ref()
    }

    /// Run the active converter.
    ///
    /// Never fails: a missing converter, an error or a panic inside the
    /// converter yields empty output with the reason in the diagnostics
    /// messages.
    pub fn convert(&mut self, input: &str) -> Conversion {
        let Some(active) = self.get_active() else {
            return Conversion {
                output: String::new(),
                diagnostics: Diagnostics {
                    messages: vec![NO_CONVERTER.to_string()],
                    ..Diagnostics::default()
                },
            };
        };

        let strategy = active.label().to_string();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| active.convert(input)))
            .unwrap_or_else(|payload| Err(Error::ConversionFailed(panic_message(payload))));

        let conversion = match outcome {
            Ok(mut conversion) => {
                conversion.diagnostics.strategy = Some(strategy);
                conversion
            }
            Err(error) => {
                log::warn!("Converter '{}' failed: {}", active.id(), error);
                Conversion {
                    output: String::new(),
                    diagnostics: Diagnostics {
                        duration_ms: 0.0,
                        messages: vec![CONVERSION_FAILED.to_string(), error.to_string()],
                        strategy: Some(strategy),
                    },
                }
            }
        };

        self.last_diagnostics = Some(conversion.diagnostics.clone());
        conversion
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "converter panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct EchoConverter;
    impl Converter for EchoConverter {
        fn id(&self) -> &str {
            "echo"
        }
        fn convert(&self, markdown: &str) -> Result<Conversion, Error> {
            Ok(Conversion {
                output: markdown.to_string(),
                diagnostics: Diagnostics::default(),
            })
        }
    }

    struct FailingConverter;
    impl Converter for FailingConverter {
        fn id(&self) -> &str {
            "failing"
        }
        fn label(&self) -> &str {
            "Always fails"
        }
        fn convert(&self, _markdown: &str) -> Result<Conversion, Error> {
            Err(Error::ConversionFailed("boom".to_string()))
        }
    }

    struct PanickingConverter;
    impl Converter for PanickingConverter {
        fn id(&self) -> &str {
            "panicking"
        }
        fn convert(&self, _markdown: &str) -> Result<Conversion, Error> {
            panic!("index out of range");
        }
    }

    fn ids(registry: &ConverterRegistry) -> Vec<&str> {
        registry.list_converters().iter().map(|c| c.id()).collect()
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = ConverterRegistry::new();
        assert!(registry.list_converters().is_empty());
        assert!(registry.get_active().is_none());
        assert!(registry.last_diagnostics().is_none());
    }

    #[test]
    fn first_registered_becomes_active() {
        let mut registry = ConverterRegistry::new();
        registry.register(EchoConverter);
        registry.register(FailingConverter);

        assert_eq!(ids(&registry), vec!["echo", "failing"]);
        assert_eq!(registry.get_active().map(|c| c.id()), Some("echo"));
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut registry = ConverterRegistry::new();
        registry.register(EchoConverter);
        registry.register(FailingConverter);
        registry.register(EchoConverter);

        assert_eq!(ids(&registry), vec!["echo", "failing"]);
    }

    #[test]
    fn set_active_switches_converter() {
        let mut registry = ConverterRegistry::new();
        registry.register(EchoConverter);
        registry.register(FailingConverter);

        assert_eq!(registry.set_active("failing"), Ok(()));
        assert_eq!(registry.get_active().map(|c| c.id()), Some("failing"));
    }

    #[test]
    fn set_active_unknown_id() {
        let mut registry = ConverterRegistry::with_defaults();
        assert_eq!(
            registry.set_active("missing"),
            Err(Error::UnknownConverter("missing".to_string()))
        );
        assert_eq!(registry.get_active().map(|c| c.id()), Some("nested-xml"));
    }

    #[test]
    fn convert_without_converter() {
        let mut registry = ConverterRegistry::new();
        let result = registry.convert("# Title");

        assert_eq!(result.output, "");
        assert_eq!(result.diagnostics.messages, vec!["No converter selected."]);
    }

    #[test]
    fn convert_delegates_to_active() {
        let mut registry = ConverterRegistry::with_defaults();
        let result = registry.convert("# Title\nBody");

        assert_eq!(result.output, "<title>\n  Body\n</title>");
        assert_eq!(result.diagnostics.strategy.as_deref(), Some("Nested XML"));
        assert_eq!(registry.last_diagnostics(), Some(&result.diagnostics));
    }

    #[test]
    fn convert_failure_becomes_diagnostics() {
        let mut registry = ConverterRegistry::new();
        registry.register(FailingConverter);
        let result = registry.convert("anything");

        assert_eq!(result.output, "");
        assert_eq!(
            result.diagnostics.messages,
            vec![
                "Conversion failed. Check the input or select another strategy.",
                "boom"
            ]
        );
        assert_eq!(result.diagnostics.strategy.as_deref(), Some("Always fails"));
        assert_eq!(registry.last_diagnostics(), Some(&result.diagnostics));
    }

    #[test]
    fn convert_panic_becomes_diagnostics() {
        let mut registry = ConverterRegistry::new();
        registry.register(PanickingConverter);
        let result = registry.convert("anything");

        assert_eq!(result.output, "");
        assert_eq!(
            result.diagnostics.messages,
            vec![
                "Conversion failed. Check the input or select another strategy.",
                "index out of range"
            ]
        );
        assert_eq!(result.diagnostics.strategy.as_deref(), Some("panicking"));

        // The registry stays usable afterwards
        registry.register(EchoConverter);
        registry.set_active("echo").unwrap();
        assert_eq!(registry.convert("ok").output, "ok");
    }
}
