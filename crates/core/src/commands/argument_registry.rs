use super::argument::{
    ArgumentDescriptor, ArgumentProperties, ClientCompletionKey, EntityFlags, NumericRange,
    StringMode,
};
use super::error::RegistrationError;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Builds the descriptor for one argument kind. The key passed in is the
/// kind's own key, so one factory can serve several kinds.
pub type ArgumentFactory = fn(ClientCompletionKey) -> ArgumentDescriptor;

pub fn string_factory(key: ClientCompletionKey) -> ArgumentDescriptor {
    ArgumentDescriptor::new(key, ArgumentProperties::String(StringMode::Word))
}

pub fn int_factory(key: ClientCompletionKey) -> ArgumentDescriptor {
    ArgumentDescriptor::new(
        key,
        ArgumentProperties::Range(NumericRange::Int {
            min: None,
            max: None,
        }),
    )
}

pub fn long_factory(key: ClientCompletionKey) -> ArgumentDescriptor {
    ArgumentDescriptor::new(
        key,
        ArgumentProperties::Range(NumericRange::Long {
            min: None,
            max: None,
        }),
    )
}

pub fn float_factory(key: ClientCompletionKey) -> ArgumentDescriptor {
    ArgumentDescriptor::new(
        key,
        ArgumentProperties::Range(NumericRange::Float {
            min: None,
            max: None,
        }),
    )
}

pub fn double_factory(key: ClientCompletionKey) -> ArgumentDescriptor {
    ArgumentDescriptor::new(
        key,
        ArgumentProperties::Range(NumericRange::Double {
            min: None,
            max: None,
        }),
    )
}

pub fn entity_factory(key: ClientCompletionKey) -> ArgumentDescriptor {
    ArgumentDescriptor::new(key, ArgumentProperties::Entity(EntityFlags::empty()))
}

pub fn opaque_factory(key: ClientCompletionKey) -> ArgumentDescriptor {
    ArgumentDescriptor::new(key, ArgumentProperties::Opaque)
}

/// Maps argument kind ids to the factory that builds their descriptor.
///
/// Open for registration until [`ArgumentRegistry::freeze`] is called, read
/// only afterwards. Kinds that were never registered resolve to
/// [`opaque_factory`], so a new or unknown kind degrades into an argument
/// slot without client side suggestions instead of breaking synthesis.
#[derive(Debug, Clone, Default)]
pub struct ArgumentRegistry {
    factories: FxHashMap<String, ArgumentFactory>,
    frozen: bool,
}

impl ArgumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the argument kinds every vanilla client understands.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults: [(&str, ArgumentFactory); 6] = [
            ("brigadier:double", double_factory),
            ("brigadier:float", float_factory),
            ("brigadier:integer", int_factory),
            ("brigadier:long", long_factory),
            ("brigadier:string", string_factory),
            ("minecraft:entity", entity_factory),
        ];
        for (kind, factory) in defaults {
            registry.factories.insert(kind.to_string(), factory);
        }
        registry
    }

    /// Registers `factory` for `kind`. Registering a kind twice replaces the
    /// earlier factory.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: ArgumentFactory,
    ) -> Result<(), RegistrationError> {
        let kind = kind.into();
        if self.frozen {
            return Err(RegistrationError::Frozen {
                what: format!("argument kind '{}'", kind),
            });
        }
        if self.factories.insert(kind.clone(), factory).is_some() {
            debug!("Argument kind '{}' registered again, replacing factory", kind);
        }
        Ok(())
    }

    pub fn resolve(&self, kind: &str) -> ArgumentFactory {
        match self.factories.get(kind) {
            Some(factory) => *factory,
            None => {
                debug!("Unknown argument kind '{}', using opaque fallback", kind);
                opaque_factory
            }
        }
    }

    pub fn create(&self, kind: &str) -> ArgumentDescriptor {
        self.resolve(kind)(ClientCompletionKey::new(kind))
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
