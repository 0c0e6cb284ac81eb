use bitflags::bitflags;
use std::fmt;
use tracing::warn;

/// Stable identifier of an argument kind, e.g. `brigadier:string`. It picks
/// the builder factory at registration time and is sent to the client as
/// the parser id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientCompletionKey(String);

impl ClientCompletionKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientCompletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientCompletionKey {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringMode {
    #[default]
    Word,
    Phrase,
    Greedy,
}

impl StringMode {
    pub fn wire_id(self) -> i32 {
        match self {
            StringMode::Word => 0,
            StringMode::Phrase => 1,
            StringMode::Greedy => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericRange {
    Int { min: Option<i32>, max: Option<i32> },
    Long { min: Option<i64>, max: Option<i64> },
    Float { min: Option<f32>, max: Option<f32> },
    Double { min: Option<f64>, max: Option<f64> },
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntityFlags: u8 {
        const SINGLE_TARGET = 0x01;
        const PLAYERS_ONLY = 0x02;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentProperties {
    String(StringMode),
    Range(NumericRange),
    Entity(EntityFlags),
    /// Validated by the server only, nothing to send beyond the key.
    Opaque,
}

impl ArgumentProperties {
    fn kind_name(&self) -> &'static str {
        match self {
            ArgumentProperties::String(_) => "string",
            ArgumentProperties::Range(_) => "range",
            ArgumentProperties::Entity(_) => "entity",
            ArgumentProperties::Opaque => "opaque",
        }
    }
}

/// The client renderable description of an argument slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDescriptor {
    key: ClientCompletionKey,
    properties: ArgumentProperties,
}

macro_rules! range_setter {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        pub fn $fn_name(mut self, min: Option<$ty>, max: Option<$ty>) -> Self {
            match &mut self.properties {
                ArgumentProperties::Range(NumericRange::$variant { min: lo, max: hi }) => {
                    *lo = min;
                    *hi = max;
                }
                _ => self.mismatch(stringify!($fn_name)),
            }
            self
        }
    };
}

impl ArgumentDescriptor {
    pub fn new(key: ClientCompletionKey, properties: ArgumentProperties) -> Self {
        Self { key, properties }
    }

    pub fn key(&self) -> &ClientCompletionKey {
        &self.key
    }

    pub fn properties(&self) -> &ArgumentProperties {
        &self.properties
    }

    fn mismatch(&self, setter: &str) {
        warn!(
            "Ignoring {} on argument kind '{}' which has {} properties",
            setter,
            self.key,
            self.properties.kind_name()
        );
    }

    pub fn mode(mut self, mode: StringMode) -> Self {
        match &mut self.properties {
            ArgumentProperties::String(current) => *current = mode,
            _ => self.mismatch("mode"),
        }
        self
    }

    range_setter!(int_range, Int, i32);
    range_setter!(long_range, Long, i64);
    range_setter!(float_range, Float, f32);
    range_setter!(double_range, Double, f64);

    pub fn single_target(self) -> Self {
        self.entity_flag(EntityFlags::SINGLE_TARGET, "single_target")
    }

    pub fn players_only(self) -> Self {
        self.entity_flag(EntityFlags::PLAYERS_ONLY, "players_only")
    }

    fn entity_flag(mut self, flag: EntityFlags, setter: &str) -> Self {
        match &mut self.properties {
            ArgumentProperties::Entity(flags) => *flags |= flag,
            _ => self.mismatch(setter),
        }
        self
    }
}
