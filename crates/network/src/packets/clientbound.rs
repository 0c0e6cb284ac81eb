use super::{DecodeResult, PacketDecodeError, PacketDecoderExt, PacketEncoder, PacketEncoderExt};
use tracing::trace;

pub trait ClientBoundPacket {
    fn encode(&self) -> PacketEncoder;
}

/// Properties trailing the parser identifier of an argument node.
#[derive(Debug, Clone, PartialEq)]
pub enum CCommandsNodeProperties {
    None,
    /// brigadier:string, 0 = single word, 1 = quotable phrase, 2 = greedy
    String(i32),
    Integer { min: Option<i32>, max: Option<i32> },
    Long { min: Option<i64>, max: Option<i64> },
    Float { min: Option<f32>, max: Option<f32> },
    Double { min: Option<f64>, max: Option<f64> },
    /// minecraft:entity, 0x01 = single target, 0x02 = players only
    Entity(u8),
}

const RANGE_HAS_MIN: u8 = 0x01;
const RANGE_HAS_MAX: u8 = 0x02;

fn range_flags<T>(min: &Option<T>, max: &Option<T>) -> u8 {
    let mut flags = 0;
    if min.is_some() {
        flags |= RANGE_HAS_MIN;
    }
    if max.is_some() {
        flags |= RANGE_HAS_MAX;
    }
    flags
}

impl CCommandsNodeProperties {
    fn write(&self, buf: &mut Vec<u8>) {
        use CCommandsNodeProperties::*;
        match self {
            None => {}
            String(mode) => buf.write_varint(*mode),
            Integer { min, max } => {
                buf.write_unsigned_byte(range_flags(min, max));
                min.iter().chain(max).for_each(|v| buf.write_int(*v));
            }
            Long { min, max } => {
                buf.write_unsigned_byte(range_flags(min, max));
                min.iter().chain(max).for_each(|v| buf.write_long(*v));
            }
            Float { min, max } => {
                buf.write_unsigned_byte(range_flags(min, max));
                min.iter().chain(max).for_each(|v| buf.write_float(*v));
            }
            Double { min, max } => {
                buf.write_unsigned_byte(range_flags(min, max));
                min.iter().chain(max).for_each(|v| buf.write_double(*v));
            }
            Entity(flags) => buf.write_unsigned_byte(*flags),
        }
    }

    /// Reads the properties the vanilla client expects after `identifier`.
    /// Parsers the client does not know carry no properties.
    fn read<T: PacketDecoderExt>(identifier: &str, reader: &mut T) -> DecodeResult<Self> {
        macro_rules! read_range {
            ($variant:ident, $read:ident) => {{
                let flags = reader.read_unsigned_byte()?;
                let min = if flags & RANGE_HAS_MIN != 0 {
                    Some(reader.$read()?)
                } else {
                    Option::None
                };
                let max = if flags & RANGE_HAS_MAX != 0 {
                    Some(reader.$read()?)
                } else {
                    Option::None
                };
                CCommandsNodeProperties::$variant { min, max }
            }};
        }

        Ok(match identifier {
            "brigadier:string" => CCommandsNodeProperties::String(reader.read_varint()?),
            "brigadier:integer" => read_range!(Integer, read_int),
            "brigadier:long" => read_range!(Long, read_long),
            "brigadier:float" => read_range!(Float, read_float),
            "brigadier:double" => read_range!(Double, read_double),
            "minecraft:entity" => CCommandsNodeProperties::Entity(reader.read_unsigned_byte()?),
            _ => {
                trace!("Parser '{}' has no properties", identifier);
                CCommandsNodeProperties::None
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CCommandsNodeParser {
    pub identifier: String,
    pub properties: CCommandsNodeProperties,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CCommandsNode {
    pub flags: u8,
    pub children: Vec<i32>,
    pub redirect_node: Option<i32>,
    pub name: Option<String>,
    pub parser: Option<CCommandsNodeParser>,
    pub suggestions_type: Option<String>,
}

impl CCommandsNode {
    pub const KIND_MASK: u8 = 0x03;
    pub const KIND_ROOT: u8 = 0x00;
    pub const KIND_LITERAL: u8 = 0x01;
    pub const KIND_ARGUMENT: u8 = 0x02;
    pub const EXECUTABLE: u8 = 0x04;
    pub const REDIRECT: u8 = 0x08;
    pub const SUGGESTIONS: u8 = 0x10;

    pub fn kind(&self) -> u8 {
        self.flags & Self::KIND_MASK
    }

    fn write(&self, buf: &mut Vec<u8>) {
        buf.write_unsigned_byte(self.flags);
        buf.write_varint(self.children.len() as i32);
        for child in &self.children {
            buf.write_varint(*child);
        }
        if let Some(redirect_node) = self.redirect_node {
            buf.write_varint(redirect_node);
        }
        if let Some(name) = &self.name {
            buf.write_string(name);
        }
        if let Some(parser) = &self.parser {
            buf.write_string(&parser.identifier);
            parser.properties.write(buf);
        }
        if let Some(suggestions_type) = &self.suggestions_type {
            buf.write_string(suggestions_type);
        }
    }

    /// Reads a single node the same way the client does: the flag byte
    /// decides which optional fields follow.
    pub fn read<T: PacketDecoderExt>(reader: &mut T) -> DecodeResult<CCommandsNode> {
        let flags = reader.read_unsigned_byte()?;
        let child_count = reader.read_length()?;
        let mut children = Vec::with_capacity(child_count);
        for _ in 0..child_count {
            children.push(reader.read_varint()?);
        }
        let redirect_node = if flags & Self::REDIRECT != 0 {
            Some(reader.read_varint()?)
        } else {
            None
        };

        let kind = flags & Self::KIND_MASK;
        let name = if kind == Self::KIND_LITERAL || kind == Self::KIND_ARGUMENT {
            Some(reader.read_string()?)
        } else {
            None
        };

        let mut parser = None;
        let mut suggestions_type = None;
        if kind == Self::KIND_ARGUMENT {
            let identifier = reader.read_string()?;
            let properties = CCommandsNodeProperties::read(&identifier, reader)?;
            parser = Some(CCommandsNodeParser {
                identifier,
                properties,
            });
            if flags & Self::SUGGESTIONS != 0 {
                suggestions_type = Some(reader.read_string()?);
            }
        }

        Ok(CCommandsNode {
            flags,
            children,
            redirect_node,
            name,
            parser,
            suggestions_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CCommands {
    pub nodes: Vec<CCommandsNode>,
    pub root_index: i32,
}

impl CCommands {
    /// Declare Commands packet id in the play state.
    pub const PACKET_ID: u32 = 0x12;

    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.write_varint(self.nodes.len() as i32);
        for node in &self.nodes {
            node.write(buf);
        }
        buf.write_varint(self.root_index);
    }

    pub fn decode<T: PacketDecoderExt>(reader: &mut T) -> DecodeResult<CCommands> {
        let count = reader.read_length()?;
        let mut nodes = Vec::with_capacity(count);
        for _ in 0..count {
            nodes.push(CCommandsNode::read(reader)?);
        }
        let root_index = reader.read_varint()?;
        if root_index < 0 {
            return Err(PacketDecodeError::NegativeLength(root_index));
        }
        Ok(CCommands { nodes, root_index })
    }
}

impl ClientBoundPacket for CCommands {
    fn encode(&self) -> PacketEncoder {
        let mut buf = Vec::new();
        self.write(&mut buf);
        PacketEncoder::new(buf, CCommands::PACKET_ID)
    }
}
