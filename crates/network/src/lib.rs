//! Wire primitives for the minecraft protocol as far as command trees need
//! them. Framing beyond the packet id and length prefix, compression and
//! encryption belong to the transport and are not handled here.

pub mod packets;

pub use packets::{DecodeResult, PacketDecodeError, PacketDecoderExt, PacketEncoder, PacketEncoderExt};
