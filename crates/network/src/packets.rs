pub mod clientbound;

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Cursor, Read, Write};
use thiserror::Error;

pub type DecodeResult<T> = std::result::Result<T, PacketDecodeError>;

#[derive(Debug, Error)]
pub enum PacketDecodeError {
    #[error("io error while decoding packet: {0}")]
    Io(#[from] io::Error),
    #[error("invalid utf-8 in string: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    #[error("VarInt is too big")]
    VarIntTooBig,
    #[error("negative length {0}")]
    NegativeLength(i32),
}

impl<T: std::convert::AsRef<[u8]>> PacketDecoderExt for Cursor<T> {}
impl PacketDecoderExt for &[u8] {}

pub trait PacketDecoderExt: Read + Sized {
    fn read_unsigned_byte(&mut self) -> DecodeResult<u8> {
        Ok(self.read_u8()?)
    }

    fn read_bytes(&mut self, bytes: usize) -> DecodeResult<Vec<u8>> {
        let mut read = vec![0; bytes];
        self.read_exact(&mut read)?;
        Ok(read)
    }

    fn read_long(&mut self) -> DecodeResult<i64> {
        Ok(self.read_i64::<BigEndian>()?)
    }

    fn read_int(&mut self) -> DecodeResult<i32> {
        Ok(self.read_i32::<BigEndian>()?)
    }

    fn read_double(&mut self) -> DecodeResult<f64> {
        Ok(self.read_f64::<BigEndian>()?)
    }

    fn read_float(&mut self) -> DecodeResult<f32> {
        Ok(self.read_f32::<BigEndian>()?)
    }

    fn read_varint(&mut self) -> DecodeResult<i32> {
        let mut num_read = 0;
        let mut result = 0i32;
        loop {
            let read = self.read_unsigned_byte()?;
            let value = (read & 0b0111_1111) as i32;
            result |= value << (7 * num_read);

            num_read += 1;
            if read & 0b1000_0000 == 0 {
                break;
            }
            if num_read >= 5 {
                return Err(PacketDecodeError::VarIntTooBig);
            }
        }
        Ok(result)
    }

    fn read_length(&mut self) -> DecodeResult<usize> {
        let length = self.read_varint()?;
        if length < 0 {
            return Err(PacketDecodeError::NegativeLength(length));
        }
        Ok(length as usize)
    }

    fn read_string(&mut self) -> DecodeResult<String> {
        let length = self.read_length()?;
        Ok(String::from_utf8(self.read_bytes(length)?)?)
    }
}

/// Infallible big-endian writers for packet bodies.
pub trait PacketEncoderExt {
    fn write_bytes(&mut self, val: &[u8]);

    fn write_varint(&mut self, val: i32) {
        self.write_bytes(&PacketEncoder::varint(val));
    }

    fn write_unsigned_byte(&mut self, val: u8) {
        self.write_bytes(&[val]);
    }

    fn write_int(&mut self, val: i32) {
        self.write_bytes(&val.to_be_bytes());
    }

    fn write_long(&mut self, val: i64) {
        self.write_bytes(&val.to_be_bytes());
    }

    fn write_float(&mut self, val: f32) {
        self.write_bytes(&val.to_be_bytes());
    }

    fn write_double(&mut self, val: f64) {
        self.write_bytes(&val.to_be_bytes());
    }

    /// Writes a length prefixed utf-8 string. Callers are responsible for
    /// enforcing the protocol's maximum length before getting here.
    fn write_string(&mut self, val: &str) {
        self.write_varint(val.len() as i32);
        self.write_bytes(val.as_bytes());
    }
}

impl PacketEncoderExt for Vec<u8> {
    fn write_bytes(&mut self, val: &[u8]) {
        self.extend_from_slice(val);
    }
}

#[derive(Debug, Clone)]
pub struct PacketEncoder {
    buffer: Vec<u8>,
    packet_id: u32,
}

impl PacketEncoder {
    pub fn new(buffer: Vec<u8>, packet_id: u32) -> PacketEncoder {
        PacketEncoder { buffer, packet_id }
    }

    // This function is seperate because it is needed when writing packet headers
    pub fn varint(val: i32) -> Vec<u8> {
        let mut val = val as u32;
        let mut buf = Vec::new();
        loop {
            let mut temp = (val & 0b0111_1111) as u8;
            val >>= 7;
            if val != 0 {
                temp |= 0b1000_0000;
            }
            buf.push(temp);
            if val == 0 {
                return buf;
            }
        }
    }

    pub fn packet_id(&self) -> u32 {
        self.packet_id
    }

    pub fn body(&self) -> &[u8] {
        &self.buffer
    }

    /// Writes `length | packet id | body` without compression.
    pub fn write_uncompressed(&self, mut w: impl Write) -> io::Result<()> {
        let packet_id = PacketEncoder::varint(self.packet_id as i32);
        let length = PacketEncoder::varint((self.buffer.len() + packet_id.len()) as i32);

        w.write_all(&length)?;
        w.write_all(&packet_id)?;
        w.write_all(&self.buffer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_known_values() {
        assert_eq!(PacketEncoder::varint(0), vec![0x00]);
        assert_eq!(PacketEncoder::varint(1), vec![0x01]);
        assert_eq!(PacketEncoder::varint(127), vec![0x7f]);
        assert_eq!(PacketEncoder::varint(128), vec![0x80, 0x01]);
        assert_eq!(PacketEncoder::varint(300), vec![0xac, 0x02]);
        assert_eq!(PacketEncoder::varint(2097151), vec![0xff, 0xff, 0x7f]);
        assert_eq!(PacketEncoder::varint(-1), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn read_varint_reads_what_was_written() {
        let mut buf = Vec::new();
        for val in [0, 5, 127, 128, 25565, i32::MAX] {
            buf.write_varint(val);
        }
        let mut cursor = Cursor::new(buf);
        for val in [0, 5, 127, 128, 25565, i32::MAX] {
            assert_eq!(cursor.read_varint().unwrap(), val);
        }
    }

    #[test]
    fn read_varint_rejects_six_bytes() {
        let mut cursor = Cursor::new(vec![0xff, 0xff, 0xff, 0xff, 0xff, 0x01]);
        assert!(matches!(
            cursor.read_varint(),
            Err(PacketDecodeError::VarIntTooBig)
        ));
    }

    #[test]
    fn uncompressed_framing() {
        let packet = PacketEncoder::new(vec![1, 2, 3], 0x12);
        let mut out = Vec::new();
        packet.write_uncompressed(&mut out).unwrap();
        assert_eq!(out, vec![4, 0x12, 1, 2, 3]);
    }
}
