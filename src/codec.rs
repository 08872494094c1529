//! Primitive reads and writes for the Minecraft wire format.
//!
//! Every multi-byte value on the wire is big-endian, independent of the host.
//! Two string framings coexist and must never be swapped:
//!
//! - NBT strings (tag names) carry a fixed `u16` length prefix: [`ReadPacketExt::read_nbt_string`].
//! - Packet strings carry a VarInt length prefix: [`ReadPacketExt::read_packet_string`].
//!
//! Both traits are blanket-implemented for every [`Read`] / [`Write`], in the same way
//! `byteorder` extends readers, so any cursor (a `&[u8]`, an `io::Cursor`, a buffered
//! socket) can be decoded directly.

use crate::nbt::Compression;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Largest buffer reserved up front for a length-prefixed run. Longer runs grow as
/// bytes actually arrive, so a bogus length cannot force a large allocation.
pub(crate) const PREALLOC_LIMIT: usize = 64 * 1024;

const VAR_INT_MAX_BYTES: u32 = 5;
const VAR_LONG_MAX_BYTES: u32 = 10;
const SEGMENT_BITS: u8 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unexpected end of stream")]
    UnexpectedEof,
    #[error("VarInt is too long")]
    VarIntTooLong,
    #[error("invalid {what}: 0x{byte:02x}")]
    InvalidFormat { what: &'static str, byte: u8 },
    #[error("unsupported compression: {0}")]
    UnsupportedCompression(Compression),
    #[error("malformed stream: {0}")]
    MalformedStream(String),
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("decompression failed: {0}")]
    Decompression(#[source] io::Error),
    #[error("IO: {0}")]
    Io(io::Error),
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            CodecError::UnexpectedEof
        } else {
            CodecError::Io(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Convert a signed wire length into a byte count. Negative lengths never describe real data.
pub(crate) fn checked_length(len: i32, what: &str) -> Result<usize> {
    usize::try_from(len).map_err(|_| CodecError::MalformedStream(format!("negative {} {}", what, len)))
}

/// Decoding half of the primitive layer.
pub trait ReadPacketExt: Read {
    fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_u8()?)
    }

    /// Any non-zero byte is `true`.
    fn read_boolean(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    fn read_fixed_i16(&mut self) -> Result<i16> {
        Ok(self.read_i16::<BigEndian>()?)
    }

    fn read_fixed_u16(&mut self) -> Result<u16> {
        Ok(self.read_u16::<BigEndian>()?)
    }

    fn read_fixed_i32(&mut self) -> Result<i32> {
        Ok(self.read_i32::<BigEndian>()?)
    }

    fn read_fixed_i64(&mut self) -> Result<i64> {
        Ok(self.read_i64::<BigEndian>()?)
    }

    fn read_fixed_f32(&mut self) -> Result<f32> {
        Ok(self.read_f32::<BigEndian>()?)
    }

    fn read_fixed_f64(&mut self) -> Result<f64> {
        Ok(self.read_f64::<BigEndian>()?)
    }

    /// Read a VarInt: 7 value bits per byte, least significant group first,
    /// high bit set on every byte but the last. At most 5 bytes.
    fn read_var_int(&mut self) -> Result<i32> {
        let mut value: u32 = 0;
        for group in 0..VAR_INT_MAX_BYTES {
            let byte = self.read_u8()?;
            value |= u32::from(byte & SEGMENT_BITS) << (7 * group);
            if byte & CONTINUE_BIT == 0 {
                return Ok(value as i32);
            }
        }
        Err(CodecError::VarIntTooLong)
    }

    /// Same scheme as [`read_var_int`](Self::read_var_int), bounded at 10 bytes.
    fn read_var_long(&mut self) -> Result<i64> {
        let mut value: u64 = 0;
        for group in 0..VAR_LONG_MAX_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & SEGMENT_BITS) << (7 * group);
            if byte & CONTINUE_BIT == 0 {
                return Ok(value as i64);
            }
        }
        Err(CodecError::VarIntTooLong)
    }

    /// Read exactly `len` raw bytes.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        Read::take(&mut *self, len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            return Err(CodecError::UnexpectedEof);
        }
        Ok(buf)
    }

    /// NBT framing: `u16` big-endian length, then UTF-8 bytes.
    fn read_nbt_string(&mut self) -> Result<String> {
        let len = self.read_fixed_u16()?;
        let bytes = self.read_bytes(usize::from(len))?;
        utf8_string(bytes)
    }

    /// Packet framing: VarInt length, then UTF-8 bytes.
    fn read_packet_string(&mut self) -> Result<String> {
        let len = self.read_var_int()?;
        let len = checked_length(len, "string length")?;
        let bytes = self.read_bytes(len)?;
        utf8_string(bytes)
    }

    /// 128-bit UUID, most significant half first.
    fn read_uuid(&mut self) -> Result<u128> {
        Ok(self.read_u128::<BigEndian>()?)
    }
}

impl<R: Read + ?Sized> ReadPacketExt for R {}

fn utf8_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8(e.utf8_error()))
}

/// Encoding half of the primitive layer. Fixed-width writes come straight from
/// [`byteorder::WriteBytesExt`] with [`BigEndian`].
pub trait WritePacketExt: Write {
    fn write_var_int(&mut self, value: i32) -> Result<()> {
        let mut rest = value as u32;
        loop {
            if rest & !u32::from(SEGMENT_BITS) == 0 {
                self.write_u8(rest as u8)?;
                return Ok(());
            }
            self.write_u8((rest as u8 & SEGMENT_BITS) | CONTINUE_BIT)?;
            rest >>= 7;
        }
    }

    fn write_var_long(&mut self, value: i64) -> Result<()> {
        let mut rest = value as u64;
        loop {
            if rest & !u64::from(SEGMENT_BITS) == 0 {
                self.write_u8(rest as u8)?;
                return Ok(());
            }
            self.write_u8((rest as u8 & SEGMENT_BITS) | CONTINUE_BIT)?;
            rest >>= 7;
        }
    }

    fn write_nbt_string(&mut self, s: &str) -> Result<()> {
        let len = u16::try_from(s.len())
            .map_err(|_| CodecError::MalformedStream(format!("NBT string of {} bytes exceeds u16 length", s.len())))?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_packet_string(&mut self, s: &str) -> Result<()> {
        let len = i32::try_from(s.len())
            .map_err(|_| CodecError::MalformedStream(format!("packet string of {} bytes exceeds VarInt length", s.len())))?;
        self.write_var_int(len)?;
        self.write_all(s.as_bytes())?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WritePacketExt for W {}
