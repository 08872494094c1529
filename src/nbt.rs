//! Decode and encode NBT tag trees.
//!
//! ## Framing
//!
//! A tag stream is recognised by its first byte, which is peeked and left in place:
//!
//! | Byte   | Meaning                       |
//! |--------|-------------------------------|
//! | `0x0A` | uncompressed root compound    |
//! | `0x1F` | gzip member                   |
//! | `0x78` | zlib stream                   |
//!
//! Compressed streams need a [`Decompressor`]; without one they fail with
//! [`CodecError::UnsupportedCompression`].
//!
//! ## Tag layout
//!
//! ```text
//! named tag:   [type u8] [name: u16 len + UTF-8] [payload]
//! list item:   [payload]                (type and name omitted)
//! payloads:    Byte 1 | Short 2 | Int 4 | Long 8 | Float 4 | Double 8
//!              ByteArray/String: i32 len + bytes
//!              IntArray/LongArray: i32 count + count*4 / count*8 bytes
//!              List: [elem type u8] [i32 count] [count payloads]
//!              Compound: named tags ... [0x00]
//! ```
//!
//! Decoding is all-or-nothing: any error discards the partial tree. String payloads
//! and names must be UTF-8.
//!
//! Each List/Compound level costs one recursive call, bounded by
//! [`DecoderConfig::max_depth`]; see [`DEFAULT_MAX_DEPTH`](crate::config::DEFAULT_MAX_DEPTH)
//! for the stack this needs.

use crate::codec::{checked_length, CodecError, ReadPacketExt, Result, WritePacketExt, PREALLOC_LIMIT};
use crate::config::DecoderConfig;
use crate::tag::{Payload, Tag, TagType};
use byteorder::{BigEndian, WriteBytesExt};
use std::fmt;
use std::io::{self, BufRead, Read, Write};
use tracing::{debug, trace, warn};

pub(crate) const UNCOMPRESSED_MARKER: u8 = 0x0A;
pub(crate) const GZIP_MARKER: u8 = 0x1F;
pub(crate) const ZLIB_MARKER: u8 = 0x78;

/// Compression framings recognised in front of a tag stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zlib,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::Gzip => f.write_str("gzip"),
            Compression::Zlib => f.write_str("zlib"),
        }
    }
}

/// Inflates a compressed tag stream. Implemented outside this crate (e.g. on top of a
/// deflate library); `input` is positioned at the first byte of the compressed data.
pub trait Decompressor {
    fn decompress(&self, kind: Compression, input: &mut dyn Read) -> io::Result<Vec<u8>>;
}

/// Classify the leading byte of a tag stream. `Ok(None)` means uncompressed.
pub(crate) fn framing(byte: u8) -> Result<Option<Compression>> {
    match byte {
        UNCOMPRESSED_MARKER => Ok(None),
        GZIP_MARKER => Ok(Some(Compression::Gzip)),
        ZLIB_MARKER => Ok(Some(Compression::Zlib)),
        other => Err(CodecError::InvalidFormat { what: "NBT framing byte", byte: other }),
    }
}

/// Look at the next byte without consuming it.
pub(crate) fn peek_byte<R: BufRead + ?Sized>(reader: &mut R) -> Result<u8> {
    let buf = reader.fill_buf()?;
    buf.first().copied().ok_or(CodecError::UnexpectedEof)
}

/// Decode one root tag from an uncompressed stream.
pub fn read_nbt<R: BufRead>(reader: &mut R, config: &DecoderConfig) -> Result<Tag> {
    read_nbt_with(reader, config, None)
}

/// Decode one root tag, inflating gzip/zlib input through `decompressor` when given.
pub fn read_nbt_with<R: BufRead>(
    reader: &mut R,
    config: &DecoderConfig,
    decompressor: Option<&dyn Decompressor>,
) -> Result<Tag> {
    let first = peek_byte(reader)?;
    match framing(first)? {
        None => {
            let root = TagDecoder::new(config).read_root(reader)?;
            debug!(name = %root.name(), "decoded NBT root");
            Ok(root)
        }
        Some(kind) => {
            let Some(decompressor) = decompressor else {
                warn!(%kind, "compressed NBT without a decompressor");
                return Err(CodecError::UnsupportedCompression(kind));
            };
            debug!(%kind, "inflating compressed NBT");
            let inflated = decompressor.decompress(kind, reader).map_err(CodecError::Decompression)?;
            // Nested compression is not a valid tag stream.
            read_nbt_with(&mut inflated.as_slice(), config, None)
        }
    }
}

struct TagDecoder<'c> {
    config: &'c DecoderConfig,
}

// Only the container loops recurse. Headers and leaf payloads are read in separate
// non-inlined functions so their locals stay out of the per-level frames.
impl<'c> TagDecoder<'c> {
    fn new(config: &'c DecoderConfig) -> Self {
        TagDecoder { config }
    }

    fn read_root<R: Read + ?Sized>(&self, r: &mut R) -> Result<Tag> {
        match self.read_tag(r, 0)? {
            Some(root) => Ok(root),
            None => Ok(Tag::end()),
        }
    }

    /// Read one named tag. `Ok(None)` is the End signal: no more siblings.
    fn read_tag<R: Read + ?Sized>(&self, r: &mut R, depth: usize) -> Result<Option<Tag>> {
        let Some((tag_type, name)) = read_header(r, depth)? else {
            return Ok(None);
        };
        let payload = self.read_payload(r, tag_type, depth)?;
        Ok(Some(Tag::from_parts(tag_type, name, payload)))
    }

    fn read_payload<R: Read + ?Sized>(&self, r: &mut R, tag_type: TagType, depth: usize) -> Result<Payload> {
        match tag_type {
            TagType::List => self.read_list(r, depth),
            TagType::Compound => self.read_compound(r, depth),
            leaf => Ok(Payload::Bytes(read_leaf(r, leaf)?)),
        }
    }

    fn read_list<R: Read + ?Sized>(&self, r: &mut R, depth: usize) -> Result<Payload> {
        check_depth(self.config, depth)?;
        let element_type = read_type(r, "list element type")?;
        let count = list_count(self.config, r.read_fixed_i32()?, element_type)?;
        let mut children = Vec::with_capacity(count.min(PREALLOC_LIMIT / 64));
        for _ in 0..count {
            let payload = self.read_payload(r, element_type, depth + 1)?;
            children.push(Tag::from_parts(element_type, String::new(), payload));
        }
        Ok(Payload::List { element_type, children })
    }

    fn read_compound<R: Read + ?Sized>(&self, r: &mut R, depth: usize) -> Result<Payload> {
        check_depth(self.config, depth)?;
        let mut children = Vec::new();
        while let Some(child) = self.read_tag(r, depth + 1)? {
            if children.len() >= self.config.max_entries {
                return Err(compound_ceiling(self.config));
            }
            children.push(child);
        }
        Ok(Payload::Compound(children))
    }
}

fn read_type<R: Read + ?Sized>(r: &mut R, what: &'static str) -> Result<TagType> {
    let byte = r.read_byte()?;
    TagType::from_byte(byte).ok_or(CodecError::InvalidFormat { what, byte })
}

/// Type byte and name of a named tag; `None` for End, which has no name.
#[inline(never)]
fn read_header<R: Read + ?Sized>(r: &mut R, depth: usize) -> Result<Option<(TagType, String)>> {
    let tag_type = read_type(r, "tag type")?;
    if tag_type == TagType::End {
        return Ok(None);
    }
    let name = r.read_nbt_string()?;
    trace!(?tag_type, name = %name, depth, "tag");
    Ok(Some((tag_type, name)))
}

/// Raw payload of a scalar, array or String tag. String payloads must be UTF-8.
#[inline(never)]
fn read_leaf<R: Read + ?Sized>(r: &mut R, tag_type: TagType) -> Result<Vec<u8>> {
    if let Some(width) = tag_type.fixed_width() {
        return r.read_bytes(width);
    }
    if tag_type == TagType::End {
        return Ok(Vec::new());
    }
    let len = array_byte_len(r.read_fixed_i32()?, tag_type)?;
    let bytes = r.read_bytes(len)?;
    if tag_type == TagType::String {
        std::str::from_utf8(&bytes)?;
    }
    Ok(bytes)
}

#[cold]
pub(crate) fn compound_ceiling(config: &DecoderConfig) -> CodecError {
    warn!(max_entries = config.max_entries, "compound entry ceiling exceeded");
    CodecError::MalformedStream(format!("compound has more than {} entries", config.max_entries))
}

/// `depth` is the depth of the container's parent; the container itself sits one deeper.
pub(crate) fn check_depth(config: &DecoderConfig, depth: usize) -> Result<()> {
    if depth >= config.max_depth {
        warn!(max_depth = config.max_depth, "NBT nesting ceiling exceeded");
        return Err(CodecError::MalformedStream(format!(
            "nesting deeper than {} levels",
            config.max_depth
        )));
    }
    Ok(())
}

/// Byte length of a ByteArray/String/IntArray/LongArray payload with `len` elements.
pub(crate) fn array_byte_len(len: i32, tag_type: TagType) -> Result<usize> {
    let count = checked_length(len, "array length")?;
    let width = tag_type.element_width().unwrap_or(1);
    count
        .checked_mul(width)
        .ok_or_else(|| CodecError::MalformedStream(format!("{} of {} elements overflows", tag_type.name(), count)))
}

pub(crate) fn list_count(config: &DecoderConfig, count: i32, element_type: TagType) -> Result<usize> {
    let count = checked_length(count, "list length")?;
    if count > config.max_entries {
        warn!(count, max_entries = config.max_entries, "list entry ceiling exceeded");
        return Err(CodecError::MalformedStream(format!(
            "list declares {} entries, limit is {}",
            count, config.max_entries
        )));
    }
    if element_type == TagType::End && count > 0 {
        return Err(CodecError::MalformedStream(format!("list of {} entries has element type End", count)));
    }
    Ok(count)
}

/// Encode `tag` as a root (named) tag.
pub fn write_nbt<W: Write + ?Sized>(w: &mut W, tag: &Tag) -> Result<()> {
    w.write_u8(tag.tag_type().id())?;
    if tag.is_end() {
        return Ok(());
    }
    w.write_nbt_string(tag.name())?;
    write_payload(w, tag)
}

fn write_payload<W: Write + ?Sized>(w: &mut W, tag: &Tag) -> Result<()> {
    match tag.payload() {
        Payload::Bytes(bytes) => write_byte_payload(w, tag.tag_type(), bytes),
        Payload::List { element_type, children } => {
            w.write_u8(element_type.id())?;
            w.write_i32::<BigEndian>(wire_len(children.len())?)?;
            for child in children {
                if child.tag_type() != *element_type {
                    return Err(CodecError::MalformedStream(format!(
                        "{} in a list of {}",
                        child.tag_type().name(),
                        element_type.name()
                    )));
                }
                write_payload(w, child)?;
            }
            Ok(())
        }
        Payload::Compound(children) => {
            for child in children {
                write_nbt(w, child)?;
            }
            w.write_u8(TagType::End.id())?;
            Ok(())
        }
    }
}

fn write_byte_payload<W: Write + ?Sized>(w: &mut W, tag_type: TagType, bytes: &[u8]) -> Result<()> {
    if let Some(width) = tag_type.fixed_width() {
        if bytes.len() != width {
            return Err(CodecError::MalformedStream(format!(
                "{} payload is {} bytes, expected {}",
                tag_type.name(),
                bytes.len(),
                width
            )));
        }
    } else if let Some(width) = tag_type.element_width() {
        if bytes.len() % width != 0 {
            return Err(CodecError::MalformedStream(format!(
                "{} payload of {} bytes is not a multiple of {}",
                tag_type.name(),
                bytes.len(),
                width
            )));
        }
        w.write_i32::<BigEndian>(wire_len(bytes.len() / width)?)?;
    }
    w.write_all(bytes)?;
    Ok(())
}

fn wire_len(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| CodecError::MalformedStream(format!("length {} exceeds i32", len)))
}

impl Tag {
    /// Encode as a root tag into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        write_nbt(&mut out, self)?;
        Ok(out)
    }
}
