//! Zero-copy walk over encoded NBT.
//!
//! The walker follows the same layout and ceilings as the [decoder](crate::nbt) but
//! builds no [`Tag`](crate::tag::Tag) values: it only advances a position over a byte
//! slice. Use it to find where an embedded tag tree ends (e.g. to skip item data in a
//! packet you do not care about) or to reject a payload before paying for a full decode.
//!
//! | Use case | Prefer |
//! |----------|--------|
//! | Byte length of one root tag | [`nbt_extent`] |
//! | Skip a root tag inside a larger buffer | [`TagWalker::skip_root`] |
//! | Inspect values | [`read_nbt`](crate::nbt::read_nbt) |
//!
//! Compressed input cannot be walked; it fails with
//! [`CodecError::UnsupportedCompression`] just like a decode without a decompressor.

use crate::codec::{CodecError, Result};
use crate::config::DecoderConfig;
use crate::nbt::{array_byte_len, check_depth, compound_ceiling, framing, list_count};
use crate::tag::TagType;
use byteorder::{BigEndian, ByteOrder};

/// Read-only walker over encoded NBT.
///
/// Position is tracked in [`TagWalker::position`]; [`TagWalker::remaining`] gives the
/// bytes after it.
pub struct TagWalker<'a> {
    data: &'a [u8],
    pos: usize,
    config: &'a DecoderConfig,
}

impl<'a> TagWalker<'a> {
    pub fn new(data: &'a [u8], config: &'a DecoderConfig) -> Self {
        TagWalker { data, pos: 0, config }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Skip one root tag, checking the framing byte first.
    pub fn skip_root(&mut self) -> Result<()> {
        let first = *self.data.get(self.pos).ok_or(CodecError::UnexpectedEof)?;
        if let Some(kind) = framing(first)? {
            return Err(CodecError::UnsupportedCompression(kind));
        }
        self.skip_tag(0)?;
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(CodecError::UnexpectedEof)?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_type(&mut self, what: &'static str) -> Result<TagType> {
        let byte = self.take(1)?[0];
        TagType::from_byte(byte).ok_or(CodecError::InvalidFormat { what, byte })
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    /// Skip one named tag; `false` when it was the End tag.
    fn skip_tag(&mut self, depth: usize) -> Result<bool> {
        let tag_type = self.read_type("tag type")?;
        if tag_type == TagType::End {
            return Ok(false);
        }
        let len = BigEndian::read_u16(self.take(2)?);
        std::str::from_utf8(self.take(usize::from(len))?)?;
        self.skip_payload(tag_type, depth)?;
        Ok(true)
    }

    fn skip_payload(&mut self, tag_type: TagType, depth: usize) -> Result<()> {
        match tag_type {
            TagType::End => {}
            TagType::Byte | TagType::Short | TagType::Int | TagType::Long | TagType::Float | TagType::Double => {
                self.take(tag_type.fixed_width().unwrap_or(0))?;
            }
            TagType::ByteArray | TagType::String | TagType::IntArray | TagType::LongArray => {
                let len = array_byte_len(self.read_i32()?, tag_type)?;
                let bytes = self.take(len)?;
                if tag_type == TagType::String {
                    std::str::from_utf8(bytes)?;
                }
            }
            TagType::List => {
                check_depth(self.config, depth)?;
                let element_type = self.read_type("list element type")?;
                let count = list_count(self.config, self.read_i32()?, element_type)?;
                for _ in 0..count {
                    self.skip_payload(element_type, depth + 1)?;
                }
            }
            TagType::Compound => {
                check_depth(self.config, depth)?;
                let mut entries = 0usize;
                while self.skip_tag(depth + 1)? {
                    entries += 1;
                    if entries > self.config.max_entries {
                        return Err(compound_ceiling(self.config));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Number of bytes occupied by the uncompressed root tag at the start of `data`.
pub fn nbt_extent(data: &[u8], config: &DecoderConfig) -> Result<usize> {
    let mut walker = TagWalker::new(data, config);
    walker.skip_root()?;
    Ok(walker.position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::Compression;
    use crate::tag::Tag;

    fn sample() -> Tag {
        Tag::compound(
            "Level",
            vec![
                Tag::long("Seed", 42),
                Tag::list(
                    "Pos",
                    TagType::Double,
                    vec![Tag::double("", 1.5), Tag::double("", 64.0), Tag::double("", -3.0)],
                ),
                Tag::compound("Abilities", vec![Tag::byte("flying", 0), Tag::float("walkSpeed", 0.1)]),
                Tag::int_array("UUID", &[1, 2, 3, 4]),
                Tag::string("Name", "Alex"),
            ],
        )
    }

    #[test]
    fn test_extent_matches_encoded_length() {
        let bytes = sample().to_bytes().expect("encode");
        assert_eq!(nbt_extent(&bytes, &DecoderConfig::default()).expect("extent"), bytes.len());
    }

    #[test]
    fn test_extent_ignores_trailing_bytes() {
        let mut bytes = sample().to_bytes().expect("encode");
        let len = bytes.len();
        bytes.extend_from_slice(&[0xde, 0xad]);
        let config = DecoderConfig::default();
        let mut walker = TagWalker::new(&bytes, &config);
        walker.skip_root().expect("skip");
        assert_eq!(walker.position(), len);
        assert_eq!(walker.remaining(), &[0xde, 0xad]);
    }

    #[test]
    fn test_truncated_walk_is_eof() {
        let bytes = sample().to_bytes().expect("encode");
        let result = nbt_extent(&bytes[..bytes.len() - 1], &DecoderConfig::default());
        assert!(matches!(result, Err(CodecError::UnexpectedEof)));
    }

    #[test]
    fn test_walk_rejects_compressed_and_unknown_framing() {
        let config = DecoderConfig::default();
        assert!(matches!(nbt_extent(&[0x1f], &config), Err(CodecError::UnsupportedCompression(Compression::Gzip))));
        assert!(matches!(nbt_extent(&[0x78], &config), Err(CodecError::UnsupportedCompression(Compression::Zlib))));
        assert!(matches!(nbt_extent(&[0x05], &config), Err(CodecError::InvalidFormat { byte: 0x05, .. })));
    }

    #[test]
    fn test_walk_depth_ceiling() {
        let mut tag = Tag::list("", TagType::End, vec![]);
        for _ in 0..4 {
            tag = Tag::compound("", vec![tag.with_name("n")]);
        }
        let bytes = tag.to_bytes().expect("encode");
        let shallow = DecoderConfig::default().with_max_depth(4);
        assert!(matches!(nbt_extent(&bytes, &shallow), Err(CodecError::MalformedStream(_))));
        let deep = DecoderConfig::default().with_max_depth(5);
        assert_eq!(nbt_extent(&bytes, &deep).expect("extent"), bytes.len());
    }

    #[test]
    fn test_huge_list_count_is_eof_not_allocation() {
        // root { list "l" of Int, count i32::MAX / 8 } with no element bytes
        let bytes = [0x0a, 0x00, 0x00, 0x09, 0x00, 0x01, b'l', 0x03, 0x0f, 0xff, 0xff, 0xff];
        assert!(matches!(nbt_extent(&bytes, &DecoderConfig::default()), Err(CodecError::UnexpectedEof)));
    }
}
