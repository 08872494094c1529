//! NBT tag tree: the decoded representation of one tag and its children.
//!
//! Scalar and array payloads are kept as the raw big-endian bytes read from the
//! wire. The typed accessors below reinterpret them on demand.

use byteorder::{BigEndian, ByteOrder};

/// Tag kind, with its one-byte wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    /// Map a wire id to a tag kind. `None` for bytes outside the 13 known kinds.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => TagType::End,
            1 => TagType::Byte,
            2 => TagType::Short,
            3 => TagType::Int,
            4 => TagType::Long,
            5 => TagType::Float,
            6 => TagType::Double,
            7 => TagType::ByteArray,
            8 => TagType::String,
            9 => TagType::List,
            10 => TagType::Compound,
            11 => TagType::IntArray,
            12 => TagType::LongArray,
            _ => return None,
        })
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TagType::End => "TAG_End",
            TagType::Byte => "TAG_Byte",
            TagType::Short => "TAG_Short",
            TagType::Int => "TAG_Int",
            TagType::Long => "TAG_Long",
            TagType::Float => "TAG_Float",
            TagType::Double => "TAG_Double",
            TagType::ByteArray => "TAG_Byte_Array",
            TagType::String => "TAG_String",
            TagType::List => "TAG_List",
            TagType::Compound => "TAG_Compound",
            TagType::IntArray => "TAG_Int_Array",
            TagType::LongArray => "TAG_Long_Array",
        }
    }

    /// Payload width of the fixed-size scalar kinds.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            TagType::Byte => Some(1),
            TagType::Short => Some(2),
            TagType::Int | TagType::Float => Some(4),
            TagType::Long | TagType::Double => Some(8),
            _ => None,
        }
    }

    /// Element width of the length-prefixed kinds (String counts bytes).
    pub fn element_width(self) -> Option<usize> {
        match self {
            TagType::ByteArray | TagType::String => Some(1),
            TagType::IntArray => Some(4),
            TagType::LongArray => Some(8),
            _ => None,
        }
    }
}

/// Tag payload. The variant always matches the owning tag's [`TagType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// End (empty), scalars, byte/int/long arrays and strings, as raw wire bytes.
    Bytes(Vec<u8>),
    /// Homogeneous unnamed children. The element type is kept so empty lists round-trip.
    List { element_type: TagType, children: Vec<Tag> },
    /// Named children in wire order; the terminating End is not stored.
    Compound(Vec<Tag>),
}

/// One node of an NBT tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    tag_type: TagType,
    name: String,
    payload: Payload,
}

impl Tag {
    pub(crate) fn from_parts(tag_type: TagType, name: String, payload: Payload) -> Self {
        Tag { tag_type, name, payload }
    }

    /// The End sentinel; also stands for "no data" in item slots.
    pub fn end() -> Self {
        Tag::from_parts(TagType::End, String::new(), Payload::Bytes(Vec::new()))
    }

    pub fn byte(name: impl Into<String>, value: i8) -> Self {
        Tag::from_parts(TagType::Byte, name.into(), Payload::Bytes(value.to_be_bytes().to_vec()))
    }

    pub fn short(name: impl Into<String>, value: i16) -> Self {
        Tag::from_parts(TagType::Short, name.into(), Payload::Bytes(value.to_be_bytes().to_vec()))
    }

    pub fn int(name: impl Into<String>, value: i32) -> Self {
        Tag::from_parts(TagType::Int, name.into(), Payload::Bytes(value.to_be_bytes().to_vec()))
    }

    pub fn long(name: impl Into<String>, value: i64) -> Self {
        Tag::from_parts(TagType::Long, name.into(), Payload::Bytes(value.to_be_bytes().to_vec()))
    }

    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Tag::from_parts(TagType::Float, name.into(), Payload::Bytes(value.to_be_bytes().to_vec()))
    }

    pub fn double(name: impl Into<String>, value: f64) -> Self {
        Tag::from_parts(TagType::Double, name.into(), Payload::Bytes(value.to_be_bytes().to_vec()))
    }

    pub fn byte_array(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Tag::from_parts(TagType::ByteArray, name.into(), Payload::Bytes(bytes))
    }

    pub fn string(name: impl Into<String>, value: &str) -> Self {
        Tag::from_parts(TagType::String, name.into(), Payload::Bytes(value.as_bytes().to_vec()))
    }

    pub fn int_array(name: impl Into<String>, values: &[i32]) -> Self {
        let mut bytes = vec![0u8; values.len() * 4];
        BigEndian::write_i32_into(values, &mut bytes);
        Tag::from_parts(TagType::IntArray, name.into(), Payload::Bytes(bytes))
    }

    pub fn long_array(name: impl Into<String>, values: &[i64]) -> Self {
        let mut bytes = vec![0u8; values.len() * 8];
        BigEndian::write_i64_into(values, &mut bytes);
        Tag::from_parts(TagType::LongArray, name.into(), Payload::Bytes(bytes))
    }

    /// Build a list. Children lose their names, since list elements are unnamed on the wire.
    pub fn list(name: impl Into<String>, element_type: TagType, children: Vec<Tag>) -> Self {
        let children = children.into_iter().map(Tag::into_unnamed).collect();
        Tag::from_parts(TagType::List, name.into(), Payload::List { element_type, children })
    }

    /// Build a compound. End tags are dropped: on the wire they terminate the compound.
    pub fn compound(name: impl Into<String>, children: Vec<Tag>) -> Self {
        let children = children.into_iter().filter(|c| !c.is_end()).collect();
        Tag::from_parts(TagType::Compound, name.into(), Payload::Compound(children))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn into_unnamed(self) -> Self {
        self.with_name(String::new())
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    /// Empty for list elements and the End sentinel.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_end(&self) -> bool {
        self.tag_type == TagType::End
    }

    /// Raw payload bytes, for every kind except List and Compound.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Bytes(b) => Some(b),
            _ => None,
        }
    }

    fn scalar(&self, kind: TagType) -> Option<&[u8]> {
        if self.tag_type != kind {
            return None;
        }
        self.raw_bytes().filter(|b| Some(b.len()) == kind.fixed_width())
    }

    pub fn as_i8(&self) -> Option<i8> {
        self.scalar(TagType::Byte).map(|b| b[0] as i8)
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.scalar(TagType::Short).map(BigEndian::read_i16)
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.scalar(TagType::Int).map(BigEndian::read_i32)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.scalar(TagType::Long).map(BigEndian::read_i64)
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.scalar(TagType::Float).map(BigEndian::read_f32)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.scalar(TagType::Double).map(BigEndian::read_f64)
    }

    /// String payload. `None` for other kinds or when the bytes are not UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        if self.tag_type != TagType::String {
            return None;
        }
        self.raw_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_byte_array(&self) -> Option<&[u8]> {
        if self.tag_type != TagType::ByteArray {
            return None;
        }
        self.raw_bytes()
    }

    pub fn as_int_array(&self) -> Option<Vec<i32>> {
        if self.tag_type != TagType::IntArray {
            return None;
        }
        self.raw_bytes().map(|b| b.chunks_exact(4).map(BigEndian::read_i32).collect())
    }

    pub fn as_long_array(&self) -> Option<Vec<i64>> {
        if self.tag_type != TagType::LongArray {
            return None;
        }
        self.raw_bytes().map(|b| b.chunks_exact(8).map(BigEndian::read_i64).collect())
    }

    /// Children of a List or Compound.
    pub fn children(&self) -> Option<&[Tag]> {
        match &self.payload {
            Payload::List { children, .. } => Some(children),
            Payload::Compound(children) => Some(children),
            Payload::Bytes(_) => None,
        }
    }

    /// Declared element type of a List.
    pub fn element_type(&self) -> Option<TagType> {
        match &self.payload {
            Payload::List { element_type, .. } => Some(*element_type),
            _ => None,
        }
    }

    /// First compound child with the given name.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        match &self.payload {
            Payload::Compound(children) => children.iter().find(|c| c.name == name),
            _ => None,
        }
    }
}
