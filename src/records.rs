//! Fixed-shape records built from primitives and NBT: item slots, block positions,
//! rotations, particles and chat messages.

use crate::codec::{CodecError, ReadPacketExt, Result};
use crate::config::DecoderConfig;
use crate::nbt::{peek_byte, read_nbt};
use crate::tag::{Tag, TagType};
use std::collections::HashMap;
use std::io::{BufRead, Read};
use tracing::debug;

/// One inventory slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSlot {
    pub present: bool,
    pub item_id: i32,
    pub count: u8,
    /// Item NBT; the End tag when the slot is empty or the item has no extra data.
    pub nbt: Tag,
}

impl ItemSlot {
    pub fn empty() -> Self {
        ItemSlot {
            present: false,
            item_id: 0,
            count: 0,
            nbt: Tag::end(),
        }
    }
}

/// Read a slot: presence flag, then VarInt item id, count byte and item NBT.
/// A single `0x00` in place of the NBT means the item carries none.
pub fn read_slot<R: BufRead>(r: &mut R, config: &DecoderConfig) -> Result<ItemSlot> {
    if !r.read_boolean()? {
        return Ok(ItemSlot::empty());
    }
    let item_id = r.read_var_int()?;
    let count = r.read_byte()?;
    let nbt = if peek_byte(r)? == TagType::End.id() {
        r.consume(1);
        Tag::end()
    } else {
        read_nbt(r, config)?
    };
    debug!(item_id, count, has_nbt = !nbt.is_end(), "decoded item slot");
    Ok(ItemSlot {
        present: true,
        item_id,
        count,
        nbt,
    })
}

/// Block coordinates packed into one big-endian `i64`:
/// x in the top 26 bits, z in the next 26, y in the low 12, all two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn from_packed(packed: i64) -> Self {
        BlockPosition {
            x: (packed >> 38) as i32,
            y: (packed << 52 >> 52) as i32,
            z: (packed << 26 >> 38) as i32,
        }
    }

    pub fn to_packed(self) -> i64 {
        ((i64::from(self.x) & 0x3FF_FFFF) << 38) | ((i64::from(self.z) & 0x3FF_FFFF) << 12) | (i64::from(self.y) & 0xFFF)
    }
}

pub fn read_position<R: Read + ?Sized>(r: &mut R) -> Result<BlockPosition> {
    Ok(BlockPosition::from_packed(r.read_fixed_i64()?))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub fn read_rotation<R: Read + ?Sized>(r: &mut R) -> Result<Rotation> {
    let x = r.read_fixed_f32()?;
    let y = r.read_fixed_f32()?;
    let z = r.read_fixed_f32()?;
    Ok(Rotation { x, y, z })
}

/// Trailing field layout that follows a particle id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    None,
    /// VarInt block state.
    Block,
    /// red, green, blue, scale as f32.
    Dust,
    /// from red/green/blue, scale, to red/green/blue as f32.
    DustTransition,
    /// An item slot.
    Item,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParticleData {
    None,
    Block { state: i32 },
    Dust { red: f32, green: f32, blue: f32, scale: f32 },
    DustTransition { from: [f32; 3], scale: f32, to: [f32; 3] },
    Item(ItemSlot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: i32,
    pub data: ParticleData,
}

/// Particle id to trailing-field layout. Ids shift between protocol versions, so the
/// caller owns the table; [`Default`] carries protocol 754 (1.16.5).
#[derive(Debug, Clone)]
pub struct ParticleShapes {
    shapes: HashMap<i32, ParticleShape>,
}

impl Default for ParticleShapes {
    fn default() -> Self {
        ParticleShapes::empty()
            .with(3, ParticleShape::Block)
            .with(14, ParticleShape::Dust)
            .with(23, ParticleShape::Block)
            .with(32, ParticleShape::Item)
    }
}

impl ParticleShapes {
    /// A table where every particle has no trailing data.
    pub fn empty() -> Self {
        ParticleShapes { shapes: HashMap::new() }
    }

    pub fn with(mut self, id: i32, shape: ParticleShape) -> Self {
        self.shapes.insert(id, shape);
        self
    }

    pub fn shape(&self, id: i32) -> ParticleShape {
        self.shapes.get(&id).copied().unwrap_or(ParticleShape::None)
    }
}

fn read_rgb<R: Read + ?Sized>(r: &mut R) -> Result<[f32; 3]> {
    Ok([r.read_fixed_f32()?, r.read_fixed_f32()?, r.read_fixed_f32()?])
}

/// Read a VarInt particle id and the fields its shape declares.
pub fn read_particle<R: BufRead>(r: &mut R, shapes: &ParticleShapes, config: &DecoderConfig) -> Result<Particle> {
    let id = r.read_var_int()?;
    let data = match shapes.shape(id) {
        ParticleShape::None => ParticleData::None,
        ParticleShape::Block => ParticleData::Block { state: r.read_var_int()? },
        ParticleShape::Dust => {
            let [red, green, blue] = read_rgb(r)?;
            let scale = r.read_fixed_f32()?;
            ParticleData::Dust { red, green, blue, scale }
        }
        ParticleShape::DustTransition => {
            let from = read_rgb(r)?;
            let scale = r.read_fixed_f32()?;
            let to = read_rgb(r)?;
            ParticleData::DustTransition { from, scale, to }
        }
        ParticleShape::Item => ParticleData::Item(read_slot(r, config)?),
    };
    Ok(Particle { id, data })
}

/// Where a chat message is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChatPosition {
    Chat = 0,
    System = 1,
    AboveHotbar = 2,
}

impl ChatPosition {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(ChatPosition::Chat),
            1 => Some(ChatPosition::System),
            2 => Some(ChatPosition::AboveHotbar),
            _ => None,
        }
    }
}

/// Chat packet body. The JSON chat component is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub json: String,
    pub position: ChatPosition,
}

pub fn read_chat_message<R: Read + ?Sized>(r: &mut R) -> Result<ChatMessage> {
    let json = r.read_packet_string()?;
    let byte = r.read_byte()?;
    let position = ChatPosition::from_byte(byte).ok_or(CodecError::InvalidFormat { what: "chat position", byte })?;
    Ok(ChatMessage { json, position })
}
