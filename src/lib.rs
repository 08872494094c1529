//! # mcwire: Minecraft protocol primitives and NBT decoding
//!
//! Decodes the byte-level building blocks of the Minecraft Java protocol: big-endian
//! primitives and VarInts, NBT tag trees, and the fixed-shape records that embed them
//! (item slots, block positions, rotations, particles, chat messages).
//!
//! ## Layers
//!
//! - **Primitives** ([`codec`]): [`ReadPacketExt`] / [`WritePacketExt`] extend any
//!   `Read` / `Write` with VarInt, fixed-width big-endian, string and UUID operations.
//! - **Tags** ([`tag`], [`nbt`]): [`read_nbt`] detects the stream framing and builds a
//!   [`Tag`] tree; [`write_nbt`] encodes one back.
//! - **Walk** ([`walk`]): [`nbt_extent`] measures an encoded tree without allocating it.
//! - **Records** ([`records`]): [`read_slot`], [`read_position`], [`read_rotation`],
//!   [`read_particle`], [`read_chat_message`].
//!
//! Every decoder takes the cursor by `&mut` and never keeps it. Nesting depth and
//! per-container entry counts are bounded by [`DecoderConfig`].
//!
//! ## Example
//!
//! ```
//! use mcwire::{read_nbt, DecoderConfig, Tag};
//!
//! let bytes = Tag::compound("root", vec![Tag::int("answer", 42)]).to_bytes().unwrap();
//! let root = read_nbt(&mut bytes.as_slice(), &DecoderConfig::default()).unwrap();
//! assert_eq!(root.get("answer").and_then(Tag::as_i32), Some(42));
//! ```

pub mod codec;
pub mod config;
pub mod dump;
pub mod nbt;
pub mod records;
pub mod tag;
pub mod walk;

pub use codec::{CodecError, ReadPacketExt, WritePacketExt};
pub use config::{ConfigError, DecoderConfig};
pub use dump::dump_tag;
pub use nbt::{read_nbt, read_nbt_with, write_nbt, Compression, Decompressor};
pub use records::{
    read_chat_message, read_particle, read_position, read_rotation, read_slot,
    BlockPosition, ChatMessage, ChatPosition, ItemSlot, Particle, ParticleData, ParticleShape,
    ParticleShapes, Rotation,
};
pub use tag::{Payload, Tag, TagType};
pub use walk::{nbt_extent, TagWalker};
