//! Format decoded tag trees as indented text, in the notation of the classic NBT
//! format description:
//!
//! ```text
//! TAG_Compound('hello world'): 1 entry
//! {
//!   TAG_String('name'): 'Bananrama'
//! }
//! ```

use crate::tag::{Payload, Tag, TagType};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Render `tag` and all its children.
pub fn dump_tag(tag: &Tag) -> String {
    let mut out = String::new();
    write_tag(&mut out, tag, 0);
    out
}

fn entries(n: usize) -> String {
    if n == 1 {
        "1 entry".to_string()
    } else {
        format!("{} entries", n)
    }
}

fn write_tag(out: &mut String, tag: &Tag, depth: usize) {
    let pad = INDENT.repeat(depth);
    let label = if tag.name().is_empty() {
        format!("{}{}(None)", pad, tag.tag_type().name())
    } else {
        format!("{}{}('{}')", pad, tag.tag_type().name(), tag.name())
    };
    match tag.payload() {
        Payload::Bytes(_) => {
            let _ = writeln!(out, "{}: {}", label, format_scalar(tag));
        }
        Payload::List { element_type, children } => {
            let _ = writeln!(out, "{}: {} of {}", label, entries(children.len()), element_type.name());
            write_children(out, children, depth, &pad);
        }
        Payload::Compound(children) => {
            let _ = writeln!(out, "{}: {}", label, entries(children.len()));
            write_children(out, children, depth, &pad);
        }
    }
}

fn write_children(out: &mut String, children: &[Tag], depth: usize, pad: &str) {
    let _ = writeln!(out, "{}{{", pad);
    for child in children {
        write_tag(out, child, depth + 1);
    }
    let _ = writeln!(out, "{}}}", pad);
}

fn format_scalar(tag: &Tag) -> String {
    match tag.tag_type() {
        TagType::End => String::new(),
        TagType::Byte => tag.as_i8().map(|v| v.to_string()).unwrap_or_default(),
        TagType::Short => tag.as_i16().map(|v| v.to_string()).unwrap_or_default(),
        TagType::Int => tag.as_i32().map(|v| v.to_string()).unwrap_or_default(),
        TagType::Long => tag.as_i64().map(|v| v.to_string()).unwrap_or_default(),
        TagType::Float => tag.as_f32().map(|v| v.to_string()).unwrap_or_default(),
        TagType::Double => tag.as_f64().map(|v| v.to_string()).unwrap_or_default(),
        TagType::String => format!("'{}'", tag.as_str().unwrap_or_default()),
        TagType::ByteArray => format!("[{} bytes]", tag.as_byte_array().map_or(0, <[u8]>::len)),
        TagType::IntArray => format!("{:?}", tag.as_int_array().unwrap_or_default()),
        TagType::LongArray => format!("{:?}", tag.as_long_array().unwrap_or_default()),
        TagType::List | TagType::Compound => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_nested() {
        let tag = Tag::compound(
            "hello world",
            vec![
                Tag::string("name", "Bananrama"),
                Tag::list("nums", TagType::Short, vec![Tag::short("", 7)]),
                Tag::byte_array("blob", vec![1, 2, 3]),
            ],
        );
        let text = dump_tag(&tag);
        let expected = "\
TAG_Compound('hello world'): 3 entries
{
  TAG_String('name'): 'Bananrama'
  TAG_List('nums'): 1 entry of TAG_Short
  {
    TAG_Short(None): 7
  }
  TAG_Byte_Array('blob'): [3 bytes]
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_dump_arrays() {
        assert_eq!(dump_tag(&Tag::int_array("a", &[1, -2])), "TAG_Int_Array('a'): [1, -2]\n");
        assert_eq!(dump_tag(&Tag::long("l", -5)), "TAG_Long('l'): -5\n");
    }
}
