//! Print NBT files as an indented tag tree.
//!
//! Usage:
//!   nbt_dump [OPTIONS] [FILE.nbt ...]
//!   nbt_dump < file.nbt
//!
//! Options:
//!   --config, -c FILE   Load decoder limits from a TOML file
//!   --extent, -e        Print the encoded size of each root tag instead of its contents
//!
//! Only uncompressed NBT is accepted; gunzip level.dat-style files first.
//! Exit code 1 if any input fails to decode.

use anyhow::Context;
use mcwire::{dump_tag, nbt_extent, read_nbt, DecoderConfig};
use std::io::{self, Read, Write};
use std::path::Path;

#[derive(Clone, Copy)]
enum Mode {
    Tree,
    Extent,
}

fn take_flag(args: &mut Vec<String>, long: &str, short: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == long || a == short) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn take_value(args: &mut Vec<String>, long: &str, short: &str) -> anyhow::Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == long || a == short) else {
        return Ok(None);
    };
    args.remove(pos);
    if pos >= args.len() {
        anyhow::bail!("{} needs a value", long);
    }
    Ok(Some(args.remove(pos)))
}

fn dump(label: &str, data: &[u8], config: &DecoderConfig, mode: Mode, out: &mut impl Write) -> anyhow::Result<()> {
    match mode {
        Mode::Tree => {
            let root = read_nbt(&mut &data[..], config).with_context(|| format!("{}: decode failed", label))?;
            writeln!(out, "# {}", label)?;
            out.write_all(dump_tag(&root).as_bytes())?;
        }
        Mode::Extent => {
            let n = nbt_extent(data, config).with_context(|| format!("{}: walk failed", label))?;
            writeln!(out, "{}: {} of {} bytes", label, n, data.len())?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mode = if take_flag(&mut args, "--extent", "-e") { Mode::Extent } else { Mode::Tree };
    let config = match take_value(&mut args, "--config", "-c")? {
        Some(path) => DecoderConfig::from_file(&path).with_context(|| format!("loading {}", path))?,
        None => DecoderConfig::default(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut has_error = false;

    if args.is_empty() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        if let Err(e) = dump("<stdin>", &data, &config, mode, &mut out) {
            eprintln!("{:#}", e);
            has_error = true;
        }
    } else {
        for path in &args {
            let path = Path::new(path);
            let label = path.display().to_string();
            let data = match std::fs::read(path) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("{}: {}", label, e);
                    has_error = true;
                    continue;
                }
            };
            if let Err(e) = dump(&label, &data, &config, mode, &mut out) {
                eprintln!("{:#}", e);
                has_error = true;
            }
        }
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
