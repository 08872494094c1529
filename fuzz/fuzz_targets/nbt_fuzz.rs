//! NBT fuzz target: feed arbitrary bytes to the tag decoder, the walker and the slot reader.
//! None of them may panic, and whenever the decoder succeeds the walker must agree on the extent.
//! Build with: cargo fuzz run nbt_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let config = mcwire::DecoderConfig::default().with_max_depth(64);
    let mut r = data;
    if let Ok(tag) = mcwire::read_nbt(&mut r, &config) {
        let consumed = data.len() - r.len();
        assert_eq!(mcwire::nbt_extent(data, &config).ok(), Some(consumed));
        let reencoded = tag.to_bytes().expect("decoded trees re-encode");
        assert_eq!(&reencoded[..], &data[..consumed]);
    }
    let _ = mcwire::read_slot(&mut &data[..], &config);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run nbt_fuzz");
}
