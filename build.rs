//! Retrieves information about the version of the engine from Git and the build
//! environment and generates the Zobrist key tables. Both are written to the
//! output directory and are accessed at runtime by the engine.

use std::fmt::Write;
use std::path::Path;
use std::{env, fs};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Changing the seed changes every board signature: keep it stable.
const ZOBRIST_SEED: u64 = 0x7A62_1A5E_ED00_0001;
const PIECE_VARIANTS: usize = 12;
const BOARD_SIZE: usize = 64;

fn generate_file(filename: &str, contents: &str) {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join(filename);
    fs::write(dest_path, contents).unwrap();
}

fn serialize_keys(rng: &mut StdRng, count: usize) -> String {
    let mut result = String::new();
    result.push('[');
    for _ in 0..count {
        write!(result, "{:#018x}, ", rng.r#gen::<u64>()).unwrap();
    }
    result.push(']');
    result
}

fn generate_zobrist_keys() {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut contents = String::new();
    writeln!(
        contents,
        "pub(super) const BLACK_TO_MOVE: Key = {:#018x};",
        rng.r#gen::<u64>()
    )
    .unwrap();
    writeln!(
        contents,
        "pub(super) const CASTLING: [Key; 4] = {};",
        serialize_keys(&mut rng, 4)
    )
    .unwrap();
    writeln!(
        contents,
        "pub(super) const EN_PASSANT_FILES: [Key; 8] = {};",
        serialize_keys(&mut rng, 8)
    )
    .unwrap();
    contents.push_str("pub(super) const PIECES: [[Key; 64]; 12] = [\n");
    for _ in 0..PIECE_VARIANTS {
        writeln!(contents, "{},", serialize_keys(&mut rng, BOARD_SIZE)).unwrap();
    }
    contents.push_str("];\n");
    generate_file("zobrist_keys.rs", &contents);
}

fn main() -> shadow_rs::SdResult<()> {
    generate_zobrist_keys();
    shadow_rs::new()
}
