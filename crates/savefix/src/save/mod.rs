mod atomic_io;
mod file;
mod hashing;

pub use file::{
    encode_document, fixed_output_path, load_save_file, parse_document, write_fixed_save,
    write_save_file, SaveFile, SaveFileError, WrittenSave, FIXED_SUFFIX,
};
pub use hashing::sha256_hex;
