use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use super::atomic_io::{resolve_destination, write_bytes_atomic};
use super::hashing::sha256_hex;

pub const FIXED_SUFFIX: &str = "_fixed";

#[derive(Debug, Clone)]
pub struct SaveFile {
    pub path: PathBuf,
    pub document: Value,
    pub byte_len: usize,
    pub input_sha256_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenSave {
    pub path: PathBuf,
    pub byte_len: usize,
    pub sha256_hex: String,
}

#[derive(Debug, Error)]
pub enum SaveFileError {
    #[error("save file not found or unreadable at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("save file {path} is not a valid JSON document: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode save document: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("refusing to overwrite the input save file {input} through output {output}")]
    OverwritesInput { input: PathBuf, output: PathBuf },
    #[error("failed to write save file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn load_save_file(path: &Path) -> Result<SaveFile, SaveFileError> {
    let bytes = fs::read(path).map_err(|source| SaveFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(path, &bytes)?;
    let save = SaveFile {
        path: path.to_path_buf(),
        document,
        byte_len: bytes.len(),
        input_sha256_hex: sha256_hex(&bytes),
    };
    info!(
        path = %save.path.display(),
        byte_len = save.byte_len,
        sha256 = %save.input_sha256_hex,
        "save_file_loaded"
    );
    Ok(save)
}

pub fn parse_document(path: &Path, bytes: &[u8]) -> Result<Value, SaveFileError> {
    serde_json::from_slice(bytes).map_err(|source| SaveFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Compact serialization, no whitespace between tokens.
pub fn encode_document(document: &Value) -> Result<Vec<u8>, SaveFileError> {
    serde_json::to_vec(document).map_err(SaveFileError::Encode)
}

pub fn write_save_file(path: &Path, document: &Value) -> Result<WrittenSave, SaveFileError> {
    let bytes = encode_document(document)?;
    write_bytes_atomic(path, &bytes).map_err(|source| SaveFileError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let written = WrittenSave {
        path: path.to_path_buf(),
        byte_len: bytes.len(),
        sha256_hex: sha256_hex(&bytes),
    };
    info!(
        path = %written.path.display(),
        byte_len = written.byte_len,
        sha256 = %written.sha256_hex,
        "save_file_written"
    );
    Ok(written)
}

/// Writes the repaired document to `output` unless that path, once `..`
/// segments and symlinks are resolved, is the input save itself.
pub fn write_fixed_save(
    input: &Path,
    output: &Path,
    document: &Value,
) -> Result<WrittenSave, SaveFileError> {
    let original = fs::canonicalize(input).map_err(|source| SaveFileError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let destination = resolve_destination(output).map_err(|source| SaveFileError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    if destination == original {
        return Err(SaveFileError::OverwritesInput {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
    }
    write_save_file(output, document)
}

/// `saves/slot1.sav` -> `saves/slot1_fixed.sav`.
pub fn fixed_output_path(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("save"));
    file_name.push(FIXED_SUFFIX);
    if let Some(extension) = path.extension() {
        file_name.push(".");
        file_name.push(extension);
    }
    path.with_file_name(file_name)
}
