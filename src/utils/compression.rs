//! Gzip normalisation for fetched and cached page bodies.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};

use crate::utils::error::Result;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDecompressor;

impl ContentDecompressor {
    pub fn new() -> Self {
        Self
    }

    pub fn is_compressed(bytes: &[u8]) -> bool {
        bytes.starts_with(&GZIP_MAGIC)
    }

    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }

    /// Inflates a gzip body. Bodies without the gzip magic pass through untouched.
    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if !Self::is_compressed(bytes) {
            return Ok(bytes.to_vec());
        }
        let mut decoder = GzDecoder::new(bytes);
        let mut out = Vec::with_capacity(bytes.len() * 4);
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }

    /// Decompresses and decodes as UTF-8, replacing invalid sequences.
    pub fn decompress_to_string(&self, bytes: &[u8]) -> Result<String> {
        let raw = self.decompress(bytes)?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}
