//! Barcode collaborator interface
//!
//! Pixel-level QR encoding and decoding live outside this crate. A front end
//! supplies an implementation of [`BarcodeCodec`]; the core only moves text
//! in and out of it and persists the rendered image.

use crate::error::Result;

/// A rendered barcode image (JPEG bytes plus dimensions)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

pub trait BarcodeCodec {
    /// Render `text` as a square code of `size` pixels. The text is encoded
    /// as UTF-8 by the implementation.
    fn encode(&self, text: &str, size: u32) -> Result<EncodedImage>;

    /// Read the text back from an image, `None` when no code is found
    fn decode(&self, image: &EncodedImage) -> Option<String>;
}
