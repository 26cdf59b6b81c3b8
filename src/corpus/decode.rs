// Text decoding at the corpus boundary.
//
// Most reports are UTF-8, but some are saved by Windows editors as GBK. The
// extractor always receives clean UTF-8 with `\n` line endings.

use encoding_rs::GBK;
use tracing::warn;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Which decoding produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Gbk,
    /// Neither decoded cleanly; invalid bytes were replaced
    Lossy,
}

/// Decode report bytes: strict UTF-8 (BOM stripped), then GBK, then lossy
/// UTF-8 as a last resort.
pub fn decode_text(bytes: &[u8]) -> (String, SourceEncoding) {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let (text, encoding) = match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), SourceEncoding::Utf8),
        Err(_) => match GBK.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => (text.into_owned(), SourceEncoding::Gbk),
            None => {
                warn!("Report is neither UTF-8 nor GBK, decoding lossily");
                (String::from_utf8_lossy(bytes).into_owned(), SourceEncoding::Lossy)
            }
        },
    };

    (text.replace("\r\n", "\n"), encoding)
}
