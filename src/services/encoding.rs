use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use serde::Serialize;

use crate::error::{Result, VocabError};

#[derive(Debug, Serialize)]
pub struct DecodedText {
    pub text: String,
    pub encoding: String,
    pub confidence: f32,
}

/// Reads a source file and decodes it to UTF-8, guessing the encoding
/// when there is no BOM.
pub fn read_source(path: &Path) -> Result<DecodedText> {
    let bytes = fs::read(path).map_err(|e| VocabError::input(path, e.to_string()))?;
    let decoded = decode(&bytes);

    debug!(
        "decoded {} as {} (confidence {:.2})",
        path.display(),
        decoded.encoding,
        decoded.confidence
    );
    if decoded.confidence < 0.5 {
        warn!(
            "{} decoded as {} with low confidence; output may contain garbled words",
            path.display(),
            decoded.encoding
        );
    }

    Ok(decoded)
}

pub fn decode(bytes: &[u8]) -> DecodedText {
    // BOM UTF-8 (EF BB BF)
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        let (text, _) = UTF_8.decode_without_bom_handling(rest);
        return DecodedText {
            text: text.into_owned(),
            encoding: "utf-8-sig".into(),
            confidence: 0.99,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);

    let encoding = detector.guess(None, true);
    let confidence = estimate_confidence(bytes, encoding);
    let (text, _, _) = encoding.decode(bytes);

    DecodedText {
        text: text.into_owned(),
        encoding: encoding.name().to_lowercase(),
        confidence,
    }
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("привет".as_bytes());
        let d = decode(&bytes);
        assert_eq!(d.text, "привет");
        assert_eq!(d.encoding, "utf-8-sig");
    }

    #[test]
    fn detects_windows_1251() {
        let source = "Мальчик, который выжил. Мистер и миссис Дурсль проживали в доме номер четыре по Тисовой улице и всегда с гордостью заявляли, что они, слава богу, абсолютно нормальные люди.";
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(source);
        let d = decode(&bytes);
        assert_eq!(d.encoding, "windows-1251");
        assert_eq!(d.text, source);
    }

    #[test]
    fn missing_file_is_input_error() {
        let err = read_source(Path::new("/no/such/book.txt")).unwrap_err();
        assert!(matches!(err, VocabError::Input { .. }));
    }
}
