use std::borrow::Cow;
use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::Result;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult> {
    let bytes = fs::read(path)?;
    Ok(detect(&bytes))
}

pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    if bytes.starts_with(&UTF8_BOM) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }

    let encoding = guess(bytes);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    // Czech and Ukrainian dictionaries are often saved in legacy code pages.
    match best.as_str() {
        "windows-1250" => candidates.push(EncodingCandidate {
            name: "iso-8859-2".into(),
            confidence: (confidence - 0.05).max(0.0),
        }),
        "windows-1251" => candidates.push(EncodingCandidate {
            name: "koi8-u".into(),
            confidence: (confidence - 0.05).max(0.0),
        }),
        "utf-8" => candidates.push(EncodingCandidate {
            name: "utf-8-sig".into(),
            confidence: (confidence - 0.20).max(0.0),
        }),
        _ => {}
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
    }
}

/// Decodes `bytes` with the detected encoding. Returns the text and the
/// encoding name that was used.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, String) {
    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        let (text, _) = UTF_8.decode_without_bom_handling(rest);
        return (text, "utf-8-sig".into());
    }

    let encoding = guess(bytes);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = encoding.name(), "input contained undecodable bytes");
    }
    (text, encoding.name().to_lowercase())
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
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
    fn bom_is_reported_and_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("ahoj".as_bytes());

        assert_eq!(detect(&bytes).best, "utf-8-sig");
        let (text, name) = decode(&bytes);
        assert_eq!(text, "ahoj");
        assert_eq!(name, "utf-8-sig");
    }

    #[test]
    fn plain_utf8_decodes_unchanged() {
        let src = "Dobrý den, як справи? Děkuji, дякую.";
        let (text, name) = decode(src.as_bytes());
        assert_eq!(text, src);
        assert_eq!(name, "utf-8");
    }
}
