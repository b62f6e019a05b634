//! Minimal PEM armor for opaque object bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{ObjectError, ObjectResult};

const LINE_WIDTH: usize = 64;

/// Wrap bytes in PEM armor under the given label.
pub fn armor(label: &str, bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut out = format!("-----BEGIN {label}-----\n");
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let split = rest.len().min(LINE_WIDTH);
        let (line, tail) = rest.split_at(split);
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}

/// Strip PEM armor, returning the label and the decoded bytes.
pub fn dearmor(text: &str) -> ObjectResult<(String, Vec<u8>)> {
    let mut label = None;
    let mut body = String::new();
    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("-----BEGIN ") {
            let name = rest
                .strip_suffix("-----")
                .ok_or_else(|| ObjectError::DecodeFailed("malformed PEM header".into()))?;
            label = Some(name.to_string());
        } else if line.starts_with("-----END ") {
            break;
        } else if label.is_some() {
            body.push_str(line);
        }
    }
    let label =
        label.ok_or_else(|| ObjectError::DecodeFailed("missing PEM header".into()))?;
    let bytes = STANDARD
        .decode(body.as_bytes())
        .map_err(|e| ObjectError::DecodeFailed(format!("invalid PEM base64: {e}")))?;
    Ok((label, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_roundtrip() {
        let bytes: Vec<u8> = (0..200).collect();
        let text = armor("CERTIFICATE", &bytes);
        assert!(text.starts_with("-----BEGIN CERTIFICATE-----"));
        let (label, decoded) = dearmor(&text).unwrap();
        assert_eq!(label, "CERTIFICATE");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn armor_lines_are_bounded() {
        let text = armor("X509 CRL", &[0u8; 300]);
        for line in text.lines() {
            assert!(line.len() <= 64 + "-----BEGIN X509 CRL-----".len());
        }
    }

    #[test]
    fn dearmor_rejects_missing_header() {
        assert!(dearmor("not pem at all").is_err());
    }

    #[test]
    fn dearmor_rejects_bad_base64() {
        let text = "-----BEGIN KEY-----\n!!!!\n-----END KEY-----\n";
        assert!(dearmor(text).is_err());
    }
}
