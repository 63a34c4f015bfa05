//! One-shot decode gateway.

use crate::coding::UTF8_CODING_LINE;
use crate::engine::TransformEngine;
use crate::error::{CodecError, CodecResult};

/// Decode a complete raw buffer into transformed text.
///
/// The input is validated as UTF-8, the synthetic `-- coding: utf-8` header
/// is prepended so the output carries a standard declaration, and the
/// engine runs over the header-prefixed bytes. The returned count is
/// whatever the engine reports; it has no 1:1 relationship with the raw
/// input length.
///
/// Engine failures on malformed embedded syntax propagate unchanged.
pub fn decode(engine: &dyn TransformEngine, input: &[u8]) -> CodecResult<(String, usize)> {
    let source = std::str::from_utf8(input).map_err(|_| CodecError::Encoding)?;
    let headed = format!("{UTF8_CODING_LINE}{source}");
    let transformed = engine.transform(headed.as_bytes())?;
    Ok((transformed.text, transformed.consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::QueryRewriter;

    #[test]
    fn test_header_prepended_exactly_once() {
        let (text, _) = decode(&QueryRewriter, b"local x = 1\n").unwrap();
        assert!(text.starts_with(UTF8_CODING_LINE));
        assert_eq!(text.matches("-- coding: utf-8").count(), 1);
    }

    #[test]
    fn test_passthrough_modulo_header() {
        let src = "-- coding: gql\nlocal x = 1\nprint(x)\n";
        let (text, _) = decode(&QueryRewriter, src.as_bytes()).unwrap();
        assert_eq!(text, format!("{UTF8_CODING_LINE}{src}"));
    }

    #[test]
    fn test_fences_are_rewritten() {
        let src = "-- coding: gql\nq = `{ viewer }`\n";
        let (text, _) = decode(&QueryRewriter, src.as_bytes()).unwrap();
        assert_eq!(text, format!("{UTF8_CODING_LINE}-- coding: gql\nq = [[{{ viewer }}]]\n"));
    }

    #[test]
    fn test_consumed_is_engine_reported() {
        let (text, consumed) = decode(&QueryRewriter, b"q = `x`\n").unwrap();
        // The default engine counts the transformed text, which the header
        // and the rewrite both stretch past the raw input length.
        assert_eq!(consumed, text.len());
        assert_ne!(consumed, b"q = `x`\n".len());
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = decode(&QueryRewriter, &[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, CodecError::Encoding));
    }

    #[test]
    fn test_engine_error_propagates() {
        let err = decode(&QueryRewriter, b"q = `never closed\n").unwrap_err();
        assert!(matches!(err, CodecError::Transform(_)));
    }
}
