//! Transform engine seam.
//!
//! The engine is the component that rewrites embedded query literals into
//! interpreter-legal text. The rest of the pipeline treats it as a black
//! box behind the [`TransformEngine`] trait; [`QueryRewriter`] is the
//! default engine.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors raised by a transform engine on malformed embedded syntax
#[derive(Debug, Error)]
pub enum TransformError {
    /// A query fence was opened but never closed
    #[error("unterminated query literal starting on line {line}")]
    UnterminatedLiteral {
        /// 1-based line of the stray opening fence
        line: usize,
    },

    /// Engine input is not valid UTF-8
    #[error("engine input is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Result of a whole-buffer transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// The interpreter-legal output text
    pub text: String,
    /// Consumed-length accounting as reported by the engine.
    ///
    /// This counts the transformed text, not the raw input; callers must
    /// not assume a 1:1 relationship with the input length.
    pub consumed: usize,
}

/// A component that rewrites embedded query literals into host-legal text.
///
/// Implementations must be deterministic and total for well-formed input;
/// malformed embedded syntax is the only sanctioned failure.
pub trait TransformEngine: Send + Sync {
    /// Transform a complete input buffer, reporting the consumed count.
    fn transform(&self, input: &[u8]) -> Result<Transformed, TransformError>;

    /// Text-only variant used by the finalize-only incremental path.
    fn transform_text(&self, input: &[u8]) -> Result<String, TransformError> {
        self.transform(input).map(|t| t.text)
    }
}

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)`([^`]*)`").expect("fence regex"));

/// Default engine: rewrites backtick-fenced query literals.
///
/// A literal like `` `query { viewer { login } }` `` is illegal Lua; the
/// rewriter re-emits it as a long-bracket string, picking a bracket level
/// whose closing delimiter cannot occur inside the literal body. The query
/// text between the fences is opaque: the rewriter locates literals
/// structurally and never parses the query grammar.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryRewriter;

impl TransformEngine for QueryRewriter {
    fn transform(&self, input: &[u8]) -> Result<Transformed, TransformError> {
        let source = std::str::from_utf8(input)?;

        let mut out = String::with_capacity(source.len());
        let mut last = 0;
        for caps in FENCE.captures_iter(source) {
            let fence = caps.get(0).expect("whole match");
            out.push_str(&source[last..fence.start()]);
            out.push_str(&bracket_literal(caps.get(1).expect("fence body").as_str()));
            last = fence.end();
        }

        // A stray backtick after the last full fence never closes.
        let rest = &source[last..];
        if let Some(pos) = rest.find('`') {
            let line = source[..last + pos].matches('\n').count() + 1;
            return Err(TransformError::UnterminatedLiteral { line });
        }
        out.push_str(rest);

        Ok(Transformed {
            consumed: out.len(),
            text: out,
        })
    }
}

/// Emit `body` as a Lua long-bracket string.
///
/// The bracket level is raised until the closing delimiter appears nowhere
/// in the body (including the overlap at the body's tail). Lua drops a
/// newline immediately after the opening bracket, so a body starting with
/// one gets a guard newline for it to drop instead.
fn bracket_literal(body: &str) -> String {
    let mut level = 0;
    loop {
        let eq = "=".repeat(level);
        let close = format!("]{eq}]");
        let probe = format!("{body}{close}");
        if probe.find(&close) == Some(body.len()) {
            let guard = if body.starts_with('\n') || body.starts_with('\r') {
                "\n"
            } else {
                ""
            };
            return format!("[{eq}[{guard}{body}{close}");
        }
        level += 1;
    }
}
