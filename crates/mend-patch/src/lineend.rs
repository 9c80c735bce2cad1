//! Line-ending normalization.
//!
//! The engine works on `\n` internally. Incoming documents keep whatever
//! convention they arrived with: the dominant style is detected up front and
//! restored on the way out, so a CRLF file stays a CRLF file even when the
//! edit text used bare LF.

/// The line-ending convention of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Detect the dominant line ending of `content`.
///
/// Ties (including content with no newlines at all) resolve to LF.
pub fn dominant_line_ending(content: &str) -> LineEnding {
    let crlf = content.matches("\r\n").count();
    let total_lf = content.matches('\n').count();
    let bare_lf = total_lf - crlf;
    if crlf > bare_lf {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    }
}

/// Normalize all line endings to `\n`.
pub fn normalize(content: &str) -> String {
    if content.contains('\r') {
        content.replace("\r\n", "\n")
    } else {
        content.to_string()
    }
}

/// Convert normalized (`\n`) content back to the given convention.
pub fn restore(content: String, ending: LineEnding) -> String {
    match ending {
        LineEnding::Lf => content,
        LineEnding::CrLf => content.replace('\n', "\r\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_lf() {
        assert_eq!(dominant_line_ending("a\nb\nc\n"), LineEnding::Lf);
    }

    #[test]
    fn test_dominant_crlf() {
        assert_eq!(dominant_line_ending("a\r\nb\r\nc\r\n"), LineEnding::CrLf);
    }

    #[test]
    fn test_mixed_majority_wins() {
        assert_eq!(dominant_line_ending("a\r\nb\r\nc\n"), LineEnding::CrLf);
        assert_eq!(dominant_line_ending("a\nb\nc\r\n"), LineEnding::Lf);
    }

    #[test]
    fn test_no_newlines_defaults_to_lf() {
        assert_eq!(dominant_line_ending("single line"), LineEnding::Lf);
    }

    #[test]
    fn test_normalize_and_restore_roundtrip() {
        let original = "a\r\nb\r\n";
        let normalized = normalize(original);
        assert_eq!(normalized, "a\nb\n");
        let restored = restore(normalized, LineEnding::CrLf);
        assert_eq!(restored, original);
    }
}
