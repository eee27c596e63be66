//! Line tokenizer shared by the reader and the writer.
//!
//! A token is either a bare run of non-whitespace characters or a run
//! enclosed in matching `"` or `'` quotes. Everything after the first token
//! of a scalar line is free description text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unterminated;

/// Split off the first token, returning it (unquoted) and the remainder.
pub(crate) fn next_token(line: &str) -> Result<Option<(&str, &str)>, Unterminated> {
    let line = line.trim_start();
    let Some(first) = line.chars().next() else {
        return Ok(None);
    };

    if first == '"' || first == '\'' {
        let body = &line[1..];
        let end = body.find(first).ok_or(Unterminated)?;
        return Ok(Some((&body[..end], &body[end + 1..])));
    }

    let end = line.find(char::is_whitespace).unwrap_or(line.len());
    Ok(Some((&line[..end], &line[end..])))
}

pub(crate) fn first_token(line: &str) -> Result<Option<&str>, Unterminated> {
    Ok(next_token(line)?.map(|(token, _)| token))
}

/// Up to `limit` leading tokens of a line; trailing text beyond that is
/// left untouched so free-form comments after table rows never fail.
pub(crate) fn leading_tokens(line: &str, limit: usize) -> Result<Vec<&str>, Unterminated> {
    let mut out = Vec::with_capacity(limit);
    let mut rest = line;
    while out.len() < limit {
        match next_token(rest)? {
            Some((token, remainder)) => {
                out.push(token);
                rest = remainder;
            }
            None => break,
        }
    }
    Ok(out)
}

/// Render text so that [`next_token`] reads it back unchanged.
pub(crate) fn quote(text: &str, force: bool) -> Option<String> {
    if text.contains(['\n', '\r']) {
        return None;
    }
    let needs_quotes = force
        || text.is_empty()
        || text.contains(char::is_whitespace)
        || text.starts_with(['"', '\'']);
    if !needs_quotes {
        return Some(text.to_string());
    }
    if !text.contains('"') {
        Some(format!("\"{text}\""))
    } else if !text.contains('\'') {
        Some(format!("'{text}'"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_token_stops_at_whitespace() {
        assert_eq!(
            next_token("  BEDDOES   StallMod - Dynamic stall"),
            Ok(Some(("BEDDOES", "   StallMod - Dynamic stall")))
        );
        assert_eq!(first_token("   "), Ok(None));
    }

    #[test]
    fn quoted_run_keeps_inner_whitespace() {
        assert_eq!(
            first_token("\"Airfoils/Cylinder 1.dat\"    FoilNm"),
            Ok(Some("Airfoils/Cylinder 1.dat"))
        );
        assert_eq!(first_token("'it is \"fine\"' rest"), Ok(Some("it is \"fine\"")));
        assert_eq!(first_token("\"open ended"), Err(Unterminated));
    }

    #[test]
    fn leading_tokens_ignores_trailing_text_beyond_limit() {
        let tokens = leading_tokens("1.0 2.0 \"unterminated", 2).expect("two tokens");
        assert_eq!(tokens, vec!["1.0", "2.0"]);
        let tokens = leading_tokens("1.0", 3).expect("short row");
        assert_eq!(tokens, vec!["1.0"]);
    }

    #[test]
    fn quote_picks_a_delimiter_that_round_trips() {
        assert_eq!(quote("plain", false).as_deref(), Some("plain"));
        assert_eq!(quote("plain", true).as_deref(), Some("\"plain\""));
        assert_eq!(quote("", false).as_deref(), Some("\"\""));
        assert_eq!(quote("has \"dq\"", false).as_deref(), Some("'has \"dq\"'"));
        assert_eq!(quote("both \" and '", false), None);
        assert_eq!(quote("two\nlines", false), None);

        for text in ["a b", "", "'x", "x\"y z"] {
            let quoted = quote(text, false).expect("representable");
            assert_eq!(first_token(&quoted), Ok(Some(text)));
        }
    }
}
