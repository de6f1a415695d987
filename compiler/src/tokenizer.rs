use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::{quote, error};
use crate::error::KiwiError;

lazy_static! {
    pub static ref TOKEN_REGEX:    Regex = Regex::new(r"((?:-|\b)\d+\b|\[\]|[=;{},\[\]]|\b[A-Za-z_][A-Za-z0-9_]*\b|//.*|\s+)").unwrap();
    pub static ref WHITESPACE_RX:  Regex = Regex::new(r"^(//.*|\s+)$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text:   String,
    pub line:   usize,
    pub column: usize,
}

/// Splits schema text into tokens, dropping whitespace and `//` comments.
/// The returned list always ends with an empty EOF token.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, KiwiError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let end   = mat.end();
        let part  = mat.as_str();

        if start > last_end {
            let unexpected = &text[last_end..start];
            return Err(error(
                &format!("Syntax error: {}", quote(unexpected)),
                line,
                column,
            ));
        }

        if !WHITESPACE_RX.is_match(part) {
            tokens.push(Token {
                text:   part.to_string(),
                line,
                column,
            });
        }

        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.len() + 1;
            }
        } else {
            column += part.len();
        }

        last_end = end;
    }

    if last_end != text.len() {
        let unexpected = &text[last_end..];
        return Err(error(
            &format!("Syntax error: {}", quote(unexpected)),
            line,
            column,
        ));
    }

    tokens.push(Token {
        text:   "".to_string(),
        line,
        column,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize_schema(input)
            .unwrap()
            .into_iter()
            .map(|token| token.text)
            .collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let input = "int x = 10;";
        let expected = vec![
            Token { text: "int".into(), line: 1, column: 1 },
            Token { text: "x".into(),   line: 1, column: 5 },
            Token { text: "=".into(),   line: 1, column: 7 },
            Token { text: "10".into(),  line: 1, column: 9 },
            Token { text: ";".into(),   line: 1, column: 11 },
            Token { text: "".into(),    line: 1, column: 12 },
        ];
        let got = tokenize_schema(input).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_tokenize_attribute_list() {
        assert_eq!(
            texts("message B [equal, testgen = false] {"),
            ["message", "B", "[", "equal", ",", "testgen", "=", "false", "]", "{", ""]
        );
    }

    #[test]
    fn test_tokenize_array_before_attributes() {
        assert_eq!(
            texts("bytes[] chunks = 7 [deprecated];"),
            ["bytes", "[]", "chunks", "=", "7", "[", "deprecated", "]", ";", ""]
        );
    }

    #[test]
    fn test_tokenize_tracks_lines_and_skips_comments() {
        let got = tokenize_schema("// header\nextensions;").unwrap();
        assert_eq!(got[0], Token { text: "extensions".into(), line: 2, column: 1 });
        assert_eq!(got.len(), 3);
    }

    #[test]
    fn test_tokenize_unexpected_text() {
        let input = "int x = 10 @";
        let err = tokenize_schema(input).unwrap_err();
        assert!(
            matches!(err, KiwiError::ParseError { .. }),
            "expected a ParseError but got {:?}",
            err
        );
    }
}
