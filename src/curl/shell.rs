//! POSIX-style word splitting for command lines.

/// Errors that can occur when splitting a command line into words.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SplitError {
    /// A quoted section was opened but never closed.
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    /// The input ends with a backslash that escapes nothing.
    #[error("escape character at end of input")]
    DanglingEscape,
}

/// Splits a command line into words the way a POSIX shell does.
///
/// - Single quotes preserve everything up to the next single quote.
/// - Inside double quotes a backslash only escapes `"` and `\`.
/// - Outside quotes a backslash escapes the next character, and a
///   backslash-newline pair is a line continuation.
///
/// Quoted empty strings produce empty words.
///
/// # Errors
///
/// Returns an error on unbalanced quotes or a trailing backslash.
pub fn split(input: &str) -> Result<Vec<String>, SplitError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err(SplitError::UnterminatedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => return Err(SplitError::UnterminatedQuote('"')),
                        },
                        Some(c) => word.push(c),
                        None => return Err(SplitError::UnterminatedQuote('"')),
                    }
                }
            }
            '\\' => match chars.next() {
                Some('\n') => {}
                Some(c) => {
                    in_word = true;
                    word.push(c);
                }
                None => return Err(SplitError::DanglingEscape),
            },
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                word.push(c);
            }
        }
    }

    if in_word {
        words.push(word);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words() {
        assert_eq!(
            split("-X GET  https://example.com").unwrap(),
            ["-X", "GET", "https://example.com"]
        );
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(
            split(r#"-d '{"a": "b\n"}'"#).unwrap(),
            ["-d", r#"{"a": "b\n"}"#]
        );
    }

    #[test]
    fn double_quotes_escape_quote_and_backslash_only() {
        assert_eq!(
            split(r#""say \"hi\"" "a\\b" "c\d""#).unwrap(),
            [r#"say "hi""#, r"a\b", r"c\d"]
        );
    }

    #[test]
    fn line_continuations_are_removed() {
        assert_eq!(
            split("https://example.com \\\n  -H 'Accept: */*'").unwrap(),
            ["https://example.com", "-H", "Accept: */*"]
        );
    }

    #[test]
    fn adjacent_quoted_sections_join() {
        assert_eq!(split(r#"a'b c'"d e""#).unwrap(), ["ab cd e"]);
    }

    #[test]
    fn empty_quotes_produce_empty_word() {
        assert_eq!(split("-d ''").unwrap(), ["-d", ""]);
    }

    #[test]
    fn escaped_space_outside_quotes() {
        assert_eq!(split(r"a\ b").unwrap(), ["a b"]);
    }

    #[test]
    fn unterminated_quotes() {
        assert_eq!(
            split("-d '{\"a\": 1}"),
            Err(SplitError::UnterminatedQuote('\''))
        );
        assert_eq!(split("-H \"Accept"), Err(SplitError::UnterminatedQuote('"')));
    }

    #[test]
    fn dangling_escape() {
        assert_eq!(split("https://example.com \\"), Err(SplitError::DanglingEscape));
    }
}
