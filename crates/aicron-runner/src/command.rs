//! Configured-command tokenization and binary resolution.

use std::path::{Path, PathBuf};

use crate::error::{Result, RunnerError};

/// A runner command split into an executable path and leading arguments.
///
/// The job's prompt is appended as one extra trailing argument at spawn
/// time — never spliced into the configured string — so prompt content can
/// never reopen a quote or be read as additional flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Tokenizer state: outside any quote, or inside one kind of quote.
#[derive(Clone, Copy)]
enum QuoteState {
    Normal,
    InSingleQuote,
    InDoubleQuote,
}

/// Split a command string into tokens, honouring single and double quotes.
///
/// A quoted segment is taken literally, embedded spaces included. An
/// unmatched quote at end of string terminates the final token rather than
/// erroring.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut state = QuoteState::Normal;

    for ch in command.chars() {
        match state {
            QuoteState::Normal => match ch {
                '\'' => {
                    state = QuoteState::InSingleQuote;
                    in_token = true;
                }
                '"' => {
                    state = QuoteState::InDoubleQuote;
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
            QuoteState::InSingleQuote => match ch {
                '\'' => state = QuoteState::Normal,
                c => current.push(c),
            },
            QuoteState::InDoubleQuote => match ch {
                '"' => state = QuoteState::Normal,
                c => current.push(c),
            },
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
}

/// Resolve `configured` into an executable path plus leading arguments.
///
/// The first token names the binary: absolute paths are used as-is,
/// anything else is looked up on the invoking user's PATH. Resolution
/// failure is fatal and happens before any run record is created.
pub fn resolve(configured: &str) -> Result<ResolvedCommand> {
    let mut tokens = tokenize(configured);
    if tokens.is_empty() {
        return Err(RunnerError::EmptyCommand);
    }

    let bin = tokens.remove(0);
    let program = if Path::new(&bin).is_absolute() {
        PathBuf::from(&bin)
    } else {
        which::which(&bin).map_err(|_| RunnerError::ResolveFailed { bin: bin.clone() })?
    };

    Ok(ResolvedCommand {
        program,
        args: tokens,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("claude -p"), vec!["claude", "-p"]);
        assert_eq!(tokenize("  aider   --message  "), vec!["aider", "--message"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn double_quotes_keep_embedded_spaces() {
        assert_eq!(
            tokenize(r#""/usr/local/my tools/opencode" run"#),
            vec!["/usr/local/my tools/opencode", "run"]
        );
    }

    #[test]
    fn single_quotes_keep_embedded_spaces() {
        assert_eq!(
            tokenize("'/opt/a b/claude' -p"),
            vec!["/opt/a b/claude", "-p"]
        );
    }

    #[test]
    fn quotes_join_with_adjacent_text() {
        assert_eq!(tokenize(r#"ab"c d"ef"#), vec!["abc def"]);
    }

    #[test]
    fn single_quotes_inside_double_quotes_are_literal() {
        assert_eq!(tokenize(r#""it's fine" x"#), vec!["it's fine", "x"]);
    }

    #[test]
    fn unmatched_quote_terminates_the_token() {
        assert_eq!(tokenize(r#"claude "-p unclosed"#), vec!["claude", "-p unclosed"]);
        assert_eq!(tokenize("'half"), vec!["half"]);
    }

    #[test]
    fn empty_quoted_segment_is_one_token() {
        assert_eq!(tokenize(r#""" x"#), vec!["", "x"]);
    }

    #[test]
    fn resolve_keeps_absolute_paths_as_is() {
        let resolved = resolve("/bin/definitely-not-checked -p").unwrap();
        assert_eq!(resolved.program, PathBuf::from("/bin/definitely-not-checked"));
        assert_eq!(resolved.args, vec!["-p"]);
    }

    #[test]
    fn resolve_finds_binaries_on_path() {
        let resolved = resolve("sh -c").unwrap();
        assert!(resolved.program.is_absolute());
        assert!(resolved.program.ends_with("sh"));
        assert_eq!(resolved.args, vec!["-c"]);
    }

    #[test]
    fn resolve_rejects_empty_command() {
        assert!(matches!(resolve("  "), Err(RunnerError::EmptyCommand)));
    }

    #[test]
    fn resolve_rejects_unknown_binary() {
        let err = resolve("aicron-no-such-binary-on-path --flag").unwrap_err();
        assert!(matches!(err, RunnerError::ResolveFailed { .. }));
    }
}
