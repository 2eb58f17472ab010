//! Line-oriented lexical state machine: one source line in, one
//! [`Statement`] out.
//!
//! States: `Start`, `Label`, `AfterLabel`, `Instruction`, `Whitespace`,
//! `Argument`, `Comment`, `Done`. A line ending in a bare word with no
//! trailing `:` never sees a `:` to commit it as a label, so `Done`
//! reinterprets whatever's pending in `Label` as the mnemonic instead.

use crate::error::{AssemblerError, CResult};

use super::statement::Statement;

/// Max accepted line length, including the newline.
pub const MAX_LINE_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Start,
    Label,
    AfterLabel,
    Instruction,
    Whitespace,
    Argument,
    Comment,
    Done,
}

/// Lex one source line (no trailing `\n` required) into a [`Statement`].
pub fn lex_line(line: &str) -> CResult<Statement> {
    if line.len() + 1 > MAX_LINE_LEN {
        return Err(Box::new(AssemblerError(format!(
            "line too long ({} bytes, max {})",
            line.len(),
            MAX_LINE_LEN - 1
        ))));
    }

    let mut state = LexState::Start;
    let mut buf = String::new();
    let mut stmt = Statement::default();

    for ch in line.chars().chain(std::iter::once('\n')) {
        if ch == '\n' {
            match state {
                LexState::Label | LexState::Instruction => {
                    stmt.mnemonic = Some(std::mem::take(&mut buf));
                }
                LexState::Argument => stmt.push_arg(std::mem::take(&mut buf))?,
                _ => {}
            }
            state = LexState::Done;
            break;
        }

        if ch == ';' && state != LexState::Comment {
            match state {
                LexState::Label | LexState::Instruction => {
                    stmt.mnemonic = Some(std::mem::take(&mut buf));
                }
                LexState::Argument => stmt.push_arg(std::mem::take(&mut buf))?,
                _ => {}
            }
            state = LexState::Comment;
            continue;
        }

        match state {
            LexState::Comment | LexState::Done => {}
            LexState::Start => {
                if !ch.is_whitespace() {
                    buf.push(ch);
                    state = LexState::Label;
                }
            }
            LexState::Label => {
                if ch == ':' {
                    stmt.label = Some(std::mem::take(&mut buf));
                    state = LexState::AfterLabel;
                } else if ch.is_whitespace() {
                    stmt.mnemonic = Some(std::mem::take(&mut buf));
                    state = LexState::Whitespace;
                } else {
                    buf.push(ch);
                }
            }
            LexState::AfterLabel => {
                if !ch.is_whitespace() {
                    buf.push(ch);
                    state = LexState::Instruction;
                }
            }
            LexState::Instruction => {
                if ch.is_whitespace() {
                    stmt.mnemonic = Some(std::mem::take(&mut buf));
                    state = LexState::Whitespace;
                } else {
                    buf.push(ch);
                }
            }
            LexState::Whitespace => {
                if ch == ',' {
                    // Stay in Whitespace; commas between arguments are
                    // separators, not content.
                } else if !ch.is_whitespace() {
                    buf.push(ch);
                    state = LexState::Argument;
                }
            }
            LexState::Argument => {
                if ch == ',' || ch.is_whitespace() {
                    stmt.push_arg(std::mem::take(&mut buf))?;
                    state = LexState::Whitespace;
                } else {
                    buf.push(ch);
                }
            }
        }
    }

    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        let stmt = lex_line("").unwrap();
        assert!(stmt.label.is_none());
        assert!(stmt.mnemonic.is_none());
    }

    #[test]
    fn test_comment_only_line() {
        let stmt = lex_line("   ; a comment").unwrap();
        assert!(stmt.mnemonic.is_none());
    }

    #[test]
    fn test_label_only_line() {
        let stmt = lex_line("loop:").unwrap();
        assert_eq!(stmt.label.as_deref(), Some("loop"));
        assert!(stmt.mnemonic.is_none());
    }

    #[test]
    fn test_bare_mnemonic_no_label() {
        let stmt = lex_line("CLS").unwrap();
        assert!(stmt.label.is_none());
        assert_eq!(stmt.mnemonic.as_deref(), Some("CLS"));
    }

    #[test]
    fn test_label_and_mnemonic_and_args() {
        let stmt = lex_line("start: LD V0, 0x05").unwrap();
        assert_eq!(stmt.label.as_deref(), Some("start"));
        assert_eq!(stmt.mnemonic.as_deref(), Some("LD"));
        assert_eq!(stmt.args, vec!["V0".to_string(), "0x05".to_string()]);
    }

    #[test]
    fn test_trailing_comment_after_args() {
        let stmt = lex_line("DRW V0, V1, 1 ; draw it").unwrap();
        assert_eq!(stmt.mnemonic.as_deref(), Some("DRW"));
        assert_eq!(stmt.args.len(), 3);
    }

    #[test]
    fn test_directive_sb() {
        let stmt = lex_line("sprite: .SB 0x80").unwrap();
        assert_eq!(stmt.label.as_deref(), Some("sprite"));
        assert_eq!(stmt.mnemonic.as_deref(), Some(".SB"));
        assert_eq!(stmt.args, vec!["0x80".to_string()]);
    }

    #[test]
    fn test_too_many_arguments_rejected() {
        let result = lex_line("DRW V0, V1, 1, 2");
        assert!(result.is_err());
    }

    #[test]
    fn test_line_too_long_rejected() {
        let line = "A".repeat(MAX_LINE_LEN);
        assert!(lex_line(&line).is_err());
    }
}
