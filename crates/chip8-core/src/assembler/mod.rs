//! The two-pass assembler: source text in, ROM bytes out.

pub mod encoder;
pub mod labels;
pub mod lexer;
pub mod statement;

use crate::error::CResult;
use crate::types::C8Addr;

use labels::LabelTable;
use lexer::lex_line;

/// Assemble `source` into a flat byte vector ready to load at
/// [`crate::vm::memory::PROGRAM_START`].
///
/// Pass 1 ([`LabelTable::build`]) resolves every label to its address.
/// Pass 2 re-lexes each line and encodes it against that table. Blank,
/// comment-only and label-only lines contribute no bytes.
pub fn assemble(source: &str) -> CResult<Vec<u8>> {
    let labels = LabelTable::build(source)?;
    let mut out = Vec::new();

    for line in source.lines() {
        let stmt = lex_line(line)?;
        let (len, word) = encoder::encode_statement(&stmt, &labels);

        match len {
            0 => {}
            1 => out.push(word as u8),
            _ => {
                let word = word as C8Addr;
                out.push((word >> 8) as u8);
                out.push((word & 0xFF) as u8);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_simple_program() {
        let source = "start: LD V0, 0x05\n  ADD V0, 0x01\n  JP start\n";
        let rom = assemble(source).unwrap();
        assert_eq!(rom, vec![0x60, 0x05, 0x70, 0x01, 0x12, 0x00]);
    }

    #[test]
    fn test_assemble_ignores_comments_and_blank_lines() {
        let source = "; header comment\n\nCLS\n; trailer\n";
        let rom = assemble(source).unwrap();
        assert_eq!(rom, vec![0x00, 0xE0]);
    }

    #[test]
    fn test_assemble_sb_directive_single_byte() {
        let source = "LD I, sprite\nsprite: .SB 0x81\n";
        let rom = assemble(source).unwrap();
        assert_eq!(rom, vec![0xA2, 0x02, 0x81]);
    }

    #[test]
    fn test_assemble_forward_label_reference() {
        let source = "JP skip\nCLS\nskip: RET\n";
        let rom = assemble(source).unwrap();
        assert_eq!(rom, vec![0x12, 0x04, 0x00, 0xE0, 0x00, 0xEE]);
    }

    #[test]
    fn test_assemble_unrecognized_mnemonic_keeps_addresses_in_sync() {
        let source = "NOPE V0, V1\nhere: JP here\n";
        let rom = assemble(source).unwrap();
        assert_eq!(rom, vec![0x00, 0x00, 0x12, 0x02]);
    }
}
