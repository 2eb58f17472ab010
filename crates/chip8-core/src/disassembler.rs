//! Turn raw ROM bytes back into readable mnemonics. The inverse of
//! [`crate::assembler`], built on the same opcode table the interpreter
//! decodes with.

use crate::types::C8Addr;
use crate::vm::memory::PROGRAM_START;
use crate::vm::opcodes::{self, OpCode};

/// One disassembled line: the address it starts at, the raw bytes it
/// covers, and the rendered mnemonic text.
#[derive(Debug, Clone)]
pub struct DisassembledLine {
    /// Address of the first byte.
    pub addr: C8Addr,
    /// The one or two raw bytes this line covers.
    pub bytes: Vec<u8>,
    /// Rendered mnemonic and operands, or `0xWWWW` for an unknown word.
    pub text: String,
}

/// Disassemble `data` word by word, big-endian, starting at
/// [`PROGRAM_START`]. A trailing odd byte is rendered alone.
pub fn disassemble(data: &[u8]) -> Vec<DisassembledLine> {
    let mut lines = Vec::new();
    let mut addr = PROGRAM_START;
    let chunks = data.chunks_exact(2);
    let remainder = chunks.remainder();

    for chunk in chunks {
        let word = C8Addr::from(chunk[0]) << 8 | C8Addr::from(chunk[1]);
        let op = opcodes::decode(word);
        let text = match op {
            OpCode::EMPTY => "0x0000".to_string(),
            OpCode::DATA(w) => format!("0x{:04X}", w),
            _ => opcodes::mnemonic(op),
        };
        lines.push(DisassembledLine {
            addr,
            bytes: chunk.to_vec(),
            text,
        });
        addr += 2;
    }

    if let [byte] = remainder {
        lines.push(DisassembledLine {
            addr,
            bytes: vec![*byte],
            text: format!("0x{:02X}", byte),
        });
    }

    lines
}

/// Render a line as `addr: hi lo<TAB>mnemonic operands`, matching the
/// classic CHIP-8 disassembler listing format.
pub fn format_line(line: &DisassembledLine) -> String {
    let hex: Vec<String> = line.bytes.iter().map(|b| format!("{:02X}", b)).collect();
    format!("{:04X}: {}\t{}", line.addr, hex.join(" "), line.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_cls_and_ret() {
        let lines = disassemble(&[0x00, 0xE0, 0x00, 0xEE]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].addr, PROGRAM_START);
        assert_eq!(lines[1].addr, PROGRAM_START + 2);
        assert_eq!(format_line(&lines[0]), "0200: 00 E0\tCLS");
        assert_eq!(format_line(&lines[1]), "0202: 00 EE\tRET");
    }

    #[test]
    fn test_disassemble_ld_byte() {
        let lines = disassemble(&[0x60, 0x05]);
        assert_eq!(format_line(&lines[0]), "0200: 60 05\tLD V0, 0x05");
    }

    #[test]
    fn test_disassemble_unknown_word() {
        let lines = disassemble(&[0x00, 0x01]);
        assert_eq!(lines[0].text, "0x0001");
    }

    #[test]
    fn test_disassemble_zero_word_is_empty() {
        let lines = disassemble(&[0x00, 0x00]);
        assert_eq!(lines[0].text, "0x0000");
    }

    #[test]
    fn test_disassemble_trailing_odd_byte() {
        let lines = disassemble(&[0x00, 0xE0, 0x80]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "0x80");
        assert_eq!(format_line(&lines[1]), "0202: 80\t0x80");
    }
}
