//! Pass 1: walk the source once, assigning each label the byte address it
//! will have once assembled.

use std::collections::HashMap;

use crate::error::CResult;
use crate::types::C8Addr;
use crate::vm::memory::PROGRAM_START;

use super::lexer::lex_line;

/// A read-only mapping from label name to address, built by [`LabelTable::build`]
/// and consulted (never mutated) during pass 2.
#[derive(Debug, Default)]
pub struct LabelTable(HashMap<String, C8Addr>);

impl LabelTable {
    /// Run pass 1 over `source`: lex every line, track the running address,
    /// and record the address of each label's line. A redefined label is a
    /// diagnostic, not a fatal error — the first definition wins.
    pub fn build(source: &str) -> CResult<Self> {
        let mut table = HashMap::new();
        let mut addr = PROGRAM_START;

        for line in source.lines() {
            let stmt = lex_line(line)?;

            if let Some(name) = &stmt.label {
                if table.contains_key(name) {
                    log::warn!("duplicate label '{}': keeping first definition", name);
                } else {
                    table.insert(name.clone(), addr);
                }
            }

            addr += stmt.byte_len();
        }

        Ok(Self(table))
    }

    /// Look up a label's address.
    pub fn get(&self, name: &str) -> Option<C8Addr> {
        self.0.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_label_at_start() {
        let table = LabelTable::build("start: LD V0, 0x05\n  JP start\n").unwrap();
        assert_eq!(table.get("start"), Some(PROGRAM_START));
    }

    #[test]
    fn test_label_after_two_byte_instructions() {
        let source = "LD V0, 0x05\nLD V1, 0x06\nhere: JP here\n";
        let table = LabelTable::build(source).unwrap();
        assert_eq!(table.get("here"), Some(PROGRAM_START + 4));
    }

    #[test]
    fn test_sb_directive_advances_by_one() {
        let source = "LD I, sprite\nsprite: .SB 0x80\nafter: JP after\n";
        let table = LabelTable::build(source).unwrap();
        assert_eq!(table.get("sprite"), Some(PROGRAM_START + 2));
        assert_eq!(table.get("after"), Some(PROGRAM_START + 3));
    }

    #[test]
    fn test_duplicate_label_keeps_first() {
        let source = "a: LD V0, 0x01\na: LD V0, 0x02\n";
        let table = LabelTable::build(source).unwrap();
        assert_eq!(table.get("a"), Some(PROGRAM_START));
    }

    #[test]
    fn test_unknown_label_is_none() {
        let table = LabelTable::build("CLS\n").unwrap();
        assert_eq!(table.get("nowhere"), None);
    }
}
