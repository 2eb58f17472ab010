//! Pass 2: turn each statement into its 1- or 2-byte machine code, given
//! the read-only label table pass 1 built.

use crate::types::{C8Addr, C8Byte, C8RegIdx};

use super::labels::LabelTable;
use super::statement::Statement;

/// Encode one statement. Returns `(byte_count, word)`; for a 1-byte
/// statement (`.SB`) only the low byte of `word` is meaningful. A
/// statement with no mnemonic encodes to `(0, 0)` and contributes nothing.
pub fn encode_statement(stmt: &Statement, labels: &LabelTable) -> (usize, C8Addr) {
    let mnemonic = match &stmt.mnemonic {
        None => return (0, 0),
        Some(m) => m.to_ascii_uppercase(),
    };

    if mnemonic == ".SB" {
        let byte = stmt
            .args
            .first()
            .and_then(|a| parse_numeric(a))
            .unwrap_or(0) as C8Byte;
        return (1, C8Addr::from(byte));
    }

    // An unrecognized mnemonic still emits a 2-byte placeholder so pass-2
    // byte addresses stay in lockstep with what pass 1 already committed.
    let word = encode_word(&mnemonic, &stmt.args, labels).unwrap_or(0x0000);
    (2, word)
}

fn encode_word(mnemonic: &str, args: &[String], labels: &LabelTable) -> Option<C8Addr> {
    match mnemonic {
        "CLS" => Some(0x00E0),
        "RET" => Some(0x00EE),
        "EXIT" => Some(0x00FD),

        "JP" => match args {
            [a] => Some(0x1000 | resolve_addr(a, labels)),
            [a, b] if a.eq_ignore_ascii_case("V0") => Some(0xB000 | resolve_addr(b, labels)),
            _ => None,
        },
        "CALL" => match args {
            [a] => Some(0x2000 | resolve_addr(a, labels)),
            _ => None,
        },

        "SE" => match args {
            [x, y] if is_register(y) => Some(0x5000 | reg_nibble(x) << 8 | reg_nibble(y) << 4),
            [x, kk] => Some(0x3000 | reg_nibble(x) << 8 | parse_byte(kk)),
            _ => None,
        },
        "SNE" => match args {
            [x, y] if is_register(y) => Some(0x9000 | reg_nibble(x) << 8 | reg_nibble(y) << 4),
            [x, kk] => Some(0x4000 | reg_nibble(x) << 8 | parse_byte(kk)),
            _ => None,
        },

        "LD" => encode_ld(args, labels),
        "ADD" => encode_add(args),

        "OR" => binary_op(0x8001, args),
        "AND" => binary_op(0x8002, args),
        "XOR" => binary_op(0x8003, args),
        "SUB" => binary_op(0x8005, args),
        "SUBN" => binary_op(0x8007, args),

        "SHR" => args.first().map(|x| 0x8006 | reg_nibble(x) << 8),
        "SHL" => args.first().map(|x| 0x800E | reg_nibble(x) << 8),

        "RND" => match args {
            [x, kk] => Some(0xC000 | reg_nibble(x) << 8 | parse_byte(kk)),
            _ => None,
        },
        "DRW" => match args {
            [x, y, n] => {
                Some(0xD000 | reg_nibble(x) << 8 | reg_nibble(y) << 4 | (parse_byte(n) & 0xF))
            }
            _ => None,
        },

        "SKP" => args.first().map(|x| 0xE09E | reg_nibble(x) << 8),
        "SKNP" => args.first().map(|x| 0xE0A1 | reg_nibble(x) << 8),

        _ => None,
    }
}

fn encode_ld(args: &[String], labels: &LabelTable) -> Option<C8Addr> {
    let [dst, src] = args else { return None };

    if dst.eq_ignore_ascii_case("I") {
        Some(0xA000 | resolve_addr(src, labels))
    } else if dst.eq_ignore_ascii_case("[I]") {
        Some(0xF055 | reg_nibble(src) << 8)
    } else if dst.eq_ignore_ascii_case("DT") {
        Some(0xF015 | reg_nibble(src) << 8)
    } else if dst.eq_ignore_ascii_case("ST") {
        Some(0xF018 | reg_nibble(src) << 8)
    } else if dst.eq_ignore_ascii_case("F") {
        Some(0xF029 | reg_nibble(src) << 8)
    } else if dst.eq_ignore_ascii_case("B") {
        Some(0xF033 | reg_nibble(src) << 8)
    } else if is_register(dst) {
        if src.eq_ignore_ascii_case("DT") {
            Some(0xF007 | reg_nibble(dst) << 8)
        } else if src.eq_ignore_ascii_case("K") {
            Some(0xF00A | reg_nibble(dst) << 8)
        } else if src.eq_ignore_ascii_case("[I]") {
            Some(0xF065 | reg_nibble(dst) << 8)
        } else if is_register(src) {
            Some(0x8000 | reg_nibble(dst) << 8 | reg_nibble(src) << 4)
        } else {
            Some(0x6000 | reg_nibble(dst) << 8 | parse_byte(src))
        }
    } else {
        None
    }
}

fn encode_add(args: &[String]) -> Option<C8Addr> {
    let [dst, src] = args else { return None };

    if dst.eq_ignore_ascii_case("I") {
        Some(0xF01E | reg_nibble(src) << 8)
    } else if is_register(src) {
        Some(0x8004 | reg_nibble(dst) << 8 | reg_nibble(src) << 4)
    } else {
        Some(0x7000 | reg_nibble(dst) << 8 | parse_byte(src))
    }
}

fn binary_op(base: C8Addr, args: &[String]) -> Option<C8Addr> {
    match args {
        [x, y] => Some(base | reg_nibble(x) << 8 | reg_nibble(y) << 4),
        _ => None,
    }
}

/// `V` or `v` followed by a single hex digit.
fn is_register(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('V') | Some('v'))
        && token.len() > 1
        && C8RegIdx::from_str_radix(&token[1..], 16).is_ok()
}

fn reg_nibble(token: &str) -> C8Addr {
    if token.len() <= 1 {
        return 0;
    }
    C8Addr::from(C8RegIdx::from_str_radix(&token[1..], 16).unwrap_or(0))
}

fn parse_numeric(token: &str) -> Option<C8Addr> {
    let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X"));
    match digits {
        Some(hex) => C8Addr::from_str_radix(hex, 16).ok(),
        None => token.parse::<C8Addr>().ok(),
    }
}

fn parse_byte(token: &str) -> C8Addr {
    C8Addr::from(parse_numeric(token).unwrap_or(0) as C8Byte)
}

/// A label lookup falling back to numeric parsing on miss, so an
/// unresolved symbol that happens to parse as a number still succeeds. A
/// fallback that parses to zero is indistinguishable from (and treated the
/// same as) a resolved label at address zero — there's no sentinel clash
/// since `0` is itself a valid address.
fn resolve_addr(token: &str, labels: &LabelTable) -> C8Addr {
    labels.get(token).unwrap_or_else(|| parse_numeric(token).unwrap_or(0)) & 0x0FFF
}
