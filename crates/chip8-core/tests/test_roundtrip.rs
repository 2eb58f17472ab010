//! Assemble -> write to disk -> reload -> disassemble -> reassemble, and
//! check the byte stream survives the round trip untouched.

use chip8_core::assembler::assemble;
use chip8_core::cartridge::Cartridge;
use chip8_core::disassembler::disassemble;

#[test]
fn test_assemble_save_reload_roundtrip() {
    let source = "JP 020E\nJP 010A\n";
    let rom = assemble(source).unwrap();

    let tmpdir = tempdir::TempDir::new("test-assembly").unwrap();
    let path = tmpdir.path().join("example.ch8");
    let cartridge = Cartridge::load_from_bytes("example", &rom);
    cartridge.save_to_path(&path).unwrap();

    let reloaded = Cartridge::load_from_path(&path).unwrap();
    assert_eq!(reloaded.data(), rom.as_slice());
}

#[test]
fn test_disasm_of_asm_reassembles_identically() {
    let source = "start: LD V0, 0x05\n  ADD V0, 0x01\n  JP start\n";
    let rom = assemble(source).unwrap();

    let lines: Vec<String> = disassemble(&rom).iter().map(|l| l.text.clone()).collect();
    // A disassembled JP prints its raw address, so the "start" label has
    // to resolve back to the same numeral the reassembly will read.
    let reassembled_source = lines.join("\n");
    let rom2 = assemble(&reassembled_source).unwrap();

    assert_eq!(rom, rom2);
}

#[test]
fn test_assemble_is_idempotent() {
    let source = "start: LD V0, 0x05\n  JP start\n";
    assert_eq!(assemble(source).unwrap(), assemble(source).unwrap());
}
