use ikea_asm::{assemble, AsmError};

#[test]
fn comments_spacing_and_bare_labels() {
    let src = "\
# counter example
.text
        SET::IMM X1, 3     # counter
loop:
        SUB X1, X1, X2
        BRANCH_IF_NOT_ZERO X1, loop
        RETURN

.data
step: 1   # decrement
";
    let asm = assemble(src).unwrap();
    assert_eq!(asm.instructions.len(), 4);
    assert_eq!(asm.text_labels.get("loop").unwrap().value(), 8);
    assert_eq!((asm.rom.read_u64(16).unwrap() >> 16) & 0xff, 8);
    assert_eq!(asm.ram.read_u8(0), 1);
    assert_eq!(asm.instructions[1].line.text, "loop:SUB X1,X1,X2");
    assert_eq!(asm.instructions[1].line.number, 4);
}

#[test]
fn missing_segments() {
    assert!(matches!(
        assemble("ADD X1,X2,X3\n.data\n"),
        Err(AsmError::Syntax(_))
    ));
    assert!(matches!(
        assemble(".text\nRETURN\n"),
        Err(AsmError::Syntax(_))
    ));
}

#[test]
fn errors_report_physical_line() {
    let src = ".text\n\n# blank above\nRETURN\nJUMP x\n.data\n";
    let err = assemble(src).unwrap_err();
    assert_eq!(err.line(), Some(5));
    assert_eq!(err.root(), &AsmError::UnknownInstruction("JUMP".into()));
    assert!(err.to_string().contains("JUMP x"));
}
