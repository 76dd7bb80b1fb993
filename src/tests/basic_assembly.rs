use crate::*;

#[test]
fn test_simple_program() {
    let bytecode = teal_asm!([
        "int 1",
        "int 2",
        "+",
        "int 3",
        "=="
    ]);

    // version 1, intcblock [1 2 3], intc_0 intc_1 + intc_2 ==
    assert_eq!(hex::encode(&bytecode), "0120030102032223082412");
}

#[test]
fn test_string_listing() {
    let bytecode = teal_asm!("
        // pay at most 1000 microunits in fees
        txn Fee
        int 1000
        <=
    ");

    assert_eq!(hex::encode(&bytecode), "012001e8073101220e");
}

#[test]
fn test_macro_matches_runtime_assembly() {
    let source = "txn Receiver\naddr AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ\n==";
    let runtime = assemble_str(source).unwrap();
    let compiled = teal_asm!([
        "txn Receiver",
        "addr AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ",
        "=="
    ]);

    assert_eq!(runtime, compiled);
    // version, bytecblock with one 32-byte key, txn Receiver, bytec_0, ==
    assert_eq!(&compiled[..4], &[0x01, 0x26, 0x01, 0x20]);
    assert_eq!(&compiled[4..36], &[0u8; 32]);
    assert_eq!(&compiled[36..], &[0x31, 0x07, 0x28, 0x12]);
}

#[test]
fn test_deterministic_output() {
    let source = "\
        global GroupSize\n\
        int 2\n\
        ==\n\
        gtxn 1 Amount\n\
        int 100000\n\
        >=\n\
        &&\n\
        byte b64 aGVsbG8=\n\
        arg 0\n\
        ==\n\
        &&\n";

    let first = assemble_str(source).unwrap();
    let second = assemble_str(source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_empty_program() {
    assert_eq!(assemble_str("").unwrap(), vec![0x01]);
    assert_eq!(assemble_str("// nothing here\n\n").unwrap(), vec![0x01]);
}

#[test]
fn test_line_numbers_in_errors() {
    let err = assemble_str("int 1\n\n// comment\ntxn NotAField\n").unwrap_err();
    assert_eq!(err.line(), Some(4));
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.to_string(), ":4: txn unknown arg NotAField");
}

#[test]
fn test_custom_opcode_table() {
    let table = OpcodeTable::from_json_str(
        r#"{"Ops": [
            {"Name": "nop", "Opcode": 250},
            {"Name": "txn", "Opcode": 49, "ArgEnum": ["Only"]}
        ]}"#,
    )
    .unwrap();
    let mut assembler = Assembler::new(table).with_observer(Box::new(NullObserver));
    assembler.assemble_source("nop\ntxn Only").unwrap();
    assert_eq!(assembler.finalize().unwrap(), vec![0x01, 0xfa, 0x31, 0x00]);
}

struct FixedDecoder;

impl AddressDecoder for FixedDecoder {
    fn decode_address(&self, address: &str) -> Result<Vec<u8>, AssemblerError> {
        match address {
            "alice" => Ok(vec![0xa1; 4]),
            _ => Err(AssemblerError::InvalidAddress {
                address: address.to_string(),
                reason: "unknown".to_string(),
            }),
        }
    }
}

#[test]
fn test_injected_address_decoder() {
    let mut assembler = Assembler::with_embedded_table()
        .unwrap()
        .with_address_decoder(Box::new(FixedDecoder));
    assembler.assemble_source("addr alice\naddr alice").unwrap();
    assert_eq!(
        assembler.finalize().unwrap(),
        vec![0x01, 0x26, 0x01, 0x04, 0xa1, 0xa1, 0xa1, 0xa1, 0x28, 0x28]
    );

    let mut assembler = Assembler::with_embedded_table()
        .unwrap()
        .with_address_decoder(Box::new(FixedDecoder));
    let err = assembler.assemble_source("addr bob").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}
