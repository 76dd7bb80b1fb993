use crate::*;

#[test]
fn test_max_uint64_literal() {
    let bytecode = teal_asm!(["int 0xffffffffffffffff"]);

    // varuint of u64::MAX is nine 0xff bytes and a final 0x01
    let mut expected = vec![0x01, 0x20, 0x01];
    expected.extend([0xff; 9]);
    expected.push(0x01);
    expected.push(0x22);
    assert_eq!(bytecode, expected);
}

#[test]
fn test_literal_beyond_uint64_rejected() {
    let err = assemble_str("int 0x10000000000000000").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_long_byte_constant_length_prefix() {
    let payload = "ab".repeat(200);
    let bytecode = assemble_str(&format!("byte 0x{payload}")).unwrap();

    // 200 bytes needs a two-byte varuint length
    assert_eq!(&bytecode[..5], &[0x01, 0x26, 0x01, 0xc8, 0x01]);
    assert_eq!(bytecode.len(), 5 + 200 + 1);
    assert!(bytecode[5..205].iter().all(|&b| b == 0xab));
    assert_eq!(bytecode[205], 0x28);
}

#[test]
fn test_sha256_sized_constant() {
    let bytecode = teal_asm!([
        "arg 0",
        "sha256",
        "byte 0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        "=="
    ]);

    assert_eq!(bytecode[3], 32);
    assert_eq!(&bytecode[bytecode.len() - 4..], &[0x2d, 0x01, 0x28, 0x12]);
}
