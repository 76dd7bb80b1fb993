use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

use crate::types::AssemblerError;

const EMBEDDED_SPEC: &str = include_str!("langspec.json");

/// A single opcode byte. The associated constants are the encodings the
/// assembler emits itself, independent of any loaded opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(pub u8);

impl Opcode {
    pub const INTCBLOCK: Opcode = Opcode(0x20);
    pub const INTC: Opcode = Opcode(0x21);
    pub const INTC_0: Opcode = Opcode(0x22);
    pub const INTC_1: Opcode = Opcode(0x23);
    pub const INTC_2: Opcode = Opcode(0x24);
    pub const INTC_3: Opcode = Opcode(0x25);
    pub const BYTECBLOCK: Opcode = Opcode(0x26);
    pub const BYTEC: Opcode = Opcode(0x27);
    pub const BYTEC_0: Opcode = Opcode(0x28);
    pub const BYTEC_1: Opcode = Opcode(0x29);
    pub const BYTEC_2: Opcode = Opcode(0x2a);
    pub const BYTEC_3: Opcode = Opcode(0x2b);
    pub const ARG: Opcode = Opcode(0x2c);
    pub const ARG_0: Opcode = Opcode(0x2d);
    pub const ARG_1: Opcode = Opcode(0x2e);
    pub const ARG_2: Opcode = Opcode(0x2f);
    pub const ARG_3: Opcode = Opcode(0x30);
    pub const BNZ: Opcode = Opcode(0x40);
}

/// Width of a `bnz` instruction: opcode plus a 16-bit big-endian offset.
pub const BRANCH_WIDTH: usize = 3;

/// One record of the opcode specification document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpSpec {
    pub name: String,
    pub opcode: u8,
    #[serde(default)]
    pub arg_enum: Option<Vec<String>>,
}

impl OpSpec {
    /// Position of `field` in this op's argument enum.
    pub fn enum_index(&self, field: &str) -> Option<usize> {
        self.arg_enum
            .as_ref()?
            .iter()
            .position(|name| name == field)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpecDocument {
    Wrapped {
        #[serde(rename = "Ops")]
        ops: Vec<OpSpec>,
    },
    Bare(Vec<OpSpec>),
}

impl SpecDocument {
    fn into_ops(self) -> Vec<OpSpec> {
        match self {
            SpecDocument::Wrapped { ops } | SpecDocument::Bare(ops) => ops,
        }
    }
}

/// Mnemonics with dedicated operand encoding. Anything else found in the
/// opcode table assembles to its bare opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Int,
    IntC,
    IntCBlock,
    Byte,
    ByteC,
    ByteCBlock,
    Addr,
    Arg,
    Txn,
    Global,
    Gtxn,
    Load,
    Store,
    Bnz,
}

impl Handler {
    pub fn for_mnemonic(name: &str) -> Option<Self> {
        let handler = match name {
            "int" => Self::Int,
            "intc" => Self::IntC,
            "intcblock" => Self::IntCBlock,
            "byte" => Self::Byte,
            "bytec" => Self::ByteC,
            "bytecblock" => Self::ByteCBlock,
            "addr" => Self::Addr,
            "arg" => Self::Arg,
            "txn" => Self::Txn,
            "global" => Self::Global,
            "gtxn" => Self::Gtxn,
            "load" => Self::Load,
            "store" => Self::Store,
            "bnz" => Self::Bnz,
            _ => return None,
        };
        Some(handler)
    }
}

/// How a mnemonic is to be assembled.
#[derive(Debug, Clone, Copy)]
pub enum Dispatch<'a> {
    Special(Handler, Option<&'a OpSpec>),
    Plain(&'a OpSpec),
}

/// Name-indexed view of an opcode specification document.
#[derive(Debug, Clone)]
pub struct OpcodeTable {
    ops: HashMap<String, OpSpec>,
}

impl OpcodeTable {
    /// The TEAL v1 table bundled with the crate.
    pub fn embedded() -> Result<Self, AssemblerError> {
        Self::from_json_str(EMBEDDED_SPEC)
    }

    pub fn from_json_str(json: &str) -> Result<Self, AssemblerError> {
        let doc: SpecDocument = serde_json::from_str(json)?;
        Ok(Self::from_ops(doc.into_ops()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AssemblerError> {
        let doc: SpecDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_ops(doc.into_ops()))
    }

    pub fn from_ops(ops: impl IntoIterator<Item = OpSpec>) -> Self {
        Self {
            ops: ops.into_iter().map(|op| (op.name.clone(), op)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OpSpec> {
        self.ops.get(name)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn dispatch(&self, mnemonic: &str) -> Option<Dispatch<'_>> {
        let spec = self.get(mnemonic);
        match (Handler::for_mnemonic(mnemonic), spec) {
            (Some(handler), spec) => Some(Dispatch::Special(handler, spec)),
            (None, Some(spec)) => Some(Dispatch::Plain(spec)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_loads() {
        let table = OpcodeTable::embedded().unwrap();
        assert_eq!(table.get("err").unwrap().opcode, 0x00);
        assert_eq!(table.get("+").unwrap().opcode, 0x08);
        assert_eq!(table.get("bnz").unwrap().opcode, Opcode::BNZ.0);
        assert_eq!(table.get("bytec_0").unwrap().opcode, Opcode::BYTEC_0.0);
        assert_eq!(table.get("intcblock").unwrap().opcode, Opcode::INTCBLOCK.0);
        assert_eq!(table.get("arg_3").unwrap().opcode, Opcode::ARG_3.0);
    }

    #[test]
    fn test_enum_lookup() {
        let table = OpcodeTable::embedded().unwrap();
        let txn = table.get("txn").unwrap();
        assert_eq!(txn.enum_index("Sender"), Some(0));
        assert_eq!(txn.enum_index("Fee"), Some(1));
        assert_eq!(txn.enum_index("Bogus"), None);
        assert_eq!(table.get("pop").unwrap().enum_index("Sender"), None);
    }

    #[test]
    fn test_bare_array_document() {
        let table = OpcodeTable::from_json_str(
            r#"[{"Name": "nop", "Opcode": 7, "Extra": true}, {"Name": "txn", "Opcode": 49, "ArgEnum": ["A", "B"]}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("nop").unwrap().opcode, 7);
        assert_eq!(table.get("txn").unwrap().enum_index("B"), Some(1));
    }

    #[test]
    fn test_invalid_document() {
        let err = OpcodeTable::from_json_str(r#"{"Ops": [{"Name": "x"}]}"#).unwrap_err();
        assert!(matches!(err, AssemblerError::Spec(_)));
        assert!(OpcodeTable::from_json_str("[{\"Name\": \"x\", \"Opcode\": 300}]").is_err());
    }

    #[test]
    fn test_dispatch() {
        let table = OpcodeTable::embedded().unwrap();
        assert!(matches!(
            table.dispatch("int"),
            Some(Dispatch::Special(Handler::Int, None))
        ));
        assert!(matches!(
            table.dispatch("txn"),
            Some(Dispatch::Special(Handler::Txn, Some(_)))
        ));
        assert!(matches!(table.dispatch("sha256"), Some(Dispatch::Plain(spec)) if spec.opcode == 1));
        assert!(table.dispatch("frobnicate").is_none());
    }
}
