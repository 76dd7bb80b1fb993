use std::fmt::Debug;

use crate::opcodes::Opcode;
use crate::types::AssemblerError;
use crate::varuint::write_varuint;

/// Largest number of entries an 8-bit index can address.
pub const MAX_POOL_ENTRIES: usize = 256;

/// Opcodes used to reference one slot of an indexed table: single-byte
/// forms for slots 0..=3 and a generic form followed by the index byte.
#[derive(Debug, Clone, Copy)]
pub struct SlotOps {
    pub name: &'static str,
    pub fast: [Opcode; 4],
    pub generic: Opcode,
}

pub const INT_SLOTS: SlotOps = SlotOps {
    name: "intc",
    fast: [Opcode::INTC_0, Opcode::INTC_1, Opcode::INTC_2, Opcode::INTC_3],
    generic: Opcode::INTC,
};

pub const BYTE_SLOTS: SlotOps = SlotOps {
    name: "bytec",
    fast: [Opcode::BYTEC_0, Opcode::BYTEC_1, Opcode::BYTEC_2, Opcode::BYTEC_3],
    generic: Opcode::BYTEC,
};

pub const ARG_SLOTS: SlotOps = SlotOps {
    name: "arg",
    fast: [Opcode::ARG_0, Opcode::ARG_1, Opcode::ARG_2, Opcode::ARG_3],
    generic: Opcode::ARG,
};

impl SlotOps {
    pub fn write_ref(&self, out: &mut Vec<u8>, index: i64) -> Result<(), AssemblerError> {
        match u8::try_from(index) {
            Ok(i @ 0..=3) => out.push(self.fast[usize::from(i)].0),
            Ok(i) => out.extend_from_slice(&[self.generic.0, i]),
            Err(_) => {
                return Err(AssemblerError::InvalidPoolIndex {
                    pool: self.name,
                    index,
                })
            }
        }
        Ok(())
    }
}

/// A value that can live in a constant pool and be serialized into its
/// block declaration.
pub trait PoolValue: PartialEq + Debug {
    fn write_entry(&self, out: &mut Vec<u8>);
}

impl PoolValue for u64 {
    fn write_entry(&self, out: &mut Vec<u8>) {
        write_varuint(out, *self);
    }
}

impl PoolValue for Vec<u8> {
    fn write_entry(&self, out: &mut Vec<u8>) {
        write_varuint(out, self.len() as u64);
        out.extend_from_slice(self);
    }
}

/// Deduplicating constant table. Indices are assigned in first-insertion
/// order and never change.
#[derive(Debug)]
pub struct ConstantPool<T> {
    slots: SlotOps,
    block: Opcode,
    values: Vec<T>,
    written: bool,
}

pub type IntPool = ConstantPool<u64>;
pub type BytePool = ConstantPool<Vec<u8>>;

impl IntPool {
    pub fn ints() -> Self {
        Self::new(INT_SLOTS, Opcode::INTCBLOCK)
    }
}

impl BytePool {
    pub fn bytes() -> Self {
        Self::new(BYTE_SLOTS, Opcode::BYTECBLOCK)
    }
}

impl<T: PoolValue> ConstantPool<T> {
    pub fn new(slots: SlotOps, block: Opcode) -> Self {
        Self {
            slots,
            block,
            values: Vec::new(),
            written: false,
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when constants were interned but no block has declared them yet.
    pub fn needs_block(&self) -> bool {
        !self.written && !self.values.is_empty()
    }

    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    pub fn intern(&mut self, value: T) -> Result<usize, AssemblerError> {
        if let Some(index) = self.index_of(&value) {
            return Ok(index);
        }
        if self.written {
            return Err(AssemblerError::UndeclaredConstant {
                pool: self.slots.name,
                value: format!("{value:?}"),
            });
        }
        if self.values.len() >= MAX_POOL_ENTRIES {
            return Err(AssemblerError::PoolFull {
                pool: self.slots.name,
            });
        }
        self.values.push(value);
        Ok(self.values.len() - 1)
    }

    pub fn write_ref(&self, out: &mut Vec<u8>, index: usize) -> Result<(), AssemblerError> {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        self.slots.write_ref(out, index)
    }

    /// Interns `value` and emits a reference to its slot.
    pub fn write_value(&mut self, out: &mut Vec<u8>, value: T) -> Result<usize, AssemblerError> {
        let index = self.intern(value)?;
        self.write_ref(out, index)?;
        Ok(index)
    }

    /// Emits the block declaration for the current contents.
    pub fn write_block(&mut self, out: &mut Vec<u8>) {
        out.push(self.block.0);
        write_varuint(out, self.values.len() as u64);
        for value in &self.values {
            value.write_entry(out);
        }
        self.written = true;
    }

    /// Emits an explicitly declared block. Only an empty, undeclared pool
    /// accepts one; afterwards the pool is closed to new values.
    pub fn declare(&mut self, out: &mut Vec<u8>, values: Vec<T>) -> Result<(), AssemblerError> {
        if self.written || !self.values.is_empty() {
            return Err(AssemblerError::PoolAlreadyDeclared {
                pool: self.slots.name,
            });
        }
        if values.len() > MAX_POOL_ENTRIES {
            return Err(AssemblerError::PoolFull {
                pool: self.slots.name,
            });
        }
        self.values = values;
        self.write_block(out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut pool = IntPool::ints();
        assert_eq!(pool.intern(5).unwrap(), 0);
        assert_eq!(pool.intern(7).unwrap(), 1);
        assert_eq!(pool.intern(5).unwrap(), 0);
        assert_eq!(pool.values(), &[5, 7]);
    }

    #[test]
    fn test_fast_and_generic_refs() {
        let pool = BytePool::bytes();
        let mut out = Vec::new();
        for index in 0..5 {
            pool.write_ref(&mut out, index).unwrap();
        }
        assert_eq!(out, vec![0x28, 0x29, 0x2a, 0x2b, 0x27, 0x04]);

        let mut out = Vec::new();
        pool.write_ref(&mut out, 255).unwrap();
        assert_eq!(out, vec![0x27, 0xff]);
    }

    #[test]
    fn test_ref_out_of_range() {
        let mut out = Vec::new();
        let err = INT_SLOTS.write_ref(&mut out, 256).unwrap_err();
        assert!(matches!(err, AssemblerError::InvalidPoolIndex { index: 256, .. }));
        assert!(INT_SLOTS.write_ref(&mut out, -1).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_pool_full() {
        let mut pool = IntPool::ints();
        for v in 0..MAX_POOL_ENTRIES as u64 {
            pool.intern(v).unwrap();
        }
        assert_eq!(pool.intern(17).unwrap(), 17);
        let err = pool.intern(1000).unwrap_err();
        assert!(matches!(err, AssemblerError::PoolFull { pool: "intc" }));
    }

    #[test]
    fn test_int_block_layout() {
        let mut pool = IntPool::ints();
        pool.intern(1).unwrap();
        pool.intern(300).unwrap();
        let mut out = Vec::new();
        pool.write_block(&mut out);
        assert_eq!(out, vec![0x20, 0x02, 0x01, 0xac, 0x02]);
        assert!(!pool.needs_block());
    }

    #[test]
    fn test_byte_block_layout() {
        let mut pool = BytePool::bytes();
        pool.intern(b"abc".to_vec()).unwrap();
        pool.intern(Vec::new()).unwrap();
        let mut out = Vec::new();
        pool.write_block(&mut out);
        assert_eq!(out, vec![0x26, 0x02, 0x03, b'a', b'b', b'c', 0x00]);
    }

    #[test]
    fn test_declared_pool_is_closed() {
        let mut pool = IntPool::ints();
        let mut out = Vec::new();
        pool.declare(&mut out, vec![10, 20]).unwrap();
        assert_eq!(pool.intern(20).unwrap(), 1);
        assert!(matches!(
            pool.intern(30),
            Err(AssemblerError::UndeclaredConstant { .. })
        ));
        assert!(matches!(
            pool.declare(&mut out, vec![1]),
            Err(AssemblerError::PoolAlreadyDeclared { .. })
        ));
    }

    #[test]
    fn test_declare_after_intern_rejected() {
        let mut pool = IntPool::ints();
        pool.intern(1).unwrap();
        let mut out = Vec::new();
        assert!(pool.declare(&mut out, vec![1]).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_declare_oversized_block() {
        let mut pool = IntPool::ints();
        let mut out = Vec::new();
        let values: Vec<u64> = (0..=MAX_POOL_ENTRIES as u64).collect();
        let err = pool.declare(&mut out, values).unwrap_err();
        assert!(matches!(err, AssemblerError::PoolFull { pool: "intc" }));
        assert!(out.is_empty());
        assert!(pool.is_empty());
    }
}
