use std::collections::HashMap;

use crate::opcodes::BRANCH_WIDTH;
use crate::types::{AssemblerError, LabelInfo, LabelReference};

/// Largest forward distance a branch offset can encode.
pub const MAX_JUMP: usize = 0x7fff;

/// Collects label definitions and branch placeholders during the pass, then
/// patches every placeholder once all labels are known.
#[derive(Debug, Default)]
pub struct LabelResolver {
    labels: HashMap<String, LabelInfo>,
    references: Vec<LabelReference>,
}

impl LabelResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, offset: usize) -> Result<(), AssemblerError> {
        if self.labels.contains_key(name) {
            return Err(AssemblerError::DuplicateLabel(name.to_string()));
        }
        self.labels.insert(name.to_string(), LabelInfo { offset });
        Ok(())
    }

    pub fn reference(&mut self, source_line: usize, offset: usize, label: &str) {
        self.references.push(LabelReference {
            source_line,
            offset,
            label: label.to_string(),
        });
    }

    /// Rewrites each branch placeholder in `program` with the big-endian
    /// distance from the end of the branch to its label. Errors carry the
    /// line of the offending branch.
    pub fn resolve(&self, program: &mut [u8], source_name: &str) -> Result<(), AssemblerError> {
        for reference in &self.references {
            self.patch(program, reference)
                .map_err(|e| e.at_line(source_name, reference.source_line))?;
        }
        Ok(())
    }

    fn patch(&self, program: &mut [u8], reference: &LabelReference) -> Result<(), AssemblerError> {
        let label = &reference.label;
        let dest = self
            .labels
            .get(label)
            .ok_or_else(|| AssemblerError::LabelNotFound(label.clone()))?
            .offset;
        let next_pc = reference.offset + BRANCH_WIDTH;
        if dest < next_pc {
            return Err(AssemblerError::BackwardJump(label.clone()));
        }
        let jump = dest - next_pc;
        if jump > MAX_JUMP {
            return Err(AssemblerError::JumpTooFar(label.clone()));
        }
        let [hi, lo] = (jump as u16).to_be_bytes();
        program[reference.offset + 1] = hi;
        program[reference.offset + 2] = lo;
        Ok(())
    }
}
