//! Assembler for TEAL v1 smart-signature programs.
//!
//! ```
//! let program = tealasm::assemble_str("int 1\nbnz done\nerr\ndone:\nint 1").unwrap();
//! assert_eq!(program[0], 1);
//! ```

pub use tealasm_common::*;
pub use tealasm_macros::{teal_asm, teal_asm_interpolator};

#[cfg(test)]
mod tests;
