/// Receives per-instruction diagnostics from an [`Assembler`](crate::Assembler).
pub trait AssemblyObserver {
    /// Called before an opcode from the table is encoded at `pc`.
    fn on_op(&mut self, source_line: usize, pc: usize, opcode: u8, name: &str) {
        let _ = (source_line, pc, opcode, name);
    }

    fn on_label(&mut self, source_line: usize, pc: usize, name: &str) {
        let _ = (source_line, pc, name);
    }
}

/// Forwards diagnostics to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AssemblyObserver for TracingObserver {
    fn on_op(&mut self, source_line: usize, pc: usize, opcode: u8, name: &str) {
        tracing::debug!(":{} {:06x} op {:02x} {}", source_line, pc, opcode, name);
    }

    fn on_label(&mut self, source_line: usize, pc: usize, name: &str) {
        tracing::debug!(":{} {:06x} label {}", source_line, pc, name);
    }
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl AssemblyObserver for NullObserver {}
