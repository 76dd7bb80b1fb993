use std::sync::Arc;

use crate::{
    address::{AddressDecoder, ChecksumAddressDecoder},
    constants::{parse_byte_constant, parse_byte_constants, parse_index, parse_uint},
    labels::LabelResolver,
    observer::{AssemblyObserver, TracingObserver},
    opcodes::{Dispatch, Handler, OpSpec, Opcode, OpcodeTable},
    pool::{BytePool, IntPool, ARG_SLOTS, BYTE_SLOTS, INT_SLOTS},
    types::AssemblerError,
    varuint::encode_varuint,
};

pub const DEFAULT_VERSION: u64 = 1;

#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Program version written as the leading varuint.
    pub version: u64,
    /// Name used as a prefix in line-numbered errors.
    pub source_name: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            source_name: String::new(),
        }
    }
}

/// One assembly job: feed it source lines, then call [`Assembler::finalize`].
pub struct Assembler {
    table: Arc<OpcodeTable>,
    config: AssemblerConfig,
    out: Vec<u8>,
    ints: IntPool,
    bytes: BytePool,
    labels: LabelResolver,
    source_line: usize,
    address_decoder: Box<dyn AddressDecoder>,
    observer: Box<dyn AssemblyObserver>,
}

impl Assembler {
    pub fn new(table: impl Into<Arc<OpcodeTable>>) -> Self {
        Self {
            table: table.into(),
            config: AssemblerConfig::default(),
            out: Vec::new(),
            ints: IntPool::ints(),
            bytes: BytePool::bytes(),
            labels: LabelResolver::new(),
            source_line: 0,
            address_decoder: Box::new(ChecksumAddressDecoder),
            observer: Box::new(TracingObserver),
        }
    }

    /// An assembler over the bundled TEAL v1 opcode table.
    pub fn with_embedded_table() -> Result<Self, AssemblerError> {
        Ok(Self::new(OpcodeTable::embedded()?))
    }

    pub fn with_config(mut self, config: AssemblerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.config.version = version;
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.config.source_name = name.into();
        self
    }

    pub fn with_address_decoder(mut self, decoder: Box<dyn AddressDecoder>) -> Self {
        self.address_decoder = decoder;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn AssemblyObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Instruction bytes emitted so far, before constant blocks and label
    /// patching.
    pub fn program(&self) -> &[u8] {
        &self.out
    }

    pub fn int_constants(&self) -> &[u64] {
        self.ints.values()
    }

    pub fn byte_constants(&self) -> &[Vec<u8>] {
        self.bytes.values()
    }

    pub fn source_line(&self) -> usize {
        self.source_line
    }

    /// Assembles every line of `text`, stopping at the first error.
    pub fn assemble_source(&mut self, text: &str) -> Result<(), AssemblerError> {
        self.assemble_lines(text.lines())
    }

    pub fn assemble_lines<I, S>(&mut self, lines: I) -> Result<(), AssemblerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.add_line(line.as_ref())?;
        }
        Ok(())
    }

    /// Assembles the next source line, counting it for diagnostics.
    pub fn add_line(&mut self, line: &str) -> Result<(), AssemblerError> {
        self.source_line += 1;
        let line_number = self.source_line;
        self.assemble_line(line)
            .map_err(|err| err.at_line(&self.config.source_name, line_number))
    }

    fn assemble_line(&mut self, line: &str) -> Result<(), AssemblerError> {
        let tokens: Vec<&str> = line
            .split_whitespace()
            .take_while(|token| !token.starts_with("//"))
            .collect();
        let Some((&mnemonic, args)) = tokens.split_first() else {
            return Ok(());
        };

        let table = Arc::clone(&self.table);
        match table.dispatch(mnemonic) {
            Some(Dispatch::Special(handler, spec)) => {
                if let Some(spec) = spec {
                    self.trace_op(spec);
                }
                self.assemble_special(handler, mnemonic, spec, args)
            }
            Some(Dispatch::Plain(spec)) => {
                self.trace_op(spec);
                expect_args(mnemonic, args, 0)?;
                self.out.push(spec.opcode);
                Ok(())
            }
            None => match mnemonic.strip_suffix(':') {
                Some(label) => self.assemble_label(line, label, args),
                None => Err(AssemblerError::UnknownOpcode(mnemonic.to_string())),
            },
        }
    }

    /// Consumes the session and produces the program: version, any constant
    /// blocks not yet declared in the source, then the patched instructions.
    pub fn finalize(mut self) -> Result<Vec<u8>, AssemblerError> {
        let mut program = encode_varuint(self.config.version);
        if self.ints.needs_block() {
            self.ints.write_block(&mut program);
        }
        if self.bytes.needs_block() {
            self.bytes.write_block(&mut program);
        }
        self.labels
            .resolve(&mut self.out, &self.config.source_name)?;
        program.extend_from_slice(&self.out);
        tracing::debug!(
            bytes = program.len(),
            ints = self.ints.len(),
            byte_constants = self.bytes.len(),
            "assembled program"
        );
        Ok(program)
    }

    fn trace_op(&mut self, spec: &OpSpec) {
        self.observer
            .on_op(self.source_line, self.out.len(), spec.opcode, &spec.name);
    }

    fn assemble_label(&mut self, line: &str, label: &str, rest: &[&str]) -> Result<(), AssemblerError> {
        if label.is_empty() || !rest.is_empty() {
            return Err(AssemblerError::Syntax(line.trim().to_string()));
        }
        self.observer.on_label(self.source_line, self.out.len(), label);
        self.labels.define(label, self.out.len())
    }

    fn assemble_special(
        &mut self,
        handler: Handler,
        op: &str,
        spec: Option<&OpSpec>,
        args: &[&str],
    ) -> Result<(), AssemblerError> {
        match handler {
            Handler::Int => {
                expect_args(op, args, 1)?;
                let value = parse_uint(args[0])?;
                self.ints.write_value(&mut self.out, value)?;
            }
            Handler::IntC => {
                expect_args(op, args, 1)?;
                INT_SLOTS.write_ref(&mut self.out, parse_index(args[0])?)?;
            }
            Handler::IntCBlock => {
                let values = args
                    .iter()
                    .map(|arg| parse_uint(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.ints.declare(&mut self.out, values)?;
            }
            Handler::Byte => {
                if args.is_empty() {
                    return Err(AssemblerError::argument_count(op, "a byte constant", 0));
                }
                let (value, rest) = parse_byte_constant(args)?;
                if !rest.is_empty() {
                    return Err(AssemblerError::argument_count(
                        op,
                        "a single byte constant",
                        args.len(),
                    ));
                }
                self.bytes.write_value(&mut self.out, value)?;
            }
            Handler::ByteC => {
                expect_args(op, args, 1)?;
                BYTE_SLOTS.write_ref(&mut self.out, parse_index(args[0])?)?;
            }
            Handler::ByteCBlock => {
                let values = parse_byte_constants(args)?;
                self.bytes.declare(&mut self.out, values)?;
            }
            Handler::Addr => {
                expect_args(op, args, 1)?;
                let address = self.address_decoder.decode_address(args[0])?;
                self.bytes.write_value(&mut self.out, address)?;
            }
            Handler::Arg => {
                expect_args(op, args, 1)?;
                ARG_SLOTS.write_ref(&mut self.out, parse_index(args[0])?)?;
            }
            Handler::Txn | Handler::Global => {
                expect_args(op, args, 1)?;
                let spec = required(op, spec)?;
                let field = field_index(op, spec, args[0])?;
                self.out.extend_from_slice(&[spec.opcode, field]);
            }
            Handler::Gtxn => {
                expect_args(op, args, 2)?;
                let spec = required(op, spec)?;
                let group_index = byte_immediate(op, args[0])?;
                let field = field_index(op, spec, args[1])?;
                self.out.extend_from_slice(&[spec.opcode, group_index, field]);
            }
            Handler::Load | Handler::Store => {
                expect_args(op, args, 1)?;
                let spec = required(op, spec)?;
                let slot = byte_immediate(op, args[0])?;
                self.out.extend_from_slice(&[spec.opcode, slot]);
            }
            Handler::Bnz => {
                expect_args(op, args, 1)?;
                self.labels
                    .reference(self.source_line, self.out.len(), args[0]);
                self.out.extend_from_slice(&[Opcode::BNZ.0, 0x00, 0x00]);
            }
        }
        Ok(())
    }
}

/// Assembles `text` with the bundled opcode table and default settings.
pub fn assemble_str(text: &str) -> Result<Vec<u8>, AssemblerError> {
    let mut assembler = Assembler::with_embedded_table()?;
    assembler.assemble_source(text)?;
    assembler.finalize()
}

fn expect_args(op: &str, args: &[&str], count: usize) -> Result<(), AssemblerError> {
    if args.len() != count {
        let plural = if count == 1 { "" } else { "s" };
        return Err(AssemblerError::argument_count(
            op,
            format!("{count} arg{plural}"),
            args.len(),
        ));
    }
    Ok(())
}

fn required<'a>(op: &str, spec: Option<&'a OpSpec>) -> Result<&'a OpSpec, AssemblerError> {
    spec.ok_or_else(|| AssemblerError::UnknownOpcode(op.to_string()))
}

fn field_index(op: &str, spec: &OpSpec, field: &str) -> Result<u8, AssemblerError> {
    let unknown = || AssemblerError::UnknownField {
        op: op.to_string(),
        field: field.to_string(),
    };
    let index = spec.enum_index(field).ok_or_else(unknown)?;
    u8::try_from(index).map_err(|_| unknown())
}

fn byte_immediate(op: &str, text: &str) -> Result<u8, AssemblerError> {
    let value = parse_index(text)?;
    u8::try_from(value).map_err(|_| AssemblerError::ImmediateOutOfRange {
        op: op.to_string(),
        value,
    })
}
