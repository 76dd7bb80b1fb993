pub mod address;
pub mod assembler;
pub mod constants;
pub mod encodable;
pub mod labels;
pub mod observer;
pub mod opcodes;
pub mod pool;
pub mod types;
pub mod varuint;

pub use address::{AddressDecoder, ChecksumAddressDecoder};
pub use assembler::{assemble_str, Assembler, AssemblerConfig};
pub use encodable::{Account, TealEncodable};
pub use observer::{AssemblyObserver, NullObserver, TracingObserver};
pub use opcodes::{OpSpec, Opcode, OpcodeTable};
pub use types::*;
pub use varuint::{decode_varuint, encode_varuint};
