use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Could not parse line: {0:?}")]
    Syntax(String),

    #[error("Unknown opcode: {0}")]
    UnknownOpcode(String),

    #[error("{op} expects {expected}, got {got} arg(s)")]
    ArgumentCount {
        op: String,
        expected: String,
        got: usize,
    },

    #[error("{op} unknown arg {field}")]
    UnknownField { op: String, field: String },

    #[error("Invalid byte constant: {0}")]
    InvalidByteConstant(String),

    #[error("Invalid integer literal: {0}")]
    InvalidInteger(String),

    #[error("Invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("{op} immediate {value} does not fit in one byte")]
    ImmediateOutOfRange { op: String, value: i64 },

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("Reference to undefined label: {0}")]
    LabelNotFound(String),

    #[error("Label {0:?} is before reference but only forward jumps are allowed")]
    BackwardJump(String),

    #[error("Label {0:?} is too far away")]
    JumpTooFar(String),

    #[error("Cannot have more than 256 {pool} constants")]
    PoolFull { pool: &'static str },

    #[error("{pool} constants already declared")]
    PoolAlreadyDeclared { pool: &'static str },

    #[error("{pool} constant {value} is not in the declared block")]
    UndeclaredConstant { pool: &'static str, value: String },

    #[error("Invalid {pool} index: {index}")]
    InvalidPoolIndex { pool: &'static str, index: i64 },

    #[error("Truncated varuint")]
    TruncatedVarUint,

    #[error("Varuint overflows 64 bits")]
    VarUintOverflow,

    #[error("Invalid opcode specification: {0}")]
    Spec(#[from] serde_json::Error),

    #[error("{source_name}:{line}: {source}")]
    AtLine {
        source_name: String,
        line: usize,
        #[source]
        source: Box<AssemblerError>,
    },
}

/// Coarse failure categories, used by callers that only care about the
/// class of problem rather than its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Parse,
    DuplicateLabel,
    UndefinedLabel,
    BackwardJumpNotAllowed,
    JumpTooFar,
    ConstantPoolOverflow,
    Spec,
}

impl AssemblerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_)
            | Self::UnknownOpcode(_)
            | Self::ArgumentCount { .. }
            | Self::UnknownField { .. } => ErrorKind::Syntax,
            Self::InvalidByteConstant(_)
            | Self::InvalidInteger(_)
            | Self::InvalidAddress { .. }
            | Self::ImmediateOutOfRange { .. }
            | Self::TruncatedVarUint
            | Self::VarUintOverflow => ErrorKind::Parse,
            Self::DuplicateLabel(_) => ErrorKind::DuplicateLabel,
            Self::LabelNotFound(_) => ErrorKind::UndefinedLabel,
            Self::BackwardJump(_) => ErrorKind::BackwardJumpNotAllowed,
            Self::JumpTooFar(_) => ErrorKind::JumpTooFar,
            Self::PoolAlreadyDeclared { .. } => ErrorKind::Syntax,
            Self::PoolFull { .. }
            | Self::UndeclaredConstant { .. }
            | Self::InvalidPoolIndex { .. } => ErrorKind::ConstantPoolOverflow,
            Self::Spec(_) => ErrorKind::Spec,
            Self::AtLine { source, .. } => source.kind(),
        }
    }

    /// Source line the error was raised on, if it came from a line of input.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub(crate) fn at_line(self, source_name: &str, line: usize) -> Self {
        match self {
            Self::AtLine { .. } => self,
            other => Self::AtLine {
                source_name: source_name.to_string(),
                line,
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn argument_count(op: &str, expected: impl Into<String>, got: usize) -> Self {
        Self::ArgumentCount {
            op: op.to_string(),
            expected: expected.into(),
            got,
        }
    }
}

/// A label declared in the source, positioned at a byte offset of the
/// instruction stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelInfo {
    pub offset: usize,
}

/// A branch placeholder waiting for its target to be known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelReference {
    pub source_line: usize,
    pub offset: usize,
    pub label: String,
}
