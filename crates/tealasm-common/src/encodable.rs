use crate::address::{encode_address, PUBLIC_KEY_LEN};

/// A value that can be spliced into a program as a constant push.
pub trait TealEncodable {
    /// The source line that pushes this value.
    fn to_teal_line(&self) -> String;
}

impl TealEncodable for u8 {
    fn to_teal_line(&self) -> String {
        format!("int {self}")
    }
}

impl TealEncodable for u16 {
    fn to_teal_line(&self) -> String {
        format!("int {self}")
    }
}

impl TealEncodable for u32 {
    fn to_teal_line(&self) -> String {
        format!("int {self}")
    }
}

impl TealEncodable for u64 {
    fn to_teal_line(&self) -> String {
        format!("int {self}")
    }
}

impl TealEncodable for Vec<u8> {
    fn to_teal_line(&self) -> String {
        self.as_slice().to_teal_line()
    }
}

impl TealEncodable for &[u8] {
    fn to_teal_line(&self) -> String {
        format!("byte 0x{}", hex::encode(self))
    }
}

impl<const N: usize> TealEncodable for [u8; N] {
    fn to_teal_line(&self) -> String {
        self.as_slice().to_teal_line()
    }
}

impl TealEncodable for &str {
    fn to_teal_line(&self) -> String {
        self.as_bytes().to_teal_line()
    }
}

/// A 32-byte account key, pushed through the `addr` pseudo-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account(pub [u8; PUBLIC_KEY_LEN]);

impl TealEncodable for Account {
    fn to_teal_line(&self) -> String {
        format!("addr {}", encode_address(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        assert_eq!(7u8.to_teal_line(), "int 7");
        assert_eq!(u64::MAX.to_teal_line(), "int 18446744073709551615");
        assert_eq!(vec![0xdeu8, 0xad].to_teal_line(), "byte 0xdead");
        assert_eq!([0u8; 0].to_teal_line(), "byte 0x");
        assert_eq!("ab".to_teal_line(), "byte 0x6162");
        assert!(Account([0; 32]).to_teal_line().starts_with("addr AAAA"));
    }
}
