use anyhow::{bail, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Sequence context of a cytosine as reported in the Bismark `XM` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallContext {
    CpG,
    CHG,
    CHH,
    Unknown,
    /// Base is not a cytosine (`.`).
    NonCytosine,
}

/// Methylation call for one base of a read.
///
/// Only calls in CpG context carry a methylation state. Every other symbol of
/// the `XM` alphabet decodes to `NotApplicable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Methylated,
    Unmethylated,
    NotApplicable,
}

impl CallContext {
    pub fn from_byte(symbol: u8) -> Result<Self> {
        match symbol {
            b'Z' | b'z' => Ok(CallContext::CpG),
            b'X' | b'x' => Ok(CallContext::CHG),
            b'H' | b'h' => Ok(CallContext::CHH),
            b'U' | b'u' => Ok(CallContext::Unknown),
            b'.' => Ok(CallContext::NonCytosine),
            _ => bail!("Unsupported methylation call symbol: '{}'", symbol as char),
        }
    }
}

impl fmt::Display for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CallContext::CpG => write!(f, "CpG"),
            CallContext::CHG => write!(f, "CHG"),
            CallContext::CHH => write!(f, "CHH"),
            CallContext::Unknown => write!(f, "unknown"),
            CallContext::NonCytosine => write!(f, "none"),
        }
    }
}

impl Call {
    /// Decodes one symbol of an `XM` call string.
    ///
    /// # Errors
    /// Returns an error if the byte is not part of the Bismark call alphabet.
    ///
    /// # Examples
    /// ```
    /// use methylome::Call;
    ///
    /// assert_eq!(Call::from_byte(b'Z').unwrap(), Call::Methylated);
    /// assert_eq!(Call::from_byte(b'h').unwrap(), Call::NotApplicable);
    /// assert!(Call::from_byte(b'Q').is_err());
    /// ```
    pub fn from_byte(symbol: u8) -> Result<Self> {
        let context = CallContext::from_byte(symbol)?;

        let call = match (context, symbol) {
            (CallContext::CpG, b'Z') => Call::Methylated,
            (CallContext::CpG, _) => Call::Unmethylated,
            _ => Call::NotApplicable,
        };
        Ok(call)
    }

    pub fn is_cpg(&self) -> bool {
        matches!(self, Call::Methylated | Call::Unmethylated)
    }

    /// Numeric matrix encoding: methylated is 1, unmethylated is 0.
    pub fn encode(&self) -> Option<u8> {
        match self {
            Call::Methylated => Some(1),
            Call::Unmethylated => Some(0),
            Call::NotApplicable => None,
        }
    }

    pub fn to_symbol(&self) -> char {
        match self {
            Call::Methylated => 'Z',
            Call::Unmethylated => 'z',
            Call::NotApplicable => '.',
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_symbol())
    }
}

impl Serialize for Call {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_char(self.to_symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpg_symbols() {
        assert_eq!(Call::from_byte(b'Z').unwrap(), Call::Methylated);
        assert_eq!(Call::from_byte(b'z').unwrap(), Call::Unmethylated);
        assert!(Call::Methylated.is_cpg());
        assert!(Call::Unmethylated.is_cpg());
    }

    #[test]
    fn test_non_cpg_symbols() {
        for symbol in [b'X', b'x', b'H', b'h', b'U', b'u', b'.'] {
            let call = Call::from_byte(symbol).unwrap();
            assert_eq!(call, Call::NotApplicable);
            assert!(!call.is_cpg());
        }
        assert_eq!(CallContext::from_byte(b'x').unwrap(), CallContext::CHG);
        assert_eq!(CallContext::from_byte(b'H').unwrap(), CallContext::CHH);
    }

    #[test]
    fn test_unsupported_symbol() {
        let result = Call::from_byte(b'N');
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unsupported methylation call symbol: 'N'"
        );
    }

    #[test]
    fn test_encoding() {
        assert_eq!(Call::Methylated.encode(), Some(1));
        assert_eq!(Call::Unmethylated.encode(), Some(0));
        assert_eq!(Call::NotApplicable.encode(), None);
    }
}
