//! Server refusal codes
// (c) 2025 Ross Younger

/// The reason a server gave for declining a request.
///
/// Carried in the `param` field of a [`ServerMessage`](super::ServerMessage) of kind
/// [`Refusal`](super::MessageKind::Refusal).
/// A refusal means the server behaved correctly; it is reported to the user but is not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    /// The requested file does not exist on the server
    #[error("wrong file name")]
    WrongFileName,
    /// The requested start address lies outside the file
    #[error("wrong fragment address")]
    WrongFragmentAddress,
    /// The request asked for zero bytes
    #[error("no fragment size")]
    NoFragmentSize,
    /// A reason code we do not know about
    #[error("unknown refusal reason {0}")]
    Unknown(u32),
}

impl Refusal {
    /// On-wire reason code for [`Refusal::WrongFileName`]
    pub const WRONG_FILE_NAME: u32 = 1;
    /// On-wire reason code for [`Refusal::WrongFragmentAddress`]
    pub const WRONG_FRAGMENT_ADDRESS: u32 = 2;
    /// On-wire reason code for [`Refusal::NoFragmentSize`]
    pub const NO_FRAGMENT_SIZE: u32 = 3;

    /// The on-wire reason code
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Refusal::WrongFileName => Self::WRONG_FILE_NAME,
            Refusal::WrongFragmentAddress => Self::WRONG_FRAGMENT_ADDRESS,
            Refusal::NoFragmentSize => Self::NO_FRAGMENT_SIZE,
            Refusal::Unknown(code) => code,
        }
    }
}

impl From<u32> for Refusal {
    fn from(code: u32) -> Self {
        match code {
            Self::WRONG_FILE_NAME => Refusal::WrongFileName,
            Self::WRONG_FRAGMENT_ADDRESS => Refusal::WrongFragmentAddress,
            Self::NO_FRAGMENT_SIZE => Refusal::NoFragmentSize,
            other => Refusal::Unknown(other),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Refusal;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1, Refusal::WrongFileName, "wrong file name")]
    #[case(2, Refusal::WrongFragmentAddress, "wrong fragment address")]
    #[case(3, Refusal::NoFragmentSize, "no fragment size")]
    #[case(0, Refusal::Unknown(0), "unknown refusal reason 0")]
    #[case(77, Refusal::Unknown(77), "unknown refusal reason 77")]
    fn reason_codes(#[case] code: u32, #[case] expected: Refusal, #[case] message: &str) {
        let refusal = Refusal::from(code);
        assert_eq!(refusal, expected);
        assert_eq!(refusal.code(), code);
        assert_eq!(refusal.to_string(), message);
    }
}
