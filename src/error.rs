use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum PracticeError {
    NoTranscript,
    IndexOutOfRange { index: usize, len: usize },
}

impl Error for PracticeError {}

impl fmt::Display for PracticeError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PracticeError::NoTranscript => write!(fmt, "no transcript loaded"),
            PracticeError::IndexOutOfRange { index, len } => write!(
                fmt,
                "caption index {} out of range (transcript has {})",
                index, len
            ),
        }
    }
}
