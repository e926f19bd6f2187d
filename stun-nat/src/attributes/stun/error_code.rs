use crate::error::{StunError, StunErrorType};
use byteorder::{BigEndian, ByteOrder};

const ERROR_CODE: u16 = 0x0009;

// Format of Error-Code Attribute:
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |           Reserved, should be 0         |  C  |     Number    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      Reason Phrase (variable)                                ..
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

const ERROR_CODE_HEADER_SIZE: usize = 4;

crate::common::opaque_attribute!(
    /// The [`ErrorCode`] attribute is used in error response messages. The
    /// value is kept as received; the code and the reason phrase are parsed
    /// on demand.
    /// # Examples
    ///```rust
    /// # use stun_nat::attributes::stun::ErrorCode;
    /// # use std::error::Error;
    /// #
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let attr = ErrorCode::with_code(420, "Unknown Attribute")?;
    /// assert_eq!(attr.code()?, 420);
    /// assert_eq!(attr.reason()?, "Unknown Attribute");
    /// #  Ok(())
    /// # }
    ///```
    ErrorCode,
    ERROR_CODE,
    "ERROR-CODE",
);

impl ErrorCode {
    /// Creates an error code attribute.
    /// # Arguments:
    /// * `code` - The error code, in the range 300 to 699.
    /// * `reason` - The reason phrase.
    /// # Returns:
    /// An error of type [`InvalidParam`](StunErrorType::InvalidParam) if the
    /// code is out of range.
    pub fn with_code(code: u16, reason: &str) -> Result<Self, StunError> {
        if !(300..700).contains(&code) {
            return Err(StunError::new(
                StunErrorType::InvalidParam,
                format!("Error code {} is not in the range 300-699", code),
            ));
        }
        let mut value = vec![0x00; ERROR_CODE_HEADER_SIZE];
        value[2] = (code / 100) as u8;
        value[3] = (code % 100) as u8;
        value.extend_from_slice(reason.as_bytes());
        Ok(Self(value))
    }

    /// Returns the error code, computed as class * 100 + number.
    pub fn code(&self) -> Result<u16, StunError> {
        if self.0.len() < ERROR_CODE_HEADER_SIZE {
            return Err(StunError::new(
                StunErrorType::MalformedAttribute,
                format!("Error code requires 4 bytes, size: {}", self.0.len()),
            ));
        }
        let class = (BigEndian::read_u16(&self.0[..2]) & 0x0700) >> 8;
        let number = u16::from(self.0[3]);
        Ok(class * 100 + number)
    }

    /// Returns the reason phrase.
    pub fn reason(&self) -> Result<&str, StunError> {
        let phrase = self.0.get(ERROR_CODE_HEADER_SIZE..).ok_or_else(|| {
            StunError::new(
                StunErrorType::MalformedAttribute,
                format!("Error code requires 4 bytes, size: {}", self.0.len()),
            )
        })?;
        Ok(std::str::from_utf8(phrase)?)
    }
}
