const SOFTWARE: u16 = 0x8022;

crate::common::opaque_attribute!(
    /// The [`Software`] attribute contains a textual description of the software
    /// being used by the agent sending the message.  It is used by clients
    /// and servers.  Its value SHOULD include manufacturer and version
    /// number.  The attribute has no impact on operation of the protocol and
    /// serves only as a tool for diagnostic and debugging purposes.
    ///
    /// # Examples
    ///```rust
    /// # use std::error::Error;
    /// # use stun_nat::attributes::stun::Software;
    /// #
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let attr = Software::from("STUN test client");
    /// assert_eq!(attr.as_str()?, "STUN test client");
    /// #
    /// #  Ok(())
    /// # }
    ///```
    Software,
    SOFTWARE,
    "SOFTWARE",
    text,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::StunAttribute;
    use crate::error::StunErrorType;

    #[test]
    fn software_stunt_attribute() {
        let attr = StunAttribute::from(Software::from("test vector"));
        assert!(attr.is_opaque());
        assert!(attr.attribute_type().is_comprehension_optional());
        assert_eq!(attr.expect_opaque().as_slice(), b"test vector");

        let software = Software::try_from(&attr).expect("Can not get SOFTWARE");
        assert_eq!(software.as_str(), Ok("test vector"));
    }

    #[test]
    fn invalid_utf8() {
        let software = Software::new(vec![0xff, 0xfe]);
        assert_eq!(
            software.as_str().expect_err("Error expected"),
            StunErrorType::MalformedAttribute
        );
        assert_eq!(software.as_bytes(), [0xff, 0xfe]);
    }
}
