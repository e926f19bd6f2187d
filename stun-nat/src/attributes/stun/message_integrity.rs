const MESSAGE_INTEGRITY: u16 = 0x0008;

crate::common::opaque_attribute!(
    /// The [`MessageIntegrity`] attribute contains an HMAC-SHA1 of the STUN
    /// message. The 20 bytes digest is carried verbatim; it is neither
    /// computed nor checked by the codec.
    ///
    /// # Examples
    ///```rust
    /// # use stun_nat::attributes::stun::MessageIntegrity;
    /// let attr = MessageIntegrity::new([0x2b; 20]);
    /// assert_eq!(attr.as_bytes().len(), 20);
    ///```
    MessageIntegrity,
    MESSAGE_INTEGRITY,
    "MESSAGE-INTEGRITY",
);
