const FINGERPRINT: u16 = 0x8028;

crate::common::opaque_attribute!(
    /// The [`Fingerprint`] attribute MAY be present in all STUN messages. It
    /// carries a CRC-32 of the message XOR'ed with 0x5354554e. The value is
    /// carried verbatim; it is neither computed nor checked by the codec.
    ///
    /// # Examples
    ///```rust
    /// # use stun_nat::attributes::stun::Fingerprint;
    /// let attr = Fingerprint::new([0xc0, 0x7d, 0x4c, 0x96]);
    /// assert_eq!(attr.as_bytes(), [0xc0, 0x7d, 0x4c, 0x96]);
    ///```
    Fingerprint,
    FINGERPRINT,
    "FINGERPRINT",
);
