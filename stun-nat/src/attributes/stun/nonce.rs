const NONCE: u16 = 0x0015;

crate::common::opaque_attribute!(
    /// The [`Nonce`] attribute may be present in requests and responses.  It
    /// contains a sequence of qdtext or quoted-pair, kept here as received.
    ///
    /// # Examples
    ///```rust
    /// # use stun_nat::attributes::stun::Nonce;
    /// let attr = Nonce::from("f//499k954d6OL34oL9FSTvy64sA");
    /// assert_eq!(attr.as_str(), Ok("f//499k954d6OL34oL9FSTvy64sA"));
    ///```
    Nonce,
    NONCE,
    "NONCE",
    text,
);
