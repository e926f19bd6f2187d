const REALM: u16 = 0x0014;

crate::common::opaque_attribute!(
    /// The [`Realm`] attribute may be present in requests and responses.
    /// Presence of the realm attribute in a request indicates that long-term
    /// credentials are being used for authentication.
    ///
    /// # Examples
    ///```rust
    /// # use stun_nat::attributes::stun::Realm;
    /// let attr = Realm::from("example.org");
    /// assert_eq!(attr.as_str(), Ok("example.org"));
    ///```
    Realm,
    REALM,
    "REALM",
    text,
);
