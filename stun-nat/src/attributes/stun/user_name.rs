const USER_NAME: u16 = 0x0006;

crate::common::opaque_attribute!(
    /// The [`UserName`] attribute is used for message integrity.  It identifies
    /// the username and password combination used in the message-integrity
    /// check. The value is kept as received; it is not validated against any
    /// profile.
    ///
    /// # Examples
    ///```rust
    /// # use stun_nat::attributes::stun::UserName;
    /// let attr = UserName::from("evtj:h6vY");
    /// assert_eq!(attr.as_str(), Ok("evtj:h6vY"));
    ///```
    UserName,
    USER_NAME,
    "USERNAME",
    text,
);
