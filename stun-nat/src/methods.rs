//! STUN Methods Registry

use crate::message::MessageMethod;

/// Reserved
pub const RESERVED: MessageMethod = MessageMethod(0x0000);

/// Binding. The only method used by NAT behavior discovery.
pub const BINDING: MessageMethod = MessageMethod(0x0001);

/// Shared secret. Reserved since RFC 5389, decoded but never emitted.
pub const SHARED_SECRET: MessageMethod = MessageMethod(0x0002);
