//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod dispatch;

pub use dispatch::{decode_dispatch_response, encode_dispatch_request};
