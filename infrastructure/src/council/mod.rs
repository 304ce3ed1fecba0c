//! Council backend adapter: frame decoding, the wire protocol, and the
//! HTTP gateway implementing the application's `CouncilGateway` port.

pub mod framing;
pub mod gateway;
pub mod protocol;
