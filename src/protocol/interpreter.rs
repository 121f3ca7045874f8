use bytes::Bytes;

use crate::error::BoxError;

/// Turns an assembled packet body into an application packet.
///
/// Supplied when the channel is created. Failures are delivered to the consumer
/// at the position the packet would have taken.
pub trait PacketInterpreter: Send + 'static {
    type Packet: Send + 'static;

    fn interpret(&mut self, body: Bytes) -> Result<Self::Packet, BoxError>;
}

impl<F, P, E> PacketInterpreter for F
where
    F: FnMut(Bytes) -> Result<P, E> + Send + 'static,
    P: Send + 'static,
    E: Into<BoxError>,
{
    type Packet = P;

    fn interpret(&mut self, body: Bytes) -> Result<P, BoxError> {
        self(body).map_err(Into::into)
    }
}

/// Hands each packet body through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawInterpreter;

impl PacketInterpreter for RawInterpreter {
    type Packet = Bytes;

    fn interpret(&mut self, body: Bytes) -> Result<Bytes, BoxError> {
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn closures_are_interpreters() {
        let mut first_byte = |body: Bytes| -> Result<u8, String> {
            body.first().copied().ok_or_else(|| "empty body".to_string())
        };

        assert_eq!(first_byte.interpret(Bytes::from_static(&[0xFE, 1])).unwrap(), 0xFE);
        let err = first_byte.interpret(Bytes::new()).unwrap_err();
        assert_eq!(err.to_string(), "empty body");
    }

    #[test]
    fn raw_interpreter_is_identity() {
        let body = Bytes::from_static(b"row event");
        assert_eq!(RawInterpreter.interpret(body.clone()).unwrap(), body);
    }
}
