#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use repl_wire::FrameCodec;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail cleanly: no panics, no endless loops
    let mut codec = FrameCodec::with_max_packet_size(64 * 1024 * 1024);
    let mut buf = BytesMut::from(data);
    while let Ok(Some(_)) = codec.decode(&mut buf) {}
    while let Ok(Some(_)) = codec.decode_eof(&mut buf) {}
});
