use bytes::{Bytes, BytesMut};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use repl_wire::{FrameCodec, MAX_FRAME_BODY_LEN};
use tokio_util::codec::{Decoder, Encoder};

#[allow(clippy::unwrap_used)]
fn bench_frame_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_encode_decode");
    group.sample_size(20);
    let body_sizes = [64usize, 4096, 65536, 1024 * 1024, MAX_FRAME_BODY_LEN + 1024];

    for &size in &body_sizes {
        let body = Bytes::from(vec![0xA5u8; size]);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter_batched(
                || BytesMut::with_capacity(size + 32),
                |mut buf| {
                    let mut codec = FrameCodec::new();
                    codec.encode(body.clone(), &mut buf).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        let mut wire = BytesMut::new();
        FrameCodec::new().encode(body.clone(), &mut wire).unwrap();
        let wire = wire.freeze();

        group.bench_function(format!("decode_{size}b"), |b| {
            b.iter_batched(
                || BytesMut::from(&wire[..]),
                |mut buf| {
                    let mut codec = FrameCodec::new();
                    let decoded = codec.decode(&mut buf).unwrap();
                    assert!(decoded.is_some());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame_encode_decode);
criterion_main!(benches);
