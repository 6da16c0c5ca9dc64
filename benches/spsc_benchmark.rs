/// Ring buffer performance benchmark
///
/// 环形缓冲区性能基准测试，与 rtrb 对比
///
/// 重点测试：
/// 1. new() 创建性能（槽数组不经过栈的堆上原地构造）
/// 2. 单线程 write/read 吞吐
/// 3. 批量传输与逐个传输的差异（每批次一次索引发布）
/// 4. 双线程生产者-消费者吞吐（缓存行隔离的效果）

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use spscring::RingBuffer;
use std::hint::black_box;
use std::time::Duration;

/// Benchmark: RingBuffer creation performance
///
/// 不同容量下的 new() 性能
fn benchmark_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ringbuf_creation");

    macro_rules! bench_create {
        ($($cap:literal),*) => {$(
            group.bench_with_input(BenchmarkId::new("spscring", $cap), &$cap, |b, _| {
                b.iter(|| black_box(RingBuffer::<u64, $cap>::new().split()));
            });
            group.bench_with_input(BenchmarkId::new("rtrb", $cap), &$cap, |b, &cap| {
                b.iter(|| black_box(rtrb::RingBuffer::<u64>::new(black_box(cap - 1))));
            });
        )*};
    }
    bench_create!(16, 256, 4096, 65536);

    group.finish();
}

/// Benchmark: Single-threaded write/read throughput
///
/// 单线程 write/read 吞吐量测试
fn benchmark_single_thread_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("ringbuf_single_thread");
    let operations = 10_000u64;
    group.throughput(Throughput::Elements(operations));

    let (mut producer, mut consumer) = RingBuffer::<u64, 128>::new().split();
    group.bench_function("spscring", |b| {
        b.iter(|| {
            for i in 0..operations {
                let _ = producer.write(black_box(i));
                let _ = black_box(consumer.read());
            }
        });
    });

    let (mut producer, mut consumer) = rtrb::RingBuffer::<u64>::new(127);
    group.bench_function("rtrb", |b| {
        b.iter(|| {
            for i in 0..operations {
                let _ = producer.push(black_box(i));
                let _ = black_box(consumer.pop());
            }
        });
    });

    group.finish();
}

/// Benchmark: Batch transfer versus element-by-element transfer
///
/// 批量传输与逐个传输对比
fn benchmark_batch_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ringbuf_batch_ops");

    for batch_size in [8usize, 32, 255] {
        group.throughput(Throughput::Elements(batch_size as u64));
        let input: Vec<u64> = (0..batch_size as u64).collect();
        let mut output = vec![0u64; batch_size];

        let mut ring = RingBuffer::<u64, 256>::new();
        group.bench_with_input(BenchmarkId::new("batch", batch_size), &batch_size, |b, _| {
            b.iter(|| {
                let written = ring.write_batch(black_box(&input));
                let read = ring.read_batch(&mut output);
                black_box((written, read));
            });
        });

        group.bench_with_input(BenchmarkId::new("single", batch_size), &batch_size, |b, _| {
            b.iter(|| {
                for &value in &input {
                    let _ = ring.write(black_box(value));
                }
                for slot in output.iter_mut() {
                    let _ = ring.read_into(slot);
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: Multi-threaded producer-consumer
///
/// 多线程生产者-消费者性能
fn benchmark_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("ringbuf_concurrent");
    group.measurement_time(Duration::from_secs(10));

    let messages = 100_000u64;
    group.throughput(Throughput::Elements(messages));

    macro_rules! bench_concurrent {
        ($($cap:literal),*) => {$(
            group.bench_function(BenchmarkId::new("spscring", $cap), |b| {
                b.iter(|| {
                    let (mut producer, mut consumer) = RingBuffer::<u64, $cap>::new().split();

                    let producer_handle = std::thread::spawn(move || {
                        for i in 0..messages {
                            while producer.write(black_box(i)).is_err() {
                                std::hint::spin_loop();
                            }
                        }
                    });

                    let consumer_handle = std::thread::spawn(move || {
                        let mut count = 0;
                        while count < messages {
                            if consumer.read().is_ok() {
                                count += 1;
                            } else {
                                std::hint::spin_loop();
                            }
                        }
                    });

                    producer_handle.join().unwrap();
                    consumer_handle.join().unwrap();
                });
            });

            group.bench_function(BenchmarkId::new("rtrb", $cap), |b| {
                b.iter(|| {
                    let (mut producer, mut consumer) = rtrb::RingBuffer::<u64>::new($cap - 1);

                    let producer_handle = std::thread::spawn(move || {
                        for i in 0..messages {
                            while producer.push(black_box(i)).is_err() {
                                std::hint::spin_loop();
                            }
                        }
                    });

                    let consumer_handle = std::thread::spawn(move || {
                        let mut count = 0;
                        while count < messages {
                            if consumer.pop().is_ok() {
                                count += 1;
                            } else {
                                std::hint::spin_loop();
                            }
                        }
                    });

                    producer_handle.join().unwrap();
                    consumer_handle.join().unwrap();
                });
            });
        )*};
    }
    bench_concurrent!(16, 1024);

    group.finish();
}

/// Benchmark: Batched multi-threaded transfer
///
/// 多线程批量传输性能
fn benchmark_concurrent_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("ringbuf_concurrent_batch");
    group.measurement_time(Duration::from_secs(10));

    let messages = 100_000usize;
    let chunk = 64;
    group.throughput(Throughput::Elements(messages as u64));

    group.bench_function("spscring_1024", |b| {
        b.iter(|| {
            let (mut producer, mut consumer) = RingBuffer::<u64, 1024>::new().split();

            let producer_handle = std::thread::spawn(move || {
                let data: Vec<u64> = (0..chunk as u64).collect();
                let mut sent = 0;
                while sent < messages {
                    let end = chunk.min(messages - sent);
                    let n = producer.write_batch(&data[..end]);
                    if n == 0 {
                        std::hint::spin_loop();
                    }
                    sent += n;
                }
            });

            let consumer_handle = std::thread::spawn(move || {
                let mut buf = vec![0u64; chunk];
                let mut count = 0;
                while count < messages {
                    let n = consumer.read_batch(&mut buf);
                    if n == 0 {
                        std::hint::spin_loop();
                    }
                    count += n;
                }
            });

            producer_handle.join().unwrap();
            consumer_handle.join().unwrap();
        });
    });

    group.finish();
}

/// Benchmark: Read performance
///
/// Read 性能测试
fn benchmark_read_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("ringbuf_read");
    let items = 50;

    group.bench_function("spscring_read", |b| {
        b.iter_batched(
            || {
                let mut ring = RingBuffer::<u64, 64>::new();
                ring.write_iter(0..items);
                ring
            },
            |mut ring| {
                for _ in 0..items {
                    black_box(ring.read().unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("rtrb_pop", |b| {
        b.iter_batched(
            || {
                let (mut producer, consumer) = rtrb::RingBuffer::<u64>::new(63);
                for i in 0..items {
                    producer.push(i).unwrap();
                }
                consumer
            },
            |mut consumer| {
                for _ in 0..items {
                    black_box(consumer.pop().unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_creation,
    benchmark_single_thread_throughput,
    benchmark_batch_operations,
    benchmark_concurrent,
    benchmark_concurrent_batch,
    benchmark_read_only,
);

criterion_main!(benches);
