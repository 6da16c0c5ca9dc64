//! # Lock-Free SPSC Ring Buffer
//!
//! 无锁 SPSC 环形缓冲区
//!
//! `spscring` is a fixed-capacity, lock-free Single Producer Single Consumer (SPSC) ring
//! buffer. Elements are constructed in place into uninitialized slots and moved out again,
//! so the element type needs neither `Default` nor `Clone`, and no operation allocates.
//!
//! `spscring` 是一个固定容量的单生产者单消费者（SPSC）无锁环形缓冲区。
//! 元素直接在未初始化的槽中构造并从中移出，因此元素类型既不需要 `Default` 也不需要 `Clone`，
//! 且任何操作都不会分配内存。
//!
//! ## Features
//!
//! 特性
//!
//! - **Lock-Free** - One acquire load and one release store per transfer, never a lock
//! - **Non-Blocking** - Every call returns immediately; retry and backoff belong to the caller
//! - **Batch Transfer** - One index publish per batch instead of per element
//! - **No False Sharing** - Read index, write index and slot array each start on their own
//!   128-byte line
//! - **Type-Level SPSC** - Exactly one non-`Clone` producer and one non-`Clone` consumer
//!
//! - **无锁设计** - 每次传输一次 acquire 加载和一次 release 存储，从不加锁
//! - **非阻塞** - 每次调用立即返回；重试和退避由调用者负责
//! - **批量传输** - 每批次只发布一次索引，而非每个元素一次
//! - **无伪共享** - 读索引、写索引和槽数组各自从独立的 128 字节缓存行开始
//! - **类型级 SPSC** - 恰好一个不可 `Clone` 的生产者和一个不可 `Clone` 的消费者
//!
//! ## Quick Start
//!
//! 快速开始
//!
//! ```rust
//! use spscring::RingBuffer;
//!
//! // 16 slots, up to 15 elements
//! // 16 个槽，最多 15 个元素
//! let mut ring = RingBuffer::<i32, 16>::new();
//!
//! ring.write(42).unwrap();
//! ring.write(100).unwrap();
//!
//! assert_eq!(ring.read(), Ok(42));
//! assert_eq!(ring.read(), Ok(100));
//! assert!(ring.read().is_err());
//! ```
//!
//! ## Multi-threaded Usage
//!
//! 多线程使用
//!
//! ```rust
//! use spscring::RingBuffer;
//! use std::thread;
//!
//! let (mut producer, mut consumer) = RingBuffer::<String, 32>::new().split();
//!
//! let producer_handle = thread::spawn(move || {
//!     for i in 0..100 {
//!         let mut msg = format!("Message {}", i);
//!         // A full buffer hands the value back for the next attempt
//!         // 缓冲区满时值会被返还，用于下一次尝试
//!         while let Err(full) = producer.write(msg) {
//!             msg = full.into_inner();
//!             thread::yield_now();
//!         }
//!     }
//! });
//!
//! let consumer_handle = thread::spawn(move || {
//!     let mut received = Vec::new();
//!     while received.len() < 100 {
//!         match consumer.read() {
//!             Ok(msg) => received.push(msg),
//!             Err(_) => thread::yield_now(),
//!         }
//!     }
//!     received
//! });
//!
//! producer_handle.join().unwrap();
//! let messages = consumer_handle.join().unwrap();
//! assert_eq!(messages.len(), 100);
//! assert_eq!(messages[99], "Message 99");
//! ```
//!
//! ## Batch Operations
//!
//! 批量操作
//!
//! ```rust
//! let (mut producer, mut consumer) = spscring::spsc::channel::<u32, 8>();
//!
//! // Only 7 of the 10 fit; the caller retries with the rest
//! // 10 个中只能放入 7 个；调用者用剩余部分重试
//! let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
//! let written = producer.write_batch(&data);
//! assert_eq!(written, 7);
//!
//! let mut output = [0u32; 5];
//! assert_eq!(consumer.read_batch(&mut output), 5);
//! assert_eq!(output, [1, 2, 3, 4, 5]);
//!
//! assert_eq!(producer.write_batch(&data[written..]), 3);
//! let remaining: Vec<u32> = consumer.drain().collect();
//! assert_eq!(remaining, vec![6, 7, 8, 9, 10]);
//! ```
//!
//! ## Capacity
//!
//! 容量
//!
//! `CAPACITY` is a const generic checked at compile time: it must be a power of two in
//! `2..=MAX_CAPACITY`. One slot is always left free to tell a full buffer from an empty one,
//! so the buffer holds at most `CAPACITY - 1` elements.
//!
//! `CAPACITY` 是编译期检查的常量泛型：必须是 `2..=MAX_CAPACITY` 范围内的 2 的幂次。
//! 始终保留一个空闲槽以区分满和空，因此缓冲区最多容纳 `CAPACITY - 1` 个元素。
//!
//! ## Notes
//!
//! 注意事项
//!
//! - `len`, `is_empty` and `is_full` are relaxed snapshots; under concurrent use they may be
//!   stale and are meant for diagnostics and backoff heuristics only
//! - `clear` needs exclusive access and is only available on [`RingBuffer`]
//! - Remaining elements are dropped when the last handle goes away
//!
//! - `len`、`is_empty` 和 `is_full` 是 relaxed 快照；并发使用时可能过时，仅用于诊断和退避启发
//! - `clear` 需要独占访问，仅在 [`RingBuffer`] 上提供
//! - 最后一个句柄销毁时剩余元素会被 drop

mod core;
pub mod error;
mod ring;
mod shim;
pub mod spsc;
mod trace;

#[cfg(all(test, not(feature = "loom")))]
mod tests;

pub use crate::core::{CACHE_LINE, MAX_CAPACITY, validate_capacity};
pub use crate::error::{CapacityError, PopError, PushError, ReuniteError};
pub use crate::ring::RingBuffer;
pub use crate::spsc::{Consumer, Drain, Producer};
pub use crate::trace::init_tracing;
