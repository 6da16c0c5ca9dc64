//! Single-owner ring buffer front-end
//!
//! 单一所有者的环形缓冲区前端
//!
//! `RingBuffer` exposes every operation through `&mut self`, so a single thread (or a value
//! moved between threads) can drive both ends without handles. For two-thread use, `split`
//! hands out exactly one [`Producer`] and one [`Consumer`]; `reunite` turns them back into a
//! `RingBuffer` once both threads are done.
//!
//! `RingBuffer` 通过 `&mut self` 暴露所有操作，因此单个线程（或在线程间移动的值）
//! 无需句柄即可驱动两端。双线程使用时，`split` 恰好分发一个 [`Producer`] 和一个
//! [`Consumer`]；两个线程结束后 `reunite` 将其重新合并为 `RingBuffer`。

use std::fmt;
use std::sync::Arc;

use crate::core::RingCore;
use crate::error::{PopError, PushError, ReuniteError};
use crate::spsc::{Consumer, Drain, Producer};
use crate::trace::{debug, warn};

/// Fixed-capacity SPSC ring buffer
///
/// 固定容量的 SPSC 环形缓冲区
///
/// # Type Parameters
/// - `T`: Element type
/// - `CAPACITY`: Slot count; a power of two in `2..=MAX_CAPACITY`, checked at compile time.
///   One slot is always kept free, so at most `CAPACITY - 1` elements are stored.
///
/// # 类型参数
/// - `T`: 元素类型
/// - `CAPACITY`: 槽数量；`2..=MAX_CAPACITY` 范围内的 2 的幂次，编译期检查。
///   始终保留一个空闲槽，因此最多存储 `CAPACITY - 1` 个元素。
///
/// # Examples
///
/// ```
/// use spscring::RingBuffer;
///
/// let mut ring = RingBuffer::<u32, 4>::new();
/// assert!(ring.write(1).is_ok());
/// assert!(ring.write(2).is_ok());
/// assert!(ring.write(3).is_ok());
/// assert!(ring.write(4).is_err()); // usable capacity is 3
///
/// assert_eq!(ring.read(), Ok(1));
/// assert_eq!(ring.len(), 2);
/// ```
///
/// A capacity that is not a power of two does not compile:
///
/// ```compile_fail
/// let _ring = spscring::RingBuffer::<u32, 12>::new();
/// ```
pub struct RingBuffer<T, const CAPACITY: usize> {
    core: Arc<RingCore<T, CAPACITY>>,
}

impl<T, const CAPACITY: usize> RingBuffer<T, CAPACITY> {
    /// Create an empty ring buffer
    ///
    /// 创建一个空的环形缓冲区
    pub fn new() -> Self {
        Self {
            core: RingCore::shared(),
        }
    }

    /// Get the capacity of the buffer (slot count)
    ///
    /// 获取缓冲区容量（槽数量）
    #[inline]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Maximum number of elements the buffer can hold at once (`CAPACITY - 1`)
    ///
    /// 缓冲区同时可容纳的最大元素数量（`CAPACITY - 1`）
    #[inline]
    pub const fn usable_capacity(&self) -> usize {
        CAPACITY - 1
    }

    /// Get the number of elements currently in the buffer
    ///
    /// 获取缓冲区中当前的元素数量
    #[inline]
    pub fn len(&self) -> usize {
        self.core.len()
    }

    /// Number of elements that can still be written before the buffer is full
    ///
    /// 缓冲区满之前还能写入的元素数量
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.usable_capacity() - self.len()
    }

    /// Check if the buffer is empty
    ///
    /// 检查缓冲区是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Check if the buffer is full (`CAPACITY - 1` elements stored)
    ///
    /// 检查缓冲区是否已满（已存储 `CAPACITY - 1` 个元素）
    #[inline]
    pub fn is_full(&self) -> bool {
        self.core.is_full()
    }

    /// Write a value, moving it into the buffer
    ///
    /// 写入一个值，将其移动到缓冲区中
    ///
    /// # Errors
    /// Returns `PushError::Full(value)` if the buffer is full; the buffer is unchanged
    ///
    /// # 错误
    /// 如果缓冲区满则返回 `PushError::Full(value)`；缓冲区保持不变
    #[inline]
    pub fn write(&mut self, value: T) -> Result<(), PushError<T>> {
        // SAFETY: `&mut self` makes this the only producer.
        let pushed = unsafe { self.core.push(value) };
        pushed.map_err(PushError::Full)
    }

    /// Write a clone of `value`
    ///
    /// 写入 `value` 的克隆
    ///
    /// # Errors
    /// Returns `PushError::Full` holding the clone if the buffer is full
    ///
    /// # 错误
    /// 如果缓冲区满则返回持有该克隆的 `PushError::Full`
    #[inline]
    pub fn write_cloned(&mut self, value: &T) -> Result<(), PushError<T>>
    where
        T: Clone,
    {
        self.write(value.clone())
    }

    /// Read the oldest value
    ///
    /// 读取最旧的值
    ///
    /// # Errors
    /// Returns `PopError::Empty` if the buffer is empty
    ///
    /// # 错误
    /// 如果缓冲区空则返回 `PopError::Empty`
    #[inline]
    pub fn read(&mut self) -> Result<T, PopError> {
        // SAFETY: `&mut self` makes this the only consumer.
        let popped = unsafe { self.core.pop() };
        popped.ok_or(PopError::Empty)
    }

    /// Read the oldest value into `dest`
    ///
    /// 将最旧的值读入 `dest`
    ///
    /// Returns `false` and leaves `dest` untouched if the buffer is empty.
    ///
    /// 如果缓冲区为空则返回 `false` 且不修改 `dest`。
    #[inline]
    pub fn read_into(&mut self, dest: &mut T) -> bool {
        match self.read() {
            Ok(value) => {
                *dest = value;
                true
            }
            Err(PopError::Empty) => false,
        }
    }

    /// Write clones of as many leading elements of `values` as fit
    ///
    /// 尽可能多地写入 `values` 前部元素的克隆
    ///
    /// # Returns
    /// Number of elements written; a short count means the buffer filled up and the caller
    /// may retry with `&values[written..]`
    ///
    /// # 返回值
    /// 写入的元素数量；少于 `values.len()` 表示缓冲区已满，调用者可用 `&values[written..]` 重试
    #[inline]
    pub fn write_batch(&mut self, values: &[T]) -> usize
    where
        T: Clone,
    {
        self.write_iter(values.iter().cloned())
    }

    /// Move elements from an iterator until it is exhausted or the buffer is full
    ///
    /// 从迭代器移动元素，直到迭代器耗尽或缓冲区已满
    ///
    /// No element is pulled from the iterator unless there is room for it.
    ///
    /// 除非有空间，否则不会从迭代器拉取元素。
    #[inline]
    pub fn write_iter<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        // SAFETY: `&mut self` makes this the only producer.
        unsafe { self.core.push_iter(values) }
    }

    /// Move up to `dest.len()` elements into `dest`, returning how many were read
    ///
    /// 将最多 `dest.len()` 个元素移入 `dest`，返回读取的数量
    #[inline]
    pub fn read_batch(&mut self, dest: &mut [T]) -> usize {
        // SAFETY: `&mut self` makes this the only consumer.
        unsafe { self.core.pop_slice(dest) }
    }

    /// Peek at the oldest element without removing it
    ///
    /// 查看最旧的元素但不移除它
    ///
    /// Takes `&mut self` so the borrow can never be shared with another thread or outlive a read.
    #[inline]
    pub fn peek(&mut self) -> Option<&T> {
        // SAFETY: the exclusive borrow makes this the only consumer until the reference is gone.
        unsafe { self.core.front() }
    }

    /// Remove all elements, dropping them, and reset both indices
    ///
    /// 移除并 drop 所有元素，然后重置两个索引
    ///
    /// # Returns
    /// Number of elements dropped
    ///
    /// # 返回值
    /// 被 drop 的元素数量
    pub fn clear(&mut self) -> usize {
        let core = Arc::get_mut(&mut self.core)
            .expect("RingBuffer owns its core exclusively; split and reunite hand it over whole");
        let dropped = core.clear();
        debug!(dropped, capacity = CAPACITY, "ring buffer cleared");
        dropped
    }

    /// Draining iterator over the buffered elements, oldest first
    ///
    /// 按从旧到新顺序消费缓冲元素的迭代器
    pub fn drain(&mut self) -> Drain<'_, T, CAPACITY> {
        Drain::new(&self.core)
    }

    /// Split into the producer and consumer halves
    ///
    /// 拆分为生产者和消费者两端
    ///
    /// Each half is not `Clone`, so at most one thread can write and one can read.
    ///
    /// 两端均不可 `Clone`，因此最多一个线程写入、一个线程读取。
    pub fn split(self) -> (Producer<T, CAPACITY>, Consumer<T, CAPACITY>) {
        let producer = Producer::new(Arc::clone(&self.core));
        let consumer = Consumer::new(self.core);
        (producer, consumer)
    }

    /// Join the two halves returned by [`split`](Self::split) back into a `RingBuffer`
    ///
    /// 将 [`split`](Self::split) 返回的两端重新合并为 `RingBuffer`
    ///
    /// Buffered elements are kept.
    ///
    /// # Errors
    /// Returns both handles unchanged if they were split from different buffers
    pub fn reunite(
        producer: Producer<T, CAPACITY>,
        consumer: Consumer<T, CAPACITY>,
    ) -> Result<Self, ReuniteError<T, CAPACITY>> {
        if !Arc::ptr_eq(producer.core(), consumer.core()) {
            warn!("attempted to reunite handles of different ring buffers");
            return Err(ReuniteError { producer, consumer });
        }

        drop(producer);
        Ok(Self {
            core: consumer.into_core(),
        })
    }
}

impl<T, const CAPACITY: usize> Default for RingBuffer<T, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAPACITY: usize> fmt::Debug for RingBuffer<T, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &CAPACITY)
            .field("len", &self.len())
            .finish()
    }
}
