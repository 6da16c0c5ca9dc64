//! Producer and consumer handles for two-thread use
//!
//! 双线程使用的生产者和消费者句柄
//!
//! Both handles share one heap-allocated ring core. Neither is `Clone`, and every transfer
//! takes `&mut self`, so the single-producer / single-consumer precondition is enforced by the
//! type system rather than left to documentation.
//!
//! 两个句柄共享同一个堆分配的环形核心。二者均不可 `Clone`，且所有传输操作都需要
//! `&mut self`，因此单生产者 / 单消费者前提由类型系统保证，而非仅靠文档约定。

use std::fmt;
use std::sync::Arc;

use crate::core::RingCore;
use crate::error::{PopError, PushError};
use crate::ring::RingBuffer;

/// Create a new ring buffer and split it into its two halves
///
/// 创建新的环形缓冲区并拆分为两端
///
/// # Type Parameters
/// - `T`: Element type
/// - `CAPACITY`: Slot count (power of two, at least 2); holds up to `CAPACITY - 1` elements
///
/// # 类型参数
/// - `T`: 元素类型
/// - `CAPACITY`: 槽数量（2 的幂次，至少为 2）；最多容纳 `CAPACITY - 1` 个元素
///
/// # Examples
///
/// ```
/// use spscring::spsc;
/// use std::thread;
///
/// let (mut producer, mut consumer) = spsc::channel::<u64, 1024>();
///
/// let writer = thread::spawn(move || {
///     for i in 0..10_000u64 {
///         while producer.write(i).is_err() {
///             std::thread::yield_now();
///         }
///     }
/// });
///
/// let mut expected = 0;
/// while expected < 10_000 {
///     match consumer.read() {
///         Ok(value) => {
///             assert_eq!(value, expected);
///             expected += 1;
///         }
///         Err(_) => thread::yield_now(),
///     }
/// }
/// writer.join().unwrap();
/// ```
pub fn channel<T, const CAPACITY: usize>() -> (Producer<T, CAPACITY>, Consumer<T, CAPACITY>) {
    RingBuffer::new().split()
}

/// Producer half of the ring buffer
///
/// 环形缓冲区的生产者端
pub struct Producer<T, const CAPACITY: usize> {
    core: Arc<RingCore<T, CAPACITY>>,
}

/// Consumer half of the ring buffer
///
/// 环形缓冲区的消费者端
pub struct Consumer<T, const CAPACITY: usize> {
    core: Arc<RingCore<T, CAPACITY>>,
}

/// Draining iterator for the ring buffer
///
/// 环形缓冲区的消费迭代器
///
/// Removes and returns elements until the buffer is observed empty. Elements the producer
/// writes while draining are picked up as well.
///
/// 移除并返回元素，直到观察到缓冲区为空。排空期间生产者写入的元素也会被取出。
pub struct Drain<'a, T, const CAPACITY: usize> {
    core: &'a RingCore<T, CAPACITY>,
}

impl<'a, T, const CAPACITY: usize> Drain<'a, T, CAPACITY> {
    /// Caller must hold the consumer role exclusively for `'a`
    pub(crate) fn new(core: &'a RingCore<T, CAPACITY>) -> Self {
        Self { core }
    }
}

impl<T, const CAPACITY: usize> Iterator for Drain<'_, T, CAPACITY> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: a `Drain` is only created from an exclusive borrow of the consumer role.
        unsafe { self.core.pop() }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // The producer may keep writing, so only the lower bound is known
        (self.core.len(), None)
    }
}

impl<T, const CAPACITY: usize> Producer<T, CAPACITY> {
    pub(crate) fn new(core: Arc<RingCore<T, CAPACITY>>) -> Self {
        Self { core }
    }

    pub(crate) fn core(&self) -> &Arc<RingCore<T, CAPACITY>> {
        &self.core
    }

    /// Get the capacity of the buffer (slot count)
    ///
    /// 获取缓冲区容量（槽数量）
    #[inline]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Get the number of elements currently in the buffer (racy snapshot)
    ///
    /// 获取缓冲区中当前的元素数量（竞态快照）
    #[inline]
    pub fn len(&self) -> usize {
        self.core.len()
    }

    /// Check if the buffer is empty (racy snapshot)
    ///
    /// 检查缓冲区是否为空（竞态快照）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Get the number of free slots in the buffer
    ///
    /// 获取缓冲区中的空闲空间数量
    ///
    /// The consumer can only free more slots concurrently, so this is a lower bound.
    ///
    /// 消费者只会并发地释放更多槽，因此这是一个下界。
    #[inline]
    pub fn free_slots(&self) -> usize {
        CAPACITY - 1 - self.core.len()
    }

    /// Check if the buffer is full
    ///
    /// 检查缓冲区是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        self.core.is_full()
    }

    /// Push a value into the buffer
    ///
    /// 向缓冲区推送一个值
    ///
    /// # Errors
    /// Returns `PushError::Full(value)` if the buffer is full
    ///
    /// # 错误
    /// 如果缓冲区满则返回 `PushError::Full(value)`
    #[inline]
    pub fn write(&mut self, value: T) -> Result<(), PushError<T>> {
        // SAFETY: `Producer` is unique per core and `&mut self` serializes its use.
        let pushed = unsafe { self.core.push(value) };
        pushed.map_err(PushError::Full)
    }

    /// Push a clone of `value`
    ///
    /// 推送 `value` 的克隆
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

    /// Push clones of as many leading elements of `values` as fit
    ///
    /// 尽可能多地推送 `values` 前部元素的克隆
    ///
    /// The whole batch becomes visible to the consumer with one index publish.
    ///
    /// 整个批次通过一次索引发布对消费者可见。
    ///
    /// # Returns
    /// Number of elements pushed (0 to `values.len()`)
    ///
    /// # 返回值
    /// 成功推送的元素数量（0 到 `values.len()`）
    #[inline]
    pub fn write_batch(&mut self, values: &[T]) -> usize
    where
        T: Clone,
    {
        self.write_iter(values.iter().cloned())
    }

    /// Move values out of an iterator until it is exhausted or the buffer is full
    ///
    /// 从迭代器移出值，直到迭代器耗尽或缓冲区已满
    #[inline]
    pub fn write_iter<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        // SAFETY: `Producer` is unique per core and `&mut self` serializes its use.
        unsafe { self.core.push_iter(values) }
    }
}

impl<T, const CAPACITY: usize> Consumer<T, CAPACITY> {
    pub(crate) fn new(core: Arc<RingCore<T, CAPACITY>>) -> Self {
        Self { core }
    }

    pub(crate) fn core(&self) -> &Arc<RingCore<T, CAPACITY>> {
        &self.core
    }

    pub(crate) fn into_core(self) -> Arc<RingCore<T, CAPACITY>> {
        self.core
    }

    /// Get the capacity of the buffer (slot count)
    ///
    /// 获取缓冲区容量（槽数量）
    #[inline]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Get the number of elements currently in the buffer (racy snapshot)
    ///
    /// 获取缓冲区中当前的元素数量（竞态快照）
    #[inline]
    pub fn len(&self) -> usize {
        self.core.len()
    }

    /// Check if the buffer is empty
    ///
    /// 检查缓冲区是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Check if the buffer is full (racy snapshot)
    ///
    /// 检查缓冲区是否已满（竞态快照）
    #[inline]
    pub fn is_full(&self) -> bool {
        self.core.is_full()
    }

    /// Pop a value from the buffer
    ///
    /// 从缓冲区弹出一个值
    ///
    /// # Errors
    /// Returns `PopError::Empty` if the buffer is empty
    ///
    /// # 错误
    /// 如果缓冲区空则返回 `PopError::Empty`
    #[inline]
    pub fn read(&mut self) -> Result<T, PopError> {
        // SAFETY: `Consumer` is unique per core and `&mut self` serializes its use.
        let popped = unsafe { self.core.pop() };
        popped.ok_or(PopError::Empty)
    }

    /// Pop a value into `dest`, leaving it untouched and returning `false` when empty
    ///
    /// 弹出一个值到 `dest`；为空时不修改 `dest` 并返回 `false`
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

    /// Pop multiple values into a slice
    ///
    /// 将多个值批量弹出到切片
    ///
    /// # Returns
    /// Number of elements popped (0 to `dest.len()`); `dest[n..]` is left as it was
    ///
    /// # 返回值
    /// 成功弹出的元素数量（0 到 `dest.len()`）；`dest[n..]` 保持不变
    #[inline]
    pub fn read_batch(&mut self, dest: &mut [T]) -> usize {
        // SAFETY: `Consumer` is unique per core and `&mut self` serializes its use.
        unsafe { self.core.pop_slice(dest) }
    }

    /// Peek at the first element without removing it
    ///
    /// 查看第一个元素但不移除它
    #[inline]
    pub fn peek(&mut self) -> Option<&T> {
        // SAFETY: the exclusive borrow keeps this the only consumer while the reference lives.
        unsafe { self.core.front() }
    }

    /// Create a draining iterator
    ///
    /// 创建一个消费迭代器
    ///
    /// # Examples
    ///
    /// ```
    /// let (mut producer, mut consumer) = spscring::spsc::channel::<i32, 8>();
    /// producer.write_batch(&[1, 2, 3]);
    ///
    /// let items: Vec<i32> = consumer.drain().collect();
    /// assert_eq!(items, vec![1, 2, 3]);
    /// assert!(consumer.is_empty());
    /// ```
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T, CAPACITY> {
        Drain::new(&self.core)
    }
}

impl<T, const CAPACITY: usize> fmt::Debug for Producer<T, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("capacity", &CAPACITY)
            .field("len", &self.len())
            .finish()
    }
}

impl<T, const CAPACITY: usize> fmt::Debug for Consumer<T, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("capacity", &CAPACITY)
            .field("len", &self.len())
            .finish()
    }
}
