//! Error types for ring buffer operations
//!
//! 环形缓冲区操作的错误类型
//!
//! `Full` and `Empty` are ordinary outcomes of a non-blocking buffer, not faults. They are
//! reported through `Result` so the caller decides whether to retry, back off or drop data.
//!
//! `Full` 和 `Empty` 是非阻塞缓冲区的正常结果，而非故障。它们通过 `Result` 返回，
//! 由调用者决定重试、退避还是丢弃数据。

use std::fmt;

use thiserror::Error;

use crate::spsc::{Consumer, Producer};

/// Ring buffer error for write operations
///
/// 写入操作的环形缓冲区错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError<T> {
    /// Buffer is full; the rejected value is handed back
    ///
    /// 缓冲区已满；被拒绝的值返还给调用者
    #[error("ring buffer is full")]
    Full(T),
}

impl<T> PushError<T> {
    /// Recover the value that could not be written
    ///
    /// 取回未能写入的值
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            PushError::Full(value) => value,
        }
    }
}

/// Ring buffer error for read operations
///
/// 读取操作的环形缓冲区错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PopError {
    /// Buffer is empty
    ///
    /// 缓冲区为空
    #[error("ring buffer is empty")]
    Empty,
}

/// Capacity rule violation
///
/// 容量规则违例
///
/// Ring capacities are checked at compile time; this type names the rule so it can also be
/// checked on a plain number through [`validate_capacity`](crate::validate_capacity).
///
/// 环形缓冲区容量在编译期检查；此类型为该规则命名，以便也可以通过
/// [`validate_capacity`](crate::validate_capacity) 对普通数字进行检查。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("capacity must not be zero")]
    Zero,

    /// One slot is always kept free, so a single-slot ring could never hold an element
    #[error("capacity must be at least 2, got 1")]
    TooSmall,

    #[error("capacity must be a power of two, got {0}")]
    NotPowerOfTwo(usize),

    #[error("capacity {0} exceeds the maximum of {max}", max = crate::MAX_CAPACITY)]
    TooLarge(usize),
}

/// Returned by [`RingBuffer::reunite`](crate::RingBuffer::reunite) when the two handles were
/// split from different buffers. Both handles are handed back unchanged.
///
/// 当两个句柄来自不同缓冲区时由 [`RingBuffer::reunite`](crate::RingBuffer::reunite) 返回。
/// 两个句柄原样返还。
#[derive(Error)]
#[error("producer and consumer belong to different ring buffers")]
pub struct ReuniteError<T, const CAPACITY: usize> {
    pub producer: Producer<T, CAPACITY>,
    pub consumer: Consumer<T, CAPACITY>,
}

impl<T, const CAPACITY: usize> fmt::Debug for ReuniteError<T, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReuniteError").finish_non_exhaustive()
    }
}
