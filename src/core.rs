//! Core ring buffer implementation - shared state for every front-end
//!
//! 核心环形缓冲区实现 - 所有前端共享的状态
//!
//! This module owns everything that has to agree on the index/storage invariants:
//! - Cache-line isolated read and write indices
//! - Uninitialized slot storage with explicit construct / move-out / drop
//! - The acquire/release transfer protocol for single and batch operations
//! - Status queries, clear and teardown
//!
//! 此模块拥有所有必须遵守索引/存储不变量的部分：
//! - 缓存行隔离的读写索引
//! - 未初始化的槽存储，显式构造 / 移出 / 析构
//! - 单个与批量操作的 acquire/release 传输协议
//! - 状态查询、清空与销毁
//!
//! The occupied slots are always the circular range `[read, write)`. One slot is kept free
//! so that `read == write` means empty and `increment(write) == read` means full.
//!
//! 已占用的槽始终是环形区间 `[read, write)`。保留一个空闲槽，
//! 使得 `read == write` 表示空，`increment(write) == read` 表示满。

use std::mem::MaybeUninit;
use std::ops::Deref;
use std::ptr::addr_of_mut;
use std::sync::Arc;

use crate::error::CapacityError;
use crate::shim::atomic::{AtomicUsize, Ordering};
use crate::shim::cell::UnsafeCell;
use crate::trace::{debug, trace};

/// Alignment boundary separating the slot array and the two indices
///
/// 分隔槽数组与两个索引的对齐边界
///
/// 128 bytes covers adjacent-line prefetching on x86_64 as well as the 128-byte lines of
/// recent aarch64 parts.
pub const CACHE_LINE: usize = 128;

/// Largest accepted capacity (2^30 slots)
///
/// 允许的最大容量（2^30 个槽）
pub const MAX_CAPACITY: usize = 1 << 30;

/// Check a capacity against the ring rules
///
/// 按环形缓冲区规则检查容量
///
/// # Returns
/// `Ok(())` for a power of two in `2..=MAX_CAPACITY`
///
/// # 返回值
/// 容量为 `2..=MAX_CAPACITY` 范围内的 2 的幂次时返回 `Ok(())`
pub const fn validate_capacity(capacity: usize) -> Result<(), CapacityError> {
    if capacity == 0 {
        Err(CapacityError::Zero)
    } else if capacity == 1 {
        Err(CapacityError::TooSmall)
    } else if !capacity.is_power_of_two() {
        Err(CapacityError::NotPowerOfTwo(capacity))
    } else if capacity > MAX_CAPACITY {
        Err(CapacityError::TooLarge(capacity))
    } else {
        Ok(())
    }
}

/// Value padded and aligned to its own cache line
///
/// 填充并对齐到独立缓存行的值
#[repr(C, align(128))]
pub struct CacheAligned<T>(T);

impl<T> CacheAligned<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for CacheAligned<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

const _: () = assert!(std::mem::align_of::<CacheAligned<u8>>() == CACHE_LINE);

/// A storage cell; occupied or empty depending only on its position relative to the indices
///
/// 存储单元；占用或空闲仅取决于其相对索引的位置
type Slot<T> = UnsafeCell<MaybeUninit<T>>;

/// Core ring buffer storage structure
///
/// 核心环形缓冲区存储结构
///
/// # Type Parameters
/// - `T`: Element type, no `Default` or `Clone` bound required
/// - `CAPACITY`: Slot count, a power of two in `2..=MAX_CAPACITY`
///
/// # 类型参数
/// - `T`: 元素类型，无需 `Default` 或 `Clone` 约束
/// - `CAPACITY`: 槽数量，`2..=MAX_CAPACITY` 范围内的 2 的幂次
///
/// # Layout
/// `#[repr(C)]` keeps the declared order; each field starts on its own 128-byte boundary so
/// the producer's stores to `write` never invalidate the line holding `read`, and neither
/// index shares a line with slot data.
///
/// # 布局
/// `#[repr(C)]` 保持声明顺序；每个字段都从独立的 128 字节边界开始，
/// 使生产者对 `write` 的存储不会使 `read` 所在缓存行失效，两个索引也不会与槽数据共享缓存行。
#[repr(C)]
pub struct RingCore<T, const CAPACITY: usize> {
    slots: CacheAligned<[Slot<T>; CAPACITY]>,

    /// Next slot the consumer moves out of. Stored only by the consumer.
    ///
    /// 消费者下一个移出的槽。仅由消费者存储。
    read: CacheAligned<AtomicUsize>,

    /// Next slot the producer constructs into. Stored only by the producer.
    ///
    /// 生产者下一个构造的槽。仅由生产者存储。
    write: CacheAligned<AtomicUsize>,
}

// SAFETY: slots are handed between exactly one producer and one consumer through the
// release/acquire pairs on `read` and `write`; a slot is never accessed by both sides at once.
unsafe impl<T: Send, const CAPACITY: usize> Sync for RingCore<T, CAPACITY> {}

impl<T, const CAPACITY: usize> RingCore<T, CAPACITY> {
    /// Post-monomorphization capacity check; referencing it fails the build for a bad capacity
    const VALID: () = match validate_capacity(CAPACITY) {
        Ok(()) => (),
        Err(CapacityError::Zero) => panic!("ring capacity must not be zero"),
        Err(CapacityError::TooSmall) => panic!("ring capacity must be at least 2"),
        Err(CapacityError::NotPowerOfTwo(_)) => panic!("ring capacity must be a power of two"),
        Err(CapacityError::TooLarge(_)) => panic!("ring capacity exceeds MAX_CAPACITY (2^30)"),
    };

    const MASK: usize = CAPACITY - 1;

    /// Allocate an empty core directly inside its shared allocation
    ///
    /// 直接在共享分配中构造一个空的核心
    ///
    /// The core is built in place in the `Arc` allocation: the slot array is never copied and
    /// never passes through the stack, so capacities in the millions are fine.
    ///
    /// 核心在 `Arc` 分配中原地构造：槽数组既不会被复制也不经过栈，因此百万级容量也没有问题。
    pub fn shared() -> Arc<Self> {
        let () = Self::VALID;

        let mut core = Arc::<Self>::new_uninit();
        let ptr = Arc::get_mut(&mut core)
            .expect("a freshly allocated Arc has no other references")
            .as_mut_ptr();
        // SAFETY: both indices are written before `assume_init`. Without loom the slot array
        // is an array of transparent `UnsafeCell<MaybeUninit<T>>`, valid when uninitialized;
        // loom cells carry tracking state and are constructed one by one.
        let core = unsafe {
            addr_of_mut!((*ptr).read).write(CacheAligned::new(AtomicUsize::new(0)));
            addr_of_mut!((*ptr).write).write(CacheAligned::new(AtomicUsize::new(0)));
            #[cfg(feature = "loom")]
            {
                let slots = addr_of_mut!((*ptr).slots.0).cast::<Slot<T>>();
                for index in 0..CAPACITY {
                    slots.add(index).write(UnsafeCell::new(MaybeUninit::uninit()));
                }
            }
            core.assume_init()
        };

        debug!(
            capacity = CAPACITY,
            slot_bytes = std::mem::size_of::<T>(),
            "ring buffer allocated"
        );
        core
    }

    /// Advance an index by one slot with wraparound
    ///
    /// 将索引前进一个槽并环绕
    #[inline(always)]
    pub const fn increment(index: usize) -> usize {
        (index + 1) & Self::MASK
    }

    /// Number of elements currently stored
    ///
    /// 当前存储的元素数量
    ///
    /// Both loads are relaxed: under concurrent transfers this is a stale-but-cheap estimate
    /// meant for diagnostics and backoff heuristics.
    ///
    /// 两次加载均为 relaxed：并发传输时这是一个可能过时但廉价的估计值，
    /// 用于诊断和退避启发。
    #[inline]
    pub fn len(&self) -> usize {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Relaxed);
        if write >= read {
            write - read
        } else {
            CAPACITY - (read - write)
        }
    }

    /// Check if the buffer is empty (relaxed snapshot)
    ///
    /// 检查缓冲区是否为空（relaxed 快照）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read.load(Ordering::Relaxed) == self.write.load(Ordering::Relaxed)
    }

    /// Check if the buffer is full (relaxed snapshot, same test as `push`)
    ///
    /// 检查缓冲区是否已满（relaxed 快照，与 `push` 使用相同判断）
    #[inline]
    pub fn is_full(&self) -> bool {
        Self::increment(self.write.load(Ordering::Relaxed)) == self.read.load(Ordering::Relaxed)
    }

    #[inline(always)]
    fn slot(&self, index: usize) -> &Slot<T> {
        debug_assert!(index < CAPACITY);
        // SAFETY: `index` is always masked into `0..CAPACITY` by the callers.
        unsafe { self.slots.get_unchecked(index) }
    }

    /// Construct `value` into an empty slot
    ///
    /// # Safety
    /// The slot at `index` must be empty and owned by the caller's role.
    #[inline(always)]
    unsafe fn put(&self, index: usize, value: T) {
        self.slot(index).with_mut(|ptr| unsafe {
            (*ptr).write(value);
        });
    }

    /// Move the element out of an occupied slot, leaving it empty
    ///
    /// # Safety
    /// The slot at `index` must be occupied and owned by the caller's role.
    #[inline(always)]
    unsafe fn take(&self, index: usize) -> T {
        self.slot(index)
            .with_mut(|ptr| unsafe { (*ptr).assume_init_read() })
    }

    /// Write a single element
    ///
    /// 写入单个元素
    ///
    /// # Safety
    /// The caller must be the only producer of this core for the duration of the call.
    ///
    /// # 安全性
    /// 调用期间调用者必须是此核心唯一的生产者。
    #[inline]
    pub unsafe fn push(&self, value: T) -> Result<(), T> {
        let write = self.write.load(Ordering::Relaxed);
        let next = Self::increment(write);

        // Acquire pairs with the consumer's release: the slot at `write` is fully vacated
        // 与消费者的 release 配对：`write` 处的槽已完全腾空
        if next == self.read.load(Ordering::Acquire) {
            return Err(value);
        }

        unsafe { self.put(write, value) };

        // Release publishes the constructed element together with the index
        // Release 将已构造的元素与索引一同发布
        self.write.store(next, Ordering::Release);
        Ok(())
    }

    /// Read a single element
    ///
    /// 读取单个元素
    ///
    /// # Safety
    /// The caller must be the only consumer of this core for the duration of the call.
    ///
    /// # 安全性
    /// 调用期间调用者必须是此核心唯一的消费者。
    #[inline]
    pub unsafe fn pop(&self) -> Option<T> {
        let read = self.read.load(Ordering::Relaxed);

        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        let value = unsafe { self.take(read) };
        self.read.store(Self::increment(read), Ordering::Release);
        Some(value)
    }

    /// Reference to the oldest element without removing it
    ///
    /// # Safety
    /// The caller must be the only consumer, and must not pop while the reference is alive.
    #[inline]
    pub unsafe fn front(&self) -> Option<&T> {
        let read = self.read.load(Ordering::Relaxed);

        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        let value = self
            .slot(read)
            .with(|ptr| unsafe { (*ptr).assume_init_ref() });
        Some(value)
    }

    /// Write elements pulled from `values` until it runs dry or the buffer fills
    ///
    /// 从 `values` 中拉取元素写入，直到迭代器耗尽或缓冲区已满
    ///
    /// The read index is re-checked (acquire) before every slot, and the advanced write index
    /// is published once, after the loop. An item is only pulled from `values` once a free
    /// slot is known to exist, so nothing is lost when the buffer fills.
    ///
    /// 每个槽之前都会重新检查读索引（acquire），推进后的写索引在循环结束后只发布一次。
    /// 仅在确认存在空闲槽后才从 `values` 拉取元素，因此缓冲区满时不会丢失任何元素。
    ///
    /// # Returns
    /// Number of elements written
    ///
    /// # 返回值
    /// 写入的元素数量
    ///
    /// # Safety
    /// The caller must be the only producer of this core for the duration of the call.
    pub unsafe fn push_iter<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.write.load(Ordering::Relaxed);
        let mut cursor = Publish::new(&self.write, start);
        let mut values = values.into_iter();

        loop {
            let next = Self::increment(cursor.position);
            if next == self.read.load(Ordering::Acquire) {
                break;
            }
            // A panicking iterator unwinds through `cursor`, which publishes what was written
            // 迭代器 panic 时经由 `cursor` 展开，已写入的部分会被发布
            let Some(value) = values.next() else {
                break;
            };
            unsafe { self.put(cursor.position, value) };
            cursor.position = next;
            cursor.count += 1;
        }

        cursor.count
    }

    /// Move up to `dest.len()` elements out of the buffer into `dest`
    ///
    /// 将最多 `dest.len()` 个元素移出缓冲区写入 `dest`
    ///
    /// Each element is assigned over `dest[i]`, dropping the value that was there. The
    /// write index is re-checked (acquire) before every slot; the advanced read index is
    /// published once, after the loop.
    ///
    /// 每个元素赋值覆盖 `dest[i]`，原有值被 drop。每个槽之前都会重新检查写索引（acquire），
    /// 推进后的读索引在循环结束后只发布一次。
    ///
    /// # Safety
    /// The caller must be the only consumer of this core for the duration of the call.
    pub unsafe fn pop_slice(&self, dest: &mut [T]) -> usize {
        let start = self.read.load(Ordering::Relaxed);
        let mut cursor = Publish::new(&self.read, start);

        for out in dest.iter_mut() {
            if cursor.position == self.write.load(Ordering::Acquire) {
                break;
            }
            let value = unsafe { self.take(cursor.position) };
            // The slot is already vacated; advance before the assignment may run a panicking drop
            // 槽已腾空；在赋值可能触发 panic 的 drop 之前先推进
            cursor.position = Self::increment(cursor.position);
            cursor.count += 1;
            *out = value;
        }

        cursor.count
    }

    /// Drop every live element and reset both indices to zero
    ///
    /// 析构所有存活元素并将两个索引重置为零
    ///
    /// Only the occupied range `[read, write)` is walked; empty slots are never touched.
    ///
    /// 只遍历已占用区间 `[read, write)`，从不触碰空闲槽。
    ///
    /// # Returns
    /// Number of elements dropped
    pub fn clear(&mut self) -> usize {
        let dropped = self.drop_live();
        self.read.store(0, Ordering::Relaxed);
        self.write.store(0, Ordering::Relaxed);
        dropped
    }

    fn drop_live(&mut self) -> usize {
        let end = self.write.load(Ordering::Relaxed);
        let mut current = self.read.load(Ordering::Relaxed);
        let mut dropped = 0;

        while current != end {
            // Advance first so a panicking drop never leaves a dropped slot inside [read, write)
            self.read.store(Self::increment(current), Ordering::Relaxed);
            self.slot(current)
                .with_mut(|ptr| unsafe { (*ptr).assume_init_drop() });
            current = Self::increment(current);
            dropped += 1;
        }

        dropped
    }
}

impl<T, const CAPACITY: usize> Drop for RingCore<T, CAPACITY> {
    fn drop(&mut self) {
        let dropped = self.drop_live();
        if dropped > 0 {
            trace!(dropped, "ring buffer dropped with live elements");
        }
    }
}

/// Local index cursor that is published with a single release store when it goes out of
/// scope, including during unwinding
///
/// 本地索引游标，在离开作用域（包括栈展开）时以一次 release 存储发布
struct Publish<'a> {
    index: &'a AtomicUsize,
    position: usize,
    count: usize,
}

impl<'a> Publish<'a> {
    #[inline(always)]
    fn new(index: &'a AtomicUsize, position: usize) -> Self {
        Self {
            index,
            position,
            count: 0,
        }
    }
}

impl Drop for Publish<'_> {
    #[inline(always)]
    fn drop(&mut self) {
        if self.count > 0 {
            self.index.store(self.position, Ordering::Release);
        }
    }
}
