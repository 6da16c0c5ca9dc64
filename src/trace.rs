//! Tracing hooks for diagnostics.
//!
//! 诊断用的 tracing 钩子
//!
//! Enable with `--features tracing`. All macros become no-ops when the feature is
//! disabled. Only cold paths (construction, clear, teardown) log; transfer operations
//! never do.
//!
//! 使用 `--features tracing` 启用。未启用时所有宏均为空操作。
//! 只有冷路径（构造、清空、销毁）会记录日志，传输操作从不记录。

/// Install a fmt subscriber filtered by `RUST_LOG` (default `spscring=debug`).
///
/// 安装一个由 `RUST_LOG` 过滤的 fmt 订阅者（默认 `spscring=debug`）。
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spscring=debug"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_line_number(false),
        )
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! trace_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug_noop as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use trace_noop as trace;
#[cfg(not(feature = "tracing"))]
pub(crate) use warn_noop as warn;
