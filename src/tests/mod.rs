//! Scenario tests spanning the whole crate
//!
//! 覆盖整个 crate 的场景测试
