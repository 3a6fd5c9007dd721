//! Weedfield - patch-based weed placement and interactive trimming
//!
//! A square field is split into a grid; weed patches are scattered over it and
//! every cell whose jittered sample lands in a patch gets one weed. A mower cuts
//! weeds within its radius, and cutting at a fresh patch centre grows the mower
//! for a limited time.

pub mod core;
pub mod math;
pub mod field;
pub mod weeds;
pub mod mower;
pub mod sim;
