//! Deterministic simulation support shared by the DST harnesses

mod rng;

pub use rng::DeterministicRng;
