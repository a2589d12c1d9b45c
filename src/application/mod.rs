//! Application Layer
//!
//! Use cases built on the domain and ports layers.

pub mod swap_desk;

pub use swap_desk::{SwapDesk, SwapError, SwapPhase};
