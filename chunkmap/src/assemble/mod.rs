//! Map assembly from tile renders.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌──────────────────────┐
//! │ TileDiscovery│──►│ GridLayout │──►│  TileGridAssembler   │
//! │ (names)      │   │ (bounds)   │   │  decode ∥ per column │
//! └──────────────┘   └────────────┘   │  composite in order  │
//!                                     └──────────┬───────────┘
//!                                                ▼
//!                                  AssembledMap { raster, metadata }
//! ```
//!
//! The assembler never writes to disk; [`crate::workspace`] persists the
//! result only after assembly succeeds.

mod assembler;
mod error;

pub use assembler::{AssembleOptions, AssembledMap, AssemblyStats, TileGridAssembler};
pub use error::AssembleError;
