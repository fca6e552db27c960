//! Reasoning-trace compiler for the triage client.
//!
//! Turns the free-text trace written by the rule engine into a typed graph
//! for rendering: classify lines -> extract stage records -> synthesize a
//! laid-out graph -> lint. Compilation never fails; input without usable
//! structure yields an empty or partial graph.

pub mod classify;
pub mod compile;
pub mod diagnostics;
pub mod dialect;
pub mod dot;
pub mod errors;
pub mod extract;
pub mod graph;
pub mod layout;
pub mod lint;
pub mod records;
pub mod response;
pub mod style;
pub mod synth;

pub use classify::*;
pub use compile::*;
pub use diagnostics::*;
pub use dialect::*;
pub use dot::*;
pub use errors::*;
pub use extract::*;
pub use graph::*;
pub use layout::*;
pub use lint::*;
pub use records::*;
pub use response::*;
pub use style::*;
pub use synth::*;
