//! Oblibeny Core
//!
//! Shared syntax tree, type, and program definitions used by the analyzer
//! and the CLI. Data only: all analysis behavior lives in
//! `oblibeny-analyzer`.

pub mod expr;
pub mod loc;
pub mod program;
pub mod types;

pub use expr::{ConstructKind, Expr};
pub use loc::SourceLoc;
pub use program::{Program, ResourceBudget, ResourceKind, ResourceSpec};
pub use types::{Parameter, ResourceType, Type};
