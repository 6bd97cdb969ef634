//! The Oblibeny syntax tree.
//!
//! A closed tagged-variant type covering both phases of the language. The
//! tree is built once by the upstream parser and never mutated; every
//! analysis stage works on `&Expr`.

use crate::loc::SourceLoc;
use crate::program::ResourceSpec;
use crate::types::{Parameter, Type};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display as StrumDisplay, EnumIter};

/// One node of the syntax tree. Every variant carries the source location
/// reported by the parser as its final field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    IntLit(i64, SourceLoc),
    /// Float literal
    FloatLit(f64, SourceLoc),
    /// Boolean literal
    BoolLit(bool, SourceLoc),
    /// String literal
    StringLit(String, SourceLoc),
    /// Variable reference
    Ident(String, SourceLoc),

    /// Function application: `(callee args...)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        loc: SourceLoc,
    },

    /// Deploy-time function definition
    DefunDeploy {
        name: String,
        params: Vec<Parameter>,
        return_type: Option<Type>,
        body: Vec<Expr>,
        loc: SourceLoc,
    },
    /// The only loop construct legal in deploy code: `(bounded-for i start end body...)`
    /// iterating over the half-open range `[start, end)`.
    BoundedFor {
        var: String,
        start: Box<Expr>,
        end: Box<Expr>,
        body: Vec<Expr>,
        loc: SourceLoc,
    },
    /// Capability-scoped block: `(with-capability cap body...)`
    WithCapability {
        capability: Box<Expr>,
        body: Vec<Expr>,
        loc: SourceLoc,
    },

    /// Compile-time function definition
    DefunCompile {
        name: String,
        params: Vec<Parameter>,
        return_type: Option<Type>,
        body: Vec<Expr>,
        loc: SourceLoc,
    },
    /// Macro definition (compile-only)
    Macro {
        name: String,
        params: Vec<Parameter>,
        body: Vec<Expr>,
        loc: SourceLoc,
    },
    /// Dynamic evaluation (compile-only)
    EvalCompile { expr: Box<Expr>, loc: SourceLoc },
    /// File inclusion (compile-only)
    Include { path: String, loc: SourceLoc },
    /// Unbounded iteration over an iterable (compile-only)
    For {
        var: String,
        iterable: Box<Expr>,
        body: Vec<Expr>,
        loc: SourceLoc,
    },
    /// Unbounded conditional loop (compile-only)
    While {
        condition: Box<Expr>,
        body: Vec<Expr>,
        loc: SourceLoc,
    },

    /// Lexical bindings: `(let ((name value)...) body...)`
    Let {
        bindings: Vec<(String, Expr)>,
        body: Vec<Expr>,
        loc: SourceLoc,
    },
    /// Assignment to an existing binding
    Set {
        target: String,
        value: Box<Expr>,
        loc: SourceLoc,
    },
    /// Two-armed conditional
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        loc: SourceLoc,
    },

    /// Fixed-size array allocation: `(array <elem-type> <size>)`
    ArrayLit {
        elem_type: Type,
        size: usize,
        loc: SourceLoc,
    },
    /// Array read: `(array-get arr idx)`
    ArrayGet {
        array: Box<Expr>,
        index: Box<Expr>,
        loc: SourceLoc,
    },
    /// Array write: `(array-set arr idx value)`
    ArraySet {
        array: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
        loc: SourceLoc,
    },
    /// Array length query
    ArrayLength { array: Box<Expr>, loc: SourceLoc },

    /// GPIO write (capability-gated I/O)
    GpioSet {
        device: Box<Expr>,
        value: Box<Expr>,
        loc: SourceLoc,
    },
    /// GPIO read
    GpioGet { device: Box<Expr>, loc: SourceLoc },
    /// UART transmit
    UartSend {
        device: Box<Expr>,
        data: Box<Expr>,
        loc: SourceLoc,
    },
    /// UART receive
    UartRecv { device: Box<Expr>, loc: SourceLoc },
    /// Sensor sample
    SensorRead { sensor: Box<Expr>, loc: SourceLoc },
    /// Network transmit
    NetworkSend {
        device: Box<Expr>,
        data: Box<Expr>,
        loc: SourceLoc,
    },
    /// Network receive
    NetworkRecv { device: Box<Expr>, loc: SourceLoc },
    /// Busy-wait for a number of milliseconds
    SleepMs { duration: Box<Expr>, loc: SourceLoc },
    /// Monotonic clock read
    Timestamp { loc: SourceLoc },

    /// Capability declaration: `(defcap name (params...) "description")`
    Defcap {
        name: String,
        params: Vec<Parameter>,
        description: String,
        loc: SourceLoc,
    },
    /// Resource budget declaration form
    ResourceBudget {
        specs: Vec<ResourceSpec>,
        loc: SourceLoc,
    },
}

impl Expr {
    /// Source location of this node.
    pub fn loc(&self) -> SourceLoc {
        match self {
            Expr::IntLit(_, l)
            | Expr::FloatLit(_, l)
            | Expr::BoolLit(_, l)
            | Expr::StringLit(_, l)
            | Expr::Ident(_, l) => *l,
            Expr::Call { loc, .. }
            | Expr::DefunDeploy { loc, .. }
            | Expr::BoundedFor { loc, .. }
            | Expr::WithCapability { loc, .. }
            | Expr::DefunCompile { loc, .. }
            | Expr::Macro { loc, .. }
            | Expr::EvalCompile { loc, .. }
            | Expr::Include { loc, .. }
            | Expr::For { loc, .. }
            | Expr::While { loc, .. }
            | Expr::Let { loc, .. }
            | Expr::Set { loc, .. }
            | Expr::If { loc, .. }
            | Expr::ArrayLit { loc, .. }
            | Expr::ArrayGet { loc, .. }
            | Expr::ArraySet { loc, .. }
            | Expr::ArrayLength { loc, .. }
            | Expr::GpioSet { loc, .. }
            | Expr::GpioGet { loc, .. }
            | Expr::UartSend { loc, .. }
            | Expr::UartRecv { loc, .. }
            | Expr::SensorRead { loc, .. }
            | Expr::NetworkSend { loc, .. }
            | Expr::NetworkRecv { loc, .. }
            | Expr::SleepMs { loc, .. }
            | Expr::Timestamp { loc }
            | Expr::Defcap { loc, .. }
            | Expr::ResourceBudget { loc, .. } => *loc,
        }
    }

    /// The construct tag of this node, used for phase classification.
    pub fn kind(&self) -> ConstructKind {
        match self {
            Expr::IntLit(..) => ConstructKind::Int,
            Expr::FloatLit(..) => ConstructKind::Float,
            Expr::BoolLit(..) => ConstructKind::Bool,
            Expr::StringLit(..) => ConstructKind::String,
            Expr::Ident(..) => ConstructKind::Ident,
            Expr::Call { .. } => ConstructKind::Call,
            Expr::DefunDeploy { .. } => ConstructKind::DefunDeploy,
            Expr::BoundedFor { .. } => ConstructKind::BoundedFor,
            Expr::WithCapability { .. } => ConstructKind::WithCapability,
            Expr::DefunCompile { .. } => ConstructKind::DefunCompile,
            Expr::Macro { .. } => ConstructKind::Macro,
            Expr::EvalCompile { .. } => ConstructKind::EvalCompile,
            Expr::Include { .. } => ConstructKind::Include,
            Expr::For { .. } => ConstructKind::For,
            Expr::While { .. } => ConstructKind::While,
            Expr::Let { .. } => ConstructKind::Let,
            Expr::Set { .. } => ConstructKind::Set,
            Expr::If { .. } => ConstructKind::If,
            Expr::ArrayLit { .. } => ConstructKind::Array,
            Expr::ArrayGet { .. } => ConstructKind::ArrayGet,
            Expr::ArraySet { .. } => ConstructKind::ArraySet,
            Expr::ArrayLength { .. } => ConstructKind::ArrayLength,
            Expr::GpioSet { .. } => ConstructKind::GpioSet,
            Expr::GpioGet { .. } => ConstructKind::GpioGet,
            Expr::UartSend { .. } => ConstructKind::UartSend,
            Expr::UartRecv { .. } => ConstructKind::UartRecv,
            Expr::SensorRead { .. } => ConstructKind::SensorRead,
            Expr::NetworkSend { .. } => ConstructKind::NetworkSend,
            Expr::NetworkRecv { .. } => ConstructKind::NetworkRecv,
            Expr::SleepMs { .. } => ConstructKind::SleepMs,
            Expr::Timestamp { .. } => ConstructKind::Timestamp,
            Expr::Defcap { .. } => ConstructKind::Defcap,
            Expr::ResourceBudget { .. } => ConstructKind::ResourceBudget,
        }
    }
}

/// Fieldless tag for each `Expr` variant.
///
/// The phase classifier takes its compile-only set as a collection of these
/// tags rather than hard-coding variant checks, so the classification is
/// configurable and unit-testable in isolation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ConstructKind {
    Int,
    Float,
    Bool,
    String,
    Ident,
    Call,
    DefunDeploy,
    BoundedFor,
    WithCapability,
    DefunCompile,
    Macro,
    EvalCompile,
    Include,
    For,
    While,
    Let,
    Set,
    If,
    Array,
    ArrayGet,
    ArraySet,
    ArrayLength,
    GpioSet,
    GpioGet,
    UartSend,
    UartRecv,
    SensorRead,
    NetworkSend,
    NetworkRecv,
    SleepMs,
    Timestamp,
    Defcap,
    ResourceBudget,
}

fn write_seq(f: &mut fmt::Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    for e in exprs {
        write!(f, " {}", e)?;
    }
    Ok(())
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Parameter]) -> fmt::Result {
    write!(f, "(")?;
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", p)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    /// Single-line s-expression rendering, used in diagnostic messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntLit(n, _) => write!(f, "{}", n),
            Expr::FloatLit(x, _) => write!(f, "{}", x),
            Expr::BoolLit(b, _) => write!(f, "{}", b),
            Expr::StringLit(s, _) => write!(f, "{:?}", s),
            Expr::Ident(name, _) => write!(f, "{}", name),
            Expr::Call { callee, args, .. } => {
                write!(f, "({}", callee)?;
                write_seq(f, args)?;
                write!(f, ")")
            }
            Expr::DefunDeploy { name, params, return_type, body, .. } => {
                write!(f, "(defun-deploy {} ", name)?;
                write_params(f, params)?;
                if let Some(ty) = return_type {
                    write!(f, " : {}", ty)?;
                }
                write_seq(f, body)?;
                write!(f, ")")
            }
            Expr::DefunCompile { name, params, return_type, body, .. } => {
                write!(f, "(defun-compile {} ", name)?;
                write_params(f, params)?;
                if let Some(ty) = return_type {
                    write!(f, " : {}", ty)?;
                }
                write_seq(f, body)?;
                write!(f, ")")
            }
            Expr::Macro { name, params, body, .. } => {
                write!(f, "(macro {} ", name)?;
                write_params(f, params)?;
                write_seq(f, body)?;
                write!(f, ")")
            }
            Expr::EvalCompile { expr, .. } => write!(f, "(eval-compile {})", expr),
            Expr::Include { path, .. } => write!(f, "(include {:?})", path),
            Expr::BoundedFor { var, start, end, body, .. } => {
                write!(f, "(bounded-for {} {} {}", var, start, end)?;
                write_seq(f, body)?;
                write!(f, ")")
            }
            Expr::For { var, iterable, body, .. } => {
                write!(f, "(for {} {}", var, iterable)?;
                write_seq(f, body)?;
                write!(f, ")")
            }
            Expr::While { condition, body, .. } => {
                write!(f, "(while {}", condition)?;
                write_seq(f, body)?;
                write!(f, ")")
            }
            Expr::WithCapability { capability, body, .. } => {
                write!(f, "(with-capability {}", capability)?;
                write_seq(f, body)?;
                write!(f, ")")
            }
            Expr::Let { bindings, body, .. } => {
                write!(f, "(let (")?;
                for (i, (name, value)) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({} {})", name, value)?;
                }
                write!(f, ")")?;
                write_seq(f, body)?;
                write!(f, ")")
            }
            Expr::Set { target, value, .. } => write!(f, "(set {} {})", target, value),
            Expr::If { condition, then_branch, else_branch, .. } => {
                write!(f, "(if {} {} {})", condition, then_branch, else_branch)
            }
            Expr::ArrayLit { elem_type, size, .. } => write!(f, "(array {} {})", elem_type, size),
            Expr::ArrayGet { array, index, .. } => write!(f, "(array-get {} {})", array, index),
            Expr::ArraySet { array, index, value, .. } => {
                write!(f, "(array-set {} {} {})", array, index, value)
            }
            Expr::ArrayLength { array, .. } => write!(f, "(array-length {})", array),
            Expr::GpioSet { device, value, .. } => write!(f, "(gpio-set {} {})", device, value),
            Expr::GpioGet { device, .. } => write!(f, "(gpio-get {})", device),
            Expr::UartSend { device, data, .. } => write!(f, "(uart-send {} {})", device, data),
            Expr::UartRecv { device, .. } => write!(f, "(uart-recv {})", device),
            Expr::SensorRead { sensor, .. } => write!(f, "(sensor-read {})", sensor),
            Expr::NetworkSend { device, data, .. } => {
                write!(f, "(network-send {} {})", device, data)
            }
            Expr::NetworkRecv { device, .. } => write!(f, "(network-recv {})", device),
            Expr::SleepMs { duration, .. } => write!(f, "(sleep-ms {})", duration),
            Expr::Timestamp { .. } => write!(f, "(timestamp)"),
            Expr::Defcap { name, params, description, .. } => {
                write!(f, "(defcap {} ", name)?;
                write_params(f, params)?;
                write!(f, " {:?})", description)
            }
            Expr::ResourceBudget { specs, .. } => {
                write!(f, "(resource-budget")?;
                for spec in specs {
                    write!(f, " ({} {})", spec.kind, spec.amount)?;
                }
                write!(f, ")")
            }
        }
    }
}
