//! Programs and their declared resource budgets.

use crate::expr::Expr;
use crate::loc::SourceLoc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource dimension named in a budget declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    TimeUnits,
    MemoryBytes,
    NetworkBytes,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::TimeUnits => "time-units",
            ResourceKind::MemoryBytes => "memory-bytes",
            ResourceKind::NetworkBytes => "network-bytes",
        };
        write!(f, "{}", name)
    }
}

/// One `(kind amount)` entry of a `resource-budget` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub kind: ResourceKind,
    pub amount: u64,
}

impl ResourceSpec {
    pub fn new(kind: ResourceKind, amount: u64) -> Self {
        Self { kind, amount }
    }
}

/// Caller-declared ceilings that computed worst-case costs must not exceed.
///
/// A dimension left out of the source declaration defaults to `u64::MAX`,
/// i.e. unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBudget {
    pub time_units: u64,
    pub memory_bytes: u64,
    pub network_bytes: u64,
}

impl ResourceBudget {
    pub fn new(time_units: u64, memory_bytes: u64, network_bytes: u64) -> Self {
        Self { time_units, memory_bytes, network_bytes }
    }

    /// Budget with every dimension unconstrained.
    pub fn unlimited() -> Self {
        Self {
            time_units: u64::MAX,
            memory_bytes: u64::MAX,
            network_bytes: u64::MAX,
        }
    }

    /// Fold a list of budget specs into a budget. Later entries for the
    /// same dimension win.
    pub fn from_specs(specs: &[ResourceSpec]) -> Self {
        let mut budget = Self::unlimited();
        for spec in specs {
            match spec.kind {
                ResourceKind::TimeUnits => budget.time_units = spec.amount,
                ResourceKind::MemoryBytes => budget.memory_bytes = spec.amount,
                ResourceKind::NetworkBytes => budget.network_bytes = spec.amount,
            }
        }
        budget
    }
}

impl Default for ResourceBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// A parsed program: ordered top-level forms plus the declared budget and
/// an optional entry point for reachability-scoped budget checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub budget: ResourceBudget,
    pub forms: Vec<Expr>,
}

impl Program {
    pub fn new(name: impl Into<String>, budget: ResourceBudget, forms: Vec<Expr>) -> Self {
        Self { name: name.into(), entry: None, budget, forms }
    }

    /// Build a program from raw top-level forms, extracting the first
    /// `resource-budget` declaration into the budget field. Remaining
    /// forms keep their source order.
    pub fn from_forms(name: impl Into<String>, forms: Vec<Expr>) -> Self {
        let mut budget = None;
        let mut rest = Vec::with_capacity(forms.len());
        for form in forms {
            match form {
                Expr::ResourceBudget { ref specs, .. } if budget.is_none() => {
                    budget = Some(ResourceBudget::from_specs(specs));
                }
                other => rest.push(other),
            }
        }
        Self {
            name: name.into(),
            entry: None,
            budget: budget.unwrap_or_default(),
            forms: rest,
        }
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Deploy-time function definitions, in declaration order.
    pub fn deploy_functions(&self) -> impl Iterator<Item = (&str, &[Expr], SourceLoc)> {
        self.forms.iter().filter_map(|form| match form {
            Expr::DefunDeploy { name, body, loc, .. } => {
                Some((name.as_str(), body.as_slice(), *loc))
            }
            _ => None,
        })
    }
}
