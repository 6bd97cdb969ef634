//! Deploy-time call graph over an index arena.
//!
//! Vertices are deploy function names in declaration order; edges are
//! direct calls between deploy functions. The graph is an arena of names
//! plus adjacency lists of indices — never a pointer graph — so cycles are
//! ordinary data. Operator applications are leaves with table-driven cost,
//! calls into compile-time code are phase violations (handled by the
//! classifier, not edges), and unresolvable targets are reported as
//! `UnknownCallee` with the edge simply omitted.

use crate::analyzer::cost::CostTable;
use crate::analyzer::report::Diagnostic;
use crate::analyzer::symbols::SymbolTable;
use crate::analyzer::visit::children;
use oblibeny_core::{Expr, Program, SourceLoc};
use std::collections::HashMap;

/// Index of a function in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncId(pub usize);

/// Arena-backed directed graph of deploy function calls.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    names: Vec<String>,
    locs: Vec<SourceLoc>,
    index: HashMap<String, FuncId>,
    succ: Vec<Vec<FuncId>>,
}

impl CallGraph {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Vertex ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = FuncId> {
        (0..self.names.len()).map(FuncId)
    }

    pub fn id(&self, name: &str) -> Option<FuncId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: FuncId) -> &str {
        &self.names[id.0]
    }

    pub fn loc(&self, id: FuncId) -> SourceLoc {
        self.locs[id.0]
    }

    pub fn successors(&self, id: FuncId) -> &[FuncId] {
        &self.succ[id.0]
    }

    fn add_vertex(&mut self, name: &str, loc: SourceLoc) -> FuncId {
        let id = FuncId(self.names.len());
        self.names.push(name.to_string());
        self.locs.push(loc);
        self.succ.push(Vec::new());
        self.index.insert(name.to_string(), id);
        id
    }

    fn add_edge(&mut self, from: FuncId, to: FuncId) {
        let list = &mut self.succ[from.0];
        if !list.contains(&to) {
            list.push(to);
        }
    }

    /// Vertices reachable from `start`, including `start` itself.
    pub fn reachable_from(&self, start: FuncId) -> Vec<FuncId> {
        let mut seen = vec![false; self.len()];
        let mut stack = vec![start];
        seen[start.0] = true;
        while let Some(v) = stack.pop() {
            for &w in self.successors(v) {
                if !seen[w.0] {
                    seen[w.0] = true;
                    stack.push(w);
                }
            }
        }
        self.ids().filter(|id| seen[id.0]).collect()
    }

    /// Build a graph directly from an edge list, for synthetic-graph tests.
    pub fn synthetic(vertices: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = CallGraph::default();
        for i in 0..vertices {
            graph.add_vertex(&format!("f{}", i), SourceLoc::dummy());
        }
        for &(from, to) in edges {
            graph.add_edge(FuncId(from), FuncId(to));
        }
        graph
    }
}

/// Graph plus the `UnknownCallee` diagnostics found while building it.
#[derive(Debug)]
pub struct CallGraphBuild {
    pub graph: CallGraph,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extract the deploy call graph from a program.
pub fn build(program: &Program, symbols: &SymbolTable, costs: &CostTable) -> CallGraphBuild {
    let mut graph = CallGraph::default();
    for (name, _, loc) in program.deploy_functions() {
        graph.add_vertex(name, loc);
    }

    let mut diagnostics = Vec::new();
    for (caller, body, _) in program.deploy_functions() {
        let caller_id = graph.id(caller).unwrap_or_else(|| {
            panic!("caller '{}' was interned in the first pass", caller);
        });
        for expr in body {
            collect_calls(expr, caller, caller_id, symbols, costs, &mut graph, &mut diagnostics);
        }
    }

    CallGraphBuild { graph, diagnostics }
}

fn collect_calls(
    expr: &Expr,
    caller: &str,
    caller_id: FuncId,
    symbols: &SymbolTable,
    costs: &CostTable,
    graph: &mut CallGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let Expr::Call { callee, .. } = expr {
        match callee.as_ref() {
            Expr::Ident(name, _) => {
                if let Some(target) = graph.id(name) {
                    graph.add_edge(caller_id, target);
                } else if !symbols.is_compile_time(name) && !costs.is_primitive(name) {
                    diagnostics.push(Diagnostic::unknown_callee(
                        caller,
                        expr.loc(),
                        &format!("'{}' is not a known function or primitive", name),
                    ));
                }
            }
            other => {
                diagnostics.push(Diagnostic::unknown_callee(
                    caller,
                    expr.loc(),
                    &format!("call target '{}' is not a named function", other),
                ));
            }
        }
    }
    for child in children(expr) {
        collect_calls(child, caller, caller_id, symbols, costs, graph, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::symbols;
    use crate::testing_helpers::{
        bounded_for, call, compile_fn, deploy, ident, if_, int, op, program,
    };
    use crate::DiagnosticKind;

    fn build_graph(forms: Vec<Expr>) -> CallGraphBuild {
        let prog = program(forms);
        let table = symbols::collect(&prog).unwrap();
        build(&prog, &table, &CostTable::default())
    }

    #[test]
    fn test_vertices_in_declaration_order() {
        let built = build_graph(vec![
            deploy("main", vec![call("helper", vec![])]),
            deploy("helper", vec![int(1)]),
        ]);
        let names: Vec<&str> = built.graph.ids().map(|id| built.graph.name(id)).collect();
        assert_eq!(names, vec!["main", "helper"]);
        assert_eq!(built.graph.successors(FuncId(0)), &[FuncId(1)]);
        assert!(built.graph.successors(FuncId(1)).is_empty());
        assert!(built.diagnostics.is_empty());
    }

    #[test]
    fn test_operator_applications_are_leaves() {
        let built = build_graph(vec![deploy("f", vec![op("+", vec![int(1), int(2)])])]);
        assert!(built.graph.successors(FuncId(0)).is_empty());
        assert!(built.diagnostics.is_empty());
    }

    #[test]
    fn test_compile_time_call_is_not_an_edge() {
        let built = build_graph(vec![
            compile_fn("gen", vec![int(1)]),
            deploy("f", vec![call("gen", vec![])]),
        ]);
        assert_eq!(built.graph.len(), 1);
        assert!(built.graph.successors(FuncId(0)).is_empty());
        // Not an unknown callee either: the phase classifier owns this case.
        assert!(built.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_callee_reported_and_edge_omitted() {
        let built = build_graph(vec![deploy("f", vec![call("nonexistent", vec![int(1)])])]);
        assert!(built.graph.successors(FuncId(0)).is_empty());
        assert_eq!(built.diagnostics.len(), 1);
        assert_eq!(built.diagnostics[0].kind, DiagnosticKind::UnknownCallee);
        assert!(built.diagnostics[0].message.contains("nonexistent"));
    }

    #[test]
    fn test_non_ident_call_target_is_unknown() {
        let built = build_graph(vec![deploy(
            "f",
            vec![Expr::Call {
                callee: Box::new(int(3)),
                args: vec![],
                loc: SourceLoc::dummy(),
            }],
        )]);
        assert_eq!(built.diagnostics.len(), 1);
        assert_eq!(built.diagnostics[0].kind, DiagnosticKind::UnknownCallee);
    }

    #[test]
    fn test_calls_found_under_nesting() {
        let built = build_graph(vec![
            deploy(
                "f",
                vec![bounded_for(
                    "i",
                    int(0),
                    int(3),
                    vec![if_(
                        op("<", vec![ident("i"), int(2)]),
                        call("g", vec![]),
                        call("h", vec![]),
                    )],
                )],
            ),
            deploy("g", vec![int(1)]),
            deploy("h", vec![int(2)]),
        ]);
        assert_eq!(built.graph.successors(FuncId(0)), &[FuncId(1), FuncId(2)]);
    }

    #[test]
    fn test_duplicate_calls_collapse_to_one_edge() {
        let built = build_graph(vec![
            deploy("f", vec![call("g", vec![]), call("g", vec![])]),
            deploy("g", vec![int(1)]),
        ]);
        assert_eq!(built.graph.successors(FuncId(0)), &[FuncId(1)]);
    }

    #[test]
    fn test_reachable_from() {
        let graph = CallGraph::synthetic(4, &[(0, 1), (1, 2)]);
        let reach: Vec<usize> = graph.reachable_from(FuncId(0)).iter().map(|id| id.0).collect();
        assert_eq!(reach, vec![0, 1, 2]);
    }
}
