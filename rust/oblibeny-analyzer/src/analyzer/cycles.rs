//! Recursion detection over the call graph.
//!
//! Depth-first traversal with explicit frames (white/gray/black via the
//! visitation index and an on-stack flag) plus low-link computation, so the
//! result is not just "a cycle exists" but the complete set of functions
//! participating in any cycle. Roots are visited in declaration order;
//! diagnostics and orders are therefore reproducible across runs.

use crate::analyzer::call_graph::{CallGraph, FuncId};
use crate::analyzer::report::Diagnostic;

/// Cycle membership and a callees-first evaluation order.
#[derive(Debug, Clone)]
pub struct CycleAnalysis {
    in_cycle: Vec<bool>,
    bottom_up: Vec<FuncId>,
}

impl CycleAnalysis {
    pub fn has_cycles(&self) -> bool {
        self.in_cycle.iter().any(|&c| c)
    }

    pub fn is_cyclic(&self, id: FuncId) -> bool {
        self.in_cycle[id.0]
    }

    /// Every vertex, callees before callers. Members of one strongly
    /// connected component appear consecutively in declaration order.
    pub fn bottom_up(&self) -> &[FuncId] {
        &self.bottom_up
    }

    /// Vertices on at least one cycle, in declaration order.
    pub fn cyclic_ids(&self) -> Vec<FuncId> {
        (0..self.in_cycle.len()).map(FuncId).filter(|id| self.in_cycle[id.0]).collect()
    }
}

/// Run the traversal and classify every vertex.
pub fn detect(graph: &CallGraph) -> CycleAnalysis {
    let n = graph.len();
    let mut visit_index: Vec<Option<usize>> = vec![None; n];
    let mut low: Vec<usize> = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut next_index = 0usize;
    let mut in_cycle = vec![false; n];
    let mut bottom_up: Vec<FuncId> = Vec::with_capacity(n);

    for root in 0..n {
        if visit_index[root].is_some() {
            continue;
        }
        visit_index[root] = Some(next_index);
        low[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        frames.push((root, 0));

        while let Some(&mut (v, pos)) = frames.last_mut() {
            let succs = graph.successors(FuncId(v));
            if pos < succs.len() {
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }
                let w = succs[pos].0;
                match visit_index[w] {
                    None => {
                        visit_index[w] = Some(next_index);
                        low[w] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        frames.push((w, 0));
                    }
                    Some(wi) => {
                        // Gray target: back-edge into the current spine.
                        if on_stack[w] {
                            low[v] = low[v].min(wi);
                        }
                    }
                }
            } else {
                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    low[parent] = low[parent].min(low[v]);
                }
                if Some(low[v]) == visit_index[v] {
                    // v roots a strongly connected component: pop it.
                    let mut component = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    let cyclic = component.len() > 1
                        || graph.successors(FuncId(v)).contains(&FuncId(v));
                    component.sort_unstable();
                    for &w in &component {
                        in_cycle[w] = cyclic;
                    }
                    bottom_up.extend(component.into_iter().map(FuncId));
                }
            }
        }
    }

    CycleAnalysis { in_cycle, bottom_up }
}

/// One `RecursionDetected` per cyclic function, in declaration order.
pub fn diagnostics(graph: &CallGraph, analysis: &CycleAnalysis) -> Vec<Diagnostic> {
    analysis
        .cyclic_ids()
        .into_iter()
        .map(|id| Diagnostic::recursion_detected(graph.name(id), graph.loc(id)))
        .collect()
}
