//! Circular dependency detection.
//!
//! Cycles are found with Tarjan's strongly-connected-components algorithm,
//! written with an explicit stack so that long dependency chains cannot
//! exhaust the call stack. Every SCC with two or more members (or a single
//! member depending on itself) becomes one cycle.
//!
//! An SCC is a set, but a report needs a path. For each SCC we search for a
//! simple cycle visiting every member, starting at the smallest name and
//! trying neighbours in name order:
//!
//! ```text
//! SCC {a, b, c}          a → b → c → a       (found by backtracking)
//! SCC {a, b, c} as a ⇄ b ⇄ c                 (no such cycle exists)
//!                        a → b → a           (shortest cycle through a)
//! ```
//!
//! The search is bounded by [`PATH_SEARCH_BUDGET`] neighbour visits. Every
//! reported path only follows declared edges; `depth` is always the size of
//! the component, even when the path is shorter.

use crate::graph::types::DependencyGraph;
use crate::types::{CircularDependencyInfo, CycleType, DependencyType, Severity};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Maximum neighbour visits spent looking for a cycle through every member.
pub const PATH_SEARCH_BUDGET: usize = 10_000;

/// Detects circular dependencies in a [`DependencyGraph`].
#[derive(Debug)]
pub struct CycleDetector<'g> {
    graph: &'g DependencyGraph,
    include_dev_dependencies: bool,
}

impl<'g> CycleDetector<'g> {
    /// Create a detector over all dependency kinds.
    #[must_use]
    pub const fn new(graph: &'g DependencyGraph) -> Self {
        Self {
            graph,
            include_dev_dependencies: true,
        }
    }

    /// Whether development edges take part in cycles.
    #[must_use]
    pub const fn with_dev_dependencies(mut self, include: bool) -> Self {
        self.include_dev_dependencies = include;
        self
    }

    /// Find every cycle, ordered by severity (worst first), then depth, then
    /// path.
    #[must_use]
    pub fn detect(&self) -> Vec<CircularDependencyInfo> {
        let names: Vec<&str> = self.graph.package_names().collect();
        let adjacency = self.adjacency(&names);
        tracing::debug!(
            nodes = names.len(),
            include_dev = self.include_dev_dependencies,
            "Running strongly connected component search"
        );

        let components = strongly_connected_components(&adjacency);
        tracing::debug!(components = components.len(), "SCC search complete");

        let mut seen = HashSet::new();
        let mut cycles = Vec::new();
        for members in components {
            let is_cycle = members.len() > 1 || adjacency[members[0]].contains(&members[0]);
            if !is_cycle {
                continue;
            }

            let path: Vec<String> = cycle_path(&adjacency, &members)
                .into_iter()
                .map(|i| names[i].to_string())
                .collect();
            if !seen.insert(path.clone()) {
                continue;
            }

            let severity = self.classify(&members, &names);
            let mut cycle = CircularDependencyInfo::new(path, severity);
            cycle.depth = members.len();
            cycle.cycle_type = CycleType::from_depth(members.len());
            cycles.push(cycle);
        }

        sort_cycles(&mut cycles);
        tracing::info!(cycles = cycles.len(), "Cycle detection complete");
        cycles
    }

    /// Sorted, de-duplicated neighbour lists indexed like `names`.
    fn adjacency(&self, names: &[&str]) -> Vec<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                let Some(node) = self.graph.node(name) else {
                    return Vec::new();
                };
                let targets: BTreeSet<&str> = DependencyType::ALL
                    .into_iter()
                    .filter(|&k| self.include_dev_dependencies || k != DependencyType::Development)
                    .flat_map(|k| node.internal(k))
                    .map(String::as_str)
                    .collect();
                targets
                    .into_iter()
                    .filter_map(|t| names.binary_search(&t).ok())
                    .collect()
            })
            .collect()
    }

    /// Production edges make a cycle a runtime problem; anything else only
    /// affects tooling.
    fn classify(&self, members: &[usize], names: &[&str]) -> Severity {
        let member_names: BTreeSet<&str> = members.iter().map(|&i| names[i]).collect();
        let has_production = self.graph.edges().any(|e| {
            e.dependency_type == DependencyType::Production
                && member_names.contains(e.from.as_str())
                && member_names.contains(e.to.as_str())
        });

        match (has_production, CycleType::from_depth(members.len())) {
            (false, _) => Severity::Info,
            (true, CycleType::Direct) => Severity::Critical,
            (true, CycleType::Indirect) => Severity::Warning,
        }
    }
}

/// Order cycles: severity descending, shorter first, then by path.
pub fn sort_cycles(cycles: &mut [CircularDependencyInfo]) {
    cycles.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.depth.cmp(&b.depth))
            .then_with(|| a.cycle.first().cmp(&b.cycle.first()))
            .then_with(|| a.cycle.cmp(&b.cycle))
    });
}

/// Iterative Tarjan. Components come back with members sorted ascending.
fn strongly_connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut lowlink = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut next_index = 0;
    let mut components = Vec::new();

    for root in 0..n {
        if index[root].is_some() {
            continue;
        }

        // (node, next neighbour position)
        let mut call_stack = vec![(root, 0_usize)];
        index[root] = Some(next_index);
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(&(v, cursor)) = call_stack.last() {
            if let Some(&w) = adjacency[v].get(cursor) {
                if let Some(frame) = call_stack.last_mut() {
                    frame.1 += 1;
                }
                match index[w] {
                    None => {
                        index[w] = Some(next_index);
                        lowlink[w] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        call_stack.push((w, 0));
                    }
                    Some(w_index) if on_stack[w] => {
                        lowlink[v] = lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            call_stack.pop();
            if let Some(&(parent, _)) = call_stack.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[v]);
            }

            if Some(lowlink[v]) == index[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                component.sort_unstable();
                components.push(component);
            }
        }
    }

    components
}

/// Closed path through an SCC, starting (and ending) at its smallest member.
fn cycle_path(adjacency: &[Vec<usize>], members: &[usize]) -> Vec<usize> {
    let start = members[0];
    let mut path = if members.len() == 1 {
        vec![start]
    } else {
        let in_component: HashSet<usize> = members.iter().copied().collect();
        hamiltonian_cycle(adjacency, start, &in_component)
            .unwrap_or_else(|| shortest_cycle(adjacency, start, &in_component))
    };
    path.push(start);
    path
}

/// Backtracking search for a simple cycle through every component member.
fn hamiltonian_cycle(
    adjacency: &[Vec<usize>],
    start: usize,
    in_component: &HashSet<usize>,
) -> Option<Vec<usize>> {
    let target = in_component.len();
    let mut path = vec![start];
    let mut cursors = vec![0_usize];
    let mut on_path: HashSet<usize> = HashSet::from([start]);
    let mut steps = 0;

    while let Some(&v) = path.last() {
        if path.len() == target {
            if adjacency[v].contains(&start) {
                return Some(path);
            }
        } else {
            let depth = path.len() - 1;
            let mut next = None;
            while let Some(&w) = adjacency[v].get(cursors[depth]) {
                cursors[depth] += 1;
                steps += 1;
                if steps > PATH_SEARCH_BUDGET {
                    return None;
                }
                if in_component.contains(&w) && !on_path.contains(&w) {
                    next = Some(w);
                    break;
                }
            }
            if let Some(w) = next {
                path.push(w);
                cursors.push(0);
                on_path.insert(w);
                continue;
            }
        }

        // Dead end: backtrack
        if let Some(v) = path.pop() {
            on_path.remove(&v);
            cursors.pop();
        }
    }

    None
}

/// Shortest cycle through `start` inside the component, found by
/// breadth-first search. One always exists when `start` is in a
/// non-trivial SCC.
fn shortest_cycle(
    adjacency: &[Vec<usize>],
    start: usize,
    in_component: &HashSet<usize>,
) -> Vec<usize> {
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(v) = queue.pop_front() {
        for &w in &adjacency[v] {
            if w == start {
                let mut path = vec![v];
                let mut current = v;
                while let Some(&p) = parent.get(&current) {
                    path.push(p);
                    current = p;
                }
                path.reverse();
                return path;
            }
            if in_component.contains(&w) && visited.insert(w) {
                parent.insert(w, v);
                queue.push_back(w);
            }
        }
    }

    vec![start]
}
