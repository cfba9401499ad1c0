//! Dependency graph between questions, derived from conditional rules.
//!
//! Each question-targeted rule contributes one edge
//! `condition question → target question`. Page-targeted rules contribute
//! nothing: a page can never be a condition source.
//!
//! Cycle participants are the questions lying on at least one directed
//! cycle: members of strongly connected components with more than one node,
//! plus nodes with a self-loop. Components are computed with an iterative
//! Tarjan walk over every root, so isolated subgraphs are covered and the
//! result does not depend on rule order.

use std::collections::{BTreeMap, BTreeSet, btree_set};

use surveyor_model::{ConditionalRule, RuleTarget};

/// Adjacency map keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from every question-targeted rule.
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a ConditionalRule>) -> Self {
        let mut graph = Self::new();
        for rule in rules {
            if let Some(RuleTarget::Question(target)) = rule.target() {
                graph.add_edge(&rule.condition_question_id, &target);
            }
        }
        graph
    }

    /// Ensure `id` is a node, even without edges.
    pub fn add_node(&mut self, id: &str) {
        if !self.edges.contains_key(id) {
            self.edges.insert(id.to_string(), BTreeSet::new());
        }
    }

    /// Add `from → to`. Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        self.add_node(to);
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string())
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edges.get(from).is_some_and(|targets| targets.contains(to))
    }

    /// Direct dependents of `id` in id order.
    pub fn successors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(id)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    pub fn has_cycle(&self) -> bool {
        !self.cycle_groups().is_empty()
    }

    /// Every question on at least one cycle.
    pub fn cycle_participants(&self) -> BTreeSet<String> {
        self.cycle_groups().into_iter().flatten().collect()
    }

    /// Cyclic components, each sorted by id, ordered by their first id.
    pub fn cycle_groups(&self) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = self
            .strongly_connected_components()
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.contains_edge(single, single),
                _ => true,
            })
            .map(|component| {
                let mut ids: Vec<String> = component.into_iter().map(str::to_string).collect();
                ids.sort();
                ids
            })
            .collect();
        groups.sort();
        groups
    }

    fn strongly_connected_components(&self) -> Vec<Vec<&str>> {
        struct Frame<'g> {
            node: &'g str,
            successors: btree_set::Iter<'g, String>,
        }

        static NO_SUCCESSORS: BTreeSet<String> = BTreeSet::new();
        let successors_of = |id: &str| self.edges.get(id).unwrap_or(&NO_SUCCESSORS).iter();

        let mut index_of: BTreeMap<&str, usize> = BTreeMap::new();
        let mut lowlink: BTreeMap<&str, usize> = BTreeMap::new();
        let mut on_stack: BTreeSet<&str> = BTreeSet::new();
        let mut stack: Vec<&str> = Vec::new();
        let mut components = Vec::new();
        let mut next_index = 0usize;

        for root in self.edges.keys() {
            let root = root.as_str();
            if index_of.contains_key(root) {
                continue;
            }

            index_of.insert(root, next_index);
            lowlink.insert(root, next_index);
            next_index += 1;
            stack.push(root);
            on_stack.insert(root);
            let mut call_stack = vec![Frame {
                node: root,
                successors: successors_of(root),
            }];

            while let Some(frame) = call_stack.last_mut() {
                let node = frame.node;
                match frame.successors.next().map(String::as_str) {
                    Some(next) => {
                        if let Some(&next_idx) = index_of.get(next) {
                            if on_stack.contains(next) {
                                let low = lowlink[node].min(next_idx);
                                lowlink.insert(node, low);
                            }
                        } else {
                            index_of.insert(next, next_index);
                            lowlink.insert(next, next_index);
                            next_index += 1;
                            stack.push(next);
                            on_stack.insert(next);
                            call_stack.push(Frame {
                                node: next,
                                successors: successors_of(next),
                            });
                        }
                    }
                    None => {
                        call_stack.pop();
                        let node_low = lowlink[node];
                        if let Some(parent) = call_stack.last() {
                            let low = lowlink[parent.node].min(node_low);
                            lowlink.insert(parent.node, low);
                        }
                        if node_low == index_of[node] {
                            let mut component = Vec::new();
                            while let Some(member) = stack.pop() {
                                on_stack.remove(member);
                                component.push(member);
                                if member == node {
                                    break;
                                }
                            }
                            components.push(component);
                        }
                    }
                }
            }
        }

        components
    }
}

/// Questions participating in at least one rule cycle; empty if acyclic.
pub fn find_cycles<'a>(rules: impl IntoIterator<Item = &'a ConditionalRule>) -> BTreeSet<String> {
    DependencyGraph::from_rules(rules).cycle_participants()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use surveyor_model::{Operator, RuleAction};

    fn edge(id: &str, from: &str, to: &str) -> ConditionalRule {
        ConditionalRule::for_question(id, from, Operator::IsNotEmpty, json!(null), to, RuleAction::Show)
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn acyclic_rules_have_no_participants() {
        let rules = vec![edge("r1", "a", "b"), edge("r2", "b", "c"), edge("r3", "a", "c")];
        assert!(find_cycles(&rules).is_empty());
        assert!(!DependencyGraph::from_rules(&rules).has_cycle());
    }

    #[test]
    fn three_cycle_reports_all_members() {
        let rules = vec![edge("r1", "a", "b"), edge("r2", "b", "c"), edge("r3", "c", "a")];
        assert_eq!(find_cycles(&rules), set(&["a", "b", "c"]));
    }

    #[test]
    fn tail_into_cycle_is_not_a_participant() {
        let rules = vec![
            edge("r0", "x", "a"),
            edge("r1", "a", "b"),
            edge("r2", "b", "a"),
            edge("r3", "b", "y"),
        ];
        assert_eq!(find_cycles(&rules), set(&["a", "b"]));
    }

    #[test]
    fn cycle_closed_through_finished_node_is_found() {
        // 3 reaches 2 after 2 has already been fully explored from 1.
        let rules = vec![edge("r1", "1", "2"), edge("r2", "2", "1"), edge("r3", "1", "3"), edge("r4", "3", "2")];
        assert_eq!(find_cycles(&rules), set(&["1", "2", "3"]));
    }

    #[test]
    fn self_loop_counts_as_cycle() {
        let rules = vec![edge("r1", "a", "a"), edge("r2", "b", "c")];
        assert_eq!(find_cycles(&rules), set(&["a"]));
    }

    #[test]
    fn disconnected_cycles_are_grouped_separately() {
        let rules = vec![
            edge("r1", "m", "n"),
            edge("r2", "n", "m"),
            edge("r3", "a", "b"),
            edge("r4", "b", "a"),
            edge("r5", "q", "r"),
        ];
        let graph = DependencyGraph::from_rules(&rules);
        assert_eq!(
            graph.cycle_groups(),
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["m".to_string(), "n".to_string()]
            ]
        );
    }

    #[test]
    fn page_targets_contribute_no_edges() {
        let rules = vec![
            ConditionalRule::for_page("r1", "a", Operator::IsEmpty, json!(null), "a", RuleAction::Hide),
            edge("r2", "a", "b"),
        ];
        let graph = DependencyGraph::from_rules(&rules);
        assert_eq!(graph.edge_count(), 1);
        assert!(find_cycles(&rules).is_empty());
    }

    #[test]
    fn participants_ignore_rule_order() {
        let rules = vec![
            edge("r1", "a", "b"),
            edge("r2", "b", "c"),
            edge("r3", "c", "a"),
            edge("r4", "c", "d"),
            edge("r5", "d", "e"),
            edge("r6", "e", "d"),
            edge("r7", "f", "a"),
        ];
        let expected = find_cycles(&rules);
        assert_eq!(expected, set(&["a", "b", "c", "d", "e"]));

        // Every rotation and the reversal produce the same set.
        for shift in 0..rules.len() {
            let mut rotated = rules.clone();
            rotated.rotate_left(shift);
            assert_eq!(find_cycles(&rotated), expected, "rotation {shift}");
            rotated.reverse();
            assert_eq!(find_cycles(&rotated), expected, "reversed rotation {shift}");
        }
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));
        graph.add_node("z");
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.successors("a").collect::<Vec<_>>(), vec!["b"]);
    }
}
