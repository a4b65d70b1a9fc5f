// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite/spec tree and result rollup.
//!
//! Suites and specs live in flat arenas and refer to each other by index.
//! A child's link to its parent is only an index, so full names walk the
//! ancestor chain without any ownership cycle.

use crate::context::Step;
use crate::results::{Failure, ResultSet, SpecOutcome};

/// Index of a suite in its runner's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(pub(crate) usize);

/// Index of a spec in its runner's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecId(pub(crate) usize);

/// A child of a suite, in definition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Suite(SuiteId),
    Spec(SpecId),
}

#[derive(Debug)]
pub struct Suite {
    pub(crate) description: String,
    pub(crate) parent: Option<SuiteId>,
    pub(crate) children: Vec<Node>,
    pub(crate) excluded: bool,
}

impl Suite {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parent(&self) -> Option<SuiteId> {
        self.parent
    }

    /// Whether this suite was declared excluded. Descendants of an excluded
    /// suite report `false` here but are still skipped; see
    /// [`SuiteTree::is_suite_excluded`].
    pub fn declared_excluded(&self) -> bool {
        self.excluded
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_suites(&self) -> impl Iterator<Item = SuiteId> + '_ {
        self.children.iter().filter_map(|n| match n {
            Node::Suite(id) => Some(*id),
            Node::Spec(_) => None,
        })
    }

    pub fn specs(&self) -> impl Iterator<Item = SpecId> + '_ {
        self.children.iter().filter_map(|n| match n {
            Node::Spec(id) => Some(*id),
            Node::Suite(_) => None,
        })
    }
}

#[derive(Debug)]
pub struct Spec {
    pub(crate) description: String,
    pub(crate) suite: SuiteId,
    pub(crate) steps: Vec<Step>,
    pub(crate) excluded: bool,
    pub(crate) expectations: usize,
    pub(crate) failures: Vec<Failure>,
    pub(crate) outcome: Option<SpecOutcome>,
}

impl Spec {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn suite(&self) -> SuiteId {
        self.suite
    }

    pub fn declared_excluded(&self) -> bool {
        self.excluded
    }

    /// `None` until the spec has finished running.
    pub fn outcome(&self) -> Option<SpecOutcome> {
        self.outcome
    }

    /// Number of expectations evaluated so far.
    pub fn expectation_count(&self) -> usize {
        self.expectations
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Counts for this spec alone: zero until it finishes.
    pub fn results(&self) -> ResultSet {
        self.outcome.map(ResultSet::from_outcome).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeMark {
    suites: usize,
    specs: usize,
}

#[derive(Debug, Default)]
pub struct SuiteTree {
    suites: Vec<Suite>,
    specs: Vec<Spec>,
    roots: Vec<SuiteId>,
}

impl SuiteTree {
    pub(crate) fn add_suite(
        &mut self,
        parent: Option<SuiteId>,
        description: String,
        excluded: bool,
    ) -> SuiteId {
        let id = SuiteId(self.suites.len());
        self.suites.push(Suite {
            description,
            parent,
            children: Vec::new(),
            excluded,
        });
        match parent {
            Some(p) => self.suites[p.0].children.push(Node::Suite(id)),
            None => self.roots.push(id),
        }
        id
    }

    pub(crate) fn add_spec(
        &mut self,
        suite: SuiteId,
        description: String,
        steps: Vec<Step>,
        excluded: bool,
    ) -> SpecId {
        let id = SpecId(self.specs.len());
        self.specs.push(Spec {
            description,
            suite,
            steps,
            excluded,
            expectations: 0,
            failures: Vec::new(),
            outcome: None,
        });
        self.suites[suite.0].children.push(Node::Spec(id));
        id
    }

    /// # Panics
    ///
    /// If `id` was issued by a different tree.
    pub fn suite(&self, id: SuiteId) -> &Suite {
        &self.suites[id.0]
    }

    /// # Panics
    ///
    /// If `id` was issued by a different tree.
    pub fn spec(&self, id: SpecId) -> &Spec {
        &self.specs[id.0]
    }

    /// Arena sizes, for undoing a definition with [`SuiteTree::rollback`].
    pub(crate) fn mark(&self) -> TreeMark {
        TreeMark {
            suites: self.suites.len(),
            specs: self.specs.len(),
        }
    }

    /// Drop every suite and spec added since `mark`, along with the links
    /// older suites and the root list hold to them.
    pub(crate) fn rollback(&mut self, mark: TreeMark) {
        self.suites.truncate(mark.suites);
        self.specs.truncate(mark.specs);
        self.roots.retain(|id| id.0 < mark.suites);
        for suite in &mut self.suites {
            suite.children.retain(|node| match *node {
                Node::Suite(id) => id.0 < mark.suites,
                Node::Spec(id) => id.0 < mark.specs,
            });
        }
    }

    pub(crate) fn spec_mut(&mut self, id: SpecId) -> &mut Spec {
        &mut self.specs[id.0]
    }

    /// Top-level suites in definition order.
    pub fn roots(&self) -> &[SuiteId] {
        &self.roots
    }

    pub fn spec_ids(&self) -> impl Iterator<Item = SpecId> + '_ {
        (0..self.specs.len()).map(SpecId)
    }

    /// Every suite, depth-first pre-order, siblings in definition order.
    pub fn flatten(&self) -> Vec<SuiteId> {
        let mut out = Vec::with_capacity(self.suites.len());
        let mut stack: Vec<SuiteId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let children: Vec<SuiteId> = self.suite(id).child_suites().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Ancestor descriptions and own description, root first, space-joined.
    pub fn suite_full_name(&self, id: SuiteId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let suite = self.suite(current);
            names.push(suite.description.as_str());
            cursor = suite.parent;
        }
        names.reverse();
        names.join(" ")
    }

    pub fn spec_full_name(&self, id: SpecId) -> String {
        let spec = self.spec(id);
        format!("{} {}", self.suite_full_name(spec.suite), spec.description)
    }

    /// Number of ancestors; top-level suites are at depth 0.
    pub fn depth(&self, id: SuiteId) -> usize {
        let mut depth = 0;
        let mut cursor = self.suite(id).parent;
        while let Some(current) = cursor {
            depth += 1;
            cursor = self.suite(current).parent;
        }
        depth
    }

    /// True when the suite or any ancestor was declared excluded.
    pub fn is_suite_excluded(&self, id: SuiteId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let suite = self.suite(current);
            if suite.excluded {
                return true;
            }
            cursor = suite.parent;
        }
        false
    }

    pub fn is_spec_excluded(&self, id: SpecId) -> bool {
        let spec = self.spec(id);
        spec.excluded || self.is_suite_excluded(spec.suite)
    }

    /// Sum over the suite's non-excluded children. Excluded suites yield
    /// zero.
    pub fn suite_results(&self, id: SuiteId) -> ResultSet {
        let suite = self.suite(id);
        if suite.excluded {
            return ResultSet::default();
        }
        suite
            .children
            .iter()
            .map(|node| match *node {
                Node::Suite(child) => self.suite_results(child),
                Node::Spec(spec) if self.spec(spec).excluded => ResultSet::default(),
                Node::Spec(spec) => self.spec(spec).results(),
            })
            .sum()
    }

    /// Sum over all top-level suites.
    pub fn results(&self) -> ResultSet {
        self.roots.iter().map(|&id| self.suite_results(id)).sum()
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
