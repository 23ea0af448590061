//! # Branch nodes
//!
//! One node of the branch-and-bound tree. The tree lives in an arena, so a node refers to its
//! parent by index; the node owns its bound constraint and, once solved, an independent tableau.
use crate::algorithm::simplex::tableau::Tableau;
use crate::data::linear_program::general_form::Constraint;

/// A node of the branch-and-bound tree.
///
/// The root carries the solved relaxation of the original problem and no constraint. Every other
/// node adds exactly one bound constraint on top of its parent's relaxation and starts without a
/// tableau; one is attached when the node is solved.
#[derive(Debug)]
pub(crate) struct Branch {
    parent: Option<usize>,
    constraint: Option<Constraint>,
    tableau: Option<Tableau>,
}

impl Branch {
    /// The root node, holding the already solved relaxation.
    pub(crate) fn root(tableau: Tableau) -> Self {
        Self {
            parent: None,
            constraint: None,
            tableau: Some(tableau),
        }
    }

    /// A child node adding `constraint` to the relaxation of node `parent`.
    pub(crate) fn child(parent: usize, constraint: Constraint) -> Self {
        Self {
            parent: Some(parent),
            constraint: Some(constraint),
            tableau: None,
        }
    }

    /// The arena index of the parent node; `None` for the root.
    pub(crate) fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// The bound constraint this node adds; `None` for the root.
    pub(crate) fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    /// The node's solved relaxation, if it has been solved.
    pub(crate) fn tableau(&self) -> Option<&Tableau> {
        self.tableau.as_ref()
    }

    /// Attach the solved relaxation.
    pub(crate) fn set_tableau(&mut self, tableau: Tableau) {
        debug_assert!(self.tableau.is_none());

        self.tableau = Some(tableau);
    }

    /// Move the solved relaxation out of the node.
    pub(crate) fn take_tableau(&mut self) -> Option<Tableau> {
        self.tableau.take()
    }
}
