//! # Solver algorithms
//!
//! The simplex variants with their shared tableau machinery, branch-and-bound on top of them,
//! and the driver that picks the right path for a problem.
use std::error::Error;
use std::fmt;

use log::info;

use crate::algorithm::branch_and_bound::BranchingRule;
use crate::algorithm::simplex::tableau::{Tableau, TableauState};
use crate::data::linear_algebra::matrix::ShapeMismatch;
use crate::data::linear_program::general_form::GeneralForm;

pub mod branch_and_bound;
pub mod simplex;

/// Comparison tolerance for pivot eligibility and termination tests.
pub(crate) const EPSILON: f64 = 1e-9;

/// Knobs of a solve call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolverOptions {
    /// The order in which branch-and-bound explores open nodes.
    pub branching_rule: BranchingRule,
    /// Hard cap on the number of pivots a single simplex run may apply. Cycling detection is
    /// advisory and Bland's rule should prevent true cycles, so this is the backstop that
    /// guarantees termination no matter what.
    pub pivot_limit: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            branching_rule: BranchingRule::default(),
            pivot_limit: 10_000,
        }
    }
}

/// A solve was aborted; nothing useful can be read from the tableau.
///
/// Infeasibility and unboundedness are not errors: they are terminal states on the returned
/// tableau, and callers inspect the state set to distinguish them from optimality.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SolveError {
    /// A matrix operation was handed incompatible dimensions.
    Shape(ShapeMismatch),
    /// A simplex run exceeded the configured pivot budget.
    IterationLimit {
        /// The configured budget.
        limit: usize,
    },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Shape(mismatch) => write!(f, "tableau operation failed: {}", mismatch),
            Self::IterationLimit { limit } => {
                write!(f, "no termination within {} pivots", limit)
            },
        }
    }
}

impl Error for SolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Shape(mismatch) => Some(mismatch),
            Self::IterationLimit { .. } => None,
        }
    }
}

impl From<ShapeMismatch> for SolveError {
    fn from(mismatch: ShapeMismatch) -> Self {
        Self::Shape(mismatch)
    }
}

/// Solve a general-form problem to completion.
///
/// The relaxation is solved by the simplex variant matching the problem's shape; when any
/// variable is tagged integer and the relaxation is optimal, branch-and-bound refines the result.
/// The returned tableau carries the outcome in its state set: `Optimal` tableaus yield values
/// through [`Tableau::solution`], `Infeasible` and `Unbound` ones do not.
///
/// # Errors
///
/// `SolveError` when the pivot budget runs out or a tableau operation is handed mismatched
/// dimensions.
pub fn solve(problem: &GeneralForm, options: &SolverOptions) -> Result<Tableau, SolveError> {
    info!(
        "solving \"{}\" with {} variables and {} constraints",
        problem.objective().name(),
        problem.variables().len(),
        problem.constraints().len(),
    );

    let maximized = problem.objective().maximized();
    let tableau = simplex::solve(problem, &maximized, options)?;

    if problem.requires_integrality() && tableau.has_state(TableauState::Optimal) {
        return branch_and_bound::solve(tableau, options);
    }

    Ok(tableau)
}
