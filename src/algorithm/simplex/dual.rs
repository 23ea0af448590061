//! # Dual simplex method
//!
//! Keeps the objective row dual-feasible (no positive coefficient) while working the right-hand
//! sides towards non-negativity. Used when the initial basis is infeasible but the objective row
//! already satisfies the optimality condition, and to resume an optimal tableau after a
//! constraint has been injected into it.
use log::{debug, warn};

use crate::algorithm::simplex::primal;
use crate::algorithm::simplex::tableau::{
    detect_cycling, flag_degenerate_rhs, ColumnKind, Tableau, TableauState,
};
use crate::algorithm::{SolveError, SolverOptions, EPSILON};
use crate::data::linear_algebra::matrix::ShapeMismatch;
use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::general_form::Constraint;

/// Run the dual simplex method to completion.
///
/// Once every right-hand side is non-negative the tableau is marked `Feasible` and handed to the
/// primal method, which owns the endgame states; when the entering rule kept the objective row
/// dual-feasible throughout, that run terminates immediately with `Optimal`. A negative
/// right-hand side row without a negative coefficient to pivot on proves the dual unbounded and
/// hence the problem `Infeasible` (plus `Unbound`, with `DualFeasible` cleared). A repeated basis
/// under degeneracy raises `Cycling` and switches to first-index selection, the dual analogue of
/// Bland's rule.
///
/// # Errors
///
/// `SolveError::IterationLimit` when more than `options.pivot_limit` pivots were applied.
pub(crate) fn solve(tableau: &mut Tableau, options: &SolverOptions) -> Result<(), SolveError> {
    debug_assert!(tableau.has_state(TableauState::DualFeasible));

    tableau.archive_snapshot();

    let mut nr_pivots = 0;
    loop {
        let bland = tableau.has_state(TableauState::Cycling);
        let Some(leaving) = select_leaving(tableau, bland) else {
            tableau.remove_state(TableauState::DualFeasible);
            tableau.add_state(TableauState::Feasible);
            debug!("dual simplex feasible after {} pivots, handing over to primal", nr_pivots);
            return primal::solve(tableau, options);
        };

        let Some(entering) = select_entering(tableau, leaving, bland) else {
            tableau.remove_state(TableauState::DualFeasible);
            tableau.add_state(TableauState::Infeasible);
            tableau.add_state(TableauState::Unbound);
            warn!("row {} has no negative coefficient, the problem is infeasible", leaving);
            return Ok(());
        };

        debug!("dual pivot on row {}, column {}", leaving, entering);
        tableau.pivot(leaving, entering)?;
        nr_pivots += 1;
        if nr_pivots > options.pivot_limit {
            return Err(SolveError::IterationLimit { limit: options.pivot_limit });
        }

        flag_degenerate_rhs(tableau, TableauState::PrimalDegenerated);
        let was_cycling = tableau.has_state(TableauState::Cycling);
        detect_cycling(tableau);
        if !was_cycling && tableau.has_state(TableauState::Cycling) {
            warn!("basis repeated after pivot {}, switching to first-index selection", nr_pivots);
        }
    }
}

/// The leaving row: the most negative right-hand side, first index on ties, or the first negative
/// right-hand side under first-index selection.
fn select_leaving(tableau: &Tableau, bland: bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for row in 0..tableau.objective_row() {
        let value = tableau.right_hand_side(row);
        if value < -EPSILON {
            if bland {
                return Some(row);
            }
            if best.is_none_or(|(_, best_value)| value < best_value) {
                best = Some((row, value));
            }
        }
    }

    best.map(|(row, _)| row)
}

/// The entering column: over columns with a strictly negative coefficient in the leaving row and
/// a non-negative ratio of objective coefficient to row coefficient, the one minimizing that
/// ratio. While the objective row is dual-feasible every ratio is non-negative; a column with a
/// positive objective coefficient has a negative ratio and must not enter. Artificial variables
/// never re-enter the basis.
fn select_entering(tableau: &Tableau, leaving: usize, bland: bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for column in 1..tableau.nr_columns() {
        if tableau.column_kinds()[column] == ColumnKind::Artificial {
            continue;
        }
        let coefficient = tableau.matrix().get_value(leaving, column);
        if coefficient < -EPSILON {
            let ratio = tableau.objective_coefficient(column) / coefficient;
            if ratio < -EPSILON {
                continue;
            }
            if bland {
                return Some(column);
            }
            if best.is_none_or(|(_, best_ratio)| ratio < best_ratio) {
                best = Some((column, ratio));
            }
        }
    }

    best.map(|(column, _)| column)
}

/// Append a `<=` constraint to an already optimal tableau.
///
/// A new constraint row is inserted before the objective row and a fresh slack column is
/// appended, after which the basis columns are eliminated from the new row to restore canonical
/// form. The tableau trades its `Optimal` state for `DualFeasible`: the objective row is
/// untouched and thus still dual-feasible, while the new right-hand side may have become
/// negative. A subsequent dual simplex run re-optimizes.
///
/// # Errors
///
/// `ShapeMismatch` when a row or column operation is handed an index outside the tableau; this
/// does not occur for indices derived from the tableau's own dimensions.
pub(crate) fn inject_constraint(
    tableau: &mut Tableau,
    constraint: &Constraint,
) -> Result<(), ShapeMismatch> {
    debug_assert!(tableau.has_state(TableauState::Optimal));
    debug_assert_eq!(constraint.relation(), ConstraintType::Less);
    debug_assert!(tableau.big_m().is_none());

    let new_row = tableau.objective_row();
    let slack_column = tableau.nr_columns();
    tableau.matrix_mut().insert_row(new_row)?;
    tableau.matrix_mut().insert_column(slack_column)?;
    tableau.column_kinds_mut().push(ColumnKind::Slack);

    tableau.matrix_mut().set_value(new_row, 0, constraint.right_hand_side());
    let names: Vec<String> = tableau.variables().iter()
        .map(|variable| variable.name().to_string())
        .collect();
    for (index, name) in names.iter().enumerate() {
        if let Some(&coefficient) = constraint.terms().get(name) {
            tableau.matrix_mut().set_value(new_row, 1 + index, coefficient);
        }
    }
    tableau.matrix_mut().set_value(new_row, slack_column, 1_f64);
    tableau.basis_mut().push(slack_column);

    // Eliminate the basis columns from the new row; their pivot elements are 1.
    for row in 0..new_row {
        let column = tableau.basis()[row];
        let coefficient = tableau.matrix().get_value(new_row, column);
        if coefficient != 0_f64 {
            tableau.matrix_mut().mul_add_rows(row, new_row, -coefficient);
        }
    }

    tableau.remove_state(TableauState::Optimal);
    tableau.remove_state(TableauState::Feasible);
    tableau.add_state(TableauState::DualFeasible);
    debug!("constraint \"{}\" injected, tableau back to dual-feasible", constraint);

    debug_assert!(tableau.is_canonical());
    Ok(())
}
