//! # Primal simplex method
//!
//! Walks from basic feasible solution to basic feasible solution, each pivot improving (or at
//! least not worsening) the objective, until no objective coefficient is positive. Requires a
//! primal-feasible initial tableau, which the standard builder provides whenever no constraint
//! excludes the origin.
use log::{debug, warn};

use crate::algorithm::simplex::tableau::{
    detect_cycling, flag_degenerate_rhs, flag_dual_degeneracy, ColumnKind, Tableau, TableauState,
};
use crate::algorithm::{SolveError, SolverOptions, EPSILON};

/// Run the primal simplex method to completion.
///
/// Terminates with the `Optimal` state when no objective coefficient is positive, or with the
/// `Unbound` state when an entering column has no positive coefficient to bound the ratio test.
/// When a basis repeats under degeneracy the `Cycling` state is raised and pivoting continues
/// under Bland's rule, which cannot cycle.
///
/// # Errors
///
/// `SolveError::IterationLimit` when more than `options.pivot_limit` pivots were applied.
pub(crate) fn solve(tableau: &mut Tableau, options: &SolverOptions) -> Result<(), SolveError> {
    debug_assert!(tableau.has_state(TableauState::Feasible));

    tableau.archive_snapshot();

    let mut nr_pivots = 0;
    loop {
        let bland = tableau.has_state(TableauState::Cycling);
        let Some(entering) = select_entering(tableau, bland) else {
            tableau.add_state(TableauState::Optimal);
            flag_dual_degeneracy(tableau);
            debug!(
                "primal simplex optimal after {} pivots, objective value {}",
                nr_pivots, tableau.objective_value(),
            );
            return Ok(());
        };

        let Some(leaving) = select_leaving(tableau, entering, bland) else {
            tableau.add_state(TableauState::Unbound);
            warn!("column {} has no positive coefficient, the problem is unbound", entering);
            return Ok(());
        };

        debug!(
            "primal pivot on row {}, column {} (ratio {})",
            leaving,
            entering,
            tableau.right_hand_side(leaving) / tableau.matrix().get_value(leaving, entering),
        );
        tableau.pivot(leaving, entering)?;
        nr_pivots += 1;
        if nr_pivots > options.pivot_limit {
            return Err(SolveError::IterationLimit { limit: options.pivot_limit });
        }

        flag_degenerate_rhs(tableau, TableauState::PrimalDegenerated);
        let was_cycling = tableau.has_state(TableauState::Cycling);
        detect_cycling(tableau);
        if !was_cycling && tableau.has_state(TableauState::Cycling) {
            warn!("basis repeated after pivot {}, switching to Bland's rule", nr_pivots);
        }
    }
}

/// The entering column: the most positive objective coefficient, first index on ties.
///
/// Under Bland's rule the first column with a positive coefficient is taken instead. An
/// artificial variable never re-enters the basis, even when its reduced cost looks attractive
/// after a Big-M hand-off.
fn select_entering(tableau: &Tableau, bland: bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for column in 1..tableau.nr_columns() {
        if tableau.column_kinds()[column] == ColumnKind::Artificial {
            continue;
        }
        let coefficient = tableau.objective_coefficient(column);
        if coefficient > EPSILON {
            if bland {
                return Some(column);
            }
            if best.is_none_or(|(_, value)| coefficient > value) {
                best = Some((column, coefficient));
            }
        }
    }

    best.map(|(column, _)| column)
}

/// The leaving row: minimum ratio of right-hand side to entering coefficient, over rows with a
/// strictly positive entering coefficient. Ties go to the first occurrence, or to the row with
/// the lowest basic column under Bland's rule. Shared with the Big-M method.
pub(super) fn select_leaving(tableau: &Tableau, entering: usize, bland: bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for row in 0..tableau.objective_row() {
        let coefficient = tableau.matrix().get_value(row, entering);
        if coefficient > EPSILON {
            let ratio = tableau.right_hand_side(row) / coefficient;
            let replace = match best {
                None => true,
                Some((best_row, best_ratio)) => {
                    ratio < best_ratio - EPSILON
                        || (bland
                            && (ratio - best_ratio).abs() <= EPSILON
                            && tableau.basis()[row] < tableau.basis()[best_row])
                },
            };
            if replace {
                best = Some((row, ratio));
            }
        }
    }

    best.map(|(row, _)| row)
}
