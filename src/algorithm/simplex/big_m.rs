//! # Big-M method
//!
//! Phase-one pivoting for problems whose initial basis is neither primal- nor dual-feasible.
//! Artificial variables make the start basis trivially feasible; their penalty lives in a
//! companion matrix holding the Big-M objective row, kept in lock-step with every pivot, instead
//! of mixing a large constant into the ordinary objective. Once the companion row is driven to
//! zero the artificials are out of play and the ordinary primal method finishes the job.
use log::{debug, warn};

use crate::algorithm::simplex::primal;
use crate::algorithm::simplex::tableau::{
    detect_cycling, flag_degenerate_rhs, ColumnKind, Tableau, TableauState,
};
use crate::algorithm::{SolveError, SolverOptions, EPSILON};

/// Run the Big-M method to completion.
///
/// Entering columns are taken from the companion objective row first; only when it offers no
/// improvement does the ordinary objective row get a turn. When neither row offers an entering
/// column, an artificial variable still in the basis proves the problem `Infeasible`; otherwise
/// the tableau is `Optimal`. When the companion row reaches zero the tableau is handed to the
/// primal method, which owns the endgame states.
///
/// # Errors
///
/// `SolveError::IterationLimit` when more than `options.pivot_limit` pivots were applied.
pub(crate) fn solve(tableau: &mut Tableau, options: &SolverOptions) -> Result<(), SolveError> {
    debug_assert!(tableau.has_state(TableauState::BigMFeasible));
    debug_assert!(tableau.big_m().is_some());

    tableau.archive_snapshot();

    let mut nr_pivots = 0;
    loop {
        if penalty_row_cleared(tableau) {
            tableau.discard_big_m();
            tableau.remove_state(TableauState::BigMFeasible);
            tableau.add_state(TableauState::Feasible);
            debug!("penalty row cleared after {} pivots, handing over to primal", nr_pivots);
            return primal::solve(tableau, options);
        }

        let bland = tableau.has_state(TableauState::Cycling);
        let Some(entering) = select_entering(tableau, bland) else {
            if tableau.has_artificial_in_basis() {
                tableau.add_state(TableauState::Infeasible);
                warn!("artificial variable stuck in the basis, the problem is infeasible");
            } else {
                tableau.discard_big_m();
                tableau.remove_state(TableauState::BigMFeasible);
                tableau.add_state(TableauState::Feasible);
                tableau.add_state(TableauState::Optimal);
            }
            return Ok(());
        };

        let Some(leaving) = primal::select_leaving(tableau, entering, bland) else {
            tableau.add_state(TableauState::Unbound);
            warn!("column {} has no positive coefficient, the problem is unbound", entering);
            return Ok(());
        };

        debug!("big-M pivot on row {}, column {}", leaving, entering);
        tableau.pivot(leaving, entering)?;
        nr_pivots += 1;
        if nr_pivots > options.pivot_limit {
            return Err(SolveError::IterationLimit { limit: options.pivot_limit });
        }

        flag_degenerate_rhs(tableau, TableauState::BigMDegenerated);
        let was_cycling = tableau.has_state(TableauState::Cycling);
        detect_cycling(tableau);
        if !was_cycling && tableau.has_state(TableauState::Cycling) {
            warn!("basis repeated after pivot {}, switching to first-index selection", nr_pivots);
        }
    }
}

/// Whether the companion objective row has been driven to zero.
///
/// Zero is required in the value column (the total level of the basic artificials) and in every
/// non-artificial column. The artificial columns themselves keep their -1 penalty once they have
/// left the basis; since they are barred from re-entering, those entries carry no information.
fn penalty_row_cleared(tableau: &Tableau) -> bool {
    let Some(big_m) = tableau.big_m() else {
        return true;
    };
    let objective_row = big_m.nr_rows() - 1;

    big_m.get_value(objective_row, 0).abs() < EPSILON
        && (1..tableau.nr_columns()).all(|column| {
            tableau.column_kinds()[column] == ColumnKind::Artificial
                || big_m.get_value(objective_row, column).abs() < EPSILON
        })
}

/// The entering column, read from the companion objective row first and only from the ordinary
/// objective row when the companion offers no positive coefficient. Artificial variables never
/// re-enter the basis.
fn select_entering(tableau: &Tableau, bland: bool) -> Option<usize> {
    let big_m = tableau.big_m()?;
    let objective_row = big_m.nr_rows() - 1;

    let mut best: Option<(usize, f64)> = None;
    for column in 1..tableau.nr_columns() {
        if tableau.column_kinds()[column] == ColumnKind::Artificial {
            continue;
        }
        let coefficient = big_m.get_value(objective_row, column);
        if coefficient > EPSILON {
            if bland {
                return Some(column);
            }
            if best.is_none_or(|(_, value)| coefficient > value) {
                best = Some((column, coefficient));
            }
        }
    }
    if let Some((column, _)) = best {
        return Some(column);
    }

    // The fall-back is lexicographic: a column with a negative companion coefficient has a true
    // reduced cost of -M-order and may not enter, however attractive its ordinary coefficient.
    for column in 1..tableau.nr_columns() {
        if tableau.column_kinds()[column] == ColumnKind::Artificial
            || big_m.get_value(objective_row, column).abs() > EPSILON
        {
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

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::algorithm::simplex::tableau::builder::build_big_m;
    use crate::data::linear_program::elements::{ConstraintType, Objective};
    use crate::data::linear_program::general_form::{
        simplify_big_m_constraints, Constraint, GeneralForm, ObjectiveFunction, Variable,
    };

    fn solve_problem(problem: &GeneralForm) -> Tableau {
        let maximized = problem.objective().maximized();
        let simplified = simplify_big_m_constraints(problem.constraints());
        let mut tableau = build_big_m(problem, &maximized, &simplified);
        solve(&mut tableau, &SolverOptions::default()).unwrap();
        tableau
    }

    #[test]
    fn mixed_relations() {
        // max 2x + y s.t. x + y <= 10, x >= 2, y = 3
        let mut objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        objective.add_term("x", 2_f64);
        objective.add_term("y", 1_f64);
        let mut first = Constraint::new(ConstraintType::Less, 10_f64);
        first.add_term("x", 1_f64);
        first.add_term("y", 1_f64);
        let problem = GeneralForm::new(
            objective,
            vec![Variable::new("x"), Variable::new("y")],
            vec![
                first,
                Constraint::bound("x", ConstraintType::Greater, 2_f64),
                Constraint::bound("y", ConstraintType::Equal, 3_f64),
            ],
        ).unwrap();

        let tableau = solve_problem(&problem);
        assert!(tableau.has_state(TableauState::Optimal));
        assert!(tableau.big_m().is_none());
        assert_approx_eq!(tableau.objective_value(), 17_f64);

        let solution = tableau.solution(problem.objective()).unwrap();
        assert_approx_eq!(solution.value("x").unwrap(), 7_f64);
        assert_approx_eq!(solution.value("y").unwrap(), 3_f64);
    }

    #[test]
    fn conflicting_equalities_are_infeasible() {
        // x = 1 and x = 2 cannot both hold
        let mut objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        objective.add_term("x", 1_f64);
        let problem = GeneralForm::new(
            objective,
            vec![Variable::new("x")],
            vec![
                Constraint::bound("x", ConstraintType::Equal, 1_f64),
                Constraint::bound("x", ConstraintType::Equal, 2_f64),
            ],
        ).unwrap();

        let tableau = solve_problem(&problem);
        assert!(tableau.has_state(TableauState::Infeasible));
        assert!(!tableau.has_state(TableauState::Optimal));
        assert!(tableau.has_artificial_in_basis());
    }

    #[test]
    fn minimization_with_cover_constraint() {
        // min 4x + 3y s.t. 2x + y >= 10, x + 3y >= 15
        let mut objective = ObjectiveFunction::new(Objective::Minimize, "z", 0_f64);
        objective.add_term("x", 4_f64);
        objective.add_term("y", 3_f64);
        let mut first = Constraint::new(ConstraintType::Greater, 10_f64);
        first.add_term("x", 2_f64);
        first.add_term("y", 1_f64);
        let mut second = Constraint::new(ConstraintType::Greater, 15_f64);
        second.add_term("x", 1_f64);
        second.add_term("y", 3_f64);
        let problem = GeneralForm::new(
            objective,
            vec![Variable::new("x"), Variable::new("y")],
            vec![first, second],
        ).unwrap();

        let tableau = solve_problem(&problem);
        assert!(tableau.has_state(TableauState::Optimal));

        let solution = tableau.solution(problem.objective()).unwrap();
        assert_approx_eq!(solution.value("x").unwrap(), 3_f64);
        assert_approx_eq!(solution.value("y").unwrap(), 4_f64);
        assert_approx_eq!(solution.objective_value(), 24_f64);
    }

    #[test]
    fn unbounded_above_with_lower_bound() {
        // max x s.t. x >= 1
        let mut objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        objective.add_term("x", 1_f64);
        let problem = GeneralForm::new(
            objective,
            vec![Variable::new("x")],
            vec![Constraint::bound("x", ConstraintType::Greater, 1_f64)],
        ).unwrap();

        let tableau = solve_problem(&problem);
        assert!(tableau.has_state(TableauState::Unbound));
    }
}
