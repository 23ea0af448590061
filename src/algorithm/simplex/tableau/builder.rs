//! # Tableau construction
//!
//! Translation of a general-form problem into an initial canonical tableau. The standard builder
//! serves both the primal and the dual simplex method and expects constraints rewritten to `<=`
//! form; the Big-M builder expects non-negative right-hand sides and adds artificial variables
//! next to the slacks, together with the companion matrix holding the Big-M objective.
use crate::algorithm::simplex::tableau::{ColumnKind, Tableau, TableauState};
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::general_form::{Constraint, GeneralForm, ObjectiveFunction};

/// Build the initial tableau for the primal or dual simplex method.
///
/// Layout: column 0 holds the right-hand sides, columns `1..=n` the decision variables in problem
/// order, and one slack column per constraint after that. The slack basis makes the tableau
/// canonical without any elimination work. The objective row carries the maximization normal form
/// coefficients; its right-hand side entry is seeded with the negated objective constant so that
/// the tableau's objective value starts at the constant.
///
/// # Arguments
///
/// * `problem`: The validated problem, used for variable order and names.
/// * `maximized`: The objective in maximization normal form.
/// * `constraints`: Constraints rewritten to `<=` form.
/// * `initial_state`: `Feasible` or `DualFeasible`, per the selected variant.
pub(crate) fn build_standard(
    problem: &GeneralForm,
    maximized: &ObjectiveFunction,
    constraints: &[Constraint],
    initial_state: TableauState,
) -> Tableau {
    debug_assert!(constraints.iter().all(|c| c.relation() == ConstraintType::Less));
    debug_assert!(matches!(initial_state, TableauState::Feasible | TableauState::DualFeasible));

    let nr_decision = problem.variables().len();
    let nr_constraints = constraints.len();
    let mut matrix = DenseMatrix::zeros(nr_constraints + 1, 1 + nr_decision + nr_constraints);
    let mut basis = Vec::with_capacity(nr_constraints);

    for (row, constraint) in constraints.iter().enumerate() {
        matrix.set_value(row, 0, constraint.right_hand_side());
        for (index, variable) in problem.variables().iter().enumerate() {
            if let Some(&coefficient) = constraint.terms().get(variable.name()) {
                matrix.set_value(row, 1 + index, coefficient);
            }
        }

        let slack_column = 1 + nr_decision + row;
        matrix.set_value(row, slack_column, 1_f64);
        basis.push(slack_column);
    }

    let objective_row = nr_constraints;
    matrix.set_value(objective_row, 0, -maximized.constant());
    for (index, variable) in problem.variables().iter().enumerate() {
        if let Some(&coefficient) = maximized.terms().get(variable.name()) {
            matrix.set_value(objective_row, 1 + index, coefficient);
        }
    }

    let mut column_kinds = Vec::with_capacity(1 + nr_decision + nr_constraints);
    column_kinds.push(ColumnKind::Value);
    column_kinds.extend(std::iter::repeat_n(ColumnKind::Decision, nr_decision));
    column_kinds.extend(std::iter::repeat_n(ColumnKind::Slack, nr_constraints));

    let mut tableau = Tableau::new(problem.variables().to_vec(), column_kinds, matrix, basis);
    tableau.add_state(initial_state);
    tableau
}

/// Build the initial tableau pair for the Big-M method.
///
/// Expects constraints with non-negative right-hand sides. `<=` rows get a slack that enters the
/// basis; `>=` rows get a surplus (a slack with coefficient -1) plus an artificial; `=` rows get
/// an artificial only. Artificial columns start basic. The companion matrix carries -1 for every
/// artificial in its objective row, after which each artificial row is added into that row once,
/// making the companion canonical with respect to the basis.
pub(crate) fn build_big_m(
    problem: &GeneralForm,
    maximized: &ObjectiveFunction,
    constraints: &[Constraint],
) -> Tableau {
    debug_assert!(constraints.iter().all(|c| c.right_hand_side() >= 0_f64));

    let nr_decision = problem.variables().len();
    let nr_constraints = constraints.len();
    let nr_slack = constraints.iter()
        .filter(|c| c.relation() != ConstraintType::Equal)
        .count();
    let nr_artificial = constraints.iter()
        .filter(|c| c.relation() != ConstraintType::Less)
        .count();

    let nr_columns = 1 + nr_decision + nr_slack + nr_artificial;
    let mut matrix = DenseMatrix::zeros(nr_constraints + 1, nr_columns);
    let mut basis = Vec::with_capacity(nr_constraints);

    let mut next_slack = 1 + nr_decision;
    let mut next_artificial = 1 + nr_decision + nr_slack;
    for (row, constraint) in constraints.iter().enumerate() {
        matrix.set_value(row, 0, constraint.right_hand_side());
        for (index, variable) in problem.variables().iter().enumerate() {
            if let Some(&coefficient) = constraint.terms().get(variable.name()) {
                matrix.set_value(row, 1 + index, coefficient);
            }
        }

        match constraint.relation() {
            ConstraintType::Less => {
                matrix.set_value(row, next_slack, 1_f64);
                basis.push(next_slack);
                next_slack += 1;
            },
            ConstraintType::Greater => {
                matrix.set_value(row, next_slack, -1_f64);
                next_slack += 1;
                matrix.set_value(row, next_artificial, 1_f64);
                basis.push(next_artificial);
                next_artificial += 1;
            },
            ConstraintType::Equal => {
                matrix.set_value(row, next_artificial, 1_f64);
                basis.push(next_artificial);
                next_artificial += 1;
            },
        }
    }

    let objective_row = nr_constraints;
    matrix.set_value(objective_row, 0, -maximized.constant());
    for (index, variable) in problem.variables().iter().enumerate() {
        if let Some(&coefficient) = maximized.terms().get(variable.name()) {
            matrix.set_value(objective_row, 1 + index, coefficient);
        }
    }

    let mut big_m = DenseMatrix::zeros(nr_constraints + 1, nr_columns);
    for column in (1 + nr_decision + nr_slack)..nr_columns {
        big_m.set_value(objective_row, column, -1_f64);
    }

    let mut column_kinds = Vec::with_capacity(nr_columns);
    column_kinds.push(ColumnKind::Value);
    column_kinds.extend(std::iter::repeat_n(ColumnKind::Decision, nr_decision));
    column_kinds.extend(std::iter::repeat_n(ColumnKind::Slack, nr_slack));
    column_kinds.extend(std::iter::repeat_n(ColumnKind::Artificial, nr_artificial));

    let mut tableau = Tableau::new(problem.variables().to_vec(), column_kinds, matrix, basis);

    // Cancel the -1 entries of the basic artificials so the companion starts canonical. The
    // cross-matrix addition can only fail on a shape mismatch, and both matrices were just built
    // with identical shapes.
    for row in 0..nr_constraints {
        if tableau.column_kinds()[tableau.basis()[row]] == ColumnKind::Artificial {
            big_m.mul_add_row_from(objective_row, tableau.matrix(), row, 1_f64)
                .unwrap_or_else(|_| unreachable!("companion matrix shares the tableau's shape"));
        }
    }
    tableau.set_big_m(big_m);
    tableau.add_state(TableauState::BigMFeasible);
    tableau
}
