//! Maximize `x + y` subject to `x + y <= -1`: non-negative variables can never sum to a negative
//! number, so the terminal state is `Infeasible`.
use crate::algorithm::simplex::tableau::TableauState;
use crate::algorithm::{solve, SolverOptions};
use crate::data::linear_program::elements::{ConstraintType, Objective};
use crate::data::linear_program::general_form::Constraint;
use crate::tests::general_form;

#[test]
fn infeasible() {
    let mut impossible = Constraint::new(ConstraintType::Less, -1_f64);
    impossible.add_term("x", 1_f64);
    impossible.add_term("y", 1_f64);
    let problem = general_form(
        Objective::Maximize,
        &[("x", 1_f64), ("y", 1_f64)],
        vec![impossible],
    );

    let tableau = solve(&problem, &SolverOptions::default()).unwrap();

    assert!(tableau.has_state(TableauState::Infeasible));
    assert!(!tableau.has_state(TableauState::Optimal));
    assert!(!tableau.has_state(TableauState::Unbound));
    assert!(tableau.decision_values().is_empty());
    assert!(tableau.solution(problem.objective()).is_none());
}
