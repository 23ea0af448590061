//! Maximize `x` with no constraint at all: nothing bounds the objective, so the terminal state
//! is `Unbound` and no values can be read off the tableau.
use crate::algorithm::simplex::tableau::TableauState;
use crate::algorithm::{solve, SolverOptions};
use crate::data::linear_program::elements::Objective;
use crate::tests::general_form;

#[test]
fn unbound() {
    let problem = general_form(Objective::Maximize, &[("x", 1_f64)], vec![]);
    let tableau = solve(&problem, &SolverOptions::default()).unwrap();

    assert!(tableau.has_state(TableauState::Unbound));
    assert!(!tableau.has_state(TableauState::Optimal));
    assert!(tableau.decision_values().is_empty());
    assert!(tableau.solution(problem.objective()).is_none());
}
