//! # Integration tests that require a look inside the crate.
//!
//! Each `problem_*` module drives one small worked problem through the whole pipeline and
//! checks the terminal state, the objective value and the variable values. The `properties`
//! module checks relationships between solve paths rather than single outcomes.
pub mod problem_5;
pub mod problem_6;

use crate::data::linear_program::elements::Objective;
use crate::data::linear_program::general_form::{
    Constraint, GeneralForm, ObjectiveFunction, Variable,
};

/// Build a validated problem from objective terms, plain variables and constraints.
pub fn general_form(
    direction: Objective,
    objective_terms: &[(&str, f64)],
    constraints: Vec<Constraint>,
) -> GeneralForm {
    let mut objective = ObjectiveFunction::new(direction, "z", 0_f64);
    let mut variables = Vec::new();
    for &(name, coefficient) in objective_terms {
        objective.add_term(name, coefficient);
        variables.push(Variable::new(name));
    }

    GeneralForm::new(objective, variables, constraints).unwrap()
}
