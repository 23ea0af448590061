//! # Simplex variants
//!
//! Three renditions of the simplex method over the same tableau type: primal, dual and Big-M.
//! Which one solves a relaxation is decided up front from the shape of the problem, never
//! mid-solve; the only hand-off is Big-M passing a feasible tableau to the primal method. The
//! warm-start path for branch-and-bound, injecting a constraint into an optimal tableau and
//! re-optimizing with the dual method, also lives here.
use log::{debug, warn};

use crate::algorithm::simplex::tableau::builder::{build_big_m, build_standard};
use crate::algorithm::simplex::tableau::{Tableau, TableauState};
use crate::algorithm::{SolveError, SolverOptions, EPSILON};
use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::general_form::{
    simplify_big_m_constraints, simplify_constraints, Constraint, GeneralForm, ObjectiveFunction,
};

pub(crate) mod big_m;
pub(crate) mod dual;
pub(crate) mod primal;
pub mod tableau;

/// The simplex variant chosen to solve a relaxation.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SimplexType {
    Primal,
    Dual,
    BigM,
}

/// Decide which variant can solve the problem from its initial basis.
///
/// The slack basis of the `<=` rewrite is primal-feasible exactly when the origin satisfies every
/// constraint; in that case the primal method runs directly. Otherwise, when the maximization
/// normal form has no positive objective coefficient, the slack basis is dual-feasible and the
/// dual method applies. Any other combination needs artificial variables, so Big-M it is.
pub fn select_simplex_type(problem: &GeneralForm, maximized: &ObjectiveFunction) -> SimplexType {
    let origin_feasible = problem.constraints().iter().all(|constraint| {
        match constraint.relation() {
            ConstraintType::Less => constraint.right_hand_side() >= 0_f64,
            ConstraintType::Greater => constraint.right_hand_side() <= 0_f64,
            ConstraintType::Equal => constraint.right_hand_side().abs() < EPSILON,
        }
    });
    if origin_feasible {
        return SimplexType::Primal;
    }

    let dual_feasible = maximized.terms().values().all(|&coefficient| coefficient <= EPSILON);
    if dual_feasible {
        return SimplexType::Dual;
    }

    SimplexType::BigM
}

/// Build the initial tableau for `problem` and run the selected variant to completion.
///
/// The returned tableau carries the terminal states; `Infeasible` and `Unbound` are outcomes,
/// not errors.
///
/// # Errors
///
/// `SolveError` when the pivot budget runs out or a tableau operation is handed mismatched
/// dimensions.
pub(crate) fn solve(
    problem: &GeneralForm,
    maximized: &ObjectiveFunction,
    options: &SolverOptions,
) -> Result<Tableau, SolveError> {
    let simplex_type = select_simplex_type(problem, maximized);
    debug!("solving relaxation with the {:?} simplex method", simplex_type);

    match simplex_type {
        SimplexType::Primal => {
            let constraints = simplify_constraints(problem.constraints());
            let mut tableau =
                build_standard(problem, maximized, &constraints, TableauState::Feasible);
            primal::solve(&mut tableau, options)?;
            Ok(tableau)
        },
        SimplexType::Dual => {
            let constraints = simplify_constraints(problem.constraints());
            let mut tableau =
                build_standard(problem, maximized, &constraints, TableauState::DualFeasible);
            dual::solve(&mut tableau, options)?;
            Ok(tableau)
        },
        SimplexType::BigM => {
            let constraints = simplify_big_m_constraints(problem.constraints());
            let mut tableau = build_big_m(problem, maximized, &constraints);
            big_m::solve(&mut tableau, options)?;
            Ok(tableau)
        },
    }
}

/// Add a constraint to an already optimal tableau and re-optimize with the dual method.
///
/// The constraint is rewritten to `<=` form first; an equality contributes two rows, which are
/// injected one at a time with a full re-optimization in between, since injection is only sound
/// on an optimal tableau. A tableau that is not optimal (or becomes infeasible along the way) is
/// marked `Infeasible` and left alone, which makes a branch-and-bound node with a hopeless
/// constraint a dead end instead of a crash.
///
/// # Errors
///
/// `SolveError` when the pivot budget runs out or a tableau operation is handed mismatched
/// dimensions.
pub(crate) fn add_constraint(
    tableau: &mut Tableau,
    constraint: &Constraint,
    options: &SolverOptions,
) -> Result<(), SolveError> {
    for piece in simplify_constraints(std::slice::from_ref(constraint)) {
        if !tableau.has_state(TableauState::Optimal) {
            warn!("constraint \"{}\" injected into a non-optimal tableau", constraint);
            tableau.add_state(TableauState::Infeasible);
            return Ok(());
        }

        dual::inject_constraint(tableau, &piece)?;
        dual::solve(tableau, options)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::general_form::Variable;

    fn problem(
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

    #[test]
    fn variant_selection() {
        let mut less = Constraint::new(ConstraintType::Less, 4_f64);
        less.add_term("x", 1_f64);
        let max = problem(Objective::Maximize, &[("x", 3_f64)], vec![less.clone()]);
        assert_eq!(
            select_simplex_type(&max, &max.objective().maximized()),
            SimplexType::Primal,
        );

        let cover = Constraint::bound("x", ConstraintType::Greater, 10_f64);
        let min = problem(Objective::Minimize, &[("x", 2_f64)], vec![cover.clone()]);
        assert_eq!(
            select_simplex_type(&min, &min.objective().maximized()),
            SimplexType::Dual,
        );

        let mixed = problem(Objective::Maximize, &[("x", 3_f64)], vec![cover, less]);
        assert_eq!(
            select_simplex_type(&mixed, &mixed.objective().maximized()),
            SimplexType::BigM,
        );
    }

    #[test]
    fn equality_at_the_origin_stays_primal() {
        let zero = Constraint::bound("x", ConstraintType::Equal, 0_f64);
        let p = problem(Objective::Maximize, &[("x", 1_f64)], vec![zero]);
        assert_eq!(select_simplex_type(&p, &p.objective().maximized()), SimplexType::Primal);
    }

    #[test]
    fn injected_equality_contributes_both_halves() {
        // max x + y s.t. x + y <= 10, then demand x = 4
        let mut less = Constraint::new(ConstraintType::Less, 10_f64);
        less.add_term("x", 1_f64);
        less.add_term("y", 1_f64);
        let p = problem(
            Objective::Maximize,
            &[("x", 1_f64), ("y", 1_f64)],
            vec![less],
        );
        let maximized = p.objective().maximized();
        let options = SolverOptions::default();
        let mut tableau = solve(&p, &maximized, &options).unwrap();
        assert!(tableau.has_state(TableauState::Optimal));

        let pin = Constraint::bound("x", ConstraintType::Equal, 4_f64);
        add_constraint(&mut tableau, &pin, &options).unwrap();

        assert!(tableau.has_state(TableauState::Optimal));
        assert_approx_eq!(tableau.objective_value(), 10_f64);
        let solution = tableau.solution(p.objective()).unwrap();
        assert_approx_eq!(solution.value("x").unwrap(), 4_f64);
        assert_approx_eq!(solution.value("y").unwrap(), 6_f64);
    }

    #[test]
    fn injection_into_a_non_optimal_tableau_is_a_dead_end() {
        // max x s.t. x - y <= 1 is unbound
        let mut less = Constraint::new(ConstraintType::Less, 1_f64);
        less.add_term("x", 1_f64);
        less.add_term("y", -1_f64);
        let p = problem(Objective::Maximize, &[("x", 1_f64), ("y", 0_f64)], vec![less]);
        let maximized = p.objective().maximized();
        let options = SolverOptions::default();
        let mut tableau = solve(&p, &maximized, &options).unwrap();
        assert!(tableau.has_state(TableauState::Unbound));

        let bound = Constraint::bound("x", ConstraintType::Less, 3_f64);
        add_constraint(&mut tableau, &bound, &options).unwrap();
        assert!(tableau.has_state(TableauState::Infeasible));
    }
}
