//! # Branch-and-bound
//!
//! Integer restrictions are enforced by searching a tree of relaxations. Each node tightens its
//! parent's optimal tableau with one bound constraint via dual warm-start; nodes live in an arena
//! and refer to their parent by index, so the tree needs no reference counting and is dropped
//! wholesale at the end of the search.
use std::cmp::Ordering;

use log::{debug, info, warn};

use crate::algorithm::simplex;
use crate::algorithm::simplex::tableau::{ColumnKind, Tableau, TableauState};
use crate::algorithm::{SolveError, SolverOptions, EPSILON};
use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::general_form::Constraint;

use self::branch::Branch;

pub(crate) mod branch;

/// A relaxation value within this distance of an integer counts as integer.
pub(crate) const INTEGRALITY_TOLERANCE: f64 = 1e-5;

/// The order in which open branch-and-bound nodes are explored.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BranchingRule {
    /// Depth-first: the candidate list is a stack.
    Lifo,
    /// Breadth-first: the candidate list is a queue.
    Fifo,
    /// Best-bound: children are solved on creation, pruned against the incumbent, and the
    /// candidate with the best relaxation bound is explored next.
    Mub,
}

impl Default for BranchingRule {
    fn default() -> Self {
        BranchingRule::Lifo
    }
}

/// Search the branch-and-bound tree rooted at an optimal relaxation.
///
/// Returns the tableau of the best integer-feasible node found. When no node is
/// integer-feasible the root tableau is returned marked `Infeasible`: the relaxation had
/// solutions, the integer program does not.
///
/// # Errors
///
/// `SolveError` when a node's re-optimization exceeds the pivot budget or a tableau operation is
/// handed mismatched dimensions.
pub(crate) fn solve(root: Tableau, options: &SolverOptions) -> Result<Tableau, SolveError> {
    debug_assert!(root.has_state(TableauState::Optimal));

    let mut nodes = vec![Branch::root(root)];
    let mut candidates = vec![0_usize];
    let mut best: Option<(usize, f64)> = None;

    while let Some(id) = next_candidate(&mut candidates, options.branching_rule) {
        if options.branching_rule == BranchingRule::Mub {
            if let Some((_, incumbent)) = best {
                if bound(&nodes, id) <= incumbent + EPSILON {
                    debug!("node {} pruned against incumbent {}", id, incumbent);
                    continue;
                }
            }
        }
        if !ensure_solved(&mut nodes, id, options)? {
            continue;
        }

        let (fractional, node_value) = {
            let Some(tableau) = nodes[id].tableau() else {
                continue;
            };
            if !tableau.has_state(TableauState::Optimal) {
                continue;
            }
            (fractional_variable(tableau), tableau.objective_value())
        };

        match fractional {
            Some((name, value)) => {
                debug!("node {} branches on {} = {}", id, name, value);
                let bounds = [
                    Constraint::bound(&name, ConstraintType::Less, value.floor()),
                    Constraint::bound(&name, ConstraintType::Greater, value.ceil()),
                ];
                for constraint in bounds {
                    let child = nodes.len();
                    nodes.push(Branch::child(id, constraint));

                    if options.branching_rule == BranchingRule::Mub {
                        if !ensure_solved(&mut nodes, child, options)? {
                            continue;
                        }
                        let child_bound = {
                            let Some(tableau) = nodes[child].tableau() else {
                                continue;
                            };
                            if !tableau.has_state(TableauState::Optimal) {
                                continue;
                            }
                            tableau.objective_value()
                        };
                        if let Some((_, incumbent)) = best {
                            if child_bound <= incumbent + EPSILON {
                                debug!("child {} pruned against incumbent {}", child, incumbent);
                                continue;
                            }
                        }
                        candidates.push(child);
                    } else {
                        candidates.push(child);
                    }
                }
                if options.branching_rule == BranchingRule::Mub {
                    candidates.sort_by(|&a, &b| {
                        bound(&nodes, a)
                            .partial_cmp(&bound(&nodes, b))
                            .unwrap_or(Ordering::Equal)
                    });
                }
            },
            None => {
                debug!("node {} is integer-feasible at {}", id, node_value);
                if best.is_none_or(|(_, incumbent)| node_value > incumbent) {
                    best = Some((id, node_value));
                }
            },
        }
    }

    if let Some((id, value)) = best {
        if let Some(tableau) = nodes[id].take_tableau() {
            info!("best integer-feasible node {} with objective value {}", id, value);
            return Ok(tableau);
        }
    }

    warn!("no integer-feasible node found");
    let Some(mut tableau) = nodes[0].take_tableau() else {
        unreachable!("the root node keeps its relaxation throughout the search");
    };
    tableau.remove_state(TableauState::Optimal);
    tableau.add_state(TableauState::Infeasible);
    Ok(tableau)
}

/// Pop the next node to explore: the stack top for `Lifo`, the queue front for `Fifo`, the last
/// (best, since the list is kept sorted ascending by bound) for `Mub`.
fn next_candidate(candidates: &mut Vec<usize>, rule: BranchingRule) -> Option<usize> {
    match rule {
        BranchingRule::Fifo => {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.remove(0))
            }
        },
        BranchingRule::Lifo | BranchingRule::Mub => candidates.pop(),
    }
}

/// The relaxation bound of a node, or infinity when it has not been solved yet, so an unsolved
/// node is never pruned.
fn bound(nodes: &[Branch], id: usize) -> f64 {
    nodes[id].tableau()
        .map_or(f64::INFINITY, Tableau::objective_value)
}

/// Make sure node `id` carries a solved tableau: clone the parent's optimal tableau, inject the
/// node's bound constraint and re-optimize. Returns whether a tableau is present afterwards.
fn ensure_solved(
    nodes: &mut [Branch],
    id: usize,
    options: &SolverOptions,
) -> Result<bool, SolveError> {
    if nodes[id].tableau().is_some() {
        return Ok(true);
    }
    let (Some(parent), Some(constraint)) = (nodes[id].parent(), nodes[id].constraint().cloned())
    else {
        return Ok(false);
    };
    let Some(parent_tableau) = nodes[parent].tableau() else {
        return Ok(false);
    };

    let mut tableau = parent_tableau.child_clone();
    // Children are only created for optimal parents; the fresh clone resumes from that fact.
    tableau.add_state(TableauState::Feasible);
    tableau.add_state(TableauState::Optimal);
    simplex::add_constraint(&mut tableau, &constraint, options)?;
    nodes[id].set_tableau(tableau);

    Ok(true)
}

/// The first basic integer-tagged decision variable whose value is fractional, in basis order.
fn fractional_variable(tableau: &Tableau) -> Option<(String, f64)> {
    for row in 0..tableau.objective_row() {
        let column = tableau.basis()[row];
        if tableau.column_kinds()[column] != ColumnKind::Decision {
            continue;
        }
        let variable = &tableau.variables()[column - 1];
        if !variable.is_integer() {
            continue;
        }
        let value = tableau.right_hand_side(row);
        if (value - value.round()).abs() > INTEGRALITY_TOLERANCE {
            return Some((variable.name().to_string(), value));
        }
    }

    None
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::data::linear_program::elements::{Objective, VariableTag};
    use crate::data::linear_program::general_form::{
        GeneralForm, ObjectiveFunction, Variable,
    };

    fn integer_variable(name: &str) -> Variable {
        let mut variable = Variable::new(name);
        variable.add_tag(VariableTag::Integer);
        variable
    }

    fn solve_with_rule(problem: &GeneralForm, rule: BranchingRule) -> Tableau {
        let options = SolverOptions { branching_rule: rule, ..SolverOptions::default() };
        let maximized = problem.objective().maximized();
        let root = simplex::solve(problem, &maximized, &options).unwrap();
        solve(root, &options).unwrap()
    }

    /// max 5x + 4y s.t. 6x + 4y <= 24, x + 2y <= 6. The relaxation peaks at x = 3, y = 1.5;
    /// rounding that down gives 19, but the integer optimum sits at the different vertex
    /// x = 4, y = 0 with value 20.
    fn knapsack() -> GeneralForm {
        let mut objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        objective.add_term("x", 5_f64);
        objective.add_term("y", 4_f64);
        let mut first = Constraint::new(ConstraintType::Less, 24_f64);
        first.add_term("x", 6_f64);
        first.add_term("y", 4_f64);
        let mut second = Constraint::new(ConstraintType::Less, 6_f64);
        second.add_term("x", 1_f64);
        second.add_term("y", 2_f64);

        GeneralForm::new(
            objective,
            vec![integer_variable("x"), integer_variable("y")],
            vec![first, second],
        ).unwrap()
    }

    #[test]
    fn single_split() {
        // max x s.t. 2x <= 3, x integer: the relaxation gives x = 1.5, the floor branch wins
        let mut objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        objective.add_term("x", 1_f64);
        let mut constraint = Constraint::new(ConstraintType::Less, 3_f64);
        constraint.add_term("x", 2_f64);
        let problem = GeneralForm::new(
            objective,
            vec![integer_variable("x")],
            vec![constraint],
        ).unwrap();

        let tableau = solve_with_rule(&problem, BranchingRule::Lifo);
        assert!(tableau.has_state(TableauState::Optimal));
        let solution = tableau.solution(problem.objective()).unwrap();
        assert_approx_eq!(solution.objective_value(), 1_f64);
        assert_approx_eq!(solution.value("x").unwrap(), 1_f64);
    }

    #[test]
    fn rounding_the_relaxation_is_not_enough() {
        let problem = knapsack();
        for rule in [BranchingRule::Lifo, BranchingRule::Fifo, BranchingRule::Mub] {
            let tableau = solve_with_rule(&problem, rule);
            assert!(tableau.has_state(TableauState::Optimal), "rule {:?}", rule);

            let solution = tableau.solution(problem.objective()).unwrap();
            assert_approx_eq!(solution.objective_value(), 20_f64);
            assert_approx_eq!(solution.value("x").unwrap(), 4_f64);
            assert_approx_eq!(solution.value("y").unwrap(), 0_f64);
        }
    }

    #[test]
    fn returned_values_are_integral() {
        let problem = knapsack();
        let tableau = solve_with_rule(&problem, BranchingRule::Lifo);
        for (_, value) in tableau.decision_values() {
            assert!((value - value.round()).abs() < INTEGRALITY_TOLERANCE);
        }
    }

    #[test]
    fn integer_infeasible_interval() {
        // 0.4 <= x <= 0.6 contains no integer
        let mut objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        objective.add_term("x", 1_f64);
        let problem = GeneralForm::new(
            objective,
            vec![integer_variable("x")],
            vec![
                Constraint::bound("x", ConstraintType::Greater, 0.4_f64),
                Constraint::bound("x", ConstraintType::Less, 0.6_f64),
            ],
        ).unwrap();

        let tableau = solve_with_rule(&problem, BranchingRule::Lifo);
        assert!(tableau.has_state(TableauState::Infeasible));
        assert!(!tableau.has_state(TableauState::Optimal));
        assert!(tableau.decision_values().is_empty());
    }

    #[test]
    fn already_integral_relaxation_skips_branching() {
        // max x s.t. x <= 2: the relaxation optimum is integral as-is
        let mut objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        objective.add_term("x", 1_f64);
        let problem = GeneralForm::new(
            objective,
            vec![integer_variable("x")],
            vec![Constraint::bound("x", ConstraintType::Less, 2_f64)],
        ).unwrap();

        let tableau = solve_with_rule(&problem, BranchingRule::Lifo);
        assert!(tableau.has_state(TableauState::Optimal));
        // One node, no splits
        assert_approx_eq!(tableau.objective_value(), 2_f64);
    }

    #[test]
    fn fractional_variable_scans_in_basis_order() {
        let problem = knapsack();
        let maximized = problem.objective().maximized();
        let root = simplex::solve(&problem, &maximized, &SolverOptions::default()).unwrap();

        let (name, value) = fractional_variable(&root).unwrap();
        assert_eq!(name, "y");
        assert_approx_eq!(value, 1.5_f64);
    }
}
