//! # Simplex tableau
//!
//! The central mutable artifact of one relaxation: the canonical-form augmented matrix, the basis,
//! the kind of every column, the set of states the tableau is currently in and an archive of past
//! pivots. Exactly one simplex variant mutates a tableau at a time; branch-and-bound nodes receive
//! independent deep clones.
use std::collections::HashSet;
use std::fmt;

use enum_map::{Enum, EnumMap};

use crate::algorithm::EPSILON;
use crate::data::linear_algebra::matrix::{DenseMatrix, ShapeMismatch};
use crate::data::linear_program::general_form::{ObjectiveFunction, Variable};
use crate::data::linear_program::solution::Solution;

pub mod builder;

/// A state a tableau can be in.
///
/// These are not mutually exclusive: a tableau is characterized by the set of states that
/// currently hold. `Optimal` together with `DualDegenerated`, or `Feasible` together with
/// `PrimalDegenerated`, are perfectly legitimate combinations, which is why this is not modelled
/// as a single finite-state enum.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
pub enum TableauState {
    Feasible,
    DualFeasible,
    BigMFeasible,
    Optimal,
    Infeasible,
    Unbound,
    PrimalDegenerated,
    BigMDegenerated,
    DualDegenerated,
    Cycling,
}

impl fmt::Display for TableauState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Feasible => "feasible",
            Self::DualFeasible => "dual-feasible",
            Self::BigMFeasible => "bigM-feasible",
            Self::Optimal => "optimal",
            Self::Infeasible => "infeasible",
            Self::Unbound => "unbound",
            Self::PrimalDegenerated => "primal degenerated",
            Self::BigMDegenerated => "bigM degenerated",
            Self::DualDegenerated => "dual degenerated",
            Self::Cycling => "cycling",
        };
        write!(f, "{}", name)
    }
}

/// The set of states that currently hold for a tableau.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StateSet {
    held: EnumMap<TableauState, bool>,
}

impl StateSet {
    /// Add a state to the set.
    pub fn insert(&mut self, state: TableauState) {
        self.held[state] = true;
    }

    /// Remove a state from the set.
    pub fn remove(&mut self, state: TableauState) {
        self.held[state] = false;
    }

    /// Whether the given state currently holds.
    pub fn contains(&self, state: TableauState) -> bool {
        self.held[state]
    }

    /// All states that currently hold.
    pub fn iter(&self) -> impl Iterator<Item = TableauState> + '_ {
        self.held.iter()
            .filter(|&(_, held)| *held)
            .map(|(state, _)| state)
    }
}

/// What a tableau column stands for.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColumnKind {
    /// Column 0, holding the right-hand side values.
    Value,
    Decision,
    Slack,
    Artificial,
}

/// One archived pivot: the matrix, basis and Big-M companion as they were right after the step.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveEntry {
    /// The coefficient matrix after the pivot.
    pub matrix: DenseMatrix,
    /// The basis after the pivot.
    pub basis: Vec<usize>,
    /// The Big-M companion matrix after the pivot, if the tableau carries one.
    pub big_m: Option<DenseMatrix>,
}

/// The canonical-form tableau of one linear program relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    variables: Vec<Variable>,
    column_kinds: Vec<ColumnKind>,
    states: StateSet,
    matrix: DenseMatrix,
    big_m: Option<DenseMatrix>,
    basis: Vec<usize>,
    archive: Vec<ArchiveEntry>,
}

impl Tableau {
    /// Combine the parts produced by a builder into a tableau without states or history.
    pub(crate) fn new(
        variables: Vec<Variable>,
        column_kinds: Vec<ColumnKind>,
        matrix: DenseMatrix,
        basis: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(column_kinds.len(), matrix.nr_columns());
        debug_assert_eq!(basis.len(), matrix.nr_rows() - 1);

        Self {
            variables,
            column_kinds,
            states: StateSet::default(),
            matrix,
            big_m: None,
            basis,
            archive: Vec::new(),
        }
    }

    pub(crate) fn set_big_m(&mut self, big_m: DenseMatrix) {
        debug_assert_eq!(big_m.nr_rows(), self.matrix.nr_rows());
        debug_assert_eq!(big_m.nr_columns(), self.matrix.nr_columns());

        self.big_m = Some(big_m);
    }

    /// Drop the Big-M companion matrix once primal feasibility has been reached.
    pub(crate) fn discard_big_m(&mut self) {
        self.big_m = None;
    }

    /// The coefficient matrix.
    pub fn matrix(&self) -> &DenseMatrix {
        &self.matrix
    }

    pub(crate) fn matrix_mut(&mut self) -> &mut DenseMatrix {
        &mut self.matrix
    }

    /// The Big-M companion matrix, present only while the Big-M method is running.
    pub fn big_m(&self) -> Option<&DenseMatrix> {
        self.big_m.as_ref()
    }

    /// The tableau-column index of the variable basic in each constraint row.
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub(crate) fn basis_mut(&mut self) -> &mut Vec<usize> {
        &mut self.basis
    }

    /// The kind of every column.
    pub fn column_kinds(&self) -> &[ColumnKind] {
        &self.column_kinds
    }

    pub(crate) fn column_kinds_mut(&mut self) -> &mut Vec<ColumnKind> {
        &mut self.column_kinds
    }

    /// The decision variables, in tableau column order (column `1 + i` for variable `i`).
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The set of states that currently hold.
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// Add a state.
    pub fn add_state(&mut self, state: TableauState) {
        self.states.insert(state);
    }

    /// Remove a state.
    pub fn remove_state(&mut self, state: TableauState) {
        self.states.remove(state);
    }

    /// Whether the given state currently holds.
    pub fn has_state(&self, state: TableauState) -> bool {
        self.states.contains(state)
    }

    /// The number of rows, the objective row included.
    pub fn nr_rows(&self) -> usize {
        self.matrix.nr_rows()
    }

    /// The number of columns, the right-hand side column included.
    pub fn nr_columns(&self) -> usize {
        self.matrix.nr_columns()
    }

    /// The index of the objective row.
    pub fn objective_row(&self) -> usize {
        self.matrix.nr_rows() - 1
    }

    /// The right-hand side value of constraint row `i`.
    pub fn right_hand_side(&self, i: usize) -> f64 {
        debug_assert!(i < self.objective_row());

        self.matrix.get_value(i, 0)
    }

    /// The objective-row coefficient of column `j`.
    pub fn objective_coefficient(&self, j: usize) -> f64 {
        self.matrix.get_value(self.objective_row(), j)
    }

    /// The objective value of the current basic solution, in maximization normal form.
    pub fn objective_value(&self) -> f64 {
        -self.matrix.get_value(self.objective_row(), 0)
    }

    /// The constraint row in which column `j` is basic, if any.
    pub fn basic_row(&self, j: usize) -> Option<usize> {
        self.basis.iter().position(|&column| column == j)
    }

    /// Whether any artificial variable is still in the basis.
    pub fn has_artificial_in_basis(&self) -> bool {
        self.basis.iter().any(|&column| self.column_kinds[column] == ColumnKind::Artificial)
    }

    /// The value of every decision variable: 0 when non-basic, its right-hand side when basic.
    ///
    /// Only meaningful once the tableau is optimal; without the `Optimal` state the mapping is
    /// empty, so presenters can never read values off an infeasible or unbounded tableau.
    pub fn decision_values(&self) -> Vec<(String, f64)> {
        if !self.has_state(TableauState::Optimal) {
            return Vec::new();
        }

        self.variables.iter()
            .enumerate()
            .map(|(index, variable)| {
                let value = self.basic_row(1 + index)
                    .map_or(0_f64, |row| self.right_hand_side(row));
                (variable.name().to_string(), value)
            })
            .collect()
    }

    /// Derive a `Solution` in the caller's original optimization direction.
    ///
    /// `None` unless the tableau is optimal.
    pub fn solution(&self, objective: &ObjectiveFunction) -> Option<Solution> {
        if !self.has_state(TableauState::Optimal) {
            return None;
        }

        Some(Solution::new(self.objective_value(), objective.direction(), self.decision_values()))
    }

    /// The archived (matrix, basis, Big-M matrix) snapshots, one per pivot.
    pub fn archive(&self) -> &[ArchiveEntry] {
        &self.archive
    }

    /// The number of archived snapshots.
    pub fn nr_archived_entries(&self) -> usize {
        self.archive.len()
    }

    /// Append the current (matrix, basis, Big-M matrix) to the archive.
    pub(crate) fn archive_snapshot(&mut self) {
        self.archive.push(ArchiveEntry {
            matrix: self.matrix.clone(),
            basis: self.basis.clone(),
            big_m: self.big_m.clone(),
        });
    }

    /// An independent copy for a child relaxation.
    ///
    /// Matrix, basis, column kinds, variables and Big-M companion are deep-copied; the archive
    /// and the state set are not carried over. The child is a fresh, exclusively owned tableau:
    /// nothing a branch-and-bound node does to it can be observed through the parent.
    #[must_use]
    pub fn child_clone(&self) -> Self {
        Self {
            variables: self.variables.clone(),
            column_kinds: self.column_kinds.clone(),
            states: StateSet::default(),
            matrix: self.matrix.clone(),
            big_m: self.big_m.clone(),
            basis: self.basis.clone(),
            archive: Vec::new(),
        }
    }

    /// Exchange the basic variable of `row` for the variable of `column` by Gauss-Jordan
    /// elimination, then archive the result.
    ///
    /// The entering column is eliminated from every other row, the objective row included; when a
    /// Big-M companion is present its objective row is updated in lock-step through the
    /// cross-matrix row addition. The pivot row is scaled such that the pivot element becomes 1.
    pub(crate) fn pivot(&mut self, row: usize, column: usize) -> Result<(), ShapeMismatch> {
        debug_assert!(row < self.objective_row());
        debug_assert!(column > 0 && column < self.nr_columns());

        let pivot_element = self.matrix.get_value(row, column);
        debug_assert!(pivot_element.abs() > EPSILON);

        for other_row in 0..self.matrix.nr_rows() {
            if other_row == row {
                continue;
            }

            let coefficient = self.matrix.get_value(other_row, column);
            if coefficient != 0_f64 {
                self.matrix.mul_add_rows(row, other_row, -coefficient / pivot_element);
            }

            if other_row == self.matrix.nr_rows() - 1 {
                if let Some(big_m) = self.big_m.as_mut() {
                    let big_m_coefficient = big_m.get_value(other_row, column);
                    if big_m_coefficient != 0_f64 {
                        big_m.mul_add_row_from(
                            other_row,
                            &self.matrix,
                            row,
                            -big_m_coefficient / pivot_element,
                        )?;
                    }
                }
            }
        }

        self.matrix.multiply_row(row, 1_f64 / pivot_element);
        self.basis[row] = column;
        self.archive_snapshot();

        debug_assert!(self.is_canonical());
        Ok(())
    }

    /// Whether every basis column is the unit vector of its row, restricted to constraint rows.
    pub(crate) fn is_canonical(&self) -> bool {
        self.basis.iter().enumerate().all(|(row, &column)| {
            (0..self.objective_row()).all(|i| {
                let expected = if i == row { 1_f64 } else { 0_f64 };
                (self.matrix.get_value(i, column) - expected).abs() < 1e-6
            })
        })
    }
}

/// Flag `flag` when any right-hand side value is zero.
///
/// A zero basic value signals that an upcoming pivot may leave the objective unchanged, the
/// precondition for cycling.
pub(crate) fn flag_degenerate_rhs(tableau: &mut Tableau, flag: TableauState) {
    debug_assert!(matches!(flag, TableauState::PrimalDegenerated | TableauState::BigMDegenerated));

    if tableau.has_state(flag) {
        return;
    }

    for row in 0..tableau.objective_row() {
        if tableau.right_hand_side(row).abs() < EPSILON {
            tableau.add_state(flag);
            return;
        }
    }
}

/// Flag `DualDegenerated` when a non-basic column has a zero objective coefficient.
///
/// Only meaningful on an optimal tableau, where such a column indicates alternate optima.
pub(crate) fn flag_dual_degeneracy(tableau: &mut Tableau) {
    if tableau.has_state(TableauState::DualDegenerated) || !tableau.has_state(TableauState::Optimal) {
        return;
    }

    for column in 1..tableau.nr_columns() {
        if tableau.column_kinds[column] != ColumnKind::Artificial
            && tableau.objective_coefficient(column).abs() < EPSILON
            && tableau.basic_row(column).is_none()
        {
            tableau.add_state(TableauState::DualDegenerated);
            return;
        }
    }
}

/// Flag `Cycling` when a degenerate tableau has returned to a previously visited basis.
///
/// The current basis is compared as a set against every archived basis except the snapshot taken
/// right after the latest pivot (which trivially equals the current one). Only runs while a
/// degeneracy flag holds; without degeneracy the objective strictly improved, so no basis can
/// repeat.
pub(crate) fn detect_cycling(tableau: &mut Tableau) {
    if !(tableau.has_state(TableauState::PrimalDegenerated)
        || tableau.has_state(TableauState::BigMDegenerated))
    {
        return;
    }
    if tableau.has_state(TableauState::Cycling) {
        return;
    }

    let current: HashSet<usize> = tableau.basis().iter().copied().collect();
    let nr_entries = tableau.nr_archived_entries();
    let revisited = tableau.archive()[..nr_entries.saturating_sub(1)].iter()
        .any(|entry| {
            entry.basis.len() == current.len()
                && entry.basis.iter().all(|column| current.contains(column))
        });

    if revisited {
        tableau.add_state(TableauState::Cycling);
    }
}
