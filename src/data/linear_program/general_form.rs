//! # General form of a linear program
//!
//! The problem description handed to the engine by an input builder: decision variables, an
//! objective function and an ordered list of constraints, all indexed by variable name. The
//! constraint simplification passes that precede tableau construction live here as well, since
//! they are pure value transformations of this data model.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::error::Error;
use std::fmt;

use itertools::Itertools;

use crate::data::linear_program::elements::{ConstraintType, Objective, VariableTag};

/// A decision variable, identified by its unique name.
///
/// Created once per problem and never deleted; after creation the only permitted mutation is
/// adding tags while the problem is still being defined.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variable {
    name: String,
    tags: BTreeSet<VariableTag>,
}

impl Variable {
    /// Create a new variable. Every variable is non-negative.
    pub fn new(name: impl Into<String>) -> Self {
        let mut tags = BTreeSet::new();
        tags.insert(VariableTag::NonNegative);

        Self { name: name.into(), tags }
    }

    /// Add a tag to this variable.
    pub fn add_tag(&mut self, tag: VariableTag) {
        self.tags.insert(tag);
    }

    /// Whether this variable carries the given tag.
    pub fn has_tag(&self, tag: VariableTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Whether this variable is restricted to integer values.
    pub fn is_integer(&self) -> bool {
        self.has_tag(VariableTag::Integer)
    }

    /// The variable's name, its unique key within a problem.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The linear function being optimized.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveFunction {
    direction: Objective,
    name: String,
    constant: f64,
    terms: BTreeMap<String, f64>,
}

impl ObjectiveFunction {
    /// Create a new objective function without terms.
    pub fn new(direction: Objective, name: impl Into<String>, constant: f64) -> Self {
        Self {
            direction,
            name: name.into(),
            constant,
            terms: BTreeMap::new(),
        }
    }

    /// Set the coefficient of `variable` (keys are unique, setting twice overwrites).
    pub fn add_term(&mut self, variable: impl Into<String>, coefficient: f64) {
        self.terms.insert(variable.into(), coefficient);
    }

    /// Direction of optimization.
    pub fn direction(&self) -> Objective {
        self.direction
    }

    /// Display name of the objective.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scalar constant of the objective function.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// The name-indexed coefficients.
    pub fn terms(&self) -> &BTreeMap<String, f64> {
        &self.terms
    }

    /// The maximization normal form of this objective.
    ///
    /// Minimizations are negated (coefficients and constant); maximizations are returned as-is.
    /// The solver computes this form once per solve and reuses it everywhere.
    #[must_use]
    pub fn maximized(&self) -> Self {
        match self.direction {
            Objective::Maximize => self.clone(),
            Objective::Minimize => Self {
                direction: Objective::Maximize,
                name: self.name.clone(),
                constant: -self.constant,
                terms: self.terms.iter().map(|(name, &c)| (name.clone(), -c)).collect(),
            },
        }
    }
}

/// A single linear constraint.
///
/// Constraints are value objects: every transformation produces a new constraint and leaves the
/// original untouched, so a constraint shared between a problem and a branch-and-bound node can
/// never be corrupted through aliasing.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    relation: ConstraintType,
    right_hand_side: f64,
    terms: BTreeMap<String, f64>,
}

impl Constraint {
    /// Create a new constraint without terms.
    pub fn new(relation: ConstraintType, right_hand_side: f64) -> Self {
        Self {
            relation,
            right_hand_side,
            terms: BTreeMap::new(),
        }
    }

    /// Set the coefficient of `variable`.
    pub fn add_term(&mut self, variable: impl Into<String>, coefficient: f64) {
        self.terms.insert(variable.into(), coefficient);
    }

    /// Convenience constructor for a single-variable bound, as created when branching.
    pub fn bound(variable: impl Into<String>, relation: ConstraintType, value: f64) -> Self {
        let mut constraint = Self::new(relation, value);
        constraint.add_term(variable, 1_f64);
        constraint
    }

    /// The relation between the terms and the right-hand side.
    pub fn relation(&self) -> ConstraintType {
        self.relation
    }

    /// The right-hand side scalar.
    pub fn right_hand_side(&self) -> f64 {
        self.right_hand_side
    }

    /// The name-indexed coefficients.
    pub fn terms(&self) -> &BTreeMap<String, f64> {
        &self.terms
    }

    /// A new constraint with both sides multiplied by `factor`.
    ///
    /// A negative factor flips the relation.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            relation: if factor < 0_f64 { self.relation.flipped() } else { self.relation },
            right_hand_side: self.right_hand_side * factor,
            terms: self.terms.iter().map(|(name, &c)| (name.clone(), c * factor)).collect(),
        }
    }

    /// Split an equality into the equivalent (`>=`, `<=`) pair.
    ///
    /// # Panics
    ///
    /// In debug builds, when called on a non-equality.
    #[must_use]
    pub fn split_equality(&self) -> (Self, Self) {
        debug_assert_eq!(self.relation, ConstraintType::Equal);

        let mut greater = self.clone();
        greater.relation = ConstraintType::Greater;
        let mut less = self.clone();
        less.relation = ConstraintType::Less;

        (greater, less)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms = self.terms.iter()
            .map(|(name, coefficient)| format!("{}*{}", coefficient, name))
            .join(" + ");
        write!(f, "{} {} {}", terms, self.relation, self.right_hand_side)
    }
}

/// Rewrite constraints such that every one of them is a `<=` constraint.
///
/// Equalities are split into a (`>=`, `<=`) pair and `>=` constraints are negated into `<=`
/// constraints. The resulting collection is what the primal and dual tableau builders expect.
/// This pass is idempotent.
pub fn simplify_constraints(constraints: &[Constraint]) -> Vec<Constraint> {
    let mut simplified = Vec::with_capacity(constraints.len());

    for constraint in constraints {
        match constraint.relation() {
            ConstraintType::Equal => {
                let (greater, less) = constraint.split_equality();
                simplified.push(greater.scaled(-1_f64));
                simplified.push(less);
            },
            ConstraintType::Greater => simplified.push(constraint.scaled(-1_f64)),
            ConstraintType::Less => simplified.push(constraint.clone()),
        }
    }

    simplified
}

/// Rewrite constraints such that every right-hand side is non-negative.
///
/// The relation of a flipped constraint flips along, which is why the Big-M builder has to deal
/// with all three relation kinds. This pass is idempotent.
pub fn simplify_big_m_constraints(constraints: &[Constraint]) -> Vec<Constraint> {
    constraints.iter()
        .map(|constraint| {
            if constraint.right_hand_side() < 0_f64 {
                constraint.scaled(-1_f64)
            } else {
                constraint.clone()
            }
        })
        .collect()
}

/// A complete linear program in general form.
///
/// Variables keep their insertion order, which determines the column order of the tableau built
/// from this problem.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralForm {
    objective: ObjectiveFunction,
    variables: Vec<Variable>,
    index_by_name: HashMap<String, usize>,
    constraints: Vec<Constraint>,
}

impl GeneralForm {
    /// Combine an objective, variables and constraints into a checked problem.
    ///
    /// # Errors
    ///
    /// `UndefinedVariable` when a variable name is used twice, or when the objective or a
    /// constraint references a name that is not among `variables`. Silently dropping such terms
    /// would make a problem with a typo in it quietly solve the wrong program.
    pub fn new(
        objective: ObjectiveFunction,
        variables: Vec<Variable>,
        constraints: Vec<Constraint>,
    ) -> Result<Self, UndefinedVariable> {
        let mut index_by_name = HashMap::with_capacity(variables.len());
        for (index, variable) in variables.iter().enumerate() {
            if index_by_name.insert(variable.name().to_string(), index).is_some() {
                return Err(UndefinedVariable::duplicate(variable.name()));
            }
        }

        for name in objective.terms().keys() {
            if !index_by_name.contains_key(name) {
                return Err(UndefinedVariable::unknown(name));
            }
        }
        for constraint in &constraints {
            for name in constraint.terms().keys() {
                if !index_by_name.contains_key(name) {
                    return Err(UndefinedVariable::unknown(name));
                }
            }
        }

        Ok(Self { objective, variables, index_by_name, constraints })
    }

    /// The objective function as provided by the caller.
    pub fn objective(&self) -> &ObjectiveFunction {
        &self.objective
    }

    /// The decision variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The position of a variable within the insertion order.
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// The constraints in the order they were provided.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether any decision variable is restricted to integer values.
    pub fn requires_integrality(&self) -> bool {
        self.variables.iter().any(Variable::is_integer)
    }
}

/// A term references a variable name that the problem doesn't define.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UndefinedVariable {
    name: String,
    duplicate: bool,
}

impl UndefinedVariable {
    fn unknown(name: impl Into<String>) -> Self {
        Self { name: name.into(), duplicate: false }
    }

    fn duplicate(name: impl Into<String>) -> Self {
        Self { name: name.into(), duplicate: true }
    }

    /// The offending variable name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for UndefinedVariable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.duplicate {
            write!(f, "variable \"{}\" is defined more than once", self.name)
        } else {
            write!(f, "term references undefined variable \"{}\"", self.name)
        }
    }
}

impl Error for UndefinedVariable {
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn maximized_objective() {
        let mut objective = ObjectiveFunction::new(Objective::Minimize, "z", 3_f64);
        objective.add_term("x", 2_f64);
        objective.add_term("y", -1_f64);

        let maximized = objective.maximized();
        assert_eq!(maximized.direction(), Objective::Maximize);
        assert_approx_eq!(maximized.constant(), -3_f64);
        assert_approx_eq!(*maximized.terms().get("x").unwrap(), -2_f64);
        assert_approx_eq!(*maximized.terms().get("y").unwrap(), 1_f64);

        // A maximization is already in normal form.
        assert_eq!(maximized.maximized(), maximized);
    }

    #[test]
    fn scaling_is_a_value_operation() {
        let mut original = Constraint::new(ConstraintType::Greater, 4_f64);
        original.add_term("x", 2_f64);

        let scaled = original.scaled(-1_f64);
        assert_eq!(scaled.relation(), ConstraintType::Less);
        assert_approx_eq!(scaled.right_hand_side(), -4_f64);
        assert_approx_eq!(*scaled.terms().get("x").unwrap(), -2_f64);

        // The shared original is untouched
        assert_eq!(original.relation(), ConstraintType::Greater);
        assert_approx_eq!(original.right_hand_side(), 4_f64);
    }

    #[test]
    fn simplification() {
        let mut equality = Constraint::new(ConstraintType::Equal, 4_f64);
        equality.add_term("x", 1_f64);
        let mut greater = Constraint::new(ConstraintType::Greater, 2_f64);
        greater.add_term("y", 3_f64);

        let simplified = simplify_constraints(&[equality, greater]);
        assert_eq!(simplified.len(), 3);
        assert!(simplified.iter().all(|c| c.relation() == ConstraintType::Less));
        assert_approx_eq!(simplified[0].right_hand_side(), -4_f64);
        assert_approx_eq!(simplified[1].right_hand_side(), 4_f64);
        assert_approx_eq!(simplified[2].right_hand_side(), -2_f64);
    }

    #[test]
    fn simplification_is_idempotent() {
        let mut equality = Constraint::new(ConstraintType::Equal, 4_f64);
        equality.add_term("x", 1_f64);
        let mut less = Constraint::new(ConstraintType::Less, -1_f64);
        less.add_term("y", 1_f64);

        let once = simplify_constraints(&[equality.clone(), less.clone()]);
        let twice = simplify_constraints(&once);
        assert_eq!(once, twice);

        let once = simplify_big_m_constraints(&[equality, less]);
        let twice = simplify_big_m_constraints(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn big_m_simplification_flips_negative_rhs() {
        let mut less = Constraint::new(ConstraintType::Less, -5_f64);
        less.add_term("x", 1_f64);

        let simplified = simplify_big_m_constraints(&[less]);
        assert_eq!(simplified[0].relation(), ConstraintType::Greater);
        assert_approx_eq!(simplified[0].right_hand_side(), 5_f64);
    }

    #[test]
    fn undefined_variable_is_rejected() {
        let mut objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        objective.add_term("x", 1_f64);

        let mut constraint = Constraint::new(ConstraintType::Less, 4_f64);
        constraint.add_term("typo", 1_f64);

        let result = GeneralForm::new(objective, vec![Variable::new("x")], vec![constraint]);
        assert_eq!(result.unwrap_err().name(), "typo");
    }

    #[test]
    fn duplicate_variable_is_rejected() {
        let objective = ObjectiveFunction::new(Objective::Maximize, "z", 0_f64);
        let variables = vec![Variable::new("x"), Variable::new("x")];
        assert!(GeneralForm::new(objective, variables, vec![]).is_err());
    }
}
