//! # Representation of solved problems
//!
//! Once a tableau reaches optimality, a `Solution` is derived from it for presentation: the
//! objective value in the caller's original optimization direction, and one value per decision
//! variable, named as in the original problem.
use crate::data::linear_program::elements::Objective;

/// A feasible, optimal assignment extracted from a solved tableau.
///
/// This struct is what a result presenter would use to display the outcome; it contains no
/// tableau bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    objective_value: f64,
    solution_values: Vec<(String, f64)>,
}

impl Solution {
    /// Create a new `Solution` instance.
    ///
    /// # Arguments
    ///
    /// * `maximized_value`: Objective value of the maximization normal form.
    /// * `direction`: Original direction of optimization; a minimization's value is negated back.
    /// * `solution_values`: (variable name, value) tuples for all decision variables.
    pub fn new(
        maximized_value: f64,
        direction: Objective,
        solution_values: Vec<(String, f64)>,
    ) -> Self {
        let objective_value = match direction {
            Objective::Maximize => maximized_value,
            Objective::Minimize => -maximized_value,
        };

        Self { objective_value, solution_values }
    }

    /// The objective value in the original direction of optimization.
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// (variable name, value) tuples for all decision variables.
    pub fn solution_values(&self) -> &[(String, f64)] {
        &self.solution_values
    }

    /// The value of a single variable, if it is part of this solution.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.solution_values.iter()
            .find(|(variable, _)| variable == name)
            .map(|&(_, value)| value)
    }
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn direction_is_restored() {
        let values = vec![("x".to_string(), 10_f64)];
        let solution = Solution::new(-20_f64, Objective::Minimize, values);
        assert_approx_eq!(solution.objective_value(), 20_f64);
        assert_approx_eq!(solution.value("x").unwrap(), 10_f64);
        assert_eq!(solution.value("y"), None);
    }
}
