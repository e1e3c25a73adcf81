//! Stepwise Gaussian elimination with human-readable step explanations.
//!
//! The elimination is exposed as a state machine advancing one visible
//! operation per [`step`](Elimination::step) call (find pivot, swap rows,
//! eliminate one row, back-substitute one variable) because the teaching
//! front ends animate each of these individually and display the
//! [`explanation`](Elimination::explanation) string alongside. The terminal
//! semantics match a plain forward-elimination / back-substitution solve.

use crate::augmented::Augmented;
use crate::PIVOT_EPS;

/// Sub-step of the forward-elimination phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardStep {
    /// Locate (and possibly prepare to swap in) the next pivot.
    FindPivot,
    /// Execute a pending row swap.
    Swap,
    /// Eliminate the entry below the pivot in one row.
    Eliminate,
}

/// Phase of the elimination machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationPhase {
    /// Forward elimination toward row-echelon form.
    Forward(ForwardStep),
    /// Back substitution, one variable per step.
    Backward,
    /// Finished.
    Done,
}

/// Result of a completed elimination.
///
/// Variables without a pivot (free variables of an underdetermined system)
/// stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: Vec<Option<f32>>,
}

impl Solution {
    /// Per-variable values; `None` marks a free variable.
    pub fn values(&self) -> &[Option<f32>] {
        &self.values
    }

    /// The full solution vector, if every variable was determined.
    pub fn as_vec(&self) -> Option<Vec<f32>> {
        self.values.iter().copied().collect()
    }
}

/// Stepwise Gaussian-elimination state machine.
#[derive(Debug, Clone)]
pub struct Elimination {
    matrix: Augmented,
    phase: EliminationPhase,
    row: usize,
    col: usize,
    eliminating_row: usize,
    swap_target: usize,
    back_row: Option<usize>,
    solution: Vec<Option<f32>>,
    explanation: String,
}

impl Elimination {
    /// Start eliminating the given augmented matrix.
    pub fn new(matrix: Augmented) -> Self {
        let unknowns = matrix.unknowns();
        Self {
            matrix,
            phase: EliminationPhase::Forward(ForwardStep::FindPivot),
            row: 0,
            col: 0,
            eliminating_row: 1,
            swap_target: 0,
            back_row: None,
            solution: vec![None; unknowns],
            explanation: "Ready to begin forward elimination".to_string(),
        }
    }

    /// The matrix in its current (partially eliminated) state.
    pub fn matrix(&self) -> &Augmented {
        &self.matrix
    }

    /// Current phase.
    pub fn phase(&self) -> EliminationPhase {
        self.phase
    }

    /// Current pivot position (row, col) during forward elimination.
    pub fn pivot(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Description of the last step taken, for display.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Advance one step; returns the phase after the step.
    pub fn step(&mut self) -> EliminationPhase {
        match self.phase {
            EliminationPhase::Forward(sub) => self.forward_step(sub),
            EliminationPhase::Backward => self.backward_step(),
            EliminationPhase::Done => {}
        }
        self.phase
    }

    /// Drive to completion and return the solution.
    pub fn run(mut self) -> Solution {
        while self.step() != EliminationPhase::Done {}
        Solution {
            values: self.solution,
        }
    }

    fn forward_step(&mut self, sub: ForwardStep) {
        let rows = self.matrix.rows();
        let unknowns = self.matrix.unknowns();

        match sub {
            ForwardStep::FindPivot => {
                if self.col >= unknowns || self.row >= rows {
                    self.phase = EliminationPhase::Backward;
                    self.back_row = Some(rows - 1);
                    self.explanation =
                        "Forward elimination complete, starting back substitution".to_string();
                    return;
                }

                let pivot_row = (self.row..rows)
                    .find(|&i| self.matrix.get(i, self.col).abs() > PIVOT_EPS);

                match pivot_row {
                    None => {
                        self.col += 1;
                        self.explanation = format!(
                            "Column {} has no valid pivot, moving to next column",
                            self.col
                        );
                    }
                    Some(p) if p != self.row => {
                        self.swap_target = p;
                        self.phase = EliminationPhase::Forward(ForwardStep::Swap);
                        self.explanation = format!(
                            "Pivot position ({},{}) is zero, swapping with row {}",
                            self.row + 1,
                            self.col + 1,
                            p + 1
                        );
                    }
                    Some(_) => {
                        self.eliminating_row = self.row + 1;
                        self.phase = EliminationPhase::Forward(ForwardStep::Eliminate);
                        self.explanation = format!(
                            "Pivot is {} at ({},{}), eliminating entries below",
                            self.matrix.get(self.row, self.col),
                            self.row + 1,
                            self.col + 1
                        );
                    }
                }
            }
            ForwardStep::Swap => {
                self.matrix.swap_rows(self.row, self.swap_target);
                self.explanation = format!(
                    "Swapped R{} and R{}, pivot is now {}",
                    self.row + 1,
                    self.swap_target + 1,
                    self.matrix.get(self.row, self.col)
                );
                self.eliminating_row = self.row + 1;
                self.phase = EliminationPhase::Forward(ForwardStep::Eliminate);
            }
            ForwardStep::Eliminate => {
                if self.eliminating_row >= rows {
                    self.row += 1;
                    self.col += 1;
                    self.phase = EliminationPhase::Forward(ForwardStep::FindPivot);
                    self.explanation =
                        format!("Column {} complete, moving to next pivot", self.col);
                    return;
                }

                let pivot = self.matrix.get(self.row, self.col);
                let target = self.matrix.get(self.eliminating_row, self.col);

                if target.abs() < PIVOT_EPS {
                    self.explanation = format!(
                        "Entry ({},{}) is already zero, skipping",
                        self.eliminating_row + 1,
                        self.col + 1
                    );
                    self.eliminating_row += 1;
                    return;
                }

                let multiplier = -target / pivot;
                self.matrix
                    .add_scaled_row(self.eliminating_row, self.row, multiplier);
                self.explanation = format!(
                    "R{} + ({multiplier:.3})*R{} -> R{}",
                    self.eliminating_row + 1,
                    self.row + 1,
                    self.eliminating_row + 1
                );
                self.eliminating_row += 1;
            }
        }
    }

    fn backward_step(&mut self) {
        let Some(row) = self.back_row else {
            self.phase = EliminationPhase::Done;
            self.explanation = "Elimination complete".to_string();
            return;
        };

        let unknowns = self.matrix.unknowns();
        let rhs_col = self.matrix.cols() - 1;

        let pivot_col = (0..unknowns).find(|&j| self.matrix.get(row, j).abs() > PIVOT_EPS);

        match pivot_col {
            None => {
                // row of zeros
                self.explanation = format!("Row {} has no pivot, skipping", row + 1);
            }
            Some(col) => {
                let pivot = self.matrix.get(row, col);
                let mut rhs = self.matrix.get(row, rhs_col);
                for j in col + 1..unknowns {
                    if let Some(value) = self.solution[j] {
                        rhs -= self.matrix.get(row, j) * value;
                    }
                }
                let value = rhs / pivot;
                self.solution[col] = Some(value);
                self.explanation = format!("From row {}: x{} = {value:.3}", row + 1, col + 1);
            }
        }

        self.back_row = row.checked_sub(1);
        if self.back_row.is_none() {
            self.phase = EliminationPhase::Done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solve_stepwise(a: &[f32], b: &[f32], n: usize) -> Solution {
        let aug = Augmented::from_system(a, b, n).unwrap();
        Elimination::new(aug).run()
    }

    #[test]
    fn test_unique_solution_3x3() {
        // x + y + z = 6, 2y + 5z = -4, 2x + 5y - z = 27
        let a = [1.0, 1.0, 1.0, 0.0, 2.0, 5.0, 2.0, 5.0, -1.0];
        let b = [6.0, -4.0, 27.0];
        let sol = solve_stepwise(&a, &b, 3).as_vec().expect("determined system");
        assert_relative_eq!(sol[0], 5.0, epsilon = 1e-4);
        assert_relative_eq!(sol[1], 3.0, epsilon = 1e-4);
        assert_relative_eq!(sol[2], -2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_swap_required() {
        // leading zero forces a row swap
        let a = [0.0, 1.0, 1.0, 0.0];
        let b = [2.0, 3.0];
        let sol = solve_stepwise(&a, &b, 2).as_vec().expect("determined system");
        assert_relative_eq!(sol[0], 3.0, epsilon = 1e-4);
        assert_relative_eq!(sol[1], 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_free_variable_stays_none() {
        // second row is a multiple of the first: y ends up free
        let a = [1.0, 2.0, 2.0, 4.0];
        let b = [3.0, 6.0];
        let sol = solve_stepwise(&a, &b, 2);
        assert!(sol.as_vec().is_none());
        assert!(sol.values().iter().any(|v| v.is_some()));
    }

    #[test]
    fn test_phase_progression() {
        let aug = Augmented::from_system(&[2.0, 1.0, 1.0, 3.0], &[3.0, 5.0], 2).unwrap();
        let mut elim = Elimination::new(aug);

        assert_eq!(
            elim.phase(),
            EliminationPhase::Forward(ForwardStep::FindPivot)
        );
        let mut steps = 0;
        while elim.step() != EliminationPhase::Done {
            steps += 1;
            assert!(steps < 100, "machine did not terminate");
        }
        assert!(!elim.explanation().is_empty());
    }

    #[test]
    fn test_explanations_change_per_step() {
        let aug = Augmented::from_system(&[1.0, 1.0, 0.0, 1.0], &[2.0, 1.0], 2).unwrap();
        let mut elim = Elimination::new(aug);
        let before = elim.explanation().to_string();
        elim.step();
        assert_ne!(elim.explanation(), before);
    }
}
