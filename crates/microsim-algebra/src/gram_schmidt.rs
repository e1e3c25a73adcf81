//! Step-by-step Gram-Schmidt orthonormalization of three 3D vectors.
//!
//! The process is exposed as a small state machine so a front end can replay
//! it one phase at a time, the way the classroom visualization does:
//!
//! ```text
//! Start ──▶ Project ──▶ Subtract ──▶ Normalize ──▶ Start (next vector)
//!   │                                      │
//!   └── first vector skips straight ───────┘
//! ```
//!
//! Alongside the orthonormal Q columns the machine records the R entries of
//! the thin QR factorization: the off-diagonal rᵢⱼ = qᵢ·aⱼ captured during
//! projection and the diagonal rⱼⱼ = ‖v‖ captured at normalization, so that
//! A = QR holds on completion.

use glam::Vec3;

use crate::project::project_onto;
use crate::EPS;

/// Phase of the stepwise Gram-Schmidt machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pick up the next input vector.
    Start,
    /// Compute projections onto the Q columns found so far.
    Project,
    /// Subtract the projections to get the residual v.
    Subtract,
    /// Normalize v into the next Q column.
    Normalize,
}

/// Terminal status of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GramSchmidtStatus {
    /// More steps remain.
    InProgress,
    /// All three vectors processed; Q is orthonormal.
    Complete,
    /// A residual collapsed below tolerance: the inputs are linearly
    /// dependent and the process stopped early.
    DependentInput,
}

/// One recorded entry of the R factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct REntry {
    /// Row index (1-based, as displayed).
    pub row: usize,
    /// Column index (1-based, as displayed).
    pub col: usize,
    /// The coefficient value.
    pub value: f32,
}

/// Stepwise Gram-Schmidt orthonormalization state.
#[derive(Debug, Clone)]
pub struct GramSchmidt {
    a: [Vec3; 3],
    q: Vec<Vec3>,
    r: Vec<REntry>,
    v: Vec3,
    projections: Vec<Vec3>,
    current: usize,
    phase: Phase,
    status: GramSchmidtStatus,
    description: String,
}

impl GramSchmidt {
    /// Start a new run over the three input vectors.
    pub fn new(a: [Vec3; 3]) -> Self {
        Self {
            a,
            q: Vec::new(),
            r: Vec::new(),
            v: Vec3::ZERO,
            projections: Vec::new(),
            current: 0,
            phase: Phase::Start,
            status: GramSchmidtStatus::InProgress,
            description: "Press 'Step' to begin orthonormalizing a1".to_string(),
        }
    }

    /// Orthonormal columns produced so far.
    pub fn q(&self) -> &[Vec3] {
        &self.q
    }

    /// R-factor entries recorded so far.
    pub fn r(&self) -> &[REntry] {
        &self.r
    }

    /// The residual vector of the in-flight column (zero between columns).
    pub fn residual(&self) -> Vec3 {
        self.v
    }

    /// Projections of the in-flight column onto the existing Q columns.
    pub fn projections(&self) -> &[Vec3] {
        &self.projections
    }

    /// The phase the next [`step`](Self::step) will execute.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current status.
    pub fn status(&self) -> GramSchmidtStatus {
        self.status
    }

    /// Human-readable description of the last transition, for display.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Advance one phase. Returns the new status.
    pub fn step(&mut self) -> GramSchmidtStatus {
        if self.status != GramSchmidtStatus::InProgress {
            return self.status;
        }

        match self.phase {
            Phase::Start => {
                self.v = self.a[self.current];
                self.projections.clear();
                if self.current == 0 {
                    self.phase = Phase::Normalize;
                    self.description =
                        "First vector: directly normalize a1 to get q1".to_string();
                } else {
                    self.phase = Phase::Project;
                    self.description = format!(
                        "Computing projections of a{} onto existing q vectors",
                        self.current + 1
                    );
                }
            }
            Phase::Project => {
                self.projections.clear();
                for (i, &q) in self.q.iter().enumerate() {
                    self.projections.push(project_onto(self.a[self.current], q));
                    self.r.push(REntry {
                        row: i + 1,
                        col: self.current + 1,
                        value: q.dot(self.a[self.current]),
                    });
                }
                self.phase = Phase::Subtract;
                self.description = format!(
                    "Subtracting projections from a{} to get v",
                    self.current + 1
                );
            }
            Phase::Subtract => {
                self.v = self.a[self.current];
                for proj in &self.projections {
                    self.v -= *proj;
                }
                self.phase = Phase::Normalize;
                self.description = format!("Normalizing v to get q{}", self.current + 1);
            }
            Phase::Normalize => {
                let norm = self.v.length();
                if norm < EPS {
                    self.status = GramSchmidtStatus::DependentInput;
                    self.description = "Vector is linearly dependent".to_string();
                    return self.status;
                }

                self.q.push(self.v / norm);
                self.r.push(REntry {
                    row: self.current + 1,
                    col: self.current + 1,
                    value: norm,
                });

                self.current += 1;
                self.projections.clear();
                self.v = Vec3::ZERO;

                if self.current >= 3 {
                    self.status = GramSchmidtStatus::Complete;
                    self.description =
                        "Gram-Schmidt complete: A = QR with orthonormal Q".to_string();
                } else {
                    self.phase = Phase::Start;
                    self.description = format!(
                        "q{} computed, ready for a{}",
                        self.q.len(),
                        self.current + 1
                    );
                }
            }
        }

        self.status
    }

    /// Drive the machine to a terminal status.
    pub fn run(&mut self) -> GramSchmidtStatus {
        while self.step() == GramSchmidtStatus::InProgress {}
        self.status
    }
}

/// One-shot orthonormalization of three vectors.
///
/// Returns the orthonormal basis, or `None` when the inputs are linearly
/// dependent (to the shared [`EPS`] tolerance).
pub fn orthonormalize(a: [Vec3; 3]) -> Option<[Vec3; 3]> {
    let mut gs = GramSchmidt::new(a);
    match gs.run() {
        GramSchmidtStatus::Complete => Some([gs.q[0], gs.q[1], gs.q[2]]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Mat3;

    const TOL: f32 = 1e-5;

    fn verify_orthonormal(q: &[Vec3]) {
        for (i, qi) in q.iter().enumerate() {
            assert_relative_eq!(qi.length(), 1.0, epsilon = TOL);
            for qj in q.iter().skip(i + 1) {
                assert!(
                    qi.dot(*qj).abs() < TOL,
                    "columns not orthogonal: {qi:?} . {qj:?}"
                );
            }
        }
    }

    #[test]
    fn test_orthonormal_output() {
        let a = [
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let q = orthonormalize(a).expect("independent input");
        verify_orthonormal(&q);
    }

    #[test]
    fn test_qr_reconstruction() {
        let a = [
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(-1.0, 1.0, 0.5),
            Vec3::new(0.3, -2.0, 1.0),
        ];
        let mut gs = GramSchmidt::new(a);
        assert_eq!(gs.run(), GramSchmidtStatus::Complete);

        // rebuild R from the recorded entries and check A = QR column-wise
        let mut r = Mat3::ZERO;
        for e in gs.r() {
            r.col_mut(e.col - 1)[e.row - 1] = e.value;
        }
        let q = Mat3::from_cols(gs.q()[0], gs.q()[1], gs.q()[2]);
        let qr = q * r;
        let a_mat = Mat3::from_cols(a[0], a[1], a[2]);
        assert!(
            a_mat.abs_diff_eq(qr, 1e-4),
            "A != QR\nA:\n{a_mat}\nQR:\n{qr}"
        );
    }

    #[test]
    fn test_phase_sequence_first_vector() {
        let a = [Vec3::X, Vec3::Y, Vec3::Z];
        let mut gs = GramSchmidt::new(a);
        assert_eq!(gs.phase(), Phase::Start);
        gs.step();
        // first vector skips projection entirely
        assert_eq!(gs.phase(), Phase::Normalize);
        gs.step();
        assert_eq!(gs.q().len(), 1);
        assert_eq!(gs.phase(), Phase::Start);
    }

    #[test]
    fn test_dependent_input_detected() {
        let a = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(2.0, 4.0, 6.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let mut gs = GramSchmidt::new(a);
        assert_eq!(gs.run(), GramSchmidtStatus::DependentInput);
        assert!(orthonormalize(a).is_none());
        // the first column was still produced
        assert_eq!(gs.q().len(), 1);
    }

    #[test]
    fn test_already_orthonormal_is_fixed_point() {
        let q = orthonormalize([Vec3::X, Vec3::Y, Vec3::Z]).expect("independent input");
        assert!(q[0].abs_diff_eq(Vec3::X, TOL));
        assert!(q[1].abs_diff_eq(Vec3::Y, TOL));
        assert!(q[2].abs_diff_eq(Vec3::Z, TOL));
    }

    #[test]
    fn test_step_after_complete_is_noop() {
        let mut gs = GramSchmidt::new([Vec3::X, Vec3::Y, Vec3::Z]);
        gs.run();
        let q_before = gs.q().to_vec();
        assert_eq!(gs.step(), GramSchmidtStatus::Complete);
        assert_eq!(gs.q(), q_before.as_slice());
    }
}
