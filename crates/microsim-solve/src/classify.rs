//! Classification of linear systems by their solution sets.

use crate::augmented::Augmented;
use crate::PIVOT_EPS;

/// The three possible solution sets of a linear system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemClass {
    /// Exactly one solution (coefficient rank equals the unknown count).
    Unique,
    /// Infinitely many solutions (consistent but rank-deficient).
    Infinite,
    /// No solution (a row reduces to `0 = c` with c non-zero).
    Inconsistent,
}

/// Classify a system by reducing a copy to row-echelon form and comparing
/// the coefficient rank with the augmented rank.
pub fn classify(aug: &Augmented) -> SystemClass {
    let mut m = aug.clone();
    let rows = m.rows();
    let unknowns = m.unknowns();
    let rhs_col = m.cols() - 1;

    // forward elimination with partial pivoting
    let mut rank = 0;
    let mut col = 0;
    while rank < rows && col < unknowns {
        let pivot_row = (rank..rows).find(|&i| m.get(i, col).abs() > PIVOT_EPS);
        let Some(p) = pivot_row else {
            col += 1;
            continue;
        };
        m.swap_rows(rank, p);
        for i in rank + 1..rows {
            let factor = -m.get(i, col) / m.get(rank, col);
            m.add_scaled_row(i, rank, factor);
        }
        rank += 1;
        col += 1;
    }

    // a zero coefficient row with non-zero rhs is a contradiction
    for i in rank..rows {
        if m.get(i, rhs_col).abs() > PIVOT_EPS {
            return SystemClass::Inconsistent;
        }
    }

    if rank == unknowns {
        SystemClass::Unique
    } else {
        SystemClass::Infinite
    }
}
