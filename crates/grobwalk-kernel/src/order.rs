//! Matrix monomial orders.
//!
//! An order is a list of integer weight rows compared in sequence, with the
//! lexicographic order x1 > x2 > ... > xn as the final tie-break. Every
//! constructor here yields an admissible order on the positive orthant as
//! long as its first nonzero entry in each column is positive.

use std::cmp::Ordering;

use crate::error::WalkError;
use crate::monomial::Monomial;
use crate::weight::WeightVector;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonomialOrder {
    rows: Vec<WeightVector>,
}

impl MonomialOrder {
    /// Identity rows.
    pub fn lex(n: usize) -> Self {
        Self {
            rows: (0..n).map(|i| WeightVector::unit(n, i)).collect(),
        }
    }

    /// `[1..1], -e_n, -e_{n-1}, ..., -e_2`.
    pub fn degrevlex(n: usize) -> Self {
        let mut rows = vec![WeightVector::ones(n)];
        rows.extend(Self::reverse_tail(n));
        Self { rows }
    }

    /// `(a(w), lp)` as a square matrix: `w, e_1, ..., e_{n-1}`.
    pub fn weighted(w: &WeightVector) -> Self {
        let n = w.len();
        let mut rows = vec![w.clone()];
        rows.extend((0..n.saturating_sub(1)).map(|i| WeightVector::unit(n, i)));
        Self { rows }
    }

    /// `[w] ++ base.rows`.
    pub fn refine(w: &WeightVector, base: &Self) -> Self {
        let mut rows = Vec::with_capacity(base.rows.len() + 1);
        rows.push(w.clone());
        rows.extend(base.rows.iter().cloned());
        Self { rows }
    }

    pub fn from_rows(rows: Vec<WeightVector>) -> Result<Self, WalkError> {
        let Some(first) = rows.first() else {
            return Err(WalkError::invalid("order matrix has no rows"));
        };
        let n = first.len();
        if n == 0 {
            return Err(WalkError::invalid("order matrix has zero columns"));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(WalkError::invalid(format!(
                "order row {bad} has length {} but the ring has {n} variables",
                bad.len()
            )));
        }
        let order = Self { rows };
        if !order.is_global() {
            return Err(WalkError::invalid(
                "order matrix is not global (a column starts negative)",
            ));
        }
        Ok(order)
    }

    fn reverse_tail(n: usize) -> impl Iterator<Item = WeightVector> {
        (1..n).rev().map(move |i| {
            let mut entries = vec![0; n];
            entries[i] = -1;
            WeightVector::new(entries)
        })
    }

    pub fn rows(&self) -> &[WeightVector] {
        &self.rows
    }

    pub fn nvars(&self) -> usize {
        self.rows.first().map_or(0, WeightVector::len)
    }

    /// The first row: the weight this order refines.
    pub fn leading_weight(&self) -> &WeightVector {
        &self.rows[0]
    }

    /// First nonzero entry of every column is positive.
    pub fn is_global(&self) -> bool {
        (0..self.nvars()).all(|col| {
            self.rows
                .iter()
                .map(|r| r.0[col])
                .find(|&x| x != 0)
                .is_none_or(|x| x > 0)
        })
    }

    pub fn cmp(&self, a: &Monomial, b: &Monomial) -> Ordering {
        for row in &self.rows {
            match row.dot(a).cmp(&row.dot(b)) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        a.cmp(b)
    }
}

/// The shape of order a walk endpoint weight stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Lex,
    DegRevLex,
    Weighted,
}

impl OrderKind {
    pub fn classify(w: &WeightVector) -> Self {
        if !w.is_empty() && w.0.iter().all(|&x| x == 1) {
            Self::DegRevLex
        } else if w == &WeightVector::lex(w.len()) {
            Self::Lex
        } else {
            Self::Weighted
        }
    }

    /// The matrix order a walk uses for an endpoint weight.
    pub fn order_for(w: &WeightVector) -> MonomialOrder {
        match Self::classify(w) {
            Self::Lex => MonomialOrder::lex(w.len()),
            Self::DegRevLex => MonomialOrder::degrevlex(w.len()),
            Self::Weighted => MonomialOrder::weighted(w),
        }
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex => write!(f, "lp"),
            Self::DegRevLex => write!(f, "dp"),
            Self::Weighted => write!(f, "wp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(e: &[u32]) -> Monomial {
        Monomial(e.to_vec())
    }

    #[test]
    fn lex_compares_first_variable_first() {
        let lex = MonomialOrder::lex(2);
        assert_eq!(lex.cmp(&m(&[1, 0]), &m(&[0, 9])), Ordering::Greater);
    }

    #[test]
    fn degrevlex_breaks_ties_on_last_variable() {
        let dp = MonomialOrder::degrevlex(3);
        // x*z < y^2 in degrevlex
        assert_eq!(dp.cmp(&m(&[1, 0, 1]), &m(&[0, 2, 0])), Ordering::Less);
        assert_eq!(dp.cmp(&m(&[0, 0, 3]), &m(&[1, 0, 0])), Ordering::Greater);
    }

    #[test]
    fn weighted_uses_weight_then_lex() {
        let order = MonomialOrder::weighted(&WeightVector::new(vec![1, 2]));
        assert_eq!(order.cmp(&m(&[0, 1]), &m(&[1, 0])), Ordering::Greater);
        assert_eq!(order.cmp(&m(&[2, 0]), &m(&[0, 1])), Ordering::Greater);
    }

    #[test]
    fn classify_endpoints() {
        assert_eq!(OrderKind::classify(&WeightVector::ones(3)), OrderKind::DegRevLex);
        assert_eq!(OrderKind::classify(&WeightVector::lex(3)), OrderKind::Lex);
        assert_eq!(
            OrderKind::classify(&WeightVector::new(vec![3, 1, 0])),
            OrderKind::Weighted
        );
    }

    #[test]
    fn from_rows_rejects_ragged_and_non_global() {
        let ragged = vec![WeightVector::new(vec![1, 0]), WeightVector::new(vec![1])];
        assert!(MonomialOrder::from_rows(ragged).is_err());
        let negative = vec![WeightVector::new(vec![-1, 1])];
        assert!(MonomialOrder::from_rows(negative).is_err());
        assert!(MonomialOrder::degrevlex(4).is_global());
    }
}
