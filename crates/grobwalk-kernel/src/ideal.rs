//! Generating sets and the reductions the walk needs on them.

use num_rational::BigRational;

use crate::error::ParseError;
use crate::monomial::Monomial;
use crate::order::MonomialOrder;
use crate::poly::{Polynomial, Ring};
use crate::report::compute_basis_digest;

/// An ordered generating set in a ring of `nvars` variables.
///
/// A value type: every walk frame owns its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ideal {
    nvars: usize,
    generators: Vec<Polynomial>,
}

/// Result of dividing a polynomial by an ordered list of divisors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub quotients: Vec<Polynomial>,
    pub remainder: Polynomial,
}

impl Ideal {
    pub fn new(nvars: usize, generators: Vec<Polynomial>) -> Self {
        Self { nvars, generators }
    }

    pub fn parse(ring: &Ring, generators: &[impl AsRef<str>]) -> Result<Self, ParseError> {
        let generators = generators
            .iter()
            .map(|g| ring.parse(g.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(ring.nvars(), generators))
    }

    pub fn nvars(&self) -> usize {
        self.nvars
    }

    pub fn generators(&self) -> &[Polynomial] {
        &self.generators
    }

    pub fn into_generators(self) -> Vec<Polynomial> {
        self.generators
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// No generators, or only zero ones.
    pub fn is_zero(&self) -> bool {
        self.generators.iter().all(Polynomial::is_zero)
    }

    pub fn is_monomial_ideal(&self) -> bool {
        self.generators
            .iter()
            .all(|g| g.is_zero() || g.is_monomial())
    }

    pub fn leading_monomials(&self, order: &MonomialOrder) -> Vec<Option<Monomial>> {
        self.generators
            .iter()
            .map(|g| g.leading_monomial(order).cloned())
            .collect()
    }

    /// True iff every generator has the same leading monomial under both
    /// orders. For a Gröbner basis under `a` this means it is also one
    /// under `b`: both initial ideals contain the same monomial ideal and
    /// share its standard monomials.
    pub fn leading_monomials_agree(&self, a: &MonomialOrder, b: &MonomialOrder) -> bool {
        self.generators
            .iter()
            .all(|g| g.leading_monomial(a) == g.leading_monomial(b))
    }

    /// Largest l1 distance between two terms of one generator.
    pub fn max_exponent_spread(&self) -> u64 {
        self.generators
            .iter()
            .map(|g| {
                let monomials: Vec<&Monomial> = g.monomials().collect();
                let mut best = 0;
                for (i, a) in monomials.iter().enumerate() {
                    for b in &monomials[i + 1..] {
                        best = best.max(a.spread(b));
                    }
                }
                best
            })
            .max()
            .unwrap_or(0)
    }

    pub fn max_total_degree(&self) -> u64 {
        self.generators
            .iter()
            .map(Polynomial::total_degree)
            .max()
            .unwrap_or(0)
    }

    /// Multivariate division of `p` by the generators, in order.
    pub fn divide(&self, p: &Polynomial, order: &MonomialOrder) -> Division {
        let leads: Vec<Option<(Monomial, BigRational)>> = self
            .generators
            .iter()
            .map(|g| g.leading_term(order).map(|(m, c)| (m.clone(), c.clone())))
            .collect();
        let mut quotients = vec![Polynomial::zero(); self.generators.len()];
        let mut remainder = Polynomial::zero();
        let mut rest = p.clone();
        while let Some((m, c)) = rest.leading_term(order).map(|(m, c)| (m.clone(), c.clone())) {
            let divisor = leads.iter().enumerate().find_map(|(i, lead)| {
                let (lm, lc) = lead.as_ref()?;
                lm.quotient_of(&m).map(|q| (i, q, &c / lc))
            });
            match divisor {
                Some((i, q, factor)) => {
                    rest = rest.sub(&self.generators[i].mul_term(&q, &factor));
                    quotients[i].add_term(q, factor);
                }
                None => {
                    remainder.add_term(m.clone(), c.clone());
                    rest = rest.sub(&Polynomial::term(m, c));
                }
            }
        }
        Division {
            quotients,
            remainder,
        }
    }

    /// Full reduction of `p` by the generators.
    pub fn normal_form(&self, p: &Polynomial, order: &MonomialOrder) -> Polynomial {
        self.divide(p, order).remainder
    }

    /// Drops zero generators and every generator whose leading monomial is
    /// divisible by the leading monomial of another. Of two generators with
    /// the same leading monomial the earlier survives.
    pub fn minimalize(&self, order: &MonomialOrder) -> Self {
        let nonzero: Vec<(&Polynomial, &Monomial)> = self
            .generators
            .iter()
            .filter_map(|g| g.leading_monomial(order).map(|m| (g, m)))
            .collect();
        let kept = nonzero
            .iter()
            .enumerate()
            .filter(|(i, (_, lm))| {
                !nonzero.iter().enumerate().any(|(j, (_, other))| {
                    j != *i && other.divides(lm) && (other != lm || j < *i)
                })
            })
            .map(|(_, (g, _))| (*g).clone())
            .collect();
        Self::new(self.nvars, kept)
    }

    /// The reduced basis: minimal, monic, tails fully reduced, sorted by
    /// leading monomial from largest to smallest. Expects a Gröbner basis.
    pub fn interreduce(&self, order: &MonomialOrder) -> Self {
        let minimal = self.minimalize(order).generators;
        let mut reduced = Vec::with_capacity(minimal.len());
        for (i, g) in minimal.iter().enumerate() {
            let others: Vec<Polynomial> = minimal
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, h)| h.clone())
                .collect();
            let nf = Self::new(self.nvars, others).normal_form(g, order);
            if !nf.is_zero() {
                reduced.push(nf.monic(order));
            }
        }
        let mut out = Self::new(self.nvars, reduced);
        out.sort_by_leading(order);
        out
    }

    /// Sorts generators by leading monomial, largest first.
    pub fn sort_by_leading(&mut self, order: &MonomialOrder) {
        self.generators.sort_by(|a, b| {
            match (a.leading_monomial(order), b.leading_monomial(order)) {
                (Some(x), Some(y)) => order.cmp(y, x),
                (a, b) => b.is_some().cmp(&a.is_some()),
            }
        });
    }

    /// Same generators regardless of their order in the list.
    pub fn same_generators(&self, other: &Self) -> bool {
        let mut a = self.generators.clone();
        let mut b = other.generators.clone();
        a.sort();
        b.sort();
        a == b
    }

    pub fn render(&self, ring: &Ring) -> Vec<String> {
        self.generators.iter().map(|g| ring.render(g)).collect()
    }

    /// Order-independent digest of the rendered generators.
    pub fn basis_digest(&self, ring: &Ring) -> String {
        compute_basis_digest(&self.render(ring))
    }

    /// Drops zero generators.
    pub fn without_zeros(&self) -> Self {
        Self::new(
            self.nvars,
            self.generators
                .iter()
                .filter(|g| !g.is_zero())
                .cloned()
                .collect(),
        )
    }
}

impl Division {
    pub fn is_exact(&self) -> bool {
        self.remainder.is_zero()
    }
}

/// `Σ q_i g_i`.
pub fn combine(quotients: &[Polynomial], generators: &[Polynomial]) -> Polynomial {
    quotients
        .iter()
        .zip(generators)
        .filter(|(q, _)| !q.is_zero())
        .fold(Polynomial::zero(), |acc, (q, g)| acc.add(&q.mul(g)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Ring {
        Ring::parse_list("x,y").unwrap()
    }

    #[test]
    fn division_reconstructs_dividend() {
        let r = ring();
        let ideal = Ideal::parse(&r, &["x*y - 1", "y^2 - 1"]).unwrap();
        let p = r.parse("x^2*y + x*y^2 + y^2").unwrap();
        let order = MonomialOrder::lex(2);
        let div = ideal.divide(&p, &order);
        let back = combine(&div.quotients, ideal.generators()).add(&div.remainder);
        assert_eq!(back, p);
        assert_eq!(r.render(&div.remainder), "x + y + 1");
    }

    #[test]
    fn minimalize_drops_divisible_leads() {
        let r = ring();
        let ideal = Ideal::parse(&r, &["x^2 + y", "x^3", "y^2", "x^2 - y"]).unwrap();
        let minimal = ideal.minimalize(&MonomialOrder::lex(2));
        assert_eq!(minimal.render(&r), vec!["x^2 + y", "y^2"]);
        assert_eq!(minimal.minimalize(&MonomialOrder::lex(2)), minimal);
    }

    #[test]
    fn interreduce_gives_reduced_basis() {
        let r = ring();
        let ideal = Ideal::parse(&r, &["2*x + 4*y^2", "y^2 - y", "x*y"]).unwrap();
        let reduced = ideal.interreduce(&MonomialOrder::lex(2));
        assert_eq!(reduced.render(&r), vec!["x + 2*y", "y^2 - y"]);
    }

    #[test]
    fn agreement_compares_leading_monomials() {
        let r = ring();
        let ideal = Ideal::parse(&r, &["x + y^2"]).unwrap();
        let lex = MonomialOrder::lex(2);
        let dp = MonomialOrder::degrevlex(2);
        assert!(ideal.leading_monomials_agree(&lex, &lex));
        assert!(!ideal.leading_monomials_agree(&lex, &dp));
    }

    #[test]
    fn spread_is_per_generator() {
        let r = ring();
        let ideal = Ideal::parse(&r, &["x^3 - y", "x*y"]).unwrap();
        assert_eq!(ideal.max_exponent_spread(), 4);
    }

    #[test]
    fn digest_ignores_generator_order() {
        let r = ring();
        let a = Ideal::parse(&r, &["x", "y"]).unwrap();
        let b = Ideal::parse(&r, &["y", "x"]).unwrap();
        assert_eq!(a.basis_digest(&r), b.basis_digest(&r));
        assert!(a.same_generators(&b));
    }
}
