//! Polynomials over the rationals, with text parsing and rendering.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::ParseError;
use crate::monomial::Monomial;
use crate::order::MonomialOrder;

/// A polynomial in canonical form: no zero coefficients, one entry per monomial.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(n: usize, c: BigRational) -> Self {
        Self::term(Monomial::one(n), c)
    }

    pub fn term(m: Monomial, c: BigRational) -> Self {
        let mut terms = BTreeMap::new();
        if !c.is_zero() {
            terms.insert(m, c);
        }
        Self { terms }
    }

    pub fn from_terms(terms: impl IntoIterator<Item = (Monomial, BigRational)>) -> Self {
        let mut p = Self::zero();
        for (m, c) in terms {
            p.add_term(m, c);
        }
        p
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_monomial(&self) -> bool {
        self.terms.len() == 1
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    pub fn monomials(&self) -> impl Iterator<Item = &Monomial> {
        self.terms.keys()
    }

    pub fn coefficient(&self, m: &Monomial) -> Option<&BigRational> {
        self.terms.get(m)
    }

    pub fn total_degree(&self) -> u64 {
        self.terms.keys().map(Monomial::total_degree).max().unwrap_or(0)
    }

    pub fn add_term(&mut self, m: Monomial, c: BigRational) {
        if c.is_zero() {
            return;
        }
        let sum = match self.terms.remove(&m) {
            Some(existing) => existing + c,
            None => c,
        };
        if !sum.is_zero() {
            self.terms.insert(m, sum);
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for (m, c) in &other.terms {
            out.add_term(m.clone(), c.clone());
        }
        out
    }

    pub fn sub(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for (m, c) in &other.terms {
            out.add_term(m.clone(), -c.clone());
        }
        out
    }

    pub fn scale(&self, c: &BigRational) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, a)| (m.clone(), a * c))
                .collect(),
        }
    }

    /// `self * c * m`.
    pub fn mul_term(&self, m: &Monomial, c: &BigRational) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(k, a)| (k.mul(m), a * c))
                .collect(),
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        let mut out = Self::zero();
        for (m, c) in &other.terms {
            for (k, a) in &self.terms {
                out.add_term(k.mul(m), a * c);
            }
        }
        out
    }

    pub fn leading_term(&self, order: &MonomialOrder) -> Option<(&Monomial, &BigRational)> {
        self.terms.iter().max_by(|a, b| order.cmp(a.0, b.0))
    }

    pub fn leading_monomial(&self, order: &MonomialOrder) -> Option<&Monomial> {
        self.leading_term(order).map(|(m, _)| m)
    }

    /// Scaled so the leading coefficient is 1. Zero stays zero.
    pub fn monic(&self, order: &MonomialOrder) -> Self {
        match self.leading_term(order) {
            Some((_, c)) if !c.is_one() => self.scale(&c.recip()),
            _ => self.clone(),
        }
    }

    /// Keeps only the terms accepted by `keep`.
    pub fn filter_terms(&self, mut keep: impl FnMut(&Monomial) -> bool) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|(m, _)| keep(m))
                .map(|(m, c)| (m.clone(), c.clone()))
                .collect(),
        }
    }
}

/// The variables of a polynomial ring, used to parse and render polynomials.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Ring {
    variables: Vec<String>,
}

impl Ring {
    pub fn new(variables: Vec<String>) -> Result<Self, ParseError> {
        if variables.is_empty() {
            return Err(ParseError::Ring("no variables".to_string()));
        }
        for (i, v) in variables.iter().enumerate() {
            let valid = v.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && v.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(ParseError::Ring(format!("invalid variable name `{v}`")));
            }
            if variables[..i].contains(v) {
                return Err(ParseError::Ring(format!("duplicate variable `{v}`")));
            }
        }
        Ok(Self { variables })
    }

    /// Parses a comma-separated variable list such as `x,y,z`.
    pub fn parse_list(list: &str) -> Result<Self, ParseError> {
        Self::new(
            list.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn parse(&self, text: &str) -> Result<Polynomial, ParseError> {
        Parser::new(self, text).polynomial()
    }

    /// Terms in decreasing lexicographic order.
    pub fn render(&self, p: &Polynomial) -> String {
        if p.is_zero() {
            return "0".to_string();
        }
        let mut out = String::new();
        for (i, (m, c)) in p.terms.iter().rev().enumerate() {
            let negative = c.is_negative();
            let magnitude = c.abs();
            match (i, negative) {
                (0, true) => out.push('-'),
                (0, false) => {}
                (_, true) => out.push_str(" - "),
                (_, false) => out.push_str(" + "),
            }
            let monomial = self.render_monomial(m);
            if monomial.is_empty() {
                out.push_str(&render_rational(&magnitude));
            } else if magnitude.is_one() {
                out.push_str(&monomial);
            } else {
                out.push_str(&render_rational(&magnitude));
                out.push('*');
                out.push_str(&monomial);
            }
        }
        out
    }

    fn render_monomial(&self, m: &Monomial) -> String {
        let factors: Vec<String> = m
            .exponents()
            .iter()
            .zip(&self.variables)
            .filter(|(e, _)| **e > 0)
            .map(|(e, v)| if *e == 1 { v.clone() } else { format!("{v}^{e}") })
            .collect();
        factors.join("*")
    }
}

fn render_rational(c: &BigRational) -> String {
    if c.denom().is_one() {
        c.numer().to_string()
    } else {
        format!("{}/{}", c.numer(), c.denom())
    }
}

struct Parser<'a> {
    ring: &'a Ring,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(ring: &'a Ring, text: &str) -> Self {
        Self {
            ring,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.pos).copied()
    }

    fn unexpected(&self) -> ParseError {
        ParseError::Unexpected {
            found: self.chars.get(self.pos).copied().unwrap_or('\0'),
            offset: self.pos,
        }
    }

    fn polynomial(mut self) -> Result<Polynomial, ParseError> {
        let n = self.ring.nvars();
        let mut out = Polynomial::zero();
        let mut first = true;
        loop {
            let sign = match self.peek() {
                None if first => return Err(ParseError::Empty),
                None => break,
                Some('+') => {
                    self.pos += 1;
                    BigRational::one()
                }
                Some('-') => {
                    self.pos += 1;
                    -BigRational::one()
                }
                Some(_) if first => BigRational::one(),
                Some(_) => return Err(self.unexpected()),
            };
            first = false;
            let (m, c) = self.term(n)?;
            out.add_term(m, sign * c);
        }
        Ok(out)
    }

    /// factor (`*` factor)*, where a factor is a number or a variable power.
    fn term(&mut self, n: usize) -> Result<(Monomial, BigRational), ParseError> {
        let mut coefficient = BigRational::one();
        let mut exps = vec![0u32; n];
        let mut expect_factor = true;
        while expect_factor {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => coefficient *= self.number()?,
                Some(c) if c.is_ascii_alphabetic() => {
                    let index = self.variable()?;
                    let power = if self.peek() == Some('^') {
                        self.pos += 1;
                        self.exponent()?
                    } else {
                        1
                    };
                    exps[index] = exps[index].saturating_add(power);
                }
                _ => return Err(self.unexpected()),
            }
            expect_factor = self.peek() == Some('*');
            if expect_factor {
                self.pos += 1;
            }
        }
        Ok((Monomial(exps), coefficient))
    }

    fn digits(&mut self) -> String {
        self.skip_ws();
        let start = self.pos;
        while self.chars.get(self.pos).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn number(&mut self) -> Result<BigRational, ParseError> {
        let numer = self.digits();
        let numer: BigInt = numer
            .parse()
            .map_err(|_| ParseError::Number { text: numer.clone() })?;
        if self.peek() == Some('/') {
            self.pos += 1;
            let denom_text = self.digits();
            let denom: BigInt = denom_text.parse().map_err(|_| ParseError::Number {
                text: format!("{numer}/{denom_text}"),
            })?;
            if denom.is_zero() {
                return Err(ParseError::Number {
                    text: format!("{numer}/0"),
                });
            }
            return Ok(BigRational::new(numer, denom));
        }
        Ok(BigRational::from_integer(numer))
    }

    fn exponent(&mut self) -> Result<u32, ParseError> {
        let text = self.digits();
        text.parse().map_err(|_| ParseError::Number { text })
    }

    fn variable(&mut self) -> Result<usize, ParseError> {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_')
        {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        self.ring
            .variables
            .iter()
            .position(|v| *v == name)
            .ok_or(ParseError::UnknownVariable { name })
    }
}
