//! The walk engine shared by every variant.
//!
//! ```text
//! INIT   validate, start basis from the oracle, optional start perturbation
//!  │
//! ROUND  schedule proposes a target order
//!  │       STEP ─▶ LIFT ─▶ STEP ─▶ ...   (WalkFrame, direct or fractal)
//!  │       stall ─▶ escalate perturbation
//!  │
//! CHECK  leading monomials agree with the target? ─▶ DONE
//!  │     otherwise next round, or the oracle finishes (last round)
//! ```

use tracing::{debug, info, info_span, warn};

use crate::error::WalkError;
use crate::fractal::FractalWalk;
use crate::frame::{FrameEvent, WalkFrame};
use crate::ideal::Ideal;
use crate::lift::BasisLift;
use crate::next_weight::WeightStep;
use crate::oracle::StandardBasis;
use crate::order::{MonomialOrder, OrderKind};
use crate::perturb::{pert_next_weight, pert_target};
use crate::report::{StepRecord, Variant, WalkReport};
use crate::weight::{WeightVector, same_vector};

/// A converted basis and how it was reached.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    /// Reduced Gröbner basis under the target order.
    pub basis: Ideal,
    pub target_order: MonomialOrder,
    pub report: WalkReport,
}

/// Chooses the target order of each round.
pub trait TargetSchedule {
    fn name(&self) -> &'static str;

    /// Return early when the start basis already has the target's leading monomials.
    fn precheck(&self) -> bool {
        false
    }

    fn first(&mut self, basis: &Ideal, target: &MonomialOrder)
    -> Result<MonomialOrder, WalkError>;

    /// The next round after a round that ended outside the target cone, or
    /// `None` to hand the rest to the oracle.
    fn next_round(
        &mut self,
        basis: &Ideal,
        target: &MonomialOrder,
    ) -> Result<Option<MonomialOrder>, WalkError>;
}

/// `target` itself for degree 1, else `[u] ++ target` with `u` perturbed from `basis`.
pub fn perturbed_round(
    basis: &Ideal,
    target: &MonomialOrder,
    degree: usize,
) -> Result<MonomialOrder, WalkError> {
    if degree <= 1 {
        return Ok(target.clone());
    }
    let u = pert_target(basis, target, degree)?;
    Ok(MonomialOrder::refine(&u, target))
}

/// One round straight to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectTarget;

impl TargetSchedule for DirectTarget {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn first(&mut self, _: &Ideal, target: &MonomialOrder) -> Result<MonomialOrder, WalkError> {
        Ok(target.clone())
    }

    fn next_round(
        &mut self,
        _: &Ideal,
        _: &MonomialOrder,
    ) -> Result<Option<MonomialOrder>, WalkError> {
        Ok(None)
    }
}

/// One round to a target perturbed once from the start basis.
#[derive(Debug, Clone, Copy)]
pub struct FixedPerturbation {
    pub degree: usize,
}

impl TargetSchedule for FixedPerturbation {
    fn name(&self) -> &'static str {
        "fixed_perturbation"
    }

    fn first(
        &mut self,
        basis: &Ideal,
        target: &MonomialOrder,
    ) -> Result<MonomialOrder, WalkError> {
        perturbed_round(basis, target, self.degree)
    }

    fn next_round(
        &mut self,
        _: &Ideal,
        _: &MonomialOrder,
    ) -> Result<Option<MonomialOrder>, WalkError> {
        Ok(None)
    }
}

/// Rounds over a fixed list of perturbation degrees. A list ending in 1
/// always lands on the target.
#[derive(Debug, Clone)]
pub struct DescendingPerturbation {
    degrees: Vec<usize>,
    cursor: usize,
}

impl DescendingPerturbation {
    pub fn new(degrees: Vec<usize>) -> Self {
        Self { degrees, cursor: 0 }
    }

    /// `from, from - 1, ..., 1`.
    pub fn from_degree(from: usize) -> Self {
        Self::new((1..=from.max(1)).rev().collect())
    }

    fn degree_at(&self, i: usize) -> usize {
        self.degrees.get(i).copied().unwrap_or(1)
    }
}

impl TargetSchedule for DescendingPerturbation {
    fn name(&self) -> &'static str {
        "descending_perturbation"
    }

    fn first(
        &mut self,
        basis: &Ideal,
        target: &MonomialOrder,
    ) -> Result<MonomialOrder, WalkError> {
        self.cursor = 0;
        perturbed_round(basis, target, self.degree_at(0))
    }

    fn next_round(
        &mut self,
        basis: &Ideal,
        target: &MonomialOrder,
    ) -> Result<Option<MonomialOrder>, WalkError> {
        self.cursor += 1;
        if self.cursor >= self.degrees.len() {
            return Ok(None);
        }
        perturbed_round(basis, target, self.degree_at(self.cursor)).map(Some)
    }
}

/// Perturbation recomputed from whatever basis the last round reached,
/// raising the degree each time.
#[derive(Debug, Clone)]
pub struct AdaptivePerturbation {
    degree: usize,
    rounds: usize,
    max_rounds: usize,
}

impl AdaptivePerturbation {
    pub fn new(degree: usize, max_rounds: usize) -> Self {
        Self {
            degree: degree.max(1),
            rounds: 0,
            max_rounds,
        }
    }
}

impl TargetSchedule for AdaptivePerturbation {
    fn name(&self) -> &'static str {
        "adaptive_perturbation"
    }

    fn precheck(&self) -> bool {
        true
    }

    fn first(
        &mut self,
        basis: &Ideal,
        target: &MonomialOrder,
    ) -> Result<MonomialOrder, WalkError> {
        self.rounds = 0;
        perturbed_round(basis, target, self.degree)
    }

    fn next_round(
        &mut self,
        basis: &Ideal,
        target: &MonomialOrder,
    ) -> Result<Option<MonomialOrder>, WalkError> {
        self.rounds += 1;
        if self.rounds > self.max_rounds {
            return Ok(None);
        }
        self.degree = (self.degree + 1).min(target.rows().len());
        perturbed_round(basis, target, self.degree).map(Some)
    }
}

/// How initial-ideal requests are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recursion {
    /// Always by the oracle.
    Direct,
    /// By sub-walks, at most `max_depth` levels deep.
    Fractal { max_depth: usize },
}

/// Shared mutable context while frames are driven.
pub(crate) struct Session<'a> {
    pub oracle: &'a dyn StandardBasis,
    pub step: &'a mut dyn WeightStep,
    pub lift: &'a dyn BasisLift,
    pub report: &'a mut WalkReport,
}

impl Session<'_> {
    pub fn oracle(&mut self, ideal: &Ideal, order: &MonomialOrder) -> Result<Ideal, WalkError> {
        self.report.oracle_calls += 1;
        debug!(
            oracle = self.oracle.name(),
            generators = ideal.len(),
            "oracle call"
        );
        Ok(self.oracle.standard_basis(ideal, order)?)
    }

    pub fn record(&mut self, record: StepRecord) {
        self.report.steps.push(record);
    }

    pub fn stalled(&mut self, frame: &WalkFrame) {
        self.report.stalls += 1;
        warn!(weight = %frame.current(), depth = frame.depth(), "walk stalled");
    }
}

/// Drives one frame to completion, answering every request with the oracle.
pub(crate) fn drive_direct(
    mut frame: WalkFrame,
    session: &mut Session<'_>,
) -> Result<(Ideal, MonomialOrder), WalkError> {
    loop {
        match frame.advance(session.step, session.lift)? {
            FrameEvent::NeedsInitialBasis(request) => {
                let gb = session.oracle(&request.initial, &request.order)?;
                frame.resume(gb, session.lift)?;
            }
            FrameEvent::Stepped(record) => session.record(record),
            FrameEvent::Lifted => {}
            FrameEvent::Stalled => {
                session.stalled(&frame);
                frame.escalate()?;
            }
            FrameEvent::Done => return Ok(frame.into_parts()),
        }
    }
}

/// A walk variant assembled from strategy objects.
pub struct WalkEngine<'a> {
    variant: Variant,
    oracle: &'a dyn StandardBasis,
    step: Box<dyn WeightStep + 'a>,
    lift: Box<dyn BasisLift + 'a>,
    schedule: Box<dyn TargetSchedule + 'a>,
    recursion: Recursion,
    start_degree: usize,
}

impl<'a> WalkEngine<'a> {
    pub fn new(
        variant: Variant,
        oracle: &'a dyn StandardBasis,
        step: Box<dyn WeightStep + 'a>,
        lift: Box<dyn BasisLift + 'a>,
        schedule: Box<dyn TargetSchedule + 'a>,
    ) -> Self {
        Self {
            variant,
            oracle,
            step,
            lift,
            schedule,
            recursion: Recursion::Direct,
            start_degree: 1,
        }
    }

    pub fn with_recursion(mut self, recursion: Recursion) -> Self {
        self.recursion = recursion;
        self
    }

    pub fn with_start_degree(mut self, degree: usize) -> Self {
        self.start_degree = degree;
        self
    }

    pub fn run(
        mut self,
        input: &Ideal,
        start: &WeightVector,
        target: &WeightVector,
    ) -> Result<WalkOutcome, WalkError> {
        validate(input, start, target)?;
        let span = info_span!("walk", variant = %self.variant);
        let _enter = span.enter();

        let start_order = OrderKind::order_for(start);
        let target_order = OrderKind::order_for(target);
        info!(
            start = %OrderKind::classify(start),
            target = %OrderKind::classify(target),
            step = self.step.name(),
            lift = self.lift.name(),
            schedule = self.schedule.name(),
            "walk started"
        );

        let mut report = WalkReport::new(self.variant);
        let mut session = Session {
            oracle: self.oracle,
            step: self.step.as_mut(),
            lift: self.lift.as_ref(),
            report: &mut report,
        };

        let mut basis = session.oracle(&input.without_zeros(), &start_order)?;
        let (mut current, mut order) = if self.start_degree > 1 {
            let u = pert_next_weight(&basis, &start_order, self.start_degree);
            debug!(start = %u, "perturbed start weight");
            let order = MonomialOrder::refine(&u, &start_order);
            (u, order)
        } else {
            (start_order.leading_weight().clone(), start_order.clone())
        };

        if self.schedule.precheck() && basis.leading_monomials_agree(&order, &target_order) {
            info!("start basis is already a Gröbner basis for the target");
            let basis = basis.interreduce(&target_order);
            return Ok(WalkOutcome {
                basis,
                target_order,
                report,
            });
        }

        let mut round_target = self.schedule.first(&basis, &target_order)?;
        let basis = loop {
            session.report.rounds += 1;
            debug!(
                round = session.report.rounds,
                target = %round_target.leading_weight(),
                "round"
            );
            let frame = WalkFrame::new(basis, order, current, round_target, 0);
            let (reached, reached_order) = match self.recursion {
                Recursion::Direct => drive_direct(frame, &mut session)?,
                Recursion::Fractal { max_depth } => {
                    FractalWalk::new(max_depth).drive(frame, &mut session)?
                }
            };
            if reached.leading_monomials_agree(&reached_order, &target_order) {
                break reached.interreduce(&target_order);
            }
            match self.schedule.next_round(&reached, &target_order)? {
                Some(next) => {
                    current = reached_order.leading_weight().clone();
                    order = reached_order;
                    basis = reached;
                    round_target = next;
                }
                None => {
                    warn!("walk ended outside the target cone; finishing with the oracle");
                    session.report.oracle_fallback = true;
                    break session.oracle(&reached, &target_order)?;
                }
            }
        };

        info!(
            steps = report.steps.len(),
            rounds = report.rounds,
            generators = basis.len(),
            "walk finished"
        );
        Ok(WalkOutcome {
            basis,
            target_order,
            report,
        })
    }
}

/// Rejects requests the walk cannot start from.
pub fn validate(
    input: &Ideal,
    start: &WeightVector,
    target: &WeightVector,
) -> Result<(), WalkError> {
    let n = input.nvars();
    if n == 0 {
        return Err(WalkError::invalid("the ring has no variables"));
    }
    if input.is_zero() {
        return Err(WalkError::invalid("the ideal has no nonzero generators"));
    }
    if input
        .generators()
        .iter()
        .flat_map(|g| g.monomials())
        .any(|m| m.nvars() != n)
    {
        return Err(WalkError::invalid(format!(
            "a generator does not live in {n} variables"
        )));
    }
    for (name, w) in [("start", start), ("target", target)] {
        if w.len() != n {
            return Err(WalkError::invalid(format!(
                "{name} weight {w} has {} entries for {n} variables",
                w.len()
            )));
        }
        if !w.is_non_negative() {
            return Err(WalkError::invalid(format!(
                "{name} weight {w} has a negative entry"
            )));
        }
        if w.is_zero() {
            return Err(WalkError::invalid(format!("{name} weight is zero")));
        }
    }
    if same_vector(start, target) {
        return Err(WalkError::invalid(format!(
            "start and target weights are both {start}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lift::GeneralLift;
    use crate::next_weight::DeterministicStep;
    use crate::oracle::Buchberger;
    use crate::poly::Ring;

    fn intro() -> (Ring, Ideal) {
        let ring = Ring::parse_list("x,y").unwrap();
        let ideal = Ideal::parse(&ring, &["x^2 + y^3 - 1", "x*y - 2"]).unwrap();
        (ring, ideal)
    }

    #[test]
    fn validation_rejects_bad_weights() {
        let (_, ideal) = intro();
        let ones = WeightVector::ones(2);
        let cases = [
            (WeightVector::new(vec![1, 1, 1]), WeightVector::lex(2)),
            (WeightVector::new(vec![1, -1]), WeightVector::lex(2)),
            (WeightVector::new(vec![0, 0]), WeightVector::lex(2)),
            (ones.clone(), ones.clone()),
        ];
        for (start, target) in cases {
            let err = validate(&ideal, &start, &target).unwrap_err();
            assert!(matches!(err, WalkError::InvalidInput { .. }), "{start} -> {target}");
        }
        assert!(validate(&Ideal::new(2, vec![]), &ones, &WeightVector::lex(2)).is_err());
    }

    #[test]
    fn descending_schedule_ends_on_the_target() {
        let (_, ideal) = intro();
        let lex = MonomialOrder::lex(2);
        let mut schedule = DescendingPerturbation::from_degree(2);
        let first = schedule.first(&ideal, &lex).unwrap();
        assert_eq!(first.leading_weight(), &WeightVector::new(vec![6, 1]));
        let second = schedule.next_round(&ideal, &lex).unwrap().unwrap();
        assert_eq!(second, lex);
        assert!(schedule.next_round(&ideal, &lex).unwrap().is_none());
    }

    #[test]
    fn adaptive_schedule_is_bounded() {
        let (_, ideal) = intro();
        let lex = MonomialOrder::lex(2);
        let mut schedule = AdaptivePerturbation::new(1, 2);
        assert_eq!(schedule.first(&ideal, &lex).unwrap(), lex);
        assert!(schedule.next_round(&ideal, &lex).unwrap().is_some());
        assert!(schedule.next_round(&ideal, &lex).unwrap().is_some());
        assert!(schedule.next_round(&ideal, &lex).unwrap().is_none());
    }

    /// Stays put on the first call, then steps normally.
    struct StallOnce {
        stalled: bool,
    }

    impl WeightStep for StallOnce {
        fn name(&self) -> &'static str {
            "stall_once"
        }

        fn next(
            &mut self,
            current: &WeightVector,
            target: &WeightVector,
            basis: &Ideal,
            order: &MonomialOrder,
        ) -> Result<WeightVector, WalkError> {
            if !self.stalled {
                self.stalled = true;
                return Ok(current.clone());
            }
            DeterministicStep.next(current, target, basis, order)
        }
    }

    struct Frozen;

    impl WeightStep for Frozen {
        fn name(&self) -> &'static str {
            "frozen"
        }

        fn next(
            &mut self,
            current: &WeightVector,
            _: &WeightVector,
            _: &Ideal,
            _: &MonomialOrder,
        ) -> Result<WeightVector, WalkError> {
            Ok(current.clone())
        }
    }

    fn twisted_cubic() -> (Ring, Ideal) {
        let ring = Ring::parse_list("x,y,z").unwrap();
        let ideal = Ideal::parse(&ring, &["y - x^2", "z - x^3"]).unwrap();
        (ring, ideal)
    }

    #[test]
    fn a_single_stall_is_escalated_and_recovered() {
        let (ring, ideal) = twisted_cubic();
        let oracle = Buchberger::default();
        let outcome = WalkEngine::new(
            Variant::Plain,
            &oracle,
            Box::new(StallOnce { stalled: false }),
            Box::new(GeneralLift),
            Box::new(DirectTarget),
        )
        .run(&ideal, &WeightVector::ones(3), &WeightVector::lex(3))
        .unwrap();
        assert_eq!(outcome.report.stalls, 1);
        assert_eq!(
            outcome.basis.render(&ring),
            vec!["x^2 - y", "x*y - z", "x*z - y^2", "y^3 - z^2"]
        );
    }

    #[test]
    fn a_step_that_never_moves_ends_stalled() {
        let (_, ideal) = twisted_cubic();
        let oracle = Buchberger::default();
        let err = WalkEngine::new(
            Variant::Plain,
            &oracle,
            Box::new(Frozen),
            Box::new(GeneralLift),
            Box::new(DirectTarget),
        )
        .run(&ideal, &WeightVector::ones(3), &WeightVector::lex(3))
        .unwrap_err();
        assert!(matches!(err, WalkError::Stalled { .. }));
    }

    #[test]
    fn engine_counts_oracle_calls() {
        let (ring, ideal) = intro();
        let oracle = Buchberger::default();
        let outcome = WalkEngine::new(
            Variant::Plain,
            &oracle,
            Box::new(DeterministicStep),
            Box::new(GeneralLift),
            Box::new(DirectTarget),
        )
        .run(&ideal, &WeightVector::ones(2), &WeightVector::lex(2))
        .unwrap();
        assert_eq!(
            outcome.basis.render(&ring),
            vec!["x + 1/2*y^4 - 1/2*y", "y^5 - y^2 + 4"]
        );
        assert_eq!(outcome.report.steps.len(), 3);
        assert!(outcome.report.oracle_calls >= 2);
        assert_eq!(outcome.report.rounds, 1);
        assert!(!outcome.report.oracle_fallback);
    }
}
