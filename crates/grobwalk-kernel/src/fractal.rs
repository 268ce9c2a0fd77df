//! Fractal walks: initial ideals are converted by walking again.
//!
//! Every level is a [`WalkFrame`] on an explicit stack. A level that needs
//! a basis of its initial ideal pushes a child frame that starts from the
//! initial forms under the parent's order and walks toward a perturbation
//! of the requested order, one degree finer than the parent's. Once the
//! child is done its basis answers the parent. Levels that reach full
//! perturbation degree, or whose request has no path to walk, ask the
//! oracle instead.
//!
//! Perturbed vectors grow with every level. When a child target or a
//! child step no longer fits in `i64`, the pending request goes to the
//! oracle and the child is dropped.

use tracing::debug;

use crate::engine::Session;
use crate::error::WalkError;
use crate::frame::{FrameEvent, WalkFrame};
use crate::ideal::Ideal;
use crate::order::MonomialOrder;
use crate::perturb::pert_target;

/// The request a child level answers.
#[derive(Debug)]
struct Goal {
    initial: Ideal,
    order: MonomialOrder,
}

#[derive(Debug)]
struct Level {
    frame: WalkFrame,
    /// `None` at the root.
    goal: Option<Goal>,
    degree: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FractalWalk {
    max_depth: usize,
}

impl FractalWalk {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    /// Default depth bound for a ring with `nvars` variables.
    pub fn default_depth(nvars: usize) -> usize {
        nvars + 1
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn drive(
        &self,
        root: WalkFrame,
        session: &mut Session<'_>,
    ) -> Result<(Ideal, MonomialOrder), WalkError> {
        let nvars = root.basis().nvars();
        let mut stack = vec![Level {
            frame: root,
            goal: None,
            degree: 1,
        }];
        let mut answer: Option<Ideal> = None;

        loop {
            let depth = stack.len();
            session.report.deepest_level = session.report.deepest_level.max(depth - 1);
            let Some(level) = stack.last_mut() else {
                return Err(WalkError::LiftInconsistency {
                    description: "fractal stack emptied before the root finished".to_string(),
                });
            };
            let is_child = level.goal.is_some();
            let degree = level.degree;
            let event = match answer.take() {
                Some(gb) => level
                    .frame
                    .resume(gb, session.lift)
                    .map(|()| FrameEvent::Lifted),
                None => level.frame.advance(session.step, session.lift),
            };
            let event = match event {
                Ok(event) => event,
                Err(WalkError::WeightOverflow { description }) if is_child => {
                    answer = Some(abandon(&mut stack, session, &description)?);
                    continue;
                }
                Err(e) => return Err(e),
            };
            match event {
                FrameEvent::NeedsInitialBasis(request) => {
                    if !request.has_path() || degree >= nvars {
                        answer = Some(session.oracle(&request.initial, &request.order)?);
                    } else if depth >= self.max_depth {
                        return Err(WalkError::RecursionExhausted { depth });
                    } else {
                        let degree = degree + 1;
                        let t = match pert_target(&request.initial, &request.order, degree) {
                            Ok(t) => t,
                            Err(WalkError::WeightOverflow { description }) => {
                                debug!(
                                    depth,
                                    degree,
                                    %description,
                                    "sub-walk target overflows; asking the oracle"
                                );
                                answer = Some(session.oracle(&request.initial, &request.order)?);
                                continue;
                            }
                            Err(e) => return Err(e),
                        };
                        debug!(depth, degree, target = %t, "descending into initial ideal");
                        let start = request.from_order.leading_weight().clone();
                        let target = MonomialOrder::refine(&t, &request.order);
                        let child = WalkFrame::new(
                            request.initial.clone(),
                            request.from_order,
                            start,
                            target,
                            depth,
                        );
                        stack.push(Level {
                            frame: child,
                            goal: Some(Goal {
                                initial: request.initial,
                                order: request.order,
                            }),
                            degree,
                        });
                    }
                }
                FrameEvent::Stepped(record) => session.record(record),
                FrameEvent::Lifted => {}
                FrameEvent::Stalled => {
                    session.stalled(&level.frame);
                    match level.frame.escalate() {
                        Ok(()) => {}
                        Err(WalkError::WeightOverflow { description }) if is_child => {
                            answer = Some(abandon(&mut stack, session, &description)?);
                        }
                        Err(e) => return Err(e),
                    }
                }
                FrameEvent::Done => {
                    let Some(done) = stack.pop() else {
                        continue;
                    };
                    let (basis, order) = done.frame.into_parts();
                    let Some(goal) = done.goal else {
                        return Ok((basis, order));
                    };
                    let gb = if basis.leading_monomials_agree(&order, &goal.order) {
                        basis.interreduce(&goal.order)
                    } else {
                        debug!(depth, "sub-walk missed its goal; asking the oracle");
                        session.oracle(&basis, &goal.order)?
                    };
                    answer = Some(gb);
                }
            }
        }
    }
}

/// Drops the top child level and answers its parent from the oracle.
fn abandon(
    stack: &mut Vec<Level>,
    session: &mut Session<'_>,
    description: &str,
) -> Result<Ideal, WalkError> {
    let depth = stack.len();
    let Some(Level {
        goal: Some(goal), ..
    }) = stack.pop()
    else {
        return Err(WalkError::LiftInconsistency {
            description: "only a sub-walk can be abandoned".to_string(),
        });
    };
    debug!(depth, %description, "sub-walk weight overflowed; asking the oracle");
    session.oracle(&goal.initial, &goal.order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DirectTarget, Recursion, WalkEngine};
    use crate::lift::GeneralLift;
    use crate::next_weight::DeterministicStep;
    use crate::oracle::{Buchberger, StandardBasis};
    use crate::poly::Ring;
    use crate::report::Variant;
    use crate::weight::WeightVector;

    fn fractal(oracle: &Buchberger, max_depth: usize) -> WalkEngine<'_> {
        WalkEngine::new(
            Variant::Fractal,
            oracle,
            Box::new(DeterministicStep),
            Box::new(GeneralLift),
            Box::new(DirectTarget),
        )
        .with_recursion(Recursion::Fractal { max_depth })
    }

    #[test]
    fn fractal_walk_matches_the_oracle() {
        let ring = Ring::parse_list("x,y,z").unwrap();
        let ideal = Ideal::parse(&ring, &["y - x^2", "z - x^3"]).unwrap();
        let oracle = Buchberger::default();
        let outcome = fractal(&oracle, FractalWalk::default_depth(3))
            .run(&ideal, &WeightVector::ones(3), &WeightVector::lex(3))
            .unwrap();
        let expected = oracle
            .standard_basis(&ideal, &MonomialOrder::lex(3))
            .unwrap();
        assert_eq!(outcome.basis.render(&ring), expected.render(&ring));
        assert!(outcome.report.deepest_level < FractalWalk::default_depth(3));
    }

    #[test]
    fn overflowing_sub_walk_targets_fall_back_to_the_oracle() {
        // the third level's perturbed target leaves i64
        let ring = Ring::parse_list("x,y,z,w").unwrap();
        let ideal = Ideal::parse(
            &ring,
            &["x^3 - y*z*w + 1", "y^2 - x*w", "z^2 - x - w^3", "w^2 - y"],
        )
        .unwrap();
        let oracle = Buchberger::default();
        let outcome = fractal(&oracle, FractalWalk::default_depth(4))
            .run(&ideal, &WeightVector::ones(4), &WeightVector::lex(4))
            .unwrap();
        let expected = oracle
            .standard_basis(&ideal, &MonomialOrder::lex(4))
            .unwrap();
        assert_eq!(outcome.basis.render(&ring), expected.render(&ring));
    }

    #[test]
    fn fractal_walk_respects_the_depth_bound() {
        let ring = Ring::parse_list("x,y").unwrap();
        let ideal = Ideal::parse(&ring, &["x^2 + y^3 - 1", "x*y - 2"]).unwrap();
        let oracle = Buchberger::default();
        let err = fractal(&oracle, 1)
            .run(&ideal, &WeightVector::ones(2), &WeightVector::lex(2))
            .unwrap_err();
        assert!(matches!(err, WalkError::RecursionExhausted { depth: 1 }));
    }
}
