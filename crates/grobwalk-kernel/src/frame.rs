//! One walk as a resumable state machine.
//!
//! A frame never calls the oracle itself. When it needs a Gröbner basis of
//! an initial ideal it hands out an [`InitialRequest`] and waits; the driver
//! answers from the oracle directly or by walking a child frame over a copy
//! of the initial forms. That keeps fractal recursion on an explicit stack.

use std::mem;

use tracing::{debug, warn};

use crate::error::WalkError;
use crate::ideal::Ideal;
use crate::initial::{initial_form, initial_form_is_monomial};
use crate::lift::BasisLift;
use crate::next_weight::{WeightStep, binding_generators};
use crate::order::MonomialOrder;
use crate::perturb::pert_target;
use crate::report::StepRecord;
use crate::weight::{Repeat, WeightVector, same_vector, same_vector_triple};

/// A basis of `initial` is needed under `order`.
#[derive(Debug, Clone)]
pub struct InitialRequest {
    /// The lift weight.
    pub weight: WeightVector,
    /// Initial forms at `weight`, a Gröbner basis under `from_order`.
    pub initial: Ideal,
    pub from_order: MonomialOrder,
    /// `[weight] ++ target rows`.
    pub order: MonomialOrder,
}

impl InitialRequest {
    /// False when the forms' own order already starts at the lift weight,
    /// so a sub-walk would have nowhere to go.
    pub fn has_path(&self) -> bool {
        !same_vector(self.from_order.leading_weight(), &self.weight)
    }
}

#[derive(Debug)]
pub enum FrameEvent {
    NeedsInitialBasis(InitialRequest),
    /// A lift finished without consulting anyone.
    Lifted,
    Stepped(StepRecord),
    Stalled,
    Done,
}

#[derive(Debug)]
enum Stage {
    Lift,
    AwaitInitialBasis {
        forms: Ideal,
        new_order: MonomialOrder,
    },
    Step,
    Done,
}

#[derive(Debug)]
pub struct WalkFrame {
    basis: Ideal,
    order: MonomialOrder,
    current: WeightVector,
    goal: MonomialOrder,
    target: MonomialOrder,
    stage: Stage,
    depth: usize,
    steps: usize,
    escalations: usize,
}

impl WalkFrame {
    /// `basis` must be a Gröbner basis under `order`, with `current` in the
    /// closure of its cone. The frame walks toward the first row of `target`.
    pub fn new(
        basis: Ideal,
        order: MonomialOrder,
        current: WeightVector,
        target: MonomialOrder,
        depth: usize,
    ) -> Self {
        Self {
            basis,
            order,
            current,
            goal: target.clone(),
            target,
            stage: Stage::Lift,
            depth,
            steps: 0,
            escalations: 0,
        }
    }

    pub fn basis(&self) -> &Ideal {
        &self.basis
    }

    pub fn order(&self) -> &MonomialOrder {
        &self.order
    }

    pub fn current(&self) -> &WeightVector {
        &self.current
    }

    pub fn target_weight(&self) -> &WeightVector {
        self.target.leading_weight()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn escalations(&self) -> usize {
        self.escalations
    }

    pub fn into_parts(self) -> (Ideal, MonomialOrder) {
        (self.basis, self.order)
    }

    pub fn advance(
        &mut self,
        step: &mut dyn WeightStep,
        lift: &dyn BasisLift,
    ) -> Result<FrameEvent, WalkError> {
        match mem::replace(&mut self.stage, Stage::Done) {
            Stage::Lift => {
                let new_order = MonomialOrder::refine(&self.current, &self.target);
                if initial_form_is_monomial(&self.basis, &self.current) {
                    let forms = initial_form(&self.basis, &self.current);
                    let initial_gb = forms.interreduce(&new_order);
                    self.finish_lift(initial_gb, &forms, new_order, lift)?;
                    return Ok(FrameEvent::Lifted);
                }
                let forms = initial_form(&self.basis, &self.current);
                self.stage = Stage::AwaitInitialBasis {
                    forms: forms.clone(),
                    new_order: new_order.clone(),
                };
                Ok(FrameEvent::NeedsInitialBasis(InitialRequest {
                    weight: self.current.clone(),
                    initial: forms,
                    from_order: self.order.clone(),
                    order: new_order,
                }))
            }
            Stage::AwaitInitialBasis { forms, new_order } => {
                self.stage = Stage::AwaitInitialBasis { forms, new_order };
                Err(WalkError::LiftInconsistency {
                    description: "frame advanced while waiting for an initial basis".to_string(),
                })
            }
            Stage::Step => {
                let target = self.target.leading_weight().clone();
                let next = step.next(&self.current, &target, &self.basis, &self.order)?;
                if same_vector(&next, &self.current) {
                    self.stage = Stage::Step;
                    return Ok(FrameEvent::Stalled);
                }
                let record = StepRecord {
                    weight: next.clone(),
                    depth: self.depth,
                    basis_size: self.basis.len(),
                    binding: binding_generators(&self.basis, &next),
                };
                debug!(
                    weight = %next,
                    depth = self.depth,
                    basis = self.basis.len(),
                    binding = record.binding,
                    "step"
                );
                self.current = next;
                self.steps += 1;
                self.stage = Stage::Lift;
                Ok(FrameEvent::Stepped(record))
            }
            Stage::Done => Ok(FrameEvent::Done),
        }
    }

    /// Answers the pending [`InitialRequest`] with a Gröbner basis of the
    /// initial ideal under the requested order.
    pub fn resume(&mut self, initial_gb: Ideal, lift: &dyn BasisLift) -> Result<(), WalkError> {
        match mem::replace(&mut self.stage, Stage::Done) {
            Stage::AwaitInitialBasis { forms, new_order } => {
                self.finish_lift(initial_gb, &forms, new_order, lift)
            }
            other => {
                self.stage = other;
                Err(WalkError::LiftInconsistency {
                    description: "initial basis delivered to a frame that did not ask".to_string(),
                })
            }
        }
    }

    fn finish_lift(
        &mut self,
        initial_gb: Ideal,
        forms: &Ideal,
        new_order: MonomialOrder,
        lift: &dyn BasisLift,
    ) -> Result<(), WalkError> {
        let division_order = MonomialOrder::refine(&self.current, &self.order);
        self.basis = lift.lift(&initial_gb, forms, &self.basis, &division_order, &new_order)?;
        self.order = new_order;
        self.stage = if same_vector(&self.current, self.target.leading_weight()) {
            Stage::Done
        } else {
            Stage::Step
        };
        Ok(())
    }

    /// Reacts to a stall by walking toward a more perturbed version of the
    /// frame's original target, relifting at the current weight first.
    pub fn escalate(&mut self) -> Result<(), WalkError> {
        self.escalations += 1;
        if self.escalations >= self.basis.nvars().max(1) + 1 {
            return Err(WalkError::Stalled {
                weight: self.current.clone(),
            });
        }
        let degree = self.escalations + 1;
        let u = pert_target(&self.basis, &self.goal, degree)?;
        match same_vector_triple(&u, self.target.leading_weight(), self.goal.leading_weight()) {
            Repeat::First => {
                return Err(WalkError::Stalled {
                    weight: self.current.clone(),
                });
            }
            Repeat::Second => {
                warn!(degree, "perturbation collapsed; retrying the unperturbed target")
            }
            Repeat::Neither => {
                warn!(degree, target = %u, "escalating perturbation after stall")
            }
        }
        self.target = MonomialOrder::refine(&u, &self.goal);
        self.stage = Stage::Lift;
        Ok(())
    }
}
