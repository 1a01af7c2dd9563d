use std::fmt::Display;
use std::fmt::Formatter;

use enumset::EnumSet;
use log::trace;

use super::DomainEvent;
use super::EventSink;
use crate::basic_types::HashSet;
use crate::basic_types::Inconsistency;
use crate::basic_types::IntervalSet;
use crate::basic_types::KeyedVec;
use crate::basic_types::Trail;
use crate::engine::cp::propagation::PropagatorId;
use crate::engine::variables::BooleanImage;
use crate::engine::variables::DomainQuery;
use crate::engine::variables::VariableId;
use crate::engine::variables::View;
use crate::kestrel_assert_moderate;
use crate::kestrel_assert_simple;

/// The domain store. Root variables own an [`IntegerDomain`]; views are evaluated on demand from
/// the domain of their base.
///
/// Every change to a root domain is recorded as a [`TrailEntry`]. Together with the per-variable
/// bound and hole histories, this allows reconstructing the domain of any variable just before any
/// trail position (see [`Assignments::domain_at`]), which is what explanations are computed from.
#[derive(Clone, Default, Debug)]
pub(crate) struct Assignments {
    trail: Trail<TrailEntry>,
    variables: KeyedVec<VariableId, VariableEntry>,
    /// For every variable the views which have it as their base.
    dependent_views: KeyedVec<VariableId, Vec<VariableId>>,
    events: EventSink,
    /// The update that failed in the current propagation, which is logically located at trail
    /// position `trail.len()`.
    failure: Option<TrailEntry>,
}

#[derive(Clone, Debug)]
enum VariableEntry {
    Root(IntegerDomain),
    View(View),
}

/// The operation performed by a trail entry, with the value that was requested.
///
/// The requested value can differ from the resulting bound, for example when the requested lower
/// bound is not in the domain and the bound skips to the next value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainOperation {
    LowerBound(i32),
    UpperBound(i32),
    Removal(i32),
    Assign(i32),
}

impl DomainOperation {
    pub fn value(&self) -> i32 {
        match *self {
            DomainOperation::LowerBound(value)
            | DomainOperation::UpperBound(value)
            | DomainOperation::Removal(value)
            | DomainOperation::Assign(value) => value,
        }
    }

    pub fn event(&self) -> DomainEvent {
        match self {
            DomainOperation::LowerBound(_) => DomainEvent::LowerBound,
            DomainOperation::UpperBound(_) => DomainEvent::UpperBound,
            DomainOperation::Removal(_) => DomainEvent::Removal,
            DomainOperation::Assign(_) => DomainEvent::Assign,
        }
    }
}

impl Display for DomainOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainOperation::LowerBound(value) => write!(f, ">= {value}"),
            DomainOperation::UpperBound(value) => write!(f, "<= {value}"),
            DomainOperation::Removal(value) => write!(f, "!= {value}"),
            DomainOperation::Assign(value) => write!(f, "== {value}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TrailEntry {
    /// The root variable whose domain changed.
    pub(crate) variable: VariableId,
    pub(crate) operation: DomainOperation,
    /// The variable the update was requested on, which is a view when the write was translated.
    pub(crate) requested_variable: VariableId,
    pub(crate) requested_operation: DomainOperation,
    pub(crate) old_lower_bound: i32,
    pub(crate) old_upper_bound: i32,
    /// `None` for decisions and root facts.
    pub(crate) cause: Option<PropagatorId>,
}

/// The value requested on the outermost variable of a write, kept while the write is translated
/// through views.
#[derive(Clone, Copy, Debug)]
struct Request {
    variable: VariableId,
    operation: DomainOperation,
    cause: Option<PropagatorId>,
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> VariableId {
        self.grow_with_domain(IntervalSet::from_range(lower_bound, upper_bound))
    }

    pub(crate) fn grow_with_domain(&mut self, initial: IntervalSet) -> VariableId {
        kestrel_assert_simple!(
            !initial.is_empty(),
            "cannot create a variable with an empty domain"
        );

        let id = VariableId::new(self.variables.len() as u32);
        let _ = self
            .variables
            .push(VariableEntry::Root(IntegerDomain::new(initial)));
        let _ = self.dependent_views.push(vec![]);
        self.events.grow();
        id
    }

    pub(crate) fn new_view(&mut self, view: View) -> VariableId {
        let id = VariableId::new(self.variables.len() as u32);
        kestrel_assert_simple!(
            view.base() < id,
            "a view must be defined on an existing variable"
        );
        if let View::Not { base } = view {
            kestrel_assert_simple!(
                self.initial_domain(base).is_subset_of(&IntervalSet::from_range(0, 1)),
                "the base of a negation must be boolean"
            );
        }

        let _ = self.variables.push(VariableEntry::View(view));
        let _ = self.dependent_views.push(vec![]);
        self.dependent_views[view.base()].push(id);
        self.events.grow();
        id
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.variables.keys()
    }

    pub(crate) fn view(&self, variable: VariableId) -> Option<View> {
        match self.variables[variable] {
            VariableEntry::Root(_) => None,
            VariableEntry::View(view) => Some(view),
        }
    }

    /// The root variable at the end of the chain of views starting at `variable`.
    pub(crate) fn root_of(&self, mut variable: VariableId) -> VariableId {
        while let VariableEntry::View(view) = &self.variables[variable] {
            variable = view.base();
        }
        variable
    }

    fn root_domain(&self, variable: VariableId) -> &IntegerDomain {
        match &self.variables[self.root_of(variable)] {
            VariableEntry::Root(domain) => domain,
            VariableEntry::View(_) => unreachable!("root_of always returns a root variable"),
        }
    }

    fn root_domain_mut(&mut self, root: VariableId) -> &mut IntegerDomain {
        match &mut self.variables[root] {
            VariableEntry::Root(domain) => domain,
            VariableEntry::View(_) => unreachable!("expected {root} to be a root variable"),
        }
    }

    fn image(&self, view: View) -> BooleanImage {
        match &self.variables[view.base()] {
            VariableEntry::Root(domain) => view.image(domain),
            VariableEntry::View(base_view) => view.image(&self.image(*base_view)),
        }
    }

    pub(crate) fn lower_bound(&self, variable: VariableId) -> i32 {
        match &self.variables[variable] {
            VariableEntry::Root(domain) => domain.lower_bound(),
            VariableEntry::View(view) => self.image(*view).lower_bound(),
        }
    }

    pub(crate) fn upper_bound(&self, variable: VariableId) -> i32 {
        match &self.variables[variable] {
            VariableEntry::Root(domain) => domain.upper_bound(),
            VariableEntry::View(view) => self.image(*view).upper_bound(),
        }
    }

    pub(crate) fn contains(&self, variable: VariableId, value: i32) -> bool {
        match &self.variables[variable] {
            VariableEntry::Root(domain) => domain.contains(value),
            VariableEntry::View(view) => self.image(*view).contains(value),
        }
    }

    pub(crate) fn is_fixed(&self, variable: VariableId) -> bool {
        self.lower_bound(variable) == self.upper_bound(variable)
    }

    /// The current domain of the variable as an explicit set.
    pub(crate) fn domain(&self, variable: VariableId) -> IntervalSet {
        match &self.variables[variable] {
            VariableEntry::Root(domain) => domain.current(),
            VariableEntry::View(view) => self.image(*view).to_interval_set(),
        }
    }

    /// The domain of the variable when it was created. For views this is the image of the initial
    /// domain of their base.
    pub(crate) fn initial_domain(&self, variable: VariableId) -> IntervalSet {
        match &self.variables[variable] {
            VariableEntry::Root(domain) => domain.initial.clone(),
            VariableEntry::View(view) => view
                .image(&self.initial_domain(view.base()))
                .to_interval_set(),
        }
    }

    /// The domain of the variable just before the trail entry at `position` was applied. A
    /// position equal to the number of trail entries gives the current domain.
    pub(crate) fn domain_at(&self, variable: VariableId, position: usize) -> IntervalSet {
        kestrel_assert_moderate!(position <= self.trail.len());
        match &self.variables[variable] {
            VariableEntry::Root(domain) => domain.at(position),
            VariableEntry::View(view) => view
                .image(&self.domain_at(view.base(), position))
                .to_interval_set(),
        }
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn trail_entry(&self, position: usize) -> &TrailEntry {
        &self.trail[position]
    }

    /// The positions of the trail entries which changed the root domain underlying `variable`.
    pub(crate) fn trail_positions(&self, variable: VariableId) -> &[usize] {
        &self.root_domain(variable).trail_positions
    }

    pub(crate) fn failure(&self) -> Option<&TrailEntry> {
        self.failure.as_ref()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        kestrel_assert_simple!(
            self.failure.is_none(),
            "cannot create a checkpoint in a failed state"
        );
        self.trail.new_checkpoint()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn checkpoint_start(&self, checkpoint: usize) -> usize {
        self.trail.checkpoint_start(checkpoint)
    }

    /// Undo every change made after `new_checkpoint` and discard a pending failure.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        let mut position = self.trail.len();
        for entry in self.trail.synchronise(new_checkpoint) {
            position -= 1;
            let domain = match &mut self.variables[entry.variable] {
                VariableEntry::Root(domain) => domain,
                VariableEntry::View(_) => unreachable!("trail entries refer to root variables"),
            };
            domain.undo(position);
            kestrel_assert_moderate!(
                domain.lower_bound() == entry.old_lower_bound
                    && domain.upper_bound() == entry.old_upper_bound
            );
        }
        self.failure = None;
        self.events.clear();
    }

    pub(crate) fn drain_domain_events(
        &mut self,
    ) -> impl Iterator<Item = (EnumSet<DomainEvent>, VariableId)> + '_ {
        self.events.drain()
    }

    pub(crate) fn clear_domain_events(&mut self) {
        self.events.clear()
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        variable: VariableId,
        value: i32,
        cause: Option<PropagatorId>,
    ) -> Result<bool, Inconsistency> {
        self.apply(variable, DomainOperation::LowerBound(value), cause)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        variable: VariableId,
        value: i32,
        cause: Option<PropagatorId>,
    ) -> Result<bool, Inconsistency> {
        self.apply(variable, DomainOperation::UpperBound(value), cause)
    }

    pub(crate) fn remove_value(
        &mut self,
        variable: VariableId,
        value: i32,
        cause: Option<PropagatorId>,
    ) -> Result<bool, Inconsistency> {
        self.apply(variable, DomainOperation::Removal(value), cause)
    }

    pub(crate) fn instantiate(
        &mut self,
        variable: VariableId,
        value: i32,
        cause: Option<PropagatorId>,
    ) -> Result<bool, Inconsistency> {
        self.apply(variable, DomainOperation::Assign(value), cause)
    }

    /// Tightens both bounds. Fails with [`Inconsistency::BoundInversion`] if
    /// `lower_bound > upper_bound`.
    pub(crate) fn update_bounds(
        &mut self,
        variable: VariableId,
        lower_bound: i32,
        upper_bound: i32,
        cause: Option<PropagatorId>,
    ) -> Result<bool, Inconsistency> {
        if lower_bound > upper_bound {
            let request = Request {
                variable,
                operation: DomainOperation::LowerBound(lower_bound),
                cause,
            };
            let root = self.root_of(variable);
            return Err(self.record_failure(
                root,
                request.operation,
                request,
                FailureKind::BoundInversion,
            ));
        }

        let lower_changed = self.tighten_lower_bound(variable, lower_bound, cause)?;
        let upper_changed = self.tighten_upper_bound(variable, upper_bound, cause)?;
        Ok(lower_changed || upper_changed)
    }

    /// Intersects the domain of the variable with `allowed`.
    pub(crate) fn restrict_to(
        &mut self,
        variable: VariableId,
        allowed: &IntervalSet,
        cause: Option<PropagatorId>,
    ) -> Result<bool, Inconsistency> {
        let mut remaining = self.domain(variable);
        remaining.retain_all(allowed);

        let (Some(min), Some(max)) = (remaining.min(), remaining.max()) else {
            let upper_bound = self.upper_bound(variable);
            return self.tighten_lower_bound(variable, upper_bound.saturating_add(1), cause);
        };

        let mut changed = self.tighten_lower_bound(variable, min, cause)?;
        changed |= self.tighten_upper_bound(variable, max, cause)?;

        let mut removed = self.domain(variable);
        removed.remove_all(allowed);
        for value in removed.iter() {
            changed |= self.remove_value(variable, value, cause)?;
        }

        Ok(changed)
    }

    fn apply(
        &mut self,
        variable: VariableId,
        operation: DomainOperation,
        cause: Option<PropagatorId>,
    ) -> Result<bool, Inconsistency> {
        let request = Request {
            variable,
            operation,
            cause,
        };
        self.apply_translated(variable, operation, request)
    }

    /// Applies `operation` to `variable`, rewriting it onto the base when the variable is a view.
    fn apply_translated(
        &mut self,
        variable: VariableId,
        operation: DomainOperation,
        request: Request,
    ) -> Result<bool, Inconsistency> {
        let view = match &self.variables[variable] {
            VariableEntry::Root(_) => return self.apply_to_root(variable, operation, request),
            VariableEntry::View(view) => *view,
        };

        let target = match view_target(self.image(view), operation) {
            Ok(Some(target)) => target,
            Ok(None) => return Ok(false),
            Err(kind) => {
                let root = self.root_of(variable);
                return Err(self.record_failure(root, operation, request, kind));
            }
        };

        let base_operation = match (view, target) {
            (View::Equal { constant, .. }, 1) => DomainOperation::Assign(constant),
            (View::Equal { constant, .. }, _) => DomainOperation::Removal(constant),
            (View::LessOrEqual { constant, .. }, 1) => DomainOperation::UpperBound(constant),
            (View::LessOrEqual { constant, .. }, _) => {
                DomainOperation::LowerBound(constant.saturating_add(1))
            }
            (View::Not { .. }, _) => DomainOperation::Assign(1 - target),
        };

        self.apply_translated(view.base(), base_operation, request)
    }

    fn apply_to_root(
        &mut self,
        root: VariableId,
        operation: DomainOperation,
        request: Request,
    ) -> Result<bool, Inconsistency> {
        kestrel_assert_simple!(
            self.failure.is_none(),
            "domains cannot be modified after a failure until the next synchronise"
        );

        let domain = self.root_domain(root);
        let (lower_bound, upper_bound, hole) = match domain.evaluate(operation) {
            Evaluation::Unchanged => return Ok(false),
            Evaluation::Failed(kind) => {
                return Err(self.record_failure(root, operation, request, kind));
            }
            Evaluation::Changed {
                lower_bound,
                upper_bound,
                hole,
            } => (lower_bound, upper_bound, hole),
        };

        let entry = TrailEntry {
            variable: root,
            operation,
            requested_variable: request.variable,
            requested_operation: request.operation,
            old_lower_bound: domain.lower_bound(),
            old_upper_bound: domain.upper_bound(),
            cause: request.cause,
        };
        let position = self.trail.len();

        let views_before = self.dependent_view_images(root);

        self.root_domain_mut(root)
            .apply(position, lower_bound, upper_bound, hole);
        self.trail.push(entry);

        trace!(
            "{} {} (requested {} {}) by {:?}",
            root,
            operation,
            request.variable,
            request.operation,
            request.cause
        );

        let mut events = bound_events(
            (entry.old_lower_bound, entry.old_upper_bound),
            (lower_bound, upper_bound),
        );
        let _ = events.insert(DomainEvent::Removal);
        self.events.event_occurred(events, root);

        for (view, before) in views_before {
            let after = self.lower_and_upper_bound(view);
            self.events.event_occurred(bound_events(before, after), view);
        }

        Ok(true)
    }

    fn record_failure(
        &mut self,
        root: VariableId,
        operation: DomainOperation,
        request: Request,
        kind: FailureKind,
    ) -> Inconsistency {
        let domain = self.root_domain(root);
        let entry = TrailEntry {
            variable: root,
            operation,
            requested_variable: request.variable,
            requested_operation: request.operation,
            old_lower_bound: domain.lower_bound(),
            old_upper_bound: domain.upper_bound(),
            cause: request.cause,
        };
        trace!(
            "failed to apply {} {} by {:?}",
            request.variable,
            request.operation,
            request.cause
        );
        self.failure = Some(entry);

        match kind {
            FailureKind::BoundInversion => Inconsistency::BoundInversion {
                variable: request.variable,
            },
            FailureKind::DomainWipeout => Inconsistency::DomainWipeout {
                variable: request.variable,
            },
        }
    }

    fn lower_and_upper_bound(&self, variable: VariableId) -> (i32, i32) {
        (self.lower_bound(variable), self.upper_bound(variable))
    }

    /// The bounds of all views which (transitively) depend on `variable`.
    fn dependent_view_images(&self, variable: VariableId) -> Vec<(VariableId, (i32, i32))> {
        let mut images = vec![];
        let mut stack = self.dependent_views[variable].clone();
        while let Some(view) = stack.pop() {
            images.push((view, self.lower_and_upper_bound(view)));
            stack.extend(self.dependent_views[view].iter().copied());
        }
        images
    }
}

/// The events caused by a change of bounds. Every change removes at least one value, so a
/// non-empty result always contains [`DomainEvent::Removal`].
fn bound_events(old: (i32, i32), new: (i32, i32)) -> EnumSet<DomainEvent> {
    let mut events = EnumSet::new();
    if new.0 != old.0 {
        let _ = events.insert(DomainEvent::LowerBound);
    }
    if new.1 != old.1 {
        let _ = events.insert(DomainEvent::UpperBound);
    }
    if new.0 == new.1 && old.0 != old.1 {
        let _ = events.insert(DomainEvent::Assign);
    }
    if !events.is_empty() {
        let _ = events.insert(DomainEvent::Removal);
    }
    events
}

/// The boolean value a view must take for `operation` to hold, `None` if it already holds.
fn view_target(image: BooleanImage, operation: DomainOperation) -> Result<Option<i32>, FailureKind> {
    match operation {
        DomainOperation::LowerBound(value) if value <= image.lower_bound() => Ok(None),
        DomainOperation::LowerBound(value) if value > image.upper_bound() => {
            Err(FailureKind::BoundInversion)
        }
        DomainOperation::LowerBound(_) => Ok(Some(1)),

        DomainOperation::UpperBound(value) if value >= image.upper_bound() => Ok(None),
        DomainOperation::UpperBound(value) if value < image.lower_bound() => {
            Err(FailureKind::BoundInversion)
        }
        DomainOperation::UpperBound(_) => Ok(Some(0)),

        DomainOperation::Removal(value) if !image.contains(value) => Ok(None),
        DomainOperation::Removal(value) if image.is_fixed_to(value) => {
            Err(FailureKind::DomainWipeout)
        }
        DomainOperation::Removal(value) => Ok(Some(1 - value)),

        DomainOperation::Assign(value) if !image.contains(value) => {
            Err(FailureKind::BoundInversion)
        }
        DomainOperation::Assign(value) if image.is_fixed_to(value) => Ok(None),
        DomainOperation::Assign(value) => Ok(Some(value)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FailureKind {
    BoundInversion,
    DomainWipeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Evaluation {
    Unchanged,
    Failed(FailureKind),
    Changed {
        lower_bound: i32,
        upper_bound: i32,
        hole: Option<i32>,
    },
}

#[derive(Clone, Copy, Debug)]
struct BoundUpdate {
    bound: i32,
    trail_position: usize,
}

#[derive(Clone, Copy, Debug)]
struct HoleUpdate {
    value: i32,
    trail_position: usize,
}

/// The domain of a root variable together with its history.
///
/// The first element of each bound history is the initial bound, which is never undone.
#[derive(Clone, Debug)]
struct IntegerDomain {
    initial: IntervalSet,
    lower_bound_updates: Vec<BoundUpdate>,
    upper_bound_updates: Vec<BoundUpdate>,
    hole_updates: Vec<HoleUpdate>,
    holes: HashSet<i32>,
    trail_positions: Vec<usize>,
}

impl IntegerDomain {
    fn new(initial: IntervalSet) -> IntegerDomain {
        let lower_bound = initial.min().unwrap_or(i32::MAX);
        let upper_bound = initial.max().unwrap_or(i32::MIN);
        IntegerDomain {
            initial,
            lower_bound_updates: vec![BoundUpdate {
                bound: lower_bound,
                trail_position: 0,
            }],
            upper_bound_updates: vec![BoundUpdate {
                bound: upper_bound,
                trail_position: 0,
            }],
            hole_updates: vec![],
            holes: HashSet::default(),
            trail_positions: vec![],
        }
    }

    fn allows(&self, value: i32) -> bool {
        self.initial.contains(value) && !self.holes.contains(&value)
    }

    fn next_allowed(&self, from: i32, upper_bound: i32) -> Option<i32> {
        let mut value = self.initial.next_value(from)?;
        while value <= upper_bound {
            if !self.holes.contains(&value) {
                return Some(value);
            }
            value = self.initial.next_value(value.checked_add(1)?)?;
        }
        None
    }

    fn previous_allowed(&self, from: i32, lower_bound: i32) -> Option<i32> {
        let mut value = self.initial.previous_value(from)?;
        while value >= lower_bound {
            if !self.holes.contains(&value) {
                return Some(value);
            }
            value = self.initial.previous_value(value.checked_sub(1)?)?;
        }
        None
    }

    fn evaluate(&self, operation: DomainOperation) -> Evaluation {
        let lower_bound = self.lower_bound();
        let upper_bound = self.upper_bound();

        match operation {
            DomainOperation::LowerBound(value) => {
                if value <= lower_bound {
                    Evaluation::Unchanged
                } else if value > upper_bound {
                    Evaluation::Failed(FailureKind::BoundInversion)
                } else {
                    match self.next_allowed(value, upper_bound) {
                        Some(new_lower_bound) => Evaluation::Changed {
                            lower_bound: new_lower_bound,
                            upper_bound,
                            hole: None,
                        },
                        None => Evaluation::Failed(FailureKind::DomainWipeout),
                    }
                }
            }
            DomainOperation::UpperBound(value) => {
                if value >= upper_bound {
                    Evaluation::Unchanged
                } else if value < lower_bound {
                    Evaluation::Failed(FailureKind::BoundInversion)
                } else {
                    match self.previous_allowed(value, lower_bound) {
                        Some(new_upper_bound) => Evaluation::Changed {
                            lower_bound,
                            upper_bound: new_upper_bound,
                            hole: None,
                        },
                        None => Evaluation::Failed(FailureKind::DomainWipeout),
                    }
                }
            }
            DomainOperation::Removal(value) => {
                if !self.contains(value) {
                    Evaluation::Unchanged
                } else if lower_bound == upper_bound {
                    Evaluation::Failed(FailureKind::DomainWipeout)
                } else if value == lower_bound {
                    match self.next_allowed(value + 1, upper_bound) {
                        Some(new_lower_bound) => Evaluation::Changed {
                            lower_bound: new_lower_bound,
                            upper_bound,
                            hole: None,
                        },
                        None => Evaluation::Failed(FailureKind::DomainWipeout),
                    }
                } else if value == upper_bound {
                    match self.previous_allowed(value - 1, lower_bound) {
                        Some(new_upper_bound) => Evaluation::Changed {
                            lower_bound,
                            upper_bound: new_upper_bound,
                            hole: None,
                        },
                        None => Evaluation::Failed(FailureKind::DomainWipeout),
                    }
                } else {
                    Evaluation::Changed {
                        lower_bound,
                        upper_bound,
                        hole: Some(value),
                    }
                }
            }
            DomainOperation::Assign(value) => {
                if value < lower_bound || value > upper_bound {
                    Evaluation::Failed(FailureKind::BoundInversion)
                } else if !self.allows(value) {
                    Evaluation::Failed(FailureKind::DomainWipeout)
                } else if lower_bound == upper_bound {
                    Evaluation::Unchanged
                } else {
                    Evaluation::Changed {
                        lower_bound: value,
                        upper_bound: value,
                        hole: None,
                    }
                }
            }
        }
    }

    fn apply(
        &mut self,
        trail_position: usize,
        lower_bound: i32,
        upper_bound: i32,
        hole: Option<i32>,
    ) {
        if lower_bound != self.lower_bound() {
            self.lower_bound_updates.push(BoundUpdate {
                bound: lower_bound,
                trail_position,
            });
        }
        if upper_bound != self.upper_bound() {
            self.upper_bound_updates.push(BoundUpdate {
                bound: upper_bound,
                trail_position,
            });
        }
        if let Some(value) = hole {
            let _ = self.holes.insert(value);
            self.hole_updates.push(HoleUpdate {
                value,
                trail_position,
            });
        }
        self.trail_positions.push(trail_position);
    }

    /// Reverts the update made at `trail_position`, which must be the latest one on this domain.
    fn undo(&mut self, trail_position: usize) {
        kestrel_assert_moderate!(self.trail_positions.last() == Some(&trail_position));
        let _ = self.trail_positions.pop();

        if self.lower_bound_updates.len() > 1
            && self.lower_bound_updates[self.lower_bound_updates.len() - 1].trail_position
                == trail_position
        {
            let _ = self.lower_bound_updates.pop();
        }
        if self.upper_bound_updates.len() > 1
            && self.upper_bound_updates[self.upper_bound_updates.len() - 1].trail_position
                == trail_position
        {
            let _ = self.upper_bound_updates.pop();
        }
        if let Some(update) = self.hole_updates.last().copied() {
            if update.trail_position == trail_position {
                let _ = self.hole_updates.pop();
                let _ = self.holes.remove(&update.value);
            }
        }
    }

    fn current(&self) -> IntervalSet {
        let mut domain = self.initial.clone();
        domain.retain_between(self.lower_bound(), self.upper_bound());
        self.holes.iter().for_each(|&value| domain.remove(value));
        domain
    }

    fn at(&self, trail_position: usize) -> IntervalSet {
        let lower = self.lower_bound_updates[1..]
            .partition_point(|update| update.trail_position < trail_position);
        let upper = self.upper_bound_updates[1..]
            .partition_point(|update| update.trail_position < trail_position);
        let holes = self
            .hole_updates
            .partition_point(|update| update.trail_position < trail_position);

        let mut domain = self.initial.clone();
        domain.retain_between(
            self.lower_bound_updates[lower].bound,
            self.upper_bound_updates[upper].bound,
        );
        self.hole_updates[..holes]
            .iter()
            .for_each(|update| domain.remove(update.value));
        domain
    }
}

impl DomainQuery for IntegerDomain {
    fn lower_bound(&self) -> i32 {
        self.lower_bound_updates
            .last()
            .map(|update| update.bound)
            .unwrap_or(i32::MAX)
    }

    fn upper_bound(&self) -> i32 {
        self.upper_bound_updates
            .last()
            .map(|update| update.bound)
            .unwrap_or(i32::MIN)
    }

    fn contains(&self, value: i32) -> bool {
        self.lower_bound() <= value && value <= self.upper_bound() && self.allows(value)
    }
}
