use std::collections::VecDeque;
use std::fmt::Debug;
use std::fmt::Formatter;

use enumset::EnumSet;
use log::debug;
use log::trace;

use super::conflict_analysis::AllDecisionLearning;
use super::conflict_analysis::ConflictAnalysisContext;
use super::conflict_analysis::ConflictResolutionStrategy;
use super::conflict_analysis::ConflictResolver;
use super::conflict_analysis::LearnedClause;
use super::conflict_analysis::NoLearning;
use super::cp::propagation::propagation_context::ACTIVE;
use super::cp::propagation::propagation_context::INACTIVE;
use super::cp::propagation::propagation_context::PASSIVE;
use super::cp::propagation::Explanation;
use super::cp::propagation::PropagationContext;
use super::cp::propagation::PropagationContextMut;
use super::cp::propagation::Propagator;
use super::cp::propagation::PropagatorConstructor;
use super::cp::propagation::PropagatorConstructorContext;
use super::cp::propagation::PropagatorId;
use super::cp::trailed::TrailedInteger;
use super::cp::trailed::TrailedValues;
use super::cp::Assignments;
use super::cp::DomainEvent;
use super::cp::ImplicationGraph;
use super::cp::PropagatorQueue;
use super::cp::WatchListCP;
use super::variables::VariableId;
use super::variables::View;
use super::VariableNames;
use crate::basic_types::statistic_logging::statistic_logger::log_statistic;
use crate::basic_types::statistic_logging::statistic_logger::should_log_statistics;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::CumulativeMovingAverage;
use crate::basic_types::Entailment;
use crate::basic_types::Inconsistency;
use crate::basic_types::IntervalSet;
use crate::basic_types::KeyedVec;
use crate::basic_types::PropagationStatusCP;
use crate::constraints::ClauseBuilder;
use crate::kestrel_assert_moderate;
use crate::kestrel_assert_simple;
use crate::print_kestrel_assert_warning_message;

/// The propagation engine owns the domains of all variables and the propagators over them. It
/// drives the propagators to a fixpoint, and on failure it can explain the failure as a clause.
///
/// The engine does not search. A search layer uses it as follows:
/// - take a [`Checkpoint`] and make a decision through one of the domain operations;
/// - call [`PropagationEngine::propagate`];
/// - on failure, call [`PropagationEngine::handle_conflict`] with the checkpoint to backtrack to,
///   which also learns a clause, or [`PropagationEngine::restore`] to only backtrack.
pub struct PropagationEngine {
    assignments: Assignments,
    trailed_values: TrailedValues,
    watch_list: WatchListCP,
    queue: PropagatorQueue,
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    propagator_states: KeyedVec<PropagatorId, PropagatorState>,
    state: EngineState,
    conflict: Option<Inconsistency>,
    infeasible: bool,
    counters: Counters,
    variable_names: VariableNames,
    options: EngineOptions,
}

/// The scheduling information of a propagator.
#[derive(Debug, Clone)]
struct PropagatorState {
    /// Whether the propagator is inactive, active or passive.
    activity: TrailedInteger,
    /// The local indices with pending events, in the order in which they first occurred.
    pending: VecDeque<usize>,
    pending_events: Vec<EnumSet<DomainEvent>>,
}

impl PropagatorState {
    fn add_events(&mut self, local_index: usize, events: EnumSet<DomainEvent>) {
        if self.pending_events[local_index].is_empty() {
            self.pending.push_back(local_index);
        }
        self.pending_events[local_index].insert_all(events);
    }

    fn clear_pending(&mut self) {
        for local_index in self.pending.drain(..) {
            self.pending_events[local_index] = EnumSet::empty();
        }
    }
}

/// The state of the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Not propagating; the last propagation reached a fixpoint.
    #[default]
    Idle,
    /// Running a propagator from scratch.
    FullPropagation,
    /// Running a propagator in reaction to events.
    IncrementalPropagation,
    /// A propagation or a decision failed. Only [`PropagationEngine::restore`] leaves this state.
    Failed,
}

/// A mark in the history of the engine, created by [`PropagationEngine::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// The checkpoint of the state before any checkpoint was taken.
    pub const ROOT: Checkpoint = Checkpoint(0);
}

/// Options which influence the behaviour of the [`PropagationEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// What to do with a conflict in [`PropagationEngine::handle_conflict`].
    pub conflict_resolver: ConflictResolutionStrategy,
}

/// Structure responsible for storing several statistics of the propagation process.
#[derive(Default, Debug, Copy, Clone)]
pub(crate) struct Counters {
    pub(crate) num_full_propagations: u64,
    pub(crate) num_incremental_propagations: u64,
    pub(crate) num_events: u64,
    pub(crate) num_conflicts: u64,
    pub(crate) num_learned_clauses: u64,
    average_learned_clause_size: CumulativeMovingAverage,
}

impl Counters {
    fn log_statistics(&self) {
        log_statistic("numberOfFullPropagations", self.num_full_propagations);
        log_statistic(
            "numberOfIncrementalPropagations",
            self.num_incremental_propagations,
        );
        log_statistic("numberOfDomainEvents", self.num_events);
        log_statistic("numberOfConflicts", self.num_conflicts);
        log_statistic("numberOfLearnedClauses", self.num_learned_clauses);
        log_statistic(
            "averageLearnedClauseLength",
            self.average_learned_clause_size.value(),
        );
    }
}

impl Debug for PropagationEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let propagators = self
            .propagators
            .iter()
            .map(|propagator| propagator.name())
            .collect::<Vec<_>>();
        f.debug_struct("PropagationEngine")
            .field("assignments", &self.assignments)
            .field("propagators", &propagators)
            .field("state", &self.state)
            .field("conflict", &self.conflict)
            .field("infeasible", &self.infeasible)
            .field("counters", &self.counters)
            .finish()
    }
}

impl Default for PropagationEngine {
    fn default() -> Self {
        PropagationEngine::new(EngineOptions::default())
    }
}

impl PropagationEngine {
    pub fn new(options: EngineOptions) -> Self {
        print_kestrel_assert_warning_message!();
        PropagationEngine {
            assignments: Assignments::default(),
            trailed_values: TrailedValues::default(),
            watch_list: WatchListCP::default(),
            queue: PropagatorQueue::default(),
            propagators: KeyedVec::default(),
            propagator_states: KeyedVec::default(),
            state: EngineState::default(),
            conflict: None,
            infeasible: false,
            counters: Counters::default(),
            variable_names: VariableNames::default(),
            options,
        }
    }

    /// Writes the statistics of the engine, if the statistic logger was configured to do so.
    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.counters.log_statistics()
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The failure of the last propagation, if the engine is in [`EngineState::Failed`].
    pub fn conflict(&self) -> Option<Inconsistency> {
        self.conflict
    }
}

// methods for creating variables
impl PropagationEngine {
    /// Create a new integer variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> VariableId {
        kestrel_assert_simple!(
            lower_bound <= upper_bound,
            "the lower bound {lower_bound} must not exceed the upper bound {upper_bound}"
        );
        self.new_variable_with_domain(IntervalSet::from_range(lower_bound, upper_bound), name)
    }

    /// Create a new integer variable whose domain contains exactly the given values.
    pub fn new_sparse_variable(&mut self, values: &[i32], name: Option<String>) -> VariableId {
        self.new_variable_with_domain(IntervalSet::from_values(values.iter().copied()), name)
    }

    fn new_variable_with_domain(&mut self, domain: IntervalSet, name: Option<String>) -> VariableId {
        kestrel_assert_simple!(
            self.state == EngineState::Idle,
            "variables can only be created while the engine is idle"
        );
        let variable = self.assignments.grow_with_domain(domain);
        self.watch_list.grow();
        if let Some(name) = name {
            self.variable_names.add(variable, name);
        }
        variable
    }

    /// Create a view on an existing variable. The base of a view must have been created before
    /// the view.
    pub fn new_view(&mut self, view: View) -> VariableId {
        let variable = self.assignments.new_view(view);
        self.watch_list.grow();
        variable
    }

    /// The boolean view `[base = constant]`.
    pub fn equal_view(&mut self, base: VariableId, constant: i32) -> VariableId {
        self.new_view(View::Equal { base, constant })
    }

    /// The boolean view `[base <= constant]`.
    pub fn less_or_equal_view(&mut self, base: VariableId, constant: i32) -> VariableId {
        self.new_view(View::LessOrEqual { base, constant })
    }

    /// The boolean view `1 - base` for a boolean `base`.
    pub fn not_view(&mut self, base: VariableId) -> VariableId {
        self.new_view(View::Not { base })
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_variables()
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.assignments.variables()
    }

    pub fn view(&self, variable: VariableId) -> Option<View> {
        self.assignments.view(variable)
    }

    pub fn get_variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names.get_variable_by_name(name)
    }

    pub fn variable_name(&self, variable: VariableId) -> Option<&str> {
        self.variable_names.get_name(variable)
    }

    /// The name of the variable if it has one, otherwise its id.
    pub fn describe(&self, variable: VariableId) -> String {
        self.variable_name(variable)
            .map(|name| name.to_owned())
            .unwrap_or_else(|| variable.to_string())
    }
}

// methods for reading and changing domains
impl PropagationEngine {
    pub fn lower_bound(&self, variable: VariableId) -> i32 {
        self.assignments.lower_bound(variable)
    }

    pub fn upper_bound(&self, variable: VariableId) -> i32 {
        self.assignments.upper_bound(variable)
    }

    pub fn contains(&self, variable: VariableId, value: i32) -> bool {
        self.assignments.contains(variable, value)
    }

    pub fn is_fixed(&self, variable: VariableId) -> bool {
        self.assignments.is_fixed(variable)
    }

    pub fn domain(&self, variable: VariableId) -> IntervalSet {
        self.assignments.domain(variable)
    }

    /// The domain of the variable when it was created.
    pub fn initial_domain(&self, variable: VariableId) -> IntervalSet {
        self.assignments.initial_domain(variable)
    }

    /// A decision (or a root fact, before the first checkpoint) `variable >= value`.
    pub fn tighten_lower_bound(
        &mut self,
        variable: VariableId,
        value: i32,
    ) -> Result<bool, Inconsistency> {
        self.decide(|assignments| assignments.tighten_lower_bound(variable, value, None))
    }

    /// A decision `variable <= value`.
    pub fn tighten_upper_bound(
        &mut self,
        variable: VariableId,
        value: i32,
    ) -> Result<bool, Inconsistency> {
        self.decide(|assignments| assignments.tighten_upper_bound(variable, value, None))
    }

    /// A decision `variable != value`.
    pub fn remove_value(&mut self, variable: VariableId, value: i32) -> Result<bool, Inconsistency> {
        self.decide(|assignments| assignments.remove_value(variable, value, None))
    }

    /// A decision `variable == value`.
    pub fn instantiate(&mut self, variable: VariableId, value: i32) -> Result<bool, Inconsistency> {
        self.decide(|assignments| assignments.instantiate(variable, value, None))
    }

    /// A decision `lower_bound <= variable <= upper_bound`.
    pub fn update_bounds(
        &mut self,
        variable: VariableId,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<bool, Inconsistency> {
        self.decide(|assignments| {
            assignments.update_bounds(variable, lower_bound, upper_bound, None)
        })
    }

    /// A decision `variable ∈ allowed`.
    pub fn restrict_to(
        &mut self,
        variable: VariableId,
        allowed: &IntervalSet,
    ) -> Result<bool, Inconsistency> {
        self.decide(|assignments| assignments.restrict_to(variable, allowed, None))
    }

    fn decide(
        &mut self,
        operation: impl FnOnce(&mut Assignments) -> Result<bool, Inconsistency>,
    ) -> Result<bool, Inconsistency> {
        kestrel_assert_simple!(
            self.state != EngineState::Failed,
            "cannot change domains in a failed state, restore first"
        );

        let result = operation(&mut self.assignments);
        match result {
            Ok(_) => self.notify_watchers(None),
            Err(inconsistency) => self.fail(inconsistency),
        }
        result
    }
}

// methods for propagators and propagation
impl PropagationEngine {
    /// Add a propagator to the engine. It is propagated from scratch at the next call to
    /// [`PropagationEngine::propagate`].
    pub fn add_propagator<Constructor: PropagatorConstructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorId, ConstraintOperationError> {
        if self.infeasible {
            return Err(ConstraintOperationError::InfeasibleState);
        }
        kestrel_assert_simple!(
            self.state != EngineState::Failed,
            "propagators cannot be added in a failed state, restore first"
        );

        let id = PropagatorId(self.propagators.len() as u32);
        let propagator = constructor.create(&mut PropagatorConstructorContext::new(
            &self.assignments,
            &mut self.trailed_values,
            id,
        ))?;

        let scope = propagator.scope();
        if scope.is_empty() {
            return Err(ConstraintOperationError::MalformedConfiguration(format!(
                "the scope of {} is empty",
                propagator.name()
            )));
        }

        for (local_index, &variable) in scope.iter().enumerate() {
            self.watch_list.watch(
                variable,
                id,
                local_index,
                propagator.propagation_conditions(local_index),
            );
        }

        let state = PropagatorState {
            activity: self.trailed_values.grow(INACTIVE),
            pending: VecDeque::new(),
            pending_events: vec![EnumSet::empty(); scope.len()],
        };

        debug!("Adding propagator {} as {id}", propagator.name());
        self.queue.enqueue_propagator(id, propagator.priority());
        let _ = self.propagators.push(Box::new(propagator));
        let _ = self.propagator_states.push(state);

        Ok(id)
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    pub fn propagator_name(&self, propagator: PropagatorId) -> &str {
        self.propagators[propagator].name()
    }

    pub fn is_entailed(&self, propagator: PropagatorId) -> Entailment {
        self.propagators[propagator]
            .is_entailed(PropagationContext::new(&self.assignments, &self.trailed_values))
    }

    /// Whether the propagator can no longer prune until the engine backtracks.
    pub fn is_passive(&self, propagator: PropagatorId) -> bool {
        self.trailed_values
            .read(self.propagator_states[propagator].activity)
            == PASSIVE
    }

    /// Run the propagators until no propagator can prune any domain, or until one of them fails.
    ///
    /// On failure the engine stays in [`EngineState::Failed`] until it is restored.
    pub fn propagate(&mut self) -> PropagationStatusCP {
        if let Some(conflict) = self.conflict {
            return Err(conflict);
        }

        while let Some(propagator) = self.queue.pop() {
            if let Err(inconsistency) = self.propagate_propagator(propagator) {
                debug!(
                    "{} failed with {inconsistency}",
                    self.propagators[propagator].name()
                );
                self.fail(inconsistency);
                return Err(inconsistency);
            }
        }

        self.state = EngineState::Idle;
        Ok(())
    }

    fn propagate_propagator(&mut self, propagator: PropagatorId) -> PropagationStatusCP {
        let activity = self
            .trailed_values
            .read(self.propagator_states[propagator].activity);

        if activity == PASSIVE {
            self.propagator_states[propagator].clear_pending();
            return Ok(());
        }

        if activity == INACTIVE || !self.propagators[propagator].reacts_to_fine_events() {
            self.trailed_values
                .assign(self.propagator_states[propagator].activity, ACTIVE);
            self.propagator_states[propagator].clear_pending();
            return self.propagate_full(propagator);
        }

        while let Some((local_index, events)) = self.next_pending(propagator) {
            if self.is_passive(propagator) {
                self.propagator_states[propagator].clear_pending();
                break;
            }
            self.propagate_event(propagator, local_index, events)?;
        }

        Ok(())
    }

    fn next_pending(&mut self, propagator: PropagatorId) -> Option<(usize, EnumSet<DomainEvent>)> {
        let state = &mut self.propagator_states[propagator];
        let local_index = state.pending.pop_front()?;
        let events = std::mem::take(&mut state.pending_events[local_index]);
        Some((local_index, events))
    }

    fn propagate_full(&mut self, propagator: PropagatorId) -> PropagationStatusCP {
        self.state = EngineState::FullPropagation;
        self.counters.num_full_propagations += 1;
        trace!("Full propagation of {}", self.propagators[propagator].name());

        let context = PropagationContextMut::new(
            &mut self.assignments,
            &mut self.trailed_values,
            propagator,
            self.propagator_states[propagator].activity,
        );
        self.propagators[propagator].propagate_full(context)?;

        self.notify_watchers(Some(propagator));
        Ok(())
    }

    fn propagate_event(
        &mut self,
        propagator: PropagatorId,
        local_index: usize,
        events: EnumSet<DomainEvent>,
    ) -> PropagationStatusCP {
        self.state = EngineState::IncrementalPropagation;
        self.counters.num_incremental_propagations += 1;
        trace!(
            "Propagation of {} for {events:?} on local index {local_index}",
            self.propagators[propagator].name()
        );

        let context = PropagationContextMut::new(
            &mut self.assignments,
            &mut self.trailed_values,
            propagator,
            self.propagator_states[propagator].activity,
        );
        self.propagators[propagator].propagate_event(context, local_index, events)?;

        self.notify_watchers(Some(propagator));
        Ok(())
    }

    /// Deliver the events of the domain store to the propagators which watch them. Events caused
    /// by a propagator are not delivered to that propagator itself.
    fn notify_watchers(&mut self, cause: Option<PropagatorId>) {
        for (events, variable) in self.assignments.drain_domain_events() {
            self.counters.num_events += 1;
            trace!("Events {events:?} on {variable}");

            for watcher in self.watch_list.get_affected_watchers(variable, events) {
                if Some(watcher.propagator) == cause {
                    continue;
                }

                let state = &mut self.propagator_states[watcher.propagator];
                if self.trailed_values.read(state.activity) != ACTIVE {
                    continue;
                }

                state.add_events(watcher.local_index, events);
                self.queue.enqueue_propagator(
                    watcher.propagator,
                    self.propagators[watcher.propagator].priority(),
                );
            }
        }
    }

    fn fail(&mut self, inconsistency: Inconsistency) {
        self.state = EngineState::Failed;
        self.conflict = Some(inconsistency);
        self.counters.num_conflicts += 1;
        self.queue.clear();
        self.propagator_states
            .iter_mut()
            .for_each(PropagatorState::clear_pending);
        self.assignments.clear_domain_events();
    }
}

// methods for backtracking
impl PropagationEngine {
    /// Mark the current state so that it can be restored later. The engine must be at a fixpoint.
    pub fn checkpoint(&mut self) -> Checkpoint {
        kestrel_assert_simple!(
            self.state != EngineState::Failed,
            "cannot take a checkpoint in a failed state"
        );
        kestrel_assert_simple!(
            self.queue.is_empty(),
            "checkpoints can only be taken at a fixpoint"
        );

        let checkpoint = Checkpoint(self.assignments.get_checkpoint());
        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
        kestrel_assert_moderate!(
            self.assignments.get_checkpoint() == self.trailed_values.get_checkpoint()
        );
        checkpoint
    }

    /// The number of checkpoints which can currently be restored.
    pub fn num_checkpoints(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    /// Undo every change made after `checkpoint` was taken, including any failure.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        kestrel_assert_simple!(
            checkpoint.0 <= self.assignments.get_checkpoint(),
            "cannot restore a checkpoint which was already restored"
        );

        self.assignments.synchronise(checkpoint.0);
        self.trailed_values.synchronise(checkpoint.0);

        self.queue.clear();
        self.propagator_states
            .iter_mut()
            .for_each(PropagatorState::clear_pending);
        self.conflict = None;
        self.state = EngineState::Idle;

        for propagator in self.propagators.keys() {
            if self
                .trailed_values
                .read(self.propagator_states[propagator].activity)
                == INACTIVE
            {
                self.queue
                    .enqueue_propagator(propagator, self.propagators[propagator].priority());
            }
        }
    }

    /// Mark the problem as having no solution. All further attempts to add constraints fail with
    /// [`ConstraintOperationError::InfeasibleState`].
    pub fn declare_infeasible(&mut self) {
        debug!("The problem was declared infeasible");
        self.infeasible = true;
    }

    pub fn is_infeasible(&self) -> bool {
        self.infeasible
    }
}

// methods for explanations and conflict analysis
impl PropagationEngine {
    /// The history of the domains, from which explanations are computed.
    pub fn implication_graph(&self) -> ImplicationGraph<'_> {
        ImplicationGraph::new(&self.assignments)
    }

    /// Explain the update at `position` by asking the propagator which made it. Returns `None` for
    /// decisions and root facts.
    pub fn explain(&self, position: usize) -> Option<Explanation> {
        self.conflict_analysis_context().explain(position)
    }

    fn conflict_analysis_context(&self) -> ConflictAnalysisContext<'_> {
        ConflictAnalysisContext {
            graph: ImplicationGraph::new(&self.assignments),
            propagators: &self.propagators,
        }
    }

    /// Derive a clause from the current failure which contains only literals falsified by
    /// decisions. Returns `None` if the failure was not caused by a propagator.
    pub fn analyse_conflict(&self) -> Option<LearnedClause> {
        kestrel_assert_simple!(
            self.state == EngineState::Failed,
            "conflict analysis requires a failure"
        );
        AllDecisionLearning::default().resolve_conflict(&self.conflict_analysis_context())
    }

    /// Handle the current failure according to the configured [`ConflictResolutionStrategy`]:
    /// learn a clause from it, restore `checkpoint` and add the clause as a constraint.
    pub fn handle_conflict(
        &mut self,
        checkpoint: Checkpoint,
    ) -> Result<Option<LearnedClause>, ConstraintOperationError> {
        kestrel_assert_simple!(
            self.state == EngineState::Failed,
            "conflict handling requires a failure"
        );

        let context = self.conflict_analysis_context();
        let learned_clause = match self.options.conflict_resolver {
            ConflictResolutionStrategy::AllDecision => {
                AllDecisionLearning::default().resolve_conflict(&context)
            }
            ConflictResolutionStrategy::NoLearning => NoLearning.resolve_conflict(&context),
        };

        self.restore(checkpoint);

        if let Some(clause) = &learned_clause {
            if clause.is_empty() {
                // the failure does not depend on any decision
                self.declare_infeasible();
                return Err(ConstraintOperationError::InfeasibleClause);
            }

            self.counters.num_learned_clauses += 1;
            self.counters
                .average_learned_clause_size
                .add_term(clause.len() as u64);

            let mut clause_builder = ClauseBuilder::new(self);
            for (variable, allowed) in clause.literals() {
                let _ = clause_builder.put(*variable, allowed.clone());
            }
            clause_builder.build_clause(self)?;
        }

        Ok(learned_clause)
    }
}
