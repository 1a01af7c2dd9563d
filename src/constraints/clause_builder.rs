use enumset::EnumSet;
use enumset::EnumSetType;
use log::debug;
use log::warn;

use super::clause;
use super::member;
use super::Constraint;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::HashMap;
use crate::basic_types::IntervalSet;
use crate::basic_types::KeyedVec;
use crate::engine::variables::VariableId;
use crate::engine::variables::View;
use crate::engine::PropagationEngine;
use crate::kestrel_assert_simple;

/// The status flags of the clause being built. No flag means the clause is always false.
#[derive(Debug, EnumSetType)]
enum ClauseStatus {
    /// Some literal is satisfied by every value of its initial domain.
    AlwaysTrue,
    /// At least one literal was added.
    Unknown,
}

/// Accumulates literals `var ∈ allowed` into a clause, and posts the clause as a constraint.
///
/// The builder records the initial domains and views of the engine when it is created, so a
/// builder should not outlive the creation of new variables. Literals on views are rewritten onto
/// the base of the view when the clause is built, until only literals on root variables remain.
///
/// ```ignore
/// let mut builder = ClauseBuilder::new(&engine);
/// builder.put(x, IntervalSet::from_range(3, 5));
/// builder.put_forbidden(y, IntervalSet::singleton(0));
/// builder.build_clause(&mut engine)?;
/// ```
#[derive(Debug)]
pub struct ClauseBuilder {
    initial_domains: KeyedVec<VariableId, IntervalSet>,
    views: KeyedVec<VariableId, Option<View>>,
    literals: HashMap<VariableId, IntervalSet>,
    status: EnumSet<ClauseStatus>,
}

impl ClauseBuilder {
    pub fn new(engine: &PropagationEngine) -> Self {
        let mut initial_domains = KeyedVec::default();
        let mut views = KeyedVec::default();
        for variable in engine.variables() {
            let _ = initial_domains.push(engine.initial_domain(variable));
            let _ = views.push(engine.view(variable));
        }

        ClauseBuilder {
            initial_domains,
            views,
            literals: HashMap::default(),
            status: EnumSet::empty(),
        }
    }

    /// Adds the literal `var ∈ allowed` to the clause.
    ///
    /// A literal which is true for every value of the initial domain of `var` makes the whole
    /// clause true, while a literal which is false for all of them is ignored.
    pub fn put(&mut self, var: VariableId, allowed: IntervalSet) -> &mut Self {
        let _ = self.status.insert(ClauseStatus::Unknown);
        self.add_literal(var, allowed);
        self
    }

    /// Adds the literal `var ∉ forbidden` to the clause.
    pub fn put_forbidden(&mut self, var: VariableId, forbidden: IntervalSet) -> &mut Self {
        let mut allowed = self.initial_domains[var].clone();
        allowed.remove_all(&forbidden);
        self.put(var, allowed)
    }

    /// The initial domain of `var`, as recorded when the builder was created.
    pub fn initial_domain(&self, var: VariableId) -> &IntervalSet {
        &self.initial_domains[var]
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    fn add_literal(&mut self, var: VariableId, mut allowed: IntervalSet) {
        let initial = &self.initial_domains[var];

        if initial.size() == 1 {
            if initial.min().is_some_and(|value| allowed.contains(value)) {
                let _ = self.status.insert(ClauseStatus::AlwaysTrue);
            }
            return;
        }

        if !allowed.intersects(initial) {
            return;
        }
        if initial.is_subset_of(&allowed) {
            let _ = self.status.insert(ClauseStatus::AlwaysTrue);
        }

        allowed.retain_all(initial);
        self.literals.entry(var).or_default().add_all(&allowed);
    }

    /// Posts the clause to the engine and resets the builder.
    ///
    /// Nothing is posted when the clause is always true. A clause to which nothing was ever added
    /// is unconditionally false and results in [`ConstraintOperationError::UnsupportedDerivation`],
    /// while a clause whose literals are all false results in
    /// [`ConstraintOperationError::InfeasibleClause`]; in both cases the engine is declared
    /// infeasible. A single remaining literal is posted as a [`member`] constraint, more literals
    /// as a [`clause`].
    pub fn build_clause(
        &mut self,
        engine: &mut PropagationEngine,
    ) -> Result<(), ConstraintOperationError> {
        let result = self.materialise(engine);

        self.literals.clear();
        self.status = EnumSet::empty();

        result
    }

    fn materialise(&mut self, engine: &mut PropagationEngine) -> Result<(), ConstraintOperationError> {
        if self.status.contains(ClauseStatus::AlwaysTrue) {
            debug!("The clause is always true, nothing is posted");
            return Ok(());
        }

        if !self.status.contains(ClauseStatus::Unknown) {
            engine.declare_infeasible();
            return Err(ConstraintOperationError::UnsupportedDerivation);
        }

        self.eliminate_views();

        if self.status.contains(ClauseStatus::AlwaysTrue) {
            debug!("The clause is always true after eliminating views, nothing is posted");
            return Ok(());
        }

        let mut literals = self
            .literals
            .drain()
            .filter(|(_, allowed)| !allowed.is_empty())
            .collect::<Vec<_>>();
        literals.sort_by_key(|(var, _)| *var);

        match literals.len() {
            0 => {
                engine.declare_infeasible();
                Err(ConstraintOperationError::InfeasibleClause)
            }
            1 => {
                let (var, allowed) = literals.remove(0);
                debug!("Posting {var} ∈ {allowed}");
                member(var, allowed).post(engine)
            }
            _ => {
                debug!("Posting a clause with {} literals", literals.len());
                clause(literals).post(engine)
            }
        }
    }

    /// Rewrites every literal on a view into a literal on its base. Views on views are handled
    /// by pushing the base back onto the worklist.
    fn eliminate_views(&mut self) {
        let mut worklist = self
            .literals
            .keys()
            .copied()
            .filter(|&var| self.views[var].is_some())
            .collect::<Vec<_>>();
        worklist.sort();

        while let Some(var) = worklist.pop() {
            let Some(view) = self.views[var] else {
                continue;
            };
            let Some(allowed) = self.literals.remove(&var) else {
                continue;
            };

            let base = view.base();
            kestrel_assert_simple!(base < var, "a view must refer to an older variable");

            let base_values = view.preimage_of_set(&allowed, &self.initial_domains[base]);
            if base_values.is_empty() {
                continue;
            }

            self.add_literal(base, base_values);
            if self.views[base].is_some() {
                worklist.push(base);
            }
        }
    }
}

impl Drop for ClauseBuilder {
    fn drop(&mut self) {
        if !self.literals.is_empty() {
            warn!(
                "A clause builder with {} literals was dropped without building the clause",
                self.literals.len()
            );
        }
    }
}
