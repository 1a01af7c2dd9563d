mod all_decision_learning;
mod clause_builder;
