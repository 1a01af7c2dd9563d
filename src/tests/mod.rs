mod conflict_analysis;
mod properties;
mod propagators;
