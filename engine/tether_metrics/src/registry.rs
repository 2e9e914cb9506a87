//! Ordered classifier registry.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::classifiers::{
    AnyChanged, ArgumentChange, AssertInsertion, CommentOrLiteral, Conditional, ElseClause,
    LineLevel, LinesOfCode, LiteralAssignmentRefactor, MovedBlockInCondition, TryCatch,
    ValueAssignment,
};
use crate::Classifier;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("metric `{metric}` of `{classifier}` is already declared by `{owner}`")]
    DuplicateMetric {
        metric: &'static str,
        classifier: &'static str,
        owner: &'static str,
    },
}

/// Classifiers in run order, plus the column layout they produce.
///
/// Columns are the declared metrics of every classifier, in registration
/// order. No two classifiers may declare the same metric.
#[derive(Default)]
pub struct Registry {
    classifiers: Vec<Box<dyn Classifier>>,
    columns: Vec<&'static str>,
    owners: FxHashMap<&'static str, &'static str>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in classifier.
    pub fn standard() -> Self {
        let builtin: [Box<dyn Classifier>; 12] = [
            Box::new(AnyChanged),
            Box::new(Conditional),
            Box::new(ElseClause),
            Box::new(LineLevel),
            Box::new(LinesOfCode),
            Box::new(LiteralAssignmentRefactor),
            Box::new(MovedBlockInCondition),
            Box::new(CommentOrLiteral),
            Box::new(AssertInsertion),
            Box::new(TryCatch),
            Box::new(ValueAssignment),
            Box::new(ArgumentChange),
        ];
        let mut registry = Registry::new();
        for classifier in builtin {
            let registered = registry.register(classifier);
            debug_assert!(registered.is_ok(), "{registered:?}");
        }
        registry
    }

    /// Append a classifier. Nothing is added when one of its metrics is
    /// already declared.
    pub fn register(&mut self, classifier: Box<dyn Classifier>) -> Result<(), RegistryError> {
        let name = classifier.name();
        let metrics = classifier.metrics();
        for (i, &metric) in metrics.iter().enumerate() {
            let owner = self
                .owners
                .get(metric)
                .copied()
                .or_else(|| metrics[..i].contains(&metric).then_some(name));
            if let Some(owner) = owner {
                return Err(RegistryError::DuplicateMetric {
                    metric,
                    classifier: name,
                    owner,
                });
            }
        }
        for &metric in metrics {
            self.owners.insert(metric, name);
            self.columns.push(metric);
        }
        self.classifiers.push(classifier);
        Ok(())
    }

    /// Output columns in order.
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn classifiers(&self) -> impl Iterator<Item = &dyn Classifier> + '_ {
        self.classifiers.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}
