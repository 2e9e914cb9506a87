//! Ordered metric rows.

use std::fmt;

/// One value per registered metric, in column order.
///
/// Values are signed: `locDelta` goes negative and failed rows carry the
/// `-1` sentinel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metrics {
    entries: Vec<(&'static str, i64)>,
}

impl Metrics {
    /// Value written into every column of a failed row.
    pub const SENTINEL: i64 = -1;

    /// Every column set to zero.
    pub fn zeroed(columns: &[&'static str]) -> Self {
        Self::filled(columns, 0)
    }

    /// Every column set to [`Metrics::SENTINEL`].
    pub fn sentinel(columns: &[&'static str]) -> Self {
        Self::filled(columns, Self::SENTINEL)
    }

    fn filled(columns: &[&'static str], value: i64) -> Self {
        Metrics {
            entries: columns.iter().map(|&c| (c, value)).collect(),
        }
    }

    pub fn get(&self, metric: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == metric)
            .map(|&(_, v)| v)
    }

    /// Overwrite `metric`. Returns false when no such column exists.
    pub fn set(&mut self, metric: &str, value: i64) -> bool {
        match self.entries.iter_mut().find(|(name, _)| *name == metric) {
            Some(entry) => {
                entry.1 = value;
                true
            }
            None => false,
        }
    }

    /// `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(name, _)| name)
    }

    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().map(|&(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.columns().map(str::len).max().unwrap_or(0);
        for (name, value) in self.iter() {
            writeln!(f, "{name:<width$}  {value}")?;
        }
        Ok(())
    }
}
