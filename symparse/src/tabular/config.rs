use super::TabularError;
use crate::config::runtime::TabularPreferences;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// An open symbol type and every type accepted as its close
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterPair<T> {
    pub open: T,
    pub closes: Vec<T>,
}

impl<T: PartialEq> DelimiterPair<T> {
    pub fn is_closed_by(&self, kind: &T) -> bool {
        self.closes.contains(kind)
    }

    fn mentions(&self, kind: &T) -> bool {
        self.open == *kind || self.is_closed_by(kind)
    }
}

fn describe<T: Debug>(kind: &T) -> String {
    format!("{:?}", kind)
}

/// Configuration phase of a tabular parser
///
/// Every fallible mutator validates first and leaves the builder untouched
/// when it returns an error.
#[derive(Debug, Clone)]
pub struct TabularConfigBuilder<T> {
    line_separator: T,
    column_separator: T,
    end_marker: Option<T>,
    delimiters: Vec<DelimiterPair<T>>,
    ignored: Vec<T>,
    preferences: TabularPreferences,
}

impl<T: Clone + PartialEq + Debug> TabularConfigBuilder<T> {
    pub fn new(line_separator: T, column_separator: T) -> Result<Self, TabularError> {
        if line_separator == column_separator {
            return Err(TabularError::SeparatorConflict {
                symbol: describe(&line_separator),
            });
        }

        Ok(Self {
            line_separator,
            column_separator,
            end_marker: None,
            delimiters: Vec::new(),
            ignored: Vec::new(),
            preferences: TabularPreferences::default(),
        })
    }

    pub fn with_preferences(mut self, preferences: TabularPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn set_preferences(&mut self, preferences: TabularPreferences) -> &mut Self {
        self.preferences = preferences;
        self
    }

    // ========================================================================
    // SEPARATORS
    // ========================================================================

    /// Validate a separator candidate against `others` and the delimiter and ignored tables
    fn check_separator(&self, kind: &T, others: &[&T]) -> Result<(), TabularError> {
        if others.iter().any(|other| *other == kind) {
            return Err(TabularError::SeparatorConflict {
                symbol: describe(kind),
            });
        }
        if self.delimiters.iter().any(|pair| pair.mentions(kind)) {
            return Err(TabularError::DelimiterConflict {
                symbol: describe(kind),
            });
        }
        if self.ignored.contains(kind) {
            return Err(TabularError::IgnoredSeparator {
                symbol: describe(kind),
            });
        }
        Ok(())
    }

    pub fn set_line_separator(&mut self, kind: T) -> Result<&mut Self, TabularError> {
        let mut others = vec![&self.column_separator];
        others.extend(self.end_marker.as_ref());
        self.check_separator(&kind, &others)?;
        self.line_separator = kind;
        Ok(self)
    }

    pub fn set_column_separator(&mut self, kind: T) -> Result<&mut Self, TabularError> {
        let mut others = vec![&self.line_separator];
        others.extend(self.end_marker.as_ref());
        self.check_separator(&kind, &others)?;
        self.column_separator = kind;
        Ok(self)
    }

    /// A symbol of this type ends the run as if the stream had ended
    pub fn set_end_marker(&mut self, kind: T) -> Result<&mut Self, TabularError> {
        self.check_separator(&kind, &[&self.line_separator, &self.column_separator])?;
        self.end_marker = Some(kind);
        Ok(self)
    }

    pub fn clear_end_marker(&mut self) -> &mut Self {
        self.end_marker = None;
        self
    }

    fn is_separator(&self, kind: &T) -> bool {
        *kind == self.line_separator
            || *kind == self.column_separator
            || self.end_marker.as_ref() == Some(kind)
    }

    // ========================================================================
    // DELIMITERS
    // ========================================================================

    /// Map `open` to the given close types, adding to any existing mapping
    pub fn map_delimiters<I>(&mut self, open: T, closes: I) -> Result<&mut Self, TabularError>
    where
        I: IntoIterator<Item = T>,
    {
        let closes: Vec<T> = closes.into_iter().collect();
        if closes.is_empty() {
            return Err(TabularError::EmptyCloseSet {
                open: describe(&open),
            });
        }
        if let Some(conflict) = std::iter::once(&open)
            .chain(closes.iter())
            .find(|kind| self.is_separator(kind))
        {
            return Err(TabularError::DelimiterConflict {
                symbol: describe(conflict),
            });
        }
        if let Some(ignored) = std::iter::once(&open)
            .chain(closes.iter())
            .find(|kind| self.ignored.contains(kind))
        {
            return Err(TabularError::IgnoredDelimiter {
                symbol: describe(ignored),
            });
        }

        match self.delimiters.iter_mut().find(|pair| pair.open == open) {
            Some(pair) => {
                for close in closes {
                    if !pair.closes.contains(&close) {
                        pair.closes.push(close);
                    }
                }
            }
            None => {
                let mut unique: Vec<T> = Vec::with_capacity(closes.len());
                for close in closes {
                    if !unique.contains(&close) {
                        unique.push(close);
                    }
                }
                self.delimiters.push(DelimiterPair {
                    open,
                    closes: unique,
                });
            }
        }
        Ok(self)
    }

    /// Remove one close type from `open`; the pair goes away with its last close
    pub fn unmap_delimiter(&mut self, open: &T, close: &T) -> &mut Self {
        if let Some(pair) = self.delimiters.iter_mut().find(|pair| pair.open == *open) {
            pair.closes.retain(|kind| kind != close);
        }
        self.delimiters.retain(|pair| !pair.closes.is_empty());
        self
    }

    pub fn unmap_delimiters(&mut self, open: &T) -> &mut Self {
        self.delimiters.retain(|pair| pair.open != *open);
        self
    }

    pub fn clear_delimiters(&mut self) -> &mut Self {
        self.delimiters.clear();
        self
    }

    // ========================================================================
    // IGNORED TYPES
    // ========================================================================

    /// Drop symbols of this type from field content outside delimiters
    pub fn add_ignored(&mut self, kind: T) -> Result<&mut Self, TabularError> {
        if self.is_separator(&kind) {
            return Err(TabularError::IgnoredSeparator {
                symbol: describe(&kind),
            });
        }
        if self.delimiters.iter().any(|pair| pair.mentions(&kind)) {
            return Err(TabularError::IgnoredDelimiter {
                symbol: describe(&kind),
            });
        }
        if !self.ignored.contains(&kind) {
            self.ignored.push(kind);
        }
        Ok(self)
    }

    pub fn remove_ignored(&mut self, kind: &T) -> &mut Self {
        self.ignored.retain(|ignored| ignored != kind);
        self
    }

    pub fn clear_ignored(&mut self) -> &mut Self {
        self.ignored.clear();
        self
    }

    pub fn build(&self) -> TabularConfig<T> {
        TabularConfig {
            line_separator: self.line_separator.clone(),
            column_separator: self.column_separator.clone(),
            end_marker: self.end_marker.clone(),
            delimiters: self.delimiters.clone(),
            ignored: self.ignored.clone(),
            preferences: self.preferences.clone(),
        }
    }
}

/// Frozen tabular configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularConfig<T> {
    line_separator: T,
    column_separator: T,
    end_marker: Option<T>,
    delimiters: Vec<DelimiterPair<T>>,
    ignored: Vec<T>,
    preferences: TabularPreferences,
}

impl<T: PartialEq> TabularConfig<T> {
    pub fn line_separator(&self) -> &T {
        &self.line_separator
    }

    pub fn column_separator(&self) -> &T {
        &self.column_separator
    }

    pub fn end_marker(&self) -> Option<&T> {
        self.end_marker.as_ref()
    }

    pub fn delimiters(&self) -> &[DelimiterPair<T>] {
        &self.delimiters
    }

    pub fn ignored(&self) -> &[T] {
        &self.ignored
    }

    pub fn preferences(&self) -> &TabularPreferences {
        &self.preferences
    }

    pub fn is_end_marker(&self, kind: &T) -> bool {
        self.end_marker.as_ref() == Some(kind)
    }

    pub fn is_ignored(&self, kind: &T) -> bool {
        self.ignored.contains(kind)
    }

    /// Index of the delimiter pair opened by `kind`
    pub fn open_index(&self, kind: &T) -> Option<usize> {
        self.delimiters.iter().position(|pair| pair.open == *kind)
    }
}
