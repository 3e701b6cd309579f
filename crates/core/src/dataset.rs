//! Named-column tabular data consumed by the comparison routines.
//!
//! Columns keep insertion order and may differ in length, since compared
//! groups rarely have the same number of observations. Numeric columns use
//! NaN to mark a missing observation.
//!
//! # Example
//!
//! ```
//! use easy_stat_core::dataset::Dataset;
//!
//! let dataset = Dataset::new()
//!     .with_numeric("control", vec![10.0, 12.0, f64::NAN, 11.0])
//!     .unwrap()
//!     .with_numeric("treated", vec![14.0, 15.0, 13.5])
//!     .unwrap();
//!
//! assert_eq!(dataset.column_count(), 2);
//! assert_eq!(dataset.numeric("control").unwrap(), vec![10.0, 12.0, 11.0]);
//! ```

use crate::error::ValidationError;

/// Values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    /// Number of stored rows, missing values included.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Ordered collection of uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateColumn`] if the name is taken.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        data: ColumnData,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(ValidationError::DuplicateColumn(name));
        }
        self.columns.push(Column { name, data });
        Ok(())
    }

    /// Builder-style variant of [`add_column`](Self::add_column) for numeric data.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateColumn`] if the name is taken.
    pub fn with_numeric(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        self.add_column(name, ColumnData::Numeric(values))?;
        Ok(self)
    }

    /// Builder-style variant of [`add_column`](Self::add_column) for text data.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateColumn`] if the name is taken.
    pub fn with_text(
        mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<Self, ValidationError> {
        self.add_column(name, ColumnData::Text(values))?;
        Ok(self)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Stored row count of a column, missing values included.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ColumnNotFound`] for an unknown name.
    pub fn len_of(&self, name: &str) -> Result<usize, ValidationError> {
        self.column(name)
            .map(|c| c.data.len())
            .ok_or_else(|| ValidationError::ColumnNotFound(name.to_string()))
    }

    /// Returns the non-missing numeric observations of a column.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ColumnNotFound`] for an unknown name
    /// - [`ValidationError::NonNumericColumn`] for a text column
    /// - [`ValidationError::EmptyColumn`] if no observation remains
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>, ValidationError> {
        let values = self.raw_numeric(name)?;
        let observed: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if observed.is_empty() {
            return Err(ValidationError::EmptyColumn(name.to_string()));
        }
        Ok(observed)
    }

    /// Returns a numeric column as stored, NaN included.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ColumnNotFound`] for an unknown name
    /// - [`ValidationError::NonNumericColumn`] for a text column
    pub fn raw_numeric(&self, name: &str) -> Result<&[f64], ValidationError> {
        let column = self
            .column(name)
            .ok_or_else(|| ValidationError::ColumnNotFound(name.to_string()))?;
        match &column.data {
            ColumnData::Numeric(values) => Ok(values),
            ColumnData::Text(_) => Err(ValidationError::NonNumericColumn(name.to_string())),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
