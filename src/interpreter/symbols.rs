use std::collections::BTreeMap;

use num_bigint::BigUint;

use crate::error::Error;
use crate::parser::locations::Location;

/// Flat variable namespace for one program run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    values: BTreeMap<String, BigUint>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: BigUint) {
        self.values.insert(name.into(), value);
    }

    /// Looks `name` up; `location` is where the read happened.
    pub fn get(&self, name: &str, location: Location) -> Result<BigUint, Error> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UndefinedVariable {
                name: name.to_string(),
                location,
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BigUint)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
