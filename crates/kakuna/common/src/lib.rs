#![allow(clippy::must_use_candidate)]

pub mod args;

use std::{
    fmt,
    str::FromStr,
};

/// Identifies a compiled contract, either by bare name (`Token`) or qualified
/// by its source file (`Token.sol:Token`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractRef {
    file_name: Option<String>,
    contract_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractRefError {
    #[error("contract name must not be empty")]
    EmptyName,
    #[error("source file name must not be empty in `{0}`; use `File.sol:Name` or `Name`")]
    EmptyFileName(String),
    #[error("`{0}` has more than one `:` separator; use `File.sol:Name` or `Name`")]
    TooManySeparators(String),
}

impl ContractRef {
    pub fn new(file_name: Option<String>, contract_name: String) -> Self {
        Self {
            file_name,
            contract_name,
        }
    }

    pub const fn contract_name(&self) -> &String {
        &self.contract_name
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub const fn is_qualified(&self) -> bool {
        self.file_name.is_some()
    }
}

impl FromStr for ContractRef {
    type Err = ContractRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split(':').collect::<Vec<_>>().as_slice() {
            [name] if name.is_empty() => Err(ContractRefError::EmptyName),
            [name] => Ok(Self::new(None, (*name).to_string())),
            [file, _] if file.is_empty() => Err(ContractRefError::EmptyFileName(s.to_string())),
            [_, name] if name.is_empty() => Err(ContractRefError::EmptyName),
            [file, name] => Ok(Self::new(Some((*file).to_string()), (*name).to_string())),
            _ => Err(ContractRefError::TooManySeparators(s.to_string())),
        }
    }
}

impl fmt::Display for ContractRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_name {
            Some(file_name) => write!(f, "{file_name}:{}", self.contract_name),
            None => write!(f, "{}", self.contract_name),
        }
    }
}
