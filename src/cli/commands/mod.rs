//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod distribute;
pub mod export;
pub mod init;
pub mod token;
pub mod validate;

use crate::adapters::store::{load_registrations, select_registrations};
use crate::domain::Registration;
use clap::Args;

/// Which registrations a command works on
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Registration export (JSON array or `{"registrations": [...]}`)
    #[arg(
        short,
        long,
        default_value = "registrations.json",
        env = "LANYARD_REGISTRATIONS"
    )]
    pub input: String,

    /// Registration ID(s) to select (comma-separated, default: all)
    #[arg(long = "ids", value_delimiter = ',')]
    pub ids: Vec<String>,
}

impl SelectionArgs {
    /// Loads the input file and applies the id filter
    pub fn load(&self) -> crate::domain::Result<Vec<Registration>> {
        let all = load_registrations(&self.input)?;
        let ids: Vec<String> = self
            .ids
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        select_registrations(&all, &ids)
    }
}
