//! View models for the company pages.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{company, machine};
use crate::repositories::CompanyWithMachineCount;
use crate::validation::{FieldErrors, OldInput};

pub const INDEX_COMPONENT: &str = "company";
pub const SHOW_COMPONENT: &str = "company/show";

/// One row of the company grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
    /// Creation date as shown in the grid (`dd/mm/yyyy`)
    #[schema(example = "17/09/2025")]
    pub created_on: String,
    pub machines_count: i64,
}

impl From<CompanyWithMachineCount> for CompanyRow {
    fn from(row: CompanyWithMachineCount) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at.to_rfc3339(),
            updated_at: row.updated_at.to_rfc3339(),
            created_on: format_date(&row.created_at),
            machines_count: row.machines_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MachineRow {
    pub id: i32,
    pub name: String,
    pub model: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl From<machine::Model> for MachineRow {
    fn from(machine: machine::Model) -> Self {
        Self {
            id: machine.id,
            name: machine.name,
            model: machine.model,
            category: machine.category,
            description: machine.description,
        }
    }
}

/// A single company with its machines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyDetail {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub created_on: String,
    pub machines: Vec<MachineRow>,
}

impl CompanyDetail {
    pub fn new(company: company::Model, machines: Vec<machine::Model>) -> Self {
        Self {
            id: company.id,
            created_at: company.created_at.to_rfc3339(),
            updated_at: company.updated_at.to_rfc3339(),
            created_on: format_date(&company.created_at),
            name: company.name,
            description: company.description,
            machines: machines.into_iter().map(MachineRow::from).collect(),
        }
    }
}

/// The searchable company grid, newest company first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyGrid {
    pub companies: Vec<CompanyRow>,
}

impl CompanyGrid {
    pub fn new(rows: Vec<CompanyWithMachineCount>) -> Self {
        Self {
            companies: rows.into_iter().map(CompanyRow::from).collect(),
        }
    }

    /// Rows whose name or description contains `term`, ignoring case.
    /// An empty term keeps every row; whitespace is matched as typed.
    pub fn filter(&self, term: &str) -> Vec<&CompanyRow> {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return self.companies.iter().collect();
        }

        self.companies
            .iter()
            .filter(|row| {
                row.name.to_lowercase().contains(&needle)
                    || row
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// Props of the `company` page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndexProps {
    pub companies: Vec<CompanyRow>,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<OldInput>,
}

impl IndexProps {
    pub fn new(grid: CompanyGrid) -> Self {
        Self {
            companies: grid.companies,
            errors: FieldErrors::new(),
            old: None,
        }
    }

    /// Props for re-rendering the form after a failed submission
    pub fn with_errors(grid: CompanyGrid, errors: FieldErrors, old: OldInput) -> Self {
        Self {
            companies: grid.companies,
            errors,
            old: Some(old),
        }
    }
}

/// Props of the `company/show` page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShowProps {
    pub company: CompanyDetail,
}

pub fn format_date(at: &DateTime<FixedOffset>) -> String {
    at.format("%d/%m/%Y").to_string()
}
