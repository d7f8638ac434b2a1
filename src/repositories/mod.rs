//! # Repository Layer
//!
//! Repository implementations that encapsulate SeaORM operations for the
//! company, machine and document tables.

pub mod company;
pub mod document;
pub mod machine;

pub use company::{CompanyInput, CompanyRepository, CompanyWithMachineCount};
pub use document::{DocumentInput, DocumentRepository};
pub use machine::{MachineInput, MachineRepository};
