//! `royalacta-core` — Shared data model and reference tables.
//!
//! Pure types crate: entry/statement structs, the category and platform
//! lookup tables, and locale-aware numeric parsing. No IO dependencies.

pub mod category;
pub mod entry;
pub mod numeric;
pub mod platform;
pub mod sales_type;

pub use entry::{
    CategoryGroup, DateRange, DistributorEntry, ImportedDistributorStatement, ImportedStatement,
    RoyaltyEntry, SalesType, StatementFormat,
};
