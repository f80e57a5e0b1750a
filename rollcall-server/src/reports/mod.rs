//! 报表模块
//!
//! CSV rendering ([`csv`]) and artifact lifecycle ([`generator`]).

pub mod csv;
pub mod generator;

pub use csv::{UNASSIGNED_DEPARTMENT, UTF8_BOM};
