//! PMC: PM Creator
//!
//! Turns a maintenance-asset description (criticality, operating context and
//! component inventory) into a preventive-maintenance task list. Assets are
//! plain-text YAML files; the rule engine itself is pure and stateless.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
pub mod schema;
pub mod yaml;
