//! Pure nutrition calculations: metabolic targets and macro aggregation.
//! Nothing in here touches the database.

pub mod aggregate;
pub mod constants;
pub mod metrics;
