//! Business logic layer.
//!
//! One service per aggregate; each holds the shared connection pool and the
//! event sender. State-machine checks live on the entities, cross-row
//! invariants (assignment uniqueness, order totals) run inside transactions.

pub mod asset_holders;
pub mod assets;
pub mod assignments;
pub mod customers;
pub mod maintenance;
pub mod orders;
pub mod products;
pub mod returns;
pub mod shipments;
pub mod users;
