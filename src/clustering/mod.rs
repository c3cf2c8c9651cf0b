// Clustering - Transitive closure of matched pairs
//
// union_find: disjoint-set forest over every record id
// assignment: record id → cluster id, singletons included

pub mod assignment;
pub mod union_find;

pub use assignment::{assign, Assignment};
pub use union_find::{ClusterId, DisjointSet};
