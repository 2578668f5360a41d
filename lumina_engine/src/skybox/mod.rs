//! Environment lookups for rays that leave the scene without hitting anything

pub mod cube_map;
