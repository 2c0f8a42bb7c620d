pub mod comps;
pub mod offer;
