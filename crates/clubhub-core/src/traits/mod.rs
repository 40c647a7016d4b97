//! Capability traits (ports) implemented by infrastructure crates

mod directory;

pub use directory::ClubDirectory;
