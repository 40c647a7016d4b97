//! REST client for the club backend

mod client;
mod directory;

pub use client::ClubApi;
