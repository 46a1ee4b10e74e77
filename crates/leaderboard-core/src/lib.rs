// Library root: the join-and-aggregation pipeline behind the fantasy
// leaderboard, plus the loader and config layers that feed it.

pub mod config;
pub mod index;
pub mod loader;
pub mod model;
pub mod ranking;
pub mod roles;
pub mod roster;
pub mod scoring;
pub mod standings;
