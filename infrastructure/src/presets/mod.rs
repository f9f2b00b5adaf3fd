//! Built-in team presets

pub mod care_team;

pub use care_team::CareTeamPreset;
