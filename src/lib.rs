//! BeoLink Bridge - source selection and command dispatch core
//!
//! Bridges a home-automation platform's media entities to the BeoLink
//! remote-control ecosystem. This library owns the hard part of that
//! translation:
//! - a curated catalog of protocol source addresses with labels and
//!   capability flags
//! - capability-filtered source views for the picker surfaces
//! - compilation of a configured source into the legacy Beo4 and the
//!   BeoRemote One command families
//! - per-renderer selection state with persistence across list refreshes
//! - a quick controller with the two-press all-standby gesture
//!
//! Discovery, transport serialization and authentication live behind the
//! `transport::CommandTransport` and entity-layer boundaries.

pub mod bus;
pub mod catalog;
pub mod commands;
pub mod error;
pub mod remote;
pub mod selection;
pub mod sources;
pub mod transport;
