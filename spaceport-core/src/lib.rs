#![deny(missing_docs)]
//! Spaceport core library.
//!
//! Domain types, filter composition, validation rules and the ship
//! lifecycle service shared by the server and the CLI.

pub mod domain;
pub mod error;
pub mod filter;
pub mod memory;
pub mod service;
pub mod store;
pub mod validation;

pub use domain::{NewShip, PageRequest, Ship, ShipDraft, ShipOrder, ShipType};
pub use error::{Result, ShipError};
pub use filter::{Criterion, InclusiveRange, ShipFilter, ShipPredicate, compose};
pub use memory::MemoryShipStore;
pub use service::ShipService;
pub use store::{SharedStore, ShipStore};
pub use validation::{check_id, compute_rating, round_speed};
