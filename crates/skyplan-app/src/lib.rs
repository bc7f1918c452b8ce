// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod filter;
pub mod grid;
pub mod ids;
pub mod model;
pub mod plan;
pub mod state;
pub mod store;

pub use filter::*;
pub use grid::*;
pub use ids::*;
pub use model::*;
pub use plan::*;
pub use state::*;
pub use store::*;
