//! API Seams
//!
//! The placement driver only needs to list racks and relocate geckos.
//! `HttpRackApi` implements this against the server; tests use an in-memory fake.

use async_trait::async_trait;
use rack_domain::{Gecko, GeckoId, MoveGecko, Rack, SwapResult};

use crate::error::ApiError;

/// Calls the placement controller makes
///
/// `?Send` because browser futures are not `Send`.
#[async_trait(?Send)]
pub trait PlacementApi {
    /// All racks of the signed-in user with their occupants
    async fn list_racks(&self) -> Result<Vec<Rack>, ApiError>;

    /// Put a gecko at `target`, possibly in another rack
    async fn move_gecko(&self, id: GeckoId, target: &MoveGecko) -> Result<Gecko, ApiError>;

    /// Exchange the cells of two geckos in one request
    async fn swap_geckos(&self, first: GeckoId, second: GeckoId) -> Result<SwapResult, ApiError>;
}
