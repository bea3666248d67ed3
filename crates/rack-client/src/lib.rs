//! Gecko Rack Client
//!
//! Typed access to the rack server plus the driver that turns placement
//! gestures into move and swap requests.

mod api;
mod config;
mod controller;
mod error;
mod http;
mod token;

pub use api::PlacementApi;
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use controller::{execute_action, operation_for, run_gesture, MachineSlot, PlacementController, PlacementEvent};
pub use error::{ApiError, ApiOperation};
pub use http::{HttpRackApi, PhotoUpload};
pub use token::{MemoryTokenStore, TokenStore, TOKEN_KEY};
