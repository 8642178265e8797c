// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth, veterinarian resolved by middleware)

pub mod protected; // Tier 2: JWT authentication required
pub mod public; // Tier 1: No authentication required
pub mod utils;
