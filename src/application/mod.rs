// Cursor-following fetch loop
pub mod pagination;

// Scrape-time gauge refresh
pub mod refresher;

// Webhook authentication and ingestion
pub mod webhook;

// Wiring
pub mod system;
