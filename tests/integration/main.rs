//! Integration tests for Shopify-Sync
//!
//! These tests use wiremock to stand in for a Shopify store and a PostHog
//! instance, and run the sync end-to-end over real HTTP.

mod sync_tests;
