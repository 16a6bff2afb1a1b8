//! WebSocket End-to-End Tests

mod relay_tests;
