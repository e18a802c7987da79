//! Unit tests for the board domain, in-memory adapter, and service.
