//! Unit tests for board synchronisation.
