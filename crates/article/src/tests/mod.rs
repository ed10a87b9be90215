//! Cross-module tests for sessions and the registry.

mod support;
