//! Property-based tests for collision descriptions and cards

mod collision_properties;
