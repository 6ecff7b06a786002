//! Integration tests

mod config_test;
mod desk_test;
mod sizing_test;
