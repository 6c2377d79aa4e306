pub mod cleanup;
pub mod import;
pub mod model;
pub mod preview;
pub mod store;
pub mod tracing;
pub mod verify;

pub mod util {
    pub mod env;
}
