pub mod local;

pub use local::LocalWorkspace;
