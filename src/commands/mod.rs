pub mod sync;

pub use sync::handle_sync_command;
