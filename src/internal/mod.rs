pub mod background_thread;
pub mod buffer;
pub mod data_types;
pub mod events;
pub mod names;
pub mod timer;
