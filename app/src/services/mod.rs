pub mod archive;
pub mod folder;
