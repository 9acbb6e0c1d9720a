pub mod derive;
pub mod fee;
pub mod lineage;
pub mod provision;
pub mod register;
pub mod verify;
