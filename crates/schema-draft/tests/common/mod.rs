pub mod assertions;
pub mod stores;
