pub mod activities;
pub mod buildings;
pub mod health;
pub mod organizations;
