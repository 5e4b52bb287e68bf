pub mod health;
pub mod patients;
pub mod visits;
