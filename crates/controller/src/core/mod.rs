pub mod allowance;
pub mod controller;
pub mod lifecycle;
pub mod network;
pub mod snapshot;
pub mod validator;
