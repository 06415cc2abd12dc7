pub mod corpus;
pub mod event;
pub mod session;
