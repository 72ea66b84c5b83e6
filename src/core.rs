// src/core.rs
pub mod corpus;
pub mod filter;
pub mod ignore;
pub mod index;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod scorer;
