pub mod config;
pub mod context;
pub mod convert;
pub mod domain;
pub mod error;
pub mod filters;
pub mod mock;
pub mod normalize;
pub mod provider;
pub mod records;
pub mod resolve;
pub mod translate;
pub mod vocab;
