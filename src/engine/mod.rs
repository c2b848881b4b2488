mod authorizer;
mod batch;

pub use authorizer::Authorizer;
