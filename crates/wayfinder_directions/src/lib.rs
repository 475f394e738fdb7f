pub mod endpoint;
pub mod error;
pub mod flow;
pub mod normalize;
pub mod request;
pub mod resolver;
pub mod search;

#[cfg(test)]
pub(crate) mod test_utils;
