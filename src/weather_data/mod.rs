pub mod cached_fetcher;
pub mod error;
pub mod fetcher;
pub mod pws_fetcher;
pub(crate) mod response;

#[cfg(test)]
pub(crate) mod stub;
