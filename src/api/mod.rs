mod backend;
#[cfg(test)]
pub(crate) mod test_server;

pub use backend::BackendClient;
