#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty container id")]
    EmptyContainerID,
    #[error("container id `{id}` is {len} bytes long, the maximum is {max}")]
    ContainerIDTooLong { id: String, len: usize, max: usize },
}
pub type Result<T> = std::result::Result<T, Error>;
