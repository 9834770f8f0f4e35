//! Stream abstraction
//!
//! Unified stream type for all layers to operate on.
//! The transport layer produces these; sessions and workers never
//! touch raw TCP types directly.

use tokio::io::{AsyncRead, AsyncWrite};

/// The core stream type used throughout the application.
/// All layers operate on this unified abstraction.
pub type Stream = Box<dyn AsyncReadWrite + Unpin + Send>;

/// Combined trait for async read + write
pub trait AsyncReadWrite: AsyncRead + AsyncWrite {}

impl<T: AsyncRead + AsyncWrite> AsyncReadWrite for T {}

/// Trait for types that can be converted into a Stream
pub trait IntoStream {
    fn into_stream(self) -> Stream;
}

impl<T> IntoStream for T
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    fn into_stream(self) -> Stream {
        Box::new(self)
    }
}
