use bytes::Bytes;
use futures_core::Stream;
use std::pin::Pin;

/// Stream of bytes for video content
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Wrap any compatible stream into a [`ByteStream`].
pub fn boxed<S>(stream: S) -> ByteStream
where
    S: Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static,
{
    Box::pin(stream)
}

/// A byte stream that yields `data` split into chunks of `chunk_size`.
///
/// Mostly useful for tests and for serving the in-memory backend.
pub fn chunked(data: Bytes, chunk_size: usize) -> ByteStream {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(data.len() / chunk_size + 1);
    let mut offset = 0;
    while offset < data.len() {
        let end = (offset + chunk_size).min(data.len());
        chunks.push(Ok(data.slice(offset..end)));
        offset = end;
    }
    Box::pin(futures_util::stream::iter(chunks))
}
