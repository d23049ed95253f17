//! Reading the exposition text.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Error;

/// Read the whole input: the file when a path is given, standard input otherwise.
pub async fn read_input(path: Option<&Path>) -> Result<String, Error> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Input {
                path: path.to_path_buf(),
                source,
            }),
        None => read_stream(tokio::io::stdin()).await,
    }
}

/// Read a stream to its end as UTF-8.
pub async fn read_stream<R: AsyncRead + Unpin>(mut reader: R) -> Result<String, Error> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .await
        .map_err(Error::Stdin)?;
    Ok(text)
}
