use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Longest line accepted from a client, newline included. Anything longer
/// is treated as a misbehaving client.
pub const MAX_LINE_LENGTH: usize = 1024;

/// Read one newline-terminated line, without the trailing whitespace.
/// Returns `None` on a clean EOF.
pub async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>> {
    buf.clear();
    let n = (&mut *reader)
        .take(MAX_LINE_LENGTH as u64)
        .read_until(b'\n', buf)
        .await?;
    if n == 0 {
        return Ok(None);
    }
    if n >= MAX_LINE_LENGTH && buf.last() != Some(&b'\n') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds maximum allowed length of {MAX_LINE_LENGTH} bytes"),
        ));
    }
    Ok(Some(String::from_utf8_lossy(buf).trim().to_string()))
}

/// Write `line` followed by a newline in a single write.
pub async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> io::Result<()> {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    writer.write_all(buf.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use std::io;
    use tokio::io::{AsyncWriteExt, BufReader, duplex};

    use super::{MAX_LINE_LENGTH, read_line, write_line};

    #[tokio::test]
    async fn write_and_read() {
        let (mut client, server) = duplex(4096);
        let mut reader = BufReader::new(server);
        let mut buf = Vec::new();

        write_line(&mut client, "Hello, World!").await.unwrap();
        write_line(&mut client, "second").await.unwrap();
        assert_eq!(
            read_line(&mut reader, &mut buf).await.unwrap().as_deref(),
            Some("Hello, World!")
        );
        assert_eq!(
            read_line(&mut reader, &mut buf).await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn carriage_returns_are_trimmed() {
        let (mut client, server) = duplex(64);
        let mut reader = BufReader::new(server);
        let mut buf = Vec::new();

        client.write_all(b"h\r\n").await.unwrap();
        assert_eq!(
            read_line(&mut reader, &mut buf).await.unwrap().as_deref(),
            Some("h")
        );
    }

    #[tokio::test]
    async fn eof_is_none() {
        let (client, server) = duplex(64);
        drop(client);
        let mut reader = BufReader::new(server);
        let mut buf = Vec::new();
        assert_eq!(read_line(&mut reader, &mut buf).await.unwrap(), None);
    }

    #[tokio::test]
    async fn reject_oversized_line() {
        let (mut client, server) = duplex(4 * MAX_LINE_LENGTH);
        let mut reader = BufReader::new(server);
        let mut buf = Vec::new();

        client
            .write_all("x".repeat(2 * MAX_LINE_LENGTH).as_bytes())
            .await
            .unwrap();
        assert_eq!(
            read_line(&mut reader, &mut buf).await.map_err(|e| e.kind()),
            Err(io::ErrorKind::InvalidData)
        );
    }
}
