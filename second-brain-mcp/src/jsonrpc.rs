//! Minimal JSON-RPC 2.0 framing over stdio: line-delimited JSON or
//! LSP-style `Content-Length` framing, whichever the client sends.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Read, Write};

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    #[must_use]
    pub fn ok(id: Option<Value>, result: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    #[must_use]
    pub fn err(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError { code, message: message.into(), data: None }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Read one message, supporting both a bare JSON line and an LSP-style
/// `Content-Length` header block. Returns `None` at EOF.
pub fn read_next_message<R: BufRead + Read>(reader: &mut R) -> io::Result<Option<String>> {
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('{') {
            return Ok(Some(trimmed.to_string()));
        }

        let low = trimmed.to_ascii_lowercase();
        if low.starts_with("content-length:") {
            let parts: Vec<&str> = trimmed.splitn(2, ':').collect();
            let len: usize = parts.get(1).map(|s| s.trim().parse().unwrap_or(0)).unwrap_or(0);

            loop {
                let mut hline = String::new();
                let hn = reader.read_line(&mut hline)?;
                if hn == 0 || hline.trim().is_empty() {
                    break;
                }
            }

            if len == 0 {
                continue;
            }
            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf)?;
            return Ok(Some(String::from_utf8_lossy(&buf).to_string()));
        }

        continue;
    }
}

pub fn write_response<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    let body = serde_json::to_string(response).unwrap_or_else(|_| {
        r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#.to_string()
    });
    writer.write_all(body.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_a_bare_json_line() {
        let mut reader = Cursor::new(b"{\"jsonrpc\":\"2.0\",\"method\":\"ping\"}\n".to_vec());
        let message = read_next_message(&mut reader).unwrap().unwrap();
        assert!(message.contains("ping"));
    }

    #[test]
    fn reads_a_content_length_framed_message() {
        let body = r#"{"jsonrpc":"2.0","method":"ping"}"#;
        let framed = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
        let mut reader = Cursor::new(framed.into_bytes());
        let message = read_next_message(&mut reader).unwrap().unwrap();
        assert_eq!(message, body);
    }

    #[test]
    fn returns_none_at_eof() {
        let mut reader = Cursor::new(Vec::<u8>::new());
        assert!(read_next_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn writes_a_newline_terminated_response() {
        let mut buf = Vec::new();
        write_response(&mut buf, &JsonRpcResponse::ok(Some(Value::from(1)), serde_json::json!({"ok": true}))).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with('\n'));
        assert!(text.contains("\"ok\":true"));
    }
}
