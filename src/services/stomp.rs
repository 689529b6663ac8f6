//! STOMP 1.2 frame codec
//!
//! Frames travel as WebSocket text messages:
//!
//! ```text
//! COMMAND\n
//! header:value\n
//! ...\n
//! \n
//! body\0
//! ```
//!
//! Bare end-of-line messages are heart-beats and decode to no frame.

use crate::error::{Error, Result};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Send,
    Subscribe,
    Unsubscribe,
    Message,
    Receipt,
    Error,
    Disconnect,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Send => "SEND",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
            Command::Disconnect => "DISCONNECT",
        }
    }

    fn parse(line: &str) -> Result<Self> {
        Ok(match line {
            "CONNECT" | "STOMP" => Command::Connect,
            "CONNECTED" => Command::Connected,
            "SEND" => Command::Send,
            "SUBSCRIBE" => Command::Subscribe,
            "UNSUBSCRIBE" => Command::Unsubscribe,
            "MESSAGE" => Command::Message,
            "RECEIPT" => Command::Receipt,
            "ERROR" => Command::Error,
            "DISCONNECT" => Command::Disconnect,
            other => {
                return Err(Error::Stomp {
                    message: format!("unknown command {other:?}"),
                });
            }
        })
    }

    /// CONNECT and CONNECTED headers are sent without escaping.
    fn escapes_headers(self) -> bool {
        !matches!(self, Command::Connect | Command::Connected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of a header; repeated headers keep the first occurrence.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    // ==================== Client frames ====================

    pub fn connect(host: &str, heart_beat_ms: u64) -> Self {
        Frame::new(Command::Connect)
            .header("accept-version", "1.2")
            .header("host", host)
            .header("heart-beat", format!("{heart_beat_ms},{heart_beat_ms}"))
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Frame::new(Command::Subscribe)
            .header("id", id)
            .header("destination", destination)
            .header("ack", "auto")
    }

    pub fn send(destination: &str, body: &str) -> Self {
        Frame::new(Command::Send)
            .header("destination", destination)
            .header("content-type", "text/plain;charset=UTF-8")
            .body(body)
    }

    pub fn disconnect(receipt: &str) -> Self {
        Frame::new(Command::Disconnect).header("receipt", receipt)
    }

    // ==================== Codec ====================

    pub fn encode(&self) -> String {
        let escape = self.command.escapes_headers();
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(self.command.as_str());
        out.push('\n');
        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        if !self.body.is_empty() && self.get("content-length").is_none() {
            out.push_str(&format!("content-length:{}\n", self.body.len()));
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Decode every frame in `input`, skipping heart-beats.
    pub fn decode_all(input: &str) -> Result<Vec<Frame>> {
        let mut frames = Vec::new();
        let mut rest = input;
        loop {
            rest = rest.trim_start_matches(['\r', '\n']);
            if rest.is_empty() {
                return Ok(frames);
            }
            let (frame, tail) = decode_one(rest)?;
            frames.push(frame);
            rest = tail;
        }
    }
}

fn decode_one(input: &str) -> Result<(Frame, &str)> {
    let Some((head, after_head)) = split_head(input) else {
        return Err(Error::Stomp {
            message: "frame without header terminator".to_string(),
        });
    };

    let mut lines = head.lines();
    let command = Command::parse(lines.next().unwrap_or_default().trim_end_matches('\r'))?;
    let escaped = command.escapes_headers();

    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim_end_matches('\r');
        let Some((name, value)) = line.split_once(':') else {
            return Err(Error::Stomp {
                message: format!("malformed header {line:?}"),
            });
        };
        if escaped {
            headers.push((unescape_header(name)?, unescape_header(value)?));
        } else {
            headers.push((name.to_string(), value.to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.trim().parse::<usize>().ok());

    let (body, tail) = match content_length {
        Some(len) => {
            let body = after_head.get(..len).ok_or_else(|| Error::Stomp {
                message: "content-length exceeds frame".to_string(),
            })?;
            let tail = &after_head[len..];
            let tail = tail.strip_prefix('\0').ok_or_else(|| Error::Stomp {
                message: "missing NUL after body".to_string(),
            })?;
            (body, tail)
        }
        None => match after_head.split_once('\0') {
            Some((body, tail)) => (body, tail),
            None => {
                return Err(Error::Stomp {
                    message: "missing NUL terminator".to_string(),
                });
            }
        },
    };

    Ok((
        Frame {
            command,
            headers,
            body: body.to_string(),
        },
        tail,
    ))
}

/// Split at the blank line ending the headers (`\n\n` or `\r\n\r\n`).
fn split_head(input: &str) -> Option<(&str, &str)> {
    let lf = input.find("\n\n").map(|i| (i, 2));
    let crlf = input.find("\r\n\r\n").map(|i| (i, 4));
    let (index, len) = match (lf, crlf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    Some((&input[..index], &input[index + len..]))
}

fn escape_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_header(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            other => {
                return Err(Error::Stomp {
                    message: format!("invalid header escape \\{}", other.unwrap_or(' ')),
                });
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_connect_frame() {
        let encoded = Frame::connect("localhost", 10_000).encode();
        assert_eq!(
            encoded,
            "CONNECT\naccept-version:1.2\nhost:localhost\nheart-beat:10000,10000\n\n\0"
        );
    }

    #[test]
    fn test_encode_send_adds_content_length() {
        let encoded = Frame::send("/app/sendMessage", "hola").encode();
        assert!(encoded.starts_with("SEND\ndestination:/app/sendMessage\n"));
        assert!(encoded.ends_with("content-length:4\n\nhola\0"));
    }

    #[test]
    fn test_decode_message_frame() {
        let raw = "MESSAGE\ndestination:/topic/asignaciones\nsubscription:sub-0\nmessage-id:1\n\nTarea asignada\0";
        let frames = Frame::decode_all(raw).expect("decode");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].command, Command::Message);
        assert_eq!(frames[0].get("subscription"), Some("sub-0"));
        assert_eq!(frames[0].body, "Tarea asignada");
    }

    #[test]
    fn test_decode_heartbeat_is_empty() {
        assert!(Frame::decode_all("\n").expect("decode").is_empty());
        assert!(Frame::decode_all("\r\n\n").expect("decode").is_empty());
    }

    #[test]
    fn test_decode_with_content_length_and_crlf() {
        let raw = "MESSAGE\r\ncontent-length:5\r\n\r\na\0b c\0\nRECEIPT\nreceipt-id:77\n\n\0";
        let frames = Frame::decode_all(raw).expect("decode");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].body, "a\0b c");
        assert_eq!(frames[1].command, Command::Receipt);
        assert_eq!(frames[1].get("receipt-id"), Some("77"));
    }

    #[test]
    fn test_header_escaping_round_trip() {
        let frame = Frame::new(Command::Send).header("destination", "/topic/a:b\\c\nd");
        let encoded = frame.encode();
        assert!(encoded.contains("destination:/topic/a\\cb\\\\c\\nd\n"));
        let decoded = Frame::decode_all(&encoded).expect("decode");
        assert_eq!(decoded[0].get("destination"), Some("/topic/a:b\\c\nd"));
    }

    #[test]
    fn test_decode_errors() {
        assert!(Frame::decode_all("BOGUS\n\n\0").is_err());
        assert!(Frame::decode_all("MESSAGE\nno-colon\n\n\0").is_err());
        assert!(Frame::decode_all("MESSAGE\n\nbody without nul").is_err());
        assert!(Frame::decode_all("MESSAGE\nbad:\\x\n\n\0").is_err());
    }
}
