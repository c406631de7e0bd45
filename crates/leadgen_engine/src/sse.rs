use bytes::{Buf, BytesMut};

/// Incremental `text/event-stream` decoder yielding the `data` payload of
/// each complete event. Only `data` fields matter to the agent protocol;
/// `event`, `id`, `retry` and comment lines are skipped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one network chunk and returns every event it completed, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line = self.buffer.split_to(newline);
            self.buffer.advance(1);
            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Whether bytes of an unfinished event are still buffered.
    pub fn has_partial(&self) -> bool {
        !self.buffer.is_empty() || !self.data.is_empty()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        let payload = std::mem::take(&mut self.data).join("\n");
        if payload.is_empty() {
            None
        } else {
            Some(payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_events_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"type\":\"sta").is_empty());
        assert!(decoder.has_partial());
        let events = decoder.feed(b"tus\",\"message\":\"hi\"}\n\ndata: second\n");
        assert_eq!(events, vec![r#"{"type":"status","message":"hi"}"#.to_string()]);
        assert_eq!(decoder.feed(b"\n"), vec!["second".to_string()]);
        assert!(!decoder.has_partial());
    }

    #[test]
    fn handles_crlf_and_multiline_data() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: one\r\ndata:two\r\n\r\n");
        assert_eq!(events, vec!["one\ntwo".to_string()]);
    }

    #[test]
    fn skips_comments_other_fields_and_empty_events() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b": keep-alive\n\nevent: update\nid: 7\nretry: 100\ndata: x\n\n\n");
        assert_eq!(events, vec!["x".to_string()]);
    }

    #[test]
    fn multibyte_characters_survive_chunk_boundaries() {
        let mut decoder = SseDecoder::new();
        let text = "data: Zürich\n\n".as_bytes();
        let (head, tail) = text.split_at(8);
        assert!(decoder.feed(head).is_empty());
        assert_eq!(decoder.feed(tail), vec!["Zürich".to_string()]);
    }
}
