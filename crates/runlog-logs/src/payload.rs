use runlog_types::{ExecutionResponse, PayloadFormat};

/// Split an execution response into webout, log and print output.
///
/// The payload is `webout SENTINEL log SENTINEL print`. Anything after a
/// third sentinel stays in the print output. A payload without the sentinel
/// is treated as a bare log.
pub fn parse_response(payload: &str, sentinel: &str) -> ExecutionResponse {
    if sentinel.is_empty() || !payload.contains(sentinel) {
        tracing::warn!(
            bytes = payload.len(),
            "execution response has no log separator, treating it as a plain log"
        );
        return ExecutionResponse::opaque(payload);
    }

    let mut parts = payload.splitn(3, sentinel);
    let webout = parts.next().unwrap_or_default();
    let log = parts.next().unwrap_or_default();
    let print_output = parts.next().unwrap_or_default();

    ExecutionResponse {
        webout: webout.to_string(),
        log: log.to_string(),
        print_output: print_output.to_string(),
        format: PayloadFormat::ThreePart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = "--SEP--";

    #[test]
    fn test_three_parts() {
        let response = parse_response("{\"ok\":1}--SEP--line 1\nline 2--SEP--printed", SEP);
        assert_eq!(response.webout, "{\"ok\":1}");
        assert_eq!(response.log, "line 1\nline 2");
        assert_eq!(response.print_output, "printed");
        assert_eq!(response.format, PayloadFormat::ThreePart);
    }

    #[test]
    fn test_missing_sentinel_is_opaque() {
        let response = parse_response("ERROR: everything", SEP);
        assert_eq!(response.log, "ERROR: everything");
        assert!(response.webout.is_empty());
        assert!(response.print_output.is_empty());
        assert_eq!(response.format, PayloadFormat::Opaque);
    }

    #[test]
    fn test_two_parts() {
        let response = parse_response("web--SEP--the log", SEP);
        assert_eq!(response.webout, "web");
        assert_eq!(response.log, "the log");
        assert!(response.print_output.is_empty());
    }

    #[test]
    fn test_extra_sentinel_stays_in_print() {
        let response = parse_response("a--SEP--b--SEP--c--SEP--d", SEP);
        assert_eq!(response.log, "b");
        assert_eq!(response.print_output, "c--SEP--d");
    }

    #[test]
    fn test_empty_segments() {
        let response = parse_response("--SEP----SEP--", SEP);
        assert!(response.webout.is_empty());
        assert!(response.log.is_empty());
        assert!(response.print_output.is_empty());
        assert_eq!(response.format, PayloadFormat::ThreePart);
    }
}
