//! Parse HTTP response header lines into the fields the prober needs.

/// Header fields extracted from a HEAD response.
#[derive(Debug, Default)]
pub(crate) struct ProbedHeaders {
    pub content_length: Option<u64>,
    pub accept_ranges: Option<String>,
    pub content_type: Option<String>,
    /// `ETag` with surrounding double quotes stripped.
    pub etag: Option<String>,
}

pub(crate) fn parse_headers(lines: &[String]) -> ProbedHeaders {
    let mut out = ProbedHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    out.content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("accept-ranges") {
                out.accept_ranges = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-type") {
                out.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("etag") {
                out.etag = Some(value.trim_matches('"').to_string());
            }
        }
    }

    out
}

/// Whether an `Accept-Ranges` value commits the server to ranged requests.
/// Absent, empty, and the literal `none` all mean no; anything else is taken
/// at its word.
pub(crate) fn range_support_usable(accept_ranges: Option<&str>) -> bool {
    match accept_ranges {
        None => false,
        Some(v) => {
            let v = v.trim();
            !v.is_empty() && !v.eq_ignore_ascii_case("none")
        }
    }
}
