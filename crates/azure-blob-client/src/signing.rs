//! Canonical request form for the SharedKey authorization scheme
//!
//! The string-to-sign layout is the 2015-02-21+ service version: the verb,
//! eleven standard header fields, the canonicalized `x-ms-*` headers, and the
//! canonicalized resource.

use url::Url;

/// Build the canonical string for one request.
///
/// `ms_headers` holds the `x-ms-*` headers that will be sent with the
/// request; order does not matter, they are lowercased and sorted here.
pub(crate) fn string_to_sign(
    method: &str,
    account: &str,
    url: &Url,
    content_length: usize,
    content_type: Option<&str>,
    ms_headers: &[(&str, String)],
) -> String {
    // Content-Length is signed as the empty string when zero
    let length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    let mut out = String::new();
    out.push_str(method);
    out.push('\n');
    // Content-Encoding, Content-Language
    out.push_str("\n\n");
    out.push_str(&length);
    out.push('\n');
    // Content-MD5
    out.push('\n');
    out.push_str(content_type.unwrap_or(""));
    out.push('\n');
    // Date (x-ms-date is signed instead), If-Modified-Since, If-Match,
    // If-None-Match, If-Unmodified-Since, Range
    out.push_str("\n\n\n\n\n\n");
    out.push_str(&canonicalized_headers(ms_headers));
    out.push_str(&canonicalized_resource(account, url));
    out
}

fn canonicalized_headers(ms_headers: &[(&str, String)]) -> String {
    let mut headers: Vec<(String, &str)> = ms_headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
        .collect();
    headers.sort();

    let mut out = String::new();
    for (name, value) in headers {
        out.push_str(&name);
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }
    out
}

fn canonicalized_resource(account: &str, url: &Url) -> String {
    let mut out = format!("/{}{}", account, url.path());

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| (name.to_lowercase(), value.into_owned()))
        .collect();
    params.sort();

    let mut i = 0;
    while i < params.len() {
        let name = &params[i].0;
        let mut values = params[i].1.clone();
        let mut j = i + 1;
        // Repeated parameters are signed as one comma-joined line
        while j < params.len() && params[j].0 == *name {
            values.push(',');
            values.push_str(&params[j].1);
            j += 1;
        }
        out.push('\n');
        out.push_str(name);
        out.push(':');
        out.push_str(&values);
        i = j;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_layout_is_byte_exact() {
        let url = Url::parse("https://acct.blob.core.windows.net/certs/example.com").unwrap();
        let signed = string_to_sign(
            "GET",
            "acct",
            &url,
            0,
            None,
            &[
                // Deliberately unsorted
                ("x-ms-version", "2021-12-02".to_string()),
                ("x-ms-date", "Mon, 01 Jan 2024 00:00:00 GMT".to_string()),
            ],
        );
        assert_eq!(
            signed,
            "GET\n\n\n\n\n\n\n\n\n\n\n\n\
             x-ms-date:Mon, 01 Jan 2024 00:00:00 GMT\n\
             x-ms-version:2021-12-02\n\
             /acct/certs/example.com"
        );
    }

    #[test]
    fn test_put_carries_content_length() {
        let url = Url::parse("https://acct.blob.core.windows.net/certs/example.com").unwrap();
        let signed = string_to_sign(
            "PUT",
            "acct",
            &url,
            4,
            None,
            &[("x-ms-date", "Mon, 01 Jan 2024 00:00:00 GMT".to_string())],
        );
        assert_eq!(
            signed,
            "PUT\n\n\n4\n\n\n\n\n\n\n\n\n\
             x-ms-date:Mon, 01 Jan 2024 00:00:00 GMT\n\
             /acct/certs/example.com"
        );
    }

    #[test]
    fn test_zero_content_length_is_signed_empty() {
        let url = Url::parse("https://acct.blob.core.windows.net/certs/key").unwrap();
        let signed = string_to_sign("PUT", "acct", &url, 0, None, &[]);
        assert!(signed.starts_with("PUT\n\n\n\n"));
    }

    #[test]
    fn test_content_type_field() {
        let url = Url::parse("https://acct.blob.core.windows.net/certs/key").unwrap();
        let signed = string_to_sign("PUT", "acct", &url, 8, Some("application/x-pem-file"), &[]);
        assert_eq!(signed, "PUT\n\n\n8\n\napplication/x-pem-file\n\n\n\n\n\n\n/acct/certs/key");
    }

    #[test]
    fn test_query_parameters_are_canonicalized() {
        let url = Url::parse("http://127.0.0.1:10000/certs?restype=container").unwrap();
        let signed = string_to_sign("PUT", "acct", &url, 0, None, &[]);
        assert!(signed.ends_with("/acct/certs\nrestype:container"));
    }

    #[test]
    fn test_repeated_query_parameters_join_with_commas() {
        let url = Url::parse("http://127.0.0.1:10000/certs?include=metadata&include=snapshots").unwrap();
        let signed = string_to_sign("GET", "acct", &url, 0, None, &[]);
        assert!(signed.ends_with("/acct/certs\ninclude:metadata,snapshots"));
    }

    #[test]
    fn test_header_names_are_lowercased() {
        let url = Url::parse("https://acct.blob.core.windows.net/certs").unwrap();
        let signed = string_to_sign(
            "PUT",
            "acct",
            &url,
            0,
            None,
            &[("X-Ms-Blob-Type", "BlockBlob".to_string())],
        );
        assert!(signed.contains("x-ms-blob-type:BlockBlob\n"));
    }
}
