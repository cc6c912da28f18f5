use std::mem;
use std::str::FromStr;

use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::error::Error;
use crate::error::Result;

/// Signing context for request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        let query_size = self.query_size();

        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            // Build path and query.
            uri_parts.path_and_query = {
                let paq = if query_size == 0 {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(query_size + 1);

                    s.push('?');
                    for (i, (k, v)) in self.query.iter().enumerate() {
                        if i > 0 {
                            s.push('&');
                        }

                        s.push_str(k);
                        if !v.is_empty() {
                            s.push('=');
                            s.push_str(v);
                        }
                    }

                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Convert sorted query to the canonicalized resource lines.
    ///
    /// Parameters sharing a name are folded into one entry whose values are
    /// sorted and comma joined. A parameter without value still renders its
    /// separator:
    ///
    /// ```shell
    /// [(b, 2), (a, 1), (b, 1), (c, "")] => "a:1\nb:1,2\nc:"
    /// ```
    pub fn query_to_resource_string(
        mut query: Vec<(String, String)>,
        sep: &str,
        join: &str,
    ) -> String {
        // Sorting pairs keeps values of a repeated name in ascending order.
        query.sort();

        let mut lines: Vec<(String, String)> = Vec::with_capacity(query.len());
        for (k, v) in query {
            match lines.last_mut() {
                Some((name, values)) if *name == k => {
                    values.push(',');
                    values.push_str(&v);
                }
                _ => lines.push((k, v)),
            }
        }

        let mut s = String::with_capacity(16);
        for (idx, (k, v)) in lines.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    /// Get headers with given prefix as a vector.
    ///
    /// Header names are always compared lowercase, so the prefix filter is
    /// case insensitive. Repeated headers are comma joined in insertion
    /// order; values have leading whitespace and line breaks removed.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        self.headers
            .keys()
            // Filter all headers that start with prefix
            .filter(|k| k.as_str().starts_with(prefix))
            .map(|k| {
                let value = self
                    .headers
                    .get_all(k)
                    .iter()
                    .map(|v| {
                        v.to_str()
                            .expect("must be valid header")
                            .trim_start()
                            .replace("\r\n", "")
                    })
                    .collect::<Vec<_>>()
                    .join(",");

                (k.as_str().to_lowercase(), value)
            })
            .collect()
    }

    /// Convert sorted headers to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d"
    /// ```
    pub fn header_to_string(mut headers: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        // Sort via header name.
        headers.sort();

        for (idx, (k, v)) in headers.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ErrorKind;

    fn parts_of(req: http::Request<()>) -> http::request::Parts {
        req.into_parts().0
    }

    #[test]
    fn test_build_splits_uri() {
        let mut parts = parts_of(
            http::Request::get("https://contoso.blob.core.windows.net/photos/test.txt?comp=list&prefix=a%2Fb")
                .body(())
                .expect("request must be valid"),
        );

        let ctx = SigningRequest::build(&mut parts).expect("build must succeed");

        assert_eq!(ctx.method, Method::GET);
        assert_eq!(ctx.scheme, Scheme::HTTPS);
        assert_eq!(ctx.authority.as_str(), "contoso.blob.core.windows.net");
        assert_eq!(ctx.path, "/photos/test.txt");
        assert_eq!(
            ctx.query,
            vec![
                ("comp".to_string(), "list".to_string()),
                ("prefix".to_string(), "a/b".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_rejects_uri_without_authority() {
        let mut parts = parts_of(
            http::Request::get("/photos/test.txt")
                .body(())
                .expect("request must be valid"),
        );

        let err = SigningRequest::build(&mut parts).expect_err("build must fail");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_apply_rebuilds_uri() {
        let mut parts = parts_of(
            http::Request::get("https://contoso.blob.core.windows.net/photos?comp=list&restype=container")
                .body(())
                .expect("request must be valid"),
        );

        let mut ctx = SigningRequest::build(&mut parts).expect("build must succeed");
        ctx.headers
            .insert("x-ms-date", "Mon, 15 Aug 2022 16:50:12 GMT".parse().expect("valid value"));
        ctx.apply(&mut parts).expect("apply must succeed");

        assert_eq!(
            parts.uri.to_string(),
            "https://contoso.blob.core.windows.net/photos?comp=list&restype=container"
        );
        assert!(parts.headers.contains_key("x-ms-date"));
    }

    #[test]
    fn test_apply_keeps_valueless_query_param() {
        let mut parts = parts_of(
            http::Request::get("https://contoso.blob.core.windows.net/photos?comp")
                .body(())
                .expect("request must be valid"),
        );

        let ctx = SigningRequest::build(&mut parts).expect("build must succeed");
        ctx.apply(&mut parts).expect("apply must succeed");

        assert_eq!(
            parts.uri.to_string(),
            "https://contoso.blob.core.windows.net/photos?comp"
        );
    }

    #[test]
    fn test_header_to_vec_with_prefix() {
        let mut parts = parts_of(
            http::Request::put("https://contoso.blob.core.windows.net/photos/test.txt")
                .header("X-Ms-Version", "2021-12-02")
                .header("x-ms-blob-type", "  BlockBlob")
                .header("Content-Type", "text/plain")
                .body(())
                .expect("request must be valid"),
        );

        let ctx = SigningRequest::build(&mut parts).expect("build must succeed");
        let headers = SigningRequest::header_to_string(ctx.header_to_vec_with_prefix("x-ms-"), ":", "\n");

        assert_eq!(headers, "x-ms-blob-type:BlockBlob\nx-ms-version:2021-12-02");
    }

    #[test]
    fn test_header_to_vec_with_prefix_joins_repeated_headers() {
        let mut parts = parts_of(
            http::Request::put("https://contoso.blob.core.windows.net/photos/test.txt")
                .header("x-ms-meta-tag", "beta")
                .header("x-ms-meta-tag", "alpha")
                .body(())
                .expect("request must be valid"),
        );

        let ctx = SigningRequest::build(&mut parts).expect("build must succeed");
        let headers = ctx.header_to_vec_with_prefix("x-ms-");

        // Repeated values keep their insertion order, not sorted.
        assert_eq!(
            headers,
            vec![("x-ms-meta-tag".to_string(), "beta,alpha".to_string())]
        );
    }

    #[test]
    fn test_query_to_resource_string() {
        let query = vec![
            ("restype".to_string(), "container".to_string()),
            ("comp".to_string(), "list".to_string()),
        ];

        assert_eq!(
            SigningRequest::query_to_resource_string(query, ":", "\n"),
            "comp:list\nrestype:container"
        );
    }

    #[test]
    fn test_query_to_resource_string_merges_repeated_names() {
        let query = vec![
            ("include".to_string(), "snapshots".to_string()),
            ("comp".to_string(), "list".to_string()),
            ("include".to_string(), "metadata".to_string()),
        ];

        assert_eq!(
            SigningRequest::query_to_resource_string(query, ":", "\n"),
            "comp:list\ninclude:metadata,snapshots"
        );
    }

    #[test]
    fn test_query_to_resource_string_keeps_separator_for_empty_value() {
        let query = vec![("comp".to_string(), "".to_string())];

        assert_eq!(SigningRequest::query_to_resource_string(query, ":", "\n"), "comp:");
    }
}
