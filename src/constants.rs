use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in azure storage services.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_PREFIX: &str = "x-ms-";
pub const CONTENT_MD5: &str = "content-md5";

/// AsciiSet for uri query values.
///
/// Every character except ALPHA / DIGIT / "-" / "." / "_" / "*" is escaped.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');
