//! Canonical request construction.
//!
//! Every function here must be bit-exact with the provider's verifier: any
//! difference in encoding, ordering or separators invalidates the signature.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
/// Fixed request-type suffix closing the credential scope.
pub const REQUEST_TYPE: &str = "aws4_request";
/// Prefix prepended to the secret key when deriving the signing key.
pub const KEY_PREFIX: &str = "AWS4";

/// Percent-encode per RFC 3986: everything except `A-Z a-z 0-9 - _ . ~`.
pub fn uri_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Canonical URI: each path segment encoded, `/` separators kept.
pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

/// Canonical query string: parameters sorted by name, `k=v` joined by `&`.
pub fn canonical_query_string(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn sorted_lowercase(headers: &[(String, String)]) -> Vec<(String, &str)> {
    let mut lowered: Vec<(String, &str)> = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.as_str()))
        .collect();
    lowered.sort();
    lowered
}

/// Canonical headers: `name:value\n` per header, names lower-cased and sorted.
///
/// Values are emitted as given; no trimming or whitespace folding.
pub fn canonical_headers(headers: &[(String, String)]) -> String {
    sorted_lowercase(headers)
        .into_iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect()
}

/// Signed headers: the sorted, lower-cased header names joined by `;`.
pub fn signed_headers(headers: &[(String, String)]) -> String {
    sorted_lowercase(headers)
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(";")
}

/// Full canonical request.
pub fn canonical_request(
    method: &str,
    path: &str,
    query: &[(String, String)],
    headers: &[(String, String)],
    body: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method,
        canonical_uri(path),
        canonical_query_string(query),
        canonical_headers(headers),
        signed_headers(headers),
        hex_sha256(body.as_bytes())
    )
}

/// `YYYYMMDD/region/service/aws4_request`.
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/{}", date, region, service, REQUEST_TYPE)
}

/// String to sign over the hashed canonical request.
pub fn string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex_sha256(canonical_request.as_bytes())
    )
}

/// Derive the scoped signing key: four chained HMACs over date, region,
/// service and the request-type suffix, seeded with `AWS4` + secret.
pub fn signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("{}{}", KEY_PREFIX, secret_key).as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, REQUEST_TYPE.as_bytes())
}

/// HMAC-SHA256 of `data` under `key`.
///
/// HMAC is defined for keys of any length (longer keys are hashed, shorter
/// ones zero-padded), so `new_from_slice` never returns `InvalidLength` for
/// `Hmac<Sha256>` and signing stays infallible.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_accepts_any_key_length() {
        // RFC 4231 test case 6: key longer than the block size.
        let long_key = [0xaa_u8; 131];
        assert_eq!(
            hex::encode(hmac_sha256(
                &long_key,
                b"Test Using Larger Than Block-Size Key - Hash Key First"
            )),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
        assert_eq!(
            hex::encode(hmac_sha256(b"", b"")),
            "b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
        );
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_body_hash() {
        assert_eq!(
            hex_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_canonical_uri_keeps_separators() {
        assert_eq!(canonical_uri("/"), "/");
        assert_eq!(canonical_uri(""), "/");
        assert_eq!(canonical_uri("/a b/c"), "/a%20b/c");
        assert_eq!(canonical_uri("/jobs/ü"), "/jobs/%C3%BC");
        assert_eq!(canonical_uri("/x:y"), "/x%3Ay");
    }

    #[test]
    fn test_canonical_query_sorted_and_encoded() {
        let query = pairs(&[("b", "2"), ("a", "x y"), ("c", "=&")]);
        assert_eq!(canonical_query_string(&query), "a=x%20y&b=2&c=%3D%26");
        assert_eq!(canonical_query_string(&[]), "");
    }

    #[test]
    fn test_canonical_query_order_independent() {
        let a = pairs(&[("Param2", "value2"), ("Param1", "value1"), ("Zed", "")]);
        let b = pairs(&[("Zed", ""), ("Param1", "value1"), ("Param2", "value2")]);
        let c = pairs(&[("Param1", "value1"), ("Zed", ""), ("Param2", "value2")]);
        assert_eq!(canonical_query_string(&a), canonical_query_string(&b));
        assert_eq!(canonical_query_string(&b), canonical_query_string(&c));
        assert_eq!(canonical_query_string(&a), "Param1=value1&Param2=value2&Zed=");
    }

    #[test]
    fn test_canonical_headers_lowercased_sorted() {
        let headers = pairs(&[
            ("X-Amz-Target", "RekognitionService.GetSegmentDetection"),
            ("Host", "rekognition.us-east-1.amazonaws.com"),
            ("Content-Type", "application/x-amz-json-1.1"),
        ]);
        assert_eq!(
            canonical_headers(&headers),
            "content-type:application/x-amz-json-1.1\n\
             host:rekognition.us-east-1.amazonaws.com\n\
             x-amz-target:RekognitionService.GetSegmentDetection\n"
        );
        assert_eq!(signed_headers(&headers), "content-type;host;x-amz-target");
    }

    #[test]
    fn test_canonical_headers_order_independent() {
        let base = [("Host", "h"), ("x-amz-date", "20150830T123600Z"), ("Accept", "application/json")];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let expected = canonical_headers(&pairs(&base));
        for order in orders {
            let permuted: Vec<(&str, &str)> = order.iter().map(|&i| base[i]).collect();
            assert_eq!(canonical_headers(&pairs(&permuted)), expected);
            assert_eq!(signed_headers(&pairs(&permuted)), "accept;host;x-amz-date");
        }
    }

    #[test]
    fn test_header_values_not_trimmed() {
        let headers = pairs(&[("X-Padded", "  spaced  value ")]);
        assert_eq!(canonical_headers(&headers), "x-padded:  spaced  value \n");
    }

    #[test]
    fn test_signing_key_derivation_vector() {
        // Published key-derivation example (iam, us-east-1, 20120215).
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_credential_scope_format() {
        assert_eq!(
            credential_scope("20150830", "us-east-1", "service"),
            "20150830/us-east-1/service/aws4_request"
        );
    }
}
