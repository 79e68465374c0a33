//! Decoding of the authentication headers consoles attach to every request.
//!
//! Neither header is ever verified. The service token is reduced to a
//! [`Fingerprint`]; the parameter pack is read into a [`ParamPack`] on a
//! best-effort basis. Failures here never abort a request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::DecodeError;
use crate::types::{Fingerprint, ParamPack, ServiceToken};

/// Separator between keys and values inside a decoded parameter pack.
const PARAM_PACK_SEPARATOR: char = '\\';

/// Decode a `X-Nintendo-Servicetoken` header value into its fingerprint.
///
/// An empty value decodes to the empty fingerprint.
///
/// # Errors
///
/// Returns [`DecodeError::Base64`] if the value is not standard base64.
pub fn decode_service_token(raw: &str) -> Result<Fingerprint, DecodeError> {
    let bytes = STANDARD.decode(raw)?;
    Ok(Fingerprint::from_bytes(&bytes))
}

/// Decode a service token header, keeping the raw value on failure.
pub fn read_service_token(raw: &str) -> ServiceToken {
    match decode_service_token(raw) {
        Ok(fingerprint) => ServiceToken::Decoded {
            raw: raw.to_string(),
            fingerprint,
        },
        Err(error) => ServiceToken::Undecodable {
            raw: raw.to_string(),
            error,
        },
    }
}

/// Decode a `X-Nintendo-Parampack` header value.
///
/// Never fails hard: a pack that is not base64 yields a defaulted
/// [`ParamPack`] together with the error describing why.
pub fn decode_param_pack(raw: &str) -> (ParamPack, Option<DecodeError>) {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return (ParamPack::default(), Some(DecodeError::Empty));
    }

    let bytes = match STANDARD.decode(stripped.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => return (ParamPack::default(), Some(e.into())),
    };

    let text = String::from_utf8_lossy(&bytes);
    (parse_param_pack(&text), None)
}

/// Read a decoded, backslash-separated parameter pack.
///
/// A recognised key consumes the element after it as its value, even when
/// that element is itself a key name. Anything else is skipped one element
/// at a time, including a trailing key with no value. Skipping singly keeps
/// the walk aligned across the empty elements produced by leading and
/// trailing separators, so an unknown key's value is read as a key and
/// ignored unless it happens to be a key name.
pub fn parse_param_pack(text: &str) -> ParamPack {
    let elements: Vec<&str> = text.split(PARAM_PACK_SEPARATOR).collect();
    let mut pack = ParamPack::default();

    let mut index = 0;
    while index < elements.len() {
        let key = elements[index];
        match elements.get(index + 1) {
            Some(value) if ParamPack::is_known_key(key) => {
                pack.set(key, value);
                index += 2;
            }
            _ => index += 1,
        }
    }

    pack
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> String {
        STANDARD.encode(text)
    }

    #[test]
    fn test_service_token_round_trip() {
        let all: Vec<u8> = (0u8..=255).collect();
        let cases: [&[u8]; 4] = [&all, b"", b"\x00", b"console"];
        for bytes in cases {
            let fingerprint = decode_service_token(&STANDARD.encode(bytes)).unwrap();
            assert_eq!(fingerprint.as_str(), hex::encode(bytes));
        }
    }

    #[test]
    fn test_service_token_malformed() {
        let err = decode_service_token("not-base64!").unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn test_empty_service_token_is_not_probed() {
        assert_eq!(decode_service_token("").unwrap().as_str(), "");

        let token = read_service_token("");
        assert_eq!(token.fingerprint().map(Fingerprint::as_str), Some(""));
        assert!(!token.is_ban_check_eligible());

        assert!(matches!(
            decode_service_token("   "),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_read_service_token_falls_back_to_raw() {
        let token = read_service_token("not-base64!");
        assert!(!token.is_ban_check_eligible());
        assert_eq!(token.display_identity(), "not-base64!");
        assert_eq!(token.raw(), "not-base64!");

        let token = read_service_token("3q2+7w==");
        assert!(token.is_ban_check_eligible());
        assert_eq!(token.display_identity(), "deadbeef");
        assert_eq!(token.raw(), "3q2+7w==");
    }

    #[test]
    fn test_param_pack_basic() {
        let raw = encode(r"title_id\0004800000123456\platform_id\2\tz_name\UTC");
        let (pack, err) = decode_param_pack(&raw);
        assert!(err.is_none());
        assert_eq!(
            pack,
            ParamPack {
                title_id: "0004800000123456".into(),
                platform_id: 2,
                tz_name: "UTC".into(),
                ..ParamPack::default()
            }
        );
    }

    #[test]
    fn test_param_pack_console_layout() {
        // Consoles wrap the pack in leading and trailing separators.
        let raw = encode(
            r"\title_id\0005001010040100\access_key\0\platform_id\1\region_id\2\language_id\1\country_id\49\area_id\0\network_restriction\0\friend_restriction\0\rating_restriction\20\rating_organization\0\transferable_id\12385861680304927649\tz_name\America/New_York\utc_offset\-14400\remaster_version\0\",
        );
        let (pack, err) = decode_param_pack(&raw);
        assert!(err.is_none());
        assert_eq!(pack.title_id, "0005001010040100");
        assert_eq!(pack.access_key, "0");
        assert_eq!(pack.platform_id, 1);
        assert_eq!(pack.region_id, 2);
        assert_eq!(pack.country_id, 49);
        assert_eq!(pack.rating_restriction, 20);
        assert_eq!(pack.transferable_id, "12385861680304927649");
        assert_eq!(pack.tz_name, "America/New_York");
        assert_eq!(pack.utc_offset, -14400);
    }

    #[test]
    fn test_param_pack_whitespace_is_stripped() {
        let encoded = encode(r"platform_id\1\region_id\4");
        let (head, tail) = encoded.split_at(6);
        let raw = format!(" {head}\n\t{tail} ");
        let (pack, err) = decode_param_pack(&raw);
        assert!(err.is_none());
        assert_eq!(pack.platform_id, 1);
        assert_eq!(pack.region_id, 4);
    }

    #[test]
    fn test_param_pack_unknown_and_trailing_keys() {
        let raw = encode(r"shoe_size\44\platform_id\2\region_id");
        let (pack, err) = decode_param_pack(&raw);
        assert!(err.is_none());
        assert_eq!(pack.platform_id, 2);
        assert_eq!(pack.region_id, 0);
    }

    #[test]
    fn test_param_pack_value_named_like_a_key() {
        // `mystery` consumes nothing, so `tz_name` takes `region_id` as its
        // value and the trailing `4` is skipped.
        let raw = encode(r"mystery\tz_name\region_id\4");
        let (pack, err) = decode_param_pack(&raw);
        assert!(err.is_none());
        assert_eq!(pack.tz_name, "region_id");
        assert_eq!(pack.region_id, 0);

        // An unknown key's value is walked as a key of its own.
        let raw = encode(r"mystery\region_id\4");
        let (pack, _) = decode_param_pack(&raw);
        assert_eq!(pack.region_id, 4);
    }

    #[test]
    fn test_param_pack_bad_number() {
        let raw = encode(r"platform_id\wiiu\utc_offset\3600");
        let (pack, _) = decode_param_pack(&raw);
        assert_eq!(pack.platform_id, 0);
        assert_eq!(pack.utc_offset, 3600);
    }

    #[test]
    fn test_param_pack_malformed_is_soft_error() {
        let (pack, err) = decode_param_pack("%%%definitely not base64%%%");
        assert_eq!(pack, ParamPack::default());
        assert!(matches!(err, Some(DecodeError::Base64(_))));

        let (pack, err) = decode_param_pack("");
        assert_eq!(pack, ParamPack::default());
        assert_eq!(err, Some(DecodeError::Empty));
    }
}
