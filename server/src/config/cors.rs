use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS));

    // Credentials cannot be combined with a wildcard origin.
    if has_valid_origin(origins) {
        layer.allow_credentials(true)
    } else {
        layer
    }
}

/// `*` is not an origin; it means "any" and is handled by the fallback.
fn is_wildcard(origin: &str) -> bool {
    origin.trim() == "*"
}

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter(|origin| !is_wildcard(origin))
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

fn has_valid_origin(origins: &[String]) -> bool {
    origins
        .iter()
        .any(|o| !is_wildcard(o) && o.parse::<HeaderValue>().is_ok())
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    let parsed = parse_origins(origins);

    if parsed.is_empty() {
        tracing::warn!("CORS: No valid origins configured, allowing any origin");
        AllowOrigin::any()
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", parsed.len());
        AllowOrigin::list(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_create_cors_layer_with_defaults() {
        let config = Config::default();
        let _layer = create_cors_layer(&config.cors_allowed_origins);
        assert!(has_valid_origin(&config.cors_allowed_origins));
    }

    #[test]
    fn test_invalid_origins_are_skipped() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "bad\norigin".to_string(),
        ];
        assert_eq!(parse_origins(&origins).len(), 1);
    }

    #[test]
    fn test_wildcard_origin_builds_permissive_layer() {
        let origins = vec!["*".to_string()];
        assert!(!has_valid_origin(&origins));
        assert!(parse_origins(&origins).is_empty());
        let _layer = create_cors_layer(&origins);
    }

    #[test]
    fn test_wildcard_is_dropped_from_explicit_list() {
        let origins = vec!["https://a.example".to_string(), " * ".to_string()];
        assert!(has_valid_origin(&origins));
        assert_eq!(parse_origins(&origins).len(), 1);
        let _layer = create_cors_layer(&origins);
    }

    #[test]
    fn test_no_origins_builds_permissive_layer() {
        assert!(!has_valid_origin(&[]));
        let _layer = create_cors_layer(&[]);
    }
}
