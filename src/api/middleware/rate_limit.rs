use crate::api::error::AppError;
use axum::{extract::{Request, State}, http::HeaderMap, middleware::Next, response::Response};
use chrono::{DateTime, Utc};

/// One fixed rate-limit window for a client IP.
#[derive(Clone, Debug)]
pub struct UploadWindow {
    pub window_start: DateTime<Utc>,
    pub count: u32,
}

/// Extract client IP from headers (supports proxies)
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(ip) = val.split(',').next()
    {
        return ip.trim().to_string();
    }
    if let Some(real_ip) = headers.get("x-real-ip")
        && let Ok(val) = real_ip.to_str()
    {
        return val.trim().to_string();
    }
    "unknown".to_string()
}

/// Fixed-window upload limiter, consulted before the admission pipeline.
pub async fn limit_uploads(
    State(state): State<crate::AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_client_ip(req.headers());
    check_window(
        &state.upload_windows,
        &ip,
        state.config.rate_limit_window_secs,
        state.config.rate_limit_max,
    )?;
    Ok(next.run(req).await)
}

pub fn check_window(
    windows: &dashmap::DashMap<String, UploadWindow>,
    ip: &str,
    window_secs: i64,
    max: u32,
) -> Result<(), AppError> {
    let now = Utc::now();
    let mut entry = windows.entry(ip.to_string()).or_insert(UploadWindow {
        window_start: now,
        count: 0,
    });

    if (now - entry.window_start).num_seconds() >= window_secs {
        entry.window_start = now;
        entry.count = 0;
    }

    if entry.count >= max {
        tracing::warn!("Upload rate limit hit for {}", ip);
        return Err(AppError::RateLimited(
            "Too many upload attempts, please try again later".to_string(),
        ));
    }

    entry.count += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_admits_up_to_max_then_rejects() {
        let windows = dashmap::DashMap::new();
        for _ in 0..10 {
            assert!(check_window(&windows, "1.2.3.4", 300, 10).is_ok());
        }
        assert!(check_window(&windows, "1.2.3.4", 300, 10).is_err());
        // A different client is unaffected
        assert!(check_window(&windows, "5.6.7.8", 300, 10).is_ok());
    }

    #[test]
    fn test_expired_window_resets() {
        let windows = dashmap::DashMap::new();
        windows.insert(
            "1.2.3.4".to_string(),
            UploadWindow {
                window_start: Utc::now() - chrono::Duration::seconds(301),
                count: 10,
            },
        );
        assert!(check_window(&windows, "1.2.3.4", 300, 10).is_ok());
    }

    #[test]
    fn test_extract_client_ip() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers), "unknown");

        headers.insert("x-real-ip", "10.0.0.1".parse().unwrap());
        assert_eq!(extract_client_ip(&headers), "10.0.0.1");

        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(extract_client_ip(&headers), "203.0.113.7");
    }
}
