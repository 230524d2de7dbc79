/// Security headers middleware
///
/// This module provides middleware to add security-related HTTP headers
/// to all responses, following OWASP recommendations.
///
/// # Headers Applied
///
/// - `X-Content-Type-Options: nosniff` - Prevents MIME type sniffing
/// - `X-Frame-Options: DENY` - Prevents clickjacking
/// - `Strict-Transport-Security` - Forces HTTPS (production only)
/// - `Content-Security-Policy` - Locked down, this server only serves JSON
/// - `Referrer-Policy: strict-origin-when-cross-origin`

use axum::{extract::Request, response::Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Security headers middleware layer
#[derive(Clone)]
pub struct SecurityHeadersLayer {
    /// Whether to enable HSTS (HTTPS-only, should be true in production)
    enable_hsts: bool,
}

impl SecurityHeadersLayer {
    /// Creates a new security headers layer
    ///
    /// # Arguments
    ///
    /// * `enable_hsts` - Whether to enable the HSTS header (use true for
    ///   production behind HTTPS)
    pub fn new(enable_hsts: bool) -> Self {
        Self { enable_hsts }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersMiddleware {
            inner,
            enable_hsts: self.enable_hsts,
        }
    }
}

/// Security headers middleware service
#[derive(Clone)]
pub struct SecurityHeadersMiddleware<S> {
    inner: S,
    enable_hsts: bool,
}

impl<S> Service<Request> for SecurityHeadersMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let future = self.inner.call(request);
        let enable_hsts = self.enable_hsts;

        Box::pin(async move {
            let mut response = future.await?;

            let headers = response.headers_mut();

            // Prevent MIME type sniffing
            headers.insert("X-Content-Type-Options", "nosniff".parse().unwrap());

            // Prevent clickjacking
            headers.insert("X-Frame-Options", "DENY".parse().unwrap());

            // Control referrer information
            headers.insert(
                "Referrer-Policy",
                "strict-origin-when-cross-origin".parse().unwrap(),
            );

            // This API serves JSON only, nothing may be loaded from it
            headers.insert(
                "Content-Security-Policy",
                "default-src 'none'; frame-ancestors 'none'".parse().unwrap(),
            );

            // HSTS (only in production with HTTPS)
            if enable_hsts {
                headers.insert(
                    "Strict-Transport-Security",
                    "max-age=31536000; includeSubDomains".parse().unwrap(),
                );
            }

            Ok(response)
        })
    }
}
