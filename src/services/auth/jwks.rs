//! Signing-key resolution: JWKS fetching and caching.
//!
//! Cache policy:
//! - The key set is fetched on first use and kept as an immutable snapshot
//!   (`Arc<KeySet>`). A refresh swaps the whole snapshot, so readers see either
//!   the previous set or the new one, never a mix.
//! - A snapshot older than `ttl` is refreshed before use.
//! - A lookup for an unknown `kid` triggers one refetch before failing
//!   (key rotation), unless the snapshot is younger than `min_refresh_interval`.
//! - Refreshes are single-flight: callers that queued behind an in-flight fetch
//!   reuse its outcome instead of fetching again.
//! - No retries. A failed fetch fails the requests waiting on it; the next
//!   request may try again.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::{Mutex, RwLock};

use super::error::{AuthError, DESC_KEY_NOT_FOUND};

/// Where the key set comes from. HTTP in production, in-memory in tests.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches the provider's published JWKS document over HTTP(S).
#[derive(Clone, Debug)]
pub struct HttpKeySetSource {
    url: String,
    client: reqwest::Client,
}

impl HttpKeySetSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::KeySetUnavailable(format!("http client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("invalid JWKS document: {e}")))
    }
}

/// A published verification key, ready for `jsonwebtoken::decode`.
#[derive(Clone)]
pub struct SigningKey {
    pub kid: String,
    /// `alg` declared by the JWK, if any. A token must use exactly this algorithm.
    pub algorithm: Option<Algorithm>,
    pub decoding_key: DecodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Immutable snapshot of the provider's key set.
struct KeySet {
    keys: HashMap<String, Arc<SigningKey>>,
    fetched_at: Instant,
}

impl KeySet {
    fn from_jwks(jwks: JwkSet) -> Self {
        let mut keys = HashMap::with_capacity(jwks.keys.len());

        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                tracing::warn!("skipping JWK without kid");
                continue;
            };

            match signing_key(kid.clone(), jwk) {
                Ok(key) => {
                    keys.insert(kid, Arc::new(key));
                }
                Err(err) => tracing::warn!(kid = %kid, error = %err, "skipping unusable JWK"),
            }
        }

        Self {
            keys,
            fetched_at: Instant::now(),
        }
    }

    fn get(&self, kid: &str) -> Option<Arc<SigningKey>> {
        self.keys.get(kid).cloned()
    }
}

fn signing_key(kid: String, jwk: &Jwk) -> Result<SigningKey, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_jwk(jwk)?;

    let algorithm = jwk.common.key_algorithm.as_ref().and_then(|a| match a {
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        _ => None,
    });

    Ok(SigningKey {
        kid,
        algorithm,
        decoding_key,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct JwksCachePolicy {
    pub ttl: Duration,
    pub min_refresh_interval: Duration,
}

impl Default for JwksCachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            min_refresh_interval: Duration::ZERO,
        }
    }
}

/// Process-wide signing-key cache (the only shared mutable state of the auth core).
pub struct JwksCache {
    source: Arc<dyn KeySetSource>,
    policy: JwksCachePolicy,
    current: RwLock<Option<Arc<KeySet>>>,
    // Held for the duration of a fetch. Stores the failure of the latest attempt
    // so queued callers can reuse it.
    refresh: Mutex<Option<AuthError>>,
    attempts: AtomicU64,
}

impl std::fmt::Debug for JwksCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksCache")
            .field("policy", &self.policy)
            .field("attempts", &self.attempts.load(Ordering::Relaxed))
            .finish()
    }
}

impl JwksCache {
    pub fn new(source: Arc<dyn KeySetSource>, policy: JwksCachePolicy) -> Self {
        Self {
            source,
            policy,
            current: RwLock::new(None),
            refresh: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    /// Find the verification key for `kid`.
    pub async fn resolve(&self, kid: &str) -> Result<Arc<SigningKey>, AuthError> {
        let observed = self.attempts.load(Ordering::Acquire);

        let set = match self.snapshot().await {
            Some(set) if set.fetched_at.elapsed() < self.policy.ttl => {
                if let Some(key) = set.get(kid) {
                    return Ok(key);
                }
                if set.fetched_at.elapsed() < self.policy.min_refresh_interval {
                    tracing::debug!(kid = %kid, "unknown kid, refetch suppressed by cooldown");
                    return Err(AuthError::InvalidHeader(DESC_KEY_NOT_FOUND));
                }
                tracing::debug!(kid = %kid, "unknown kid, refetching signing keys");
                self.refresh_after(observed).await?
            }
            _ => self.refresh_after(observed).await?,
        };

        set.get(kid)
            .ok_or(AuthError::InvalidHeader(DESC_KEY_NOT_FOUND))
    }

    /// Fetch the key set now, regardless of freshness.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let observed = self.attempts.load(Ordering::Acquire);
        self.refresh_after(observed).await.map(|_| ())
    }

    /// True when a snapshot exists and is within its TTL.
    pub async fn is_cached(&self) -> bool {
        self.snapshot()
            .await
            .is_some_and(|set| set.fetched_at.elapsed() < self.policy.ttl)
    }

    async fn snapshot(&self) -> Option<Arc<KeySet>> {
        self.current.read().await.clone()
    }

    // Single-flight refresh. `observed` is the attempt counter the caller saw
    // before deciding to refresh; if it moved while we waited for the lock,
    // another caller already fetched and we reuse its outcome.
    async fn refresh_after(&self, observed: u64) -> Result<Arc<KeySet>, AuthError> {
        let mut last_failure = self.refresh.lock().await;

        if self.attempts.load(Ordering::Acquire) != observed {
            if let Some(err) = last_failure.as_ref() {
                return Err(err.clone());
            }
            if let Some(set) = self.snapshot().await {
                return Ok(set);
            }
        }

        let outcome = match self.source.fetch().await {
            Ok(jwks) => {
                let set = Arc::new(KeySet::from_jwks(jwks));
                tracing::info!(keys = set.keys.len(), "signing key set refreshed");

                *self.current.write().await = Some(Arc::clone(&set));
                *last_failure = None;
                Ok(set)
            }
            Err(err) => {
                tracing::error!(error = %err, "signing key set fetch failed");
                *last_failure = Some(err.clone());
                Err(err)
            }
        };

        // Bumped only after the snapshot is published, so a caller that sees the
        // new count also sees the new snapshot.
        self.attempts.fetch_add(1, Ordering::AcqRel);

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::testing::{StaticKeySet, TEST_KID, spawn_jwks_server, test_jwks};

    fn cache(source: Arc<StaticKeySet>, policy: JwksCachePolicy) -> JwksCache {
        JwksCache::new(source, policy)
    }

    #[tokio::test]
    async fn resolves_known_kid_and_caches() {
        let source = Arc::new(StaticKeySet::new(test_jwks(TEST_KID)));
        let jwks = cache(source.clone(), JwksCachePolicy::default());

        assert!(!jwks.is_cached().await);

        let key = jwks.resolve(TEST_KID).await.unwrap();
        assert_eq!(key.kid, TEST_KID);
        assert_eq!(key.algorithm, Some(Algorithm::RS256));

        jwks.resolve(TEST_KID).await.unwrap();
        assert!(jwks.is_cached().await);
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn unknown_kid_refetches_once_then_fails() {
        let source = Arc::new(StaticKeySet::new(test_jwks(TEST_KID)));
        let jwks = cache(source.clone(), JwksCachePolicy::default());
        jwks.resolve(TEST_KID).await.unwrap();

        let err = jwks.resolve("foreign-kid").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidHeader(DESC_KEY_NOT_FOUND));
        assert_eq!(err.description(), "Unable to find the appropriate key");
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn rotated_key_is_found_after_miss() {
        let source = Arc::new(StaticKeySet::new(test_jwks(TEST_KID)));
        let jwks = cache(source.clone(), JwksCachePolicy::default());
        jwks.resolve(TEST_KID).await.unwrap();

        source.replace(test_jwks("rotated"));

        let key = jwks.resolve("rotated").await.unwrap();
        assert_eq!(key.kid, "rotated");
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn cooldown_suppresses_miss_refetch() {
        let source = Arc::new(StaticKeySet::new(test_jwks(TEST_KID)));
        let policy = JwksCachePolicy {
            ttl: Duration::from_secs(600),
            min_refresh_interval: Duration::from_secs(60),
        };
        let jwks = cache(source.clone(), policy);
        jwks.resolve(TEST_KID).await.unwrap();

        assert!(jwks.resolve("other").await.is_err());
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn expired_snapshot_is_refetched() {
        let source = Arc::new(StaticKeySet::new(test_jwks(TEST_KID)));
        let policy = JwksCachePolicy {
            ttl: Duration::ZERO,
            min_refresh_interval: Duration::ZERO,
        };
        let jwks = cache(source.clone(), policy);

        jwks.resolve(TEST_KID).await.unwrap();
        jwks.resolve(TEST_KID).await.unwrap();
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_is_operational() {
        let source = Arc::new(StaticKeySet::failing());
        let jwks = cache(source.clone(), JwksCachePolicy::default());

        let err = jwks.resolve(TEST_KID).await.unwrap_err();
        assert!(err.is_operational());
        assert!(!jwks.is_cached().await);

        // no internal retry; the next call tries again
        let _ = jwks.resolve(TEST_KID).await;
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let source = Arc::new(
            StaticKeySet::new(test_jwks(TEST_KID)).with_delay(Duration::from_millis(50)),
        );
        let jwks = Arc::new(cache(source.clone(), JwksCachePolicy::default()));
        jwks.resolve(TEST_KID).await.unwrap();

        source.replace(test_jwks("rotated"));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let jwks = Arc::clone(&jwks);
                tokio::spawn(async move { jwks.resolve("rotated").await })
            })
            .collect();

        for task in tasks {
            let key = task.await.unwrap().unwrap();
            assert_eq!(key.kid, "rotated");
        }
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn concurrent_cold_failures_share_one_fetch() {
        let source =
            Arc::new(StaticKeySet::failing().with_delay(Duration::from_millis(50)));
        let jwks = Arc::new(cache(source.clone(), JwksCachePolicy::default()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let jwks = Arc::clone(&jwks);
                tokio::spawn(async move { jwks.resolve(TEST_KID).await })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().unwrap_err().is_operational());
        }
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn http_source_fetches_published_keys() {
        let (base, shutdown) = spawn_jwks_server().await;
        let source =
            HttpKeySetSource::new(format!("{base}/.well-known/jwks.json"), Duration::from_secs(2))
                .unwrap();

        let set = source.fetch().await.unwrap();
        assert_eq!(set.keys.len(), 1);
        assert_eq!(set.keys[0].common.key_id.as_deref(), Some(TEST_KID));

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn http_source_maps_bad_status_and_body() {
        let (base, shutdown) = spawn_jwks_server().await;

        for path in ["/missing", "/garbage"] {
            let source =
                HttpKeySetSource::new(format!("{base}{path}"), Duration::from_secs(2)).unwrap();
            let err = source.fetch().await.unwrap_err();
            assert!(err.is_operational(), "{path}: {err:?}");
        }

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn http_source_times_out() {
        let (base, shutdown) = spawn_jwks_server().await;
        let source =
            HttpKeySetSource::new(format!("{base}/slow"), Duration::from_millis(100)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(err.is_operational());

        let _ = shutdown.send(());
    }
}
