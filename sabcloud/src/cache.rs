//! Mémoïsation bornée dans le temps du token et de l'URL de base
//!
//! Le token de téléchargement et l'URL de base du dispatcher sont coûteux à
//! (ré)obtenir et restent valables plusieurs minutes côté service. Ce module
//! les conserve comme entrées explicites horodatées avec TTL : des purs
//! caches sans effet de bord, sûrs à partager entre plusieurs sessions
//! logiques.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

/// Entrée de cache horodatée
#[derive(Debug, Clone)]
struct TimedEntry<T> {
    /// Valeur mémoïsée
    value: T,
    /// Instant au-delà duquel l'entrée est invalide
    valid_until: SystemTime,
}

impl<T: Clone> TimedEntry<T> {
    /// Crée une entrée valable pour la durée donnée
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            valid_until: SystemTime::now() + ttl,
        }
    }

    /// Vérifie si l'entrée est encore valide
    fn is_valid(&self) -> bool {
        SystemTime::now() < self.valid_until
    }
}

/// Caches mémoïsés du client cloud
///
/// Thread-safe ; les lectures concurrentes depuis plusieurs sessions
/// logiques sont sans danger.
#[derive(Debug, Default)]
pub struct CloudCache {
    /// Token de téléchargement courant
    token: RwLock<Option<TimedEntry<String>>>,
    /// URL de base de streaming, par partage
    base_urls: RwLock<HashMap<String, TimedEntry<String>>>,
}

impl CloudCache {
    /// Crée un cache vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne le token mémoïsé s'il est encore valide
    pub fn get_token(&self) -> Option<String> {
        let guard = self.token.read().unwrap();
        guard
            .as_ref()
            .filter(|entry| entry.is_valid())
            .map(|entry| entry.value.clone())
    }

    /// Mémoïse un token pour la durée donnée
    pub fn put_token(&self, token: String, ttl: Duration) {
        let mut guard = self.token.write().unwrap();
        *guard = Some(TimedEntry::new(token, ttl));
    }

    /// Invalide le token mémoïsé
    ///
    /// La prochaine demande devra réémettre un token, quel que soit son âge.
    pub fn invalidate_token(&self) {
        let mut guard = self.token.write().unwrap();
        *guard = None;
    }

    /// Retourne l'URL de base mémoïsée pour un partage si encore valide
    pub fn get_base_url(&self, share: &str) -> Option<String> {
        let guard = self.base_urls.read().unwrap();
        guard
            .get(share)
            .filter(|entry| entry.is_valid())
            .map(|entry| entry.value.clone())
    }

    /// Mémoïse l'URL de base d'un partage pour la durée donnée
    pub fn put_base_url(&self, share: String, url: String, ttl: Duration) {
        let mut guard = self.base_urls.write().unwrap();
        guard.insert(share, TimedEntry::new(url, ttl));
    }

    /// Vide tous les caches
    pub fn clear(&self) {
        self.token.write().unwrap().take();
        self.base_urls.write().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let cache = CloudCache::new();
        assert!(cache.get_token().is_none());

        cache.put_token("tok".to_string(), Duration::from_secs(60));
        assert_eq!(cache.get_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_expired_token_is_gone() {
        let cache = CloudCache::new();
        cache.put_token("tok".to_string(), Duration::ZERO);
        assert!(cache.get_token().is_none());
    }

    #[test]
    fn test_invalidate_token() {
        let cache = CloudCache::new();
        cache.put_token("tok".to_string(), Duration::from_secs(60));
        cache.invalidate_token();
        assert!(cache.get_token().is_none());
    }

    #[test]
    fn test_base_url_keyed_by_share() {
        let cache = CloudCache::new();
        cache.put_base_url(
            "share-a".to_string(),
            "https://a.example".to_string(),
            Duration::from_secs(60),
        );
        assert_eq!(
            cache.get_base_url("share-a").as_deref(),
            Some("https://a.example")
        );
        assert!(cache.get_base_url("share-b").is_none());
    }

    #[test]
    fn test_clear_empties_everything() {
        let cache = CloudCache::new();
        cache.put_token("tok".to_string(), Duration::from_secs(60));
        cache.put_base_url(
            "s".to_string(),
            "https://a.example".to_string(),
            Duration::from_secs(60),
        );
        cache.clear();
        assert!(cache.get_token().is_none());
        assert!(cache.get_base_url("s").is_none());
    }
}
