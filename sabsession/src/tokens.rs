//! Gestion du token de téléchargement à l'échelle d'une session
//!
//! Le token signé des URLs de streaming vieillit en "ticks" d'interaction :
//! chaque action de l'utilisateur incrémente un compteur monotone, et le
//! token est réémis dès que son âge dépasse un seuil inférieur à sa durée de
//! vie supposée côté service : on rafraîchit un peu avant l'expiration
//! attendue. Le seuil est un réglage empirique, pas une garantie du
//! protocole.
//!
//! Deux états : **absent** et **valide**. L'action explicite "refresh token"
//! force le retour à l'état absent.

use crate::error::Result;
use sabcloud::CloudClient;
use tracing::debug;

/// Seuil de rafraîchissement par défaut, en ticks
///
/// La durée de vie supposée du token est d'environ 5 ticks.
pub const DEFAULT_REFRESH_AFTER_TICKS: u64 = 4;

/// Détenteur du token courant d'une session
#[derive(Debug)]
pub struct TokenKeeper {
    /// Token courant, si l'état est "valide"
    token: Option<String>,
    /// Tick auquel le token courant a été obtenu
    issued_at_tick: u64,
    /// Age maximal (en ticks) au-delà duquel le token est réémis
    refresh_after_ticks: u64,
}

impl TokenKeeper {
    /// Crée un détenteur vide avec le seuil donné
    pub fn new(refresh_after_ticks: u64) -> Self {
        Self {
            token: None,
            issued_at_tick: 0,
            refresh_after_ticks,
        }
    }

    /// Age du token courant au tick donné, ou `None` si l'état est absent
    pub fn age(&self, now_tick: u64) -> Option<u64> {
        self.token
            .as_ref()
            .map(|_| now_tick.saturating_sub(self.issued_at_tick))
    }

    /// Vérifie si une (ré)émission est nécessaire au tick donné
    pub fn needs_refresh(&self, now_tick: u64) -> bool {
        match self.age(now_tick) {
            None => true,
            Some(age) => age > self.refresh_after_ticks,
        }
    }

    /// Retourne le token courant, en le (ré)émettant si nécessaire
    ///
    /// L'émission sous-jacente reste mémoïsée dans [`CloudClient`] ; un échec
    /// d'émission est fatal à l'opération appelante et remonte tel quel.
    pub async fn current(&mut self, client: &CloudClient, now_tick: u64) -> Result<String> {
        if !self.needs_refresh(now_tick) {
            if let Some(token) = &self.token {
                return Ok(token.clone());
            }
        }

        debug!("Requesting download token at tick {}", now_tick);
        let token = client.download_token().await?;
        self.token = Some(token.clone());
        self.issued_at_tick = now_tick;

        Ok(token)
    }

    /// Force l'état absent
    ///
    /// La prochaine demande devra émettre un token, quel que soit l'âge du
    /// précédent. Pour garantir une réémission effective, l'appelant doit
    /// aussi invalider la mémoïsation du client
    /// ([`CloudClient::invalidate_token`]).
    pub fn invalidate(&mut self) {
        self.token = None;
        self.issued_at_tick = 0;
    }
}

impl Default for TokenKeeper {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_AFTER_TICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keeper_with_token(issued_at: u64) -> TokenKeeper {
        let mut keeper = TokenKeeper::default();
        keeper.token = Some("tok".to_string());
        keeper.issued_at_tick = issued_at;
        keeper
    }

    #[test]
    fn test_absent_state_needs_refresh() {
        let keeper = TokenKeeper::default();
        assert!(keeper.needs_refresh(0));
        assert_eq!(keeper.age(0), None);
    }

    #[test]
    fn test_young_token_is_kept() {
        // Émis au tick 0, redemandé au tick 3 : âge 3 <= 4, pas de réémission
        let keeper = keeper_with_token(0);
        assert!(!keeper.needs_refresh(3));
        assert!(!keeper.needs_refresh(4));
    }

    #[test]
    fn test_aged_token_is_refreshed() {
        // Redemandé au tick 5 : âge 5 > 4, réémission
        let keeper = keeper_with_token(0);
        assert!(keeper.needs_refresh(5));
    }

    #[test]
    fn test_invalidate_forces_absent() {
        let mut keeper = keeper_with_token(10);
        assert!(!keeper.needs_refresh(10));
        keeper.invalidate();
        assert!(keeper.needs_refresh(10));
    }

    #[test]
    fn test_custom_threshold() {
        let mut keeper = TokenKeeper::new(1);
        keeper.token = Some("tok".to_string());
        keeper.issued_at_tick = 0;
        assert!(!keeper.needs_refresh(1));
        assert!(keeper.needs_refresh(2));
    }
}
