// ============================================================================
// KeyRegistry — Registre de clés thread-safe pour déploiement serveur
//
// La paire de clés est immuable après génération ; ce qui varie dans un
// serveur, c'est QUELLE paire est active (chargement au démarrage, rotation).
// Arc<RwLock<Option<KeyPair>>> couvre exactement ce besoin :
//   - Arc    : cloneable entre threads (clone = incrément atomique)
//   - RwLock : lecteurs simultanés illimités, écrivain exclusif pour la
//              rotation — un Mutex sérialiserait inutilement les lectures
//              alors que l'écrasante majorité des accès sont des chiffrements
//   - Option : distingue "aucune clé chargée" de "clé chargée"
//
// Pattern d'usage :
//   1. Au démarrage : KeyRegistry::new() puis registry.set_keypair(kp)?
//   2. Dans chaque handler : let pk = registry.public_key()?
//   3. Rotation : registry.set_keypair(new_kp)?
// ============================================================================

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::paillier::p_keygen::{PublicKey, SecretKey, KeyPair};

// ============================================================================
// Erreurs spécifiques au registre
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Aucune paire de clés n'a encore été chargée dans le registre
    NoKeyPair,
    /// Le verrou RwLock est empoisonné (thread paniqué pendant un accès exclusif)
    LockPoisoned,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NoKeyPair =>
                write!(f, "Aucune paire de clés chargée dans le registre"),
            RegistryError::LockPoisoned =>
                write!(f, "Verrou du registre empoisonné — redémarrage requis"),
        }
    }
}

impl std::error::Error for RegistryError {}

// ============================================================================
// KeyRegistry — point d'entrée pour l'accès aux clés en production
// ============================================================================

struct RegistryState {
    keypair: Option<KeyPair>,
}

#[derive(Clone)]
pub struct KeyRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        KeyRegistry {
            inner: Arc::new(RwLock::new(RegistryState { keypair: None })),
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>, RegistryError> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    // -----------------------------------------------------------------------
    // Chargement / rotation de la paire de clés
    // -----------------------------------------------------------------------
    pub fn set_keypair(&self, kp: KeyPair) -> Result<(), RegistryError> {
        let mut state = self.write()?;
        state.keypair = Some(kp);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Effacement — le Drop de KeyPair déclenche le zeroize de SecretKey
    // -----------------------------------------------------------------------
    pub fn clear_keypair(&self) -> Result<(), RegistryError> {
        let mut state = self.write()?;
        state.keypair = None;
        Ok(())
    }

    pub fn has_keypair(&self) -> bool {
        self.read().map(|s| s.keypair.is_some()).unwrap_or(false)
    }

    // -----------------------------------------------------------------------
    // Accès en lecture — clones, le registre ne prête jamais de référence
    // au-delà de la durée du verrou
    // -----------------------------------------------------------------------
    pub fn keypair(&self) -> Result<KeyPair, RegistryError> {
        let state = self.read()?;
        state.keypair.clone().ok_or(RegistryError::NoKeyPair)
    }

    pub fn public_key(&self) -> Result<PublicKey, RegistryError> {
        let state = self.read()?;
        state
            .keypair
            .as_ref()
            .map(|kp| kp.public_key.clone())
            .ok_or(RegistryError::NoKeyPair)
    }

    pub fn secret_key(&self) -> Result<SecretKey, RegistryError> {
        let state = self.read()?;
        state
            .keypair
            .as_ref()
            .map(|kp| kp.secret_key.clone())
            .ok_or(RegistryError::NoKeyPair)
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use num_bigint::BigUint;
    use crate::paillier::p_keygen::p_keygen::keypair_from_primes;

    fn test_keypair() -> KeyPair {
        keypair_from_primes(&BigUint::from(17u32), &BigUint::from(19u32)).unwrap()
    }

    #[test]
    fn test_registre_vide_retourne_err() {
        let reg = KeyRegistry::new();
        assert!(matches!(reg.public_key(), Err(RegistryError::NoKeyPair)));
    }

    #[test]
    fn test_registre_set_et_get() {
        let reg = KeyRegistry::new();
        reg.set_keypair(test_keypair()).unwrap();
        assert!(reg.public_key().is_ok());
        assert!(reg.secret_key().is_ok());
        assert!(reg.has_keypair());
    }

    #[test]
    fn test_registre_clear() {
        let reg = KeyRegistry::new();
        reg.set_keypair(test_keypair()).unwrap();
        // clear() → Drop sur KeyPair → Drop sur SecretKey → Zeroize::zeroize()
        reg.clear_keypair().unwrap();
        assert!(matches!(reg.public_key(), Err(RegistryError::NoKeyPair)));
    }

    #[test]
    fn test_registre_lectures_concurrentes() {
        // N threads lisent simultanément sans deadlock pendant que la clé
        // publique sert à chiffrer
        let reg = Arc::new(KeyRegistry::new());
        reg.set_keypair(test_keypair()).unwrap();

        let handles: Vec<_> = (0..8).map(|_| {
            let r = Arc::clone(&reg);
            thread::spawn(move || {
                for _ in 0..100 {
                    assert!(r.public_key().is_ok());
                }
            })
        }).collect();

        for h in handles { h.join().unwrap(); }
    }
}
