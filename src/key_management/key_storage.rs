use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use std::io;
use num_bigint::BigUint;
use num_traits::{Num, One};
use crate::paillier::p_keygen::{PublicKey, SecretKey, KeyPair};
use crate::crypto_error::CryptoError;

// ============================================================================
// Protection DoS parsing — limites de taille des entrées
//
// Un fichier de clés JSON contrôlé par un attaquant peut sinon :
//   - Peser plusieurs Go → lecture en mémoire non bornée, OOM killer.
//   - Porter un champ hex de plusieurs Mo → BigUint::from_str_radix est
//     O(n²) en taille d'entrée, CPU saturé par requête.
//
// Ces constantes sont vérifiées AVANT toute opération coûteuse.
// Dimensionnées pour des premiers jusqu'à 4096 bits : n pèse au plus
// 8192 bits = 2048 caractères hex. On prend 3072 avec marge.
// ============================================================================

/// Taille maximale d'un fichier de clés JSON en octets (32 Ko)
const MAX_KEY_FILE_BYTES: u64 = 32_768;

/// Longueur maximale d'un champ hexadécimal en caractères.
const MAX_HEX_FIELD_LEN: usize = 3_072;

// ============================================================================
// Structures JSON pour la sérialisation des clés
//
// n_squared n'est JAMAIS persisté : il est recalculé au chargement à partir
// de n, ce qui supprime toute possibilité d'incohérence n_squared != n².
// La cohérence restante à vérifier est g == n+1 (générateur canonique).
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicKeyJson {
    pub n: String,
    pub g: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SecretKeyJson {
    pub lambda: String,
    pub mu:     String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct KeyPairJson {
    pub public_key: PublicKeyJson,
    pub secret_key: SecretKeyJson,
}

// ============================================================================
// Conversion BigUint ↔ hexadécimal
// ============================================================================

pub fn biguint_to_hex(value: &BigUint) -> String {
    value.to_str_radix(16).to_uppercase()
}

/// Convertit une string hex en BigUint.
///
/// Vérifie la longueur du champ AVANT la conversion pour éviter une
/// allocation BigUint géante (vecteur DoS CPU).
pub fn hex_to_biguint(hex_str: &str) -> Result<BigUint, CryptoError> {
    if hex_str.len() > MAX_HEX_FIELD_LEN {
        return Err(CryptoError::HexFieldTooLong {
            actual:  hex_str.len(),
            maximum: MAX_HEX_FIELD_LEN,
        });
    }
    BigUint::from_str_radix(hex_str, 16)
        .map_err(|_| CryptoError::HexParseError)
}

// ============================================================================
// Conversion structures Rust → JSON
// ============================================================================

pub fn public_key_to_json(pk: &PublicKey) -> PublicKeyJson {
    PublicKeyJson {
        n: biguint_to_hex(&pk.n),
        g: biguint_to_hex(&pk.g),
    }
}

pub fn secret_key_to_json(sk: &SecretKey) -> SecretKeyJson {
    SecretKeyJson {
        lambda: biguint_to_hex(&sk.lambda),
        mu:     biguint_to_hex(&sk.mu),
    }
}

pub fn keypair_to_json(kp: &KeyPair) -> KeyPairJson {
    KeyPairJson {
        public_key: public_key_to_json(&kp.public_key),
        secret_key: secret_key_to_json(&kp.secret_key),
    }
}

// ============================================================================
// Conversion JSON → structures Rust
// ============================================================================

pub fn json_to_public_key(json: &PublicKeyJson) -> Result<PublicKey, CryptoError> {
    let n = hex_to_biguint(&json.n)?;
    let g = hex_to_biguint(&json.g)?;

    // Cohérence structurelle : protège contre les fichiers corrompus/falsifiés
    if g != &n + BigUint::one() {
        return Err(CryptoError::KeyCoherenceError);
    }

    let n_squared = &n * &n;
    Ok(PublicKey { n, g, n_squared })
}

pub fn json_to_secret_key(json: &SecretKeyJson) -> Result<SecretKey, CryptoError> {
    Ok(SecretKey {
        lambda: hex_to_biguint(&json.lambda)?,
        mu:     hex_to_biguint(&json.mu)?,
    })
}

pub fn json_to_keypair(json: &KeyPairJson) -> Result<KeyPair, CryptoError> {
    Ok(KeyPair {
        public_key: json_to_public_key(&json.public_key)?,
        secret_key: json_to_secret_key(&json.secret_key)?,
    })
}

// ============================================================================
// Vérification de taille de fichier (protection DoS)
// La métadonnée est lue sans ouvrir le contenu.
// ============================================================================

fn check_file_size(filepath: &str) -> io::Result<()> {
    let meta = fs::metadata(filepath)?;
    if meta.len() > MAX_KEY_FILE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Fichier de clés trop grand : {} octets (maximum autorisé : {} octets). \
                 Possible tentative DoS.",
                meta.len(),
                MAX_KEY_FILE_BYTES
            ),
        ));
    }
    Ok(())
}

// ============================================================================
// Sauvegarde JSON sur disque
// ============================================================================

pub fn save_keypair_json(kp: &KeyPair, filepath: &str) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&keypair_to_json(kp))?;
    fs::write(filepath, json)?;
    Ok(())
}

pub fn save_public_key_json(pk: &PublicKey, filepath: &str) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&public_key_to_json(pk))?;
    fs::write(filepath, json)?;
    Ok(())
}

pub fn save_secret_key_json(sk: &SecretKey, filepath: &str) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&secret_key_to_json(sk))?;
    fs::write(filepath, json)?;
    Ok(())
}

// ============================================================================
// Chargement JSON depuis disque
// Vérification de la taille du fichier AVANT la lecture (protection DoS).
// ============================================================================

pub fn load_keypair_json(filepath: &str) -> io::Result<KeyPair> {
    check_file_size(filepath)?;
    let raw  = fs::read_to_string(filepath)?;
    let json: KeyPairJson = serde_json::from_str(&raw)?;
    json_to_keypair(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub fn load_public_key_json(filepath: &str) -> io::Result<PublicKey> {
    check_file_size(filepath)?;
    let raw  = fs::read_to_string(filepath)?;
    let json: PublicKeyJson = serde_json::from_str(&raw)?;
    json_to_public_key(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub fn load_secret_key_json(filepath: &str) -> io::Result<SecretKey> {
    check_file_size(filepath)?;
    let raw  = fs::read_to_string(filepath)?;
    let json: SecretKeyJson = serde_json::from_str(&raw)?;
    json_to_secret_key(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

// ============================================================================
// Utilitaires
// ============================================================================

pub fn key_file_exists(filepath: &str) -> bool {
    Path::new(filepath).exists()
}

pub fn ensure_keys_directory(dir_path: &str) -> io::Result<()> {
    if !Path::new(dir_path).exists() {
        fs::create_dir_all(dir_path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::p_keygen::p_keygen::keypair_from_primes;

    fn test_keypair() -> KeyPair {
        keypair_from_primes(&BigUint::from(17u32), &BigUint::from(19u32)).unwrap()
    }

    #[test]
    fn test_round_trip_json() {
        let kp = test_keypair();
        let reloaded = json_to_keypair(&keypair_to_json(&kp)).unwrap();

        assert_eq!(reloaded.public_key, kp.public_key);
        assert_eq!(reloaded.secret_key, kp.secret_key);
        // n_squared recalculé, pas persisté
        assert_eq!(reloaded.public_key.n_squared, &kp.public_key.n * &kp.public_key.n);
    }

    #[test]
    fn test_coherence_g_falsifie() {
        let mut json = public_key_to_json(&test_keypair().public_key);
        json.g = biguint_to_hex(&BigUint::from(2u32));
        assert_eq!(json_to_public_key(&json), Err(CryptoError::KeyCoherenceError));
    }

    #[test]
    fn test_hex_invalide() {
        assert_eq!(hex_to_biguint("ZZZZ"), Err(CryptoError::HexParseError));
    }

    #[test]
    fn test_hex_trop_long() {
        let geant = "F".repeat(MAX_HEX_FIELD_LEN + 1);
        assert!(matches!(
            hex_to_biguint(&geant),
            Err(CryptoError::HexFieldTooLong { .. })
        ));
    }

    #[test]
    fn test_sauvegarde_et_chargement_disque() {
        let kp = test_keypair();
        let path = std::env::temp_dir().join(format!(
            "paillier_additive_test_{}.json",
            std::process::id()
        ));
        let path = path.to_str().unwrap().to_owned();

        save_keypair_json(&kp, &path).unwrap();
        let reloaded = load_keypair_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.public_key, kp.public_key);
        assert_eq!(reloaded.secret_key, kp.secret_key);
    }
}
