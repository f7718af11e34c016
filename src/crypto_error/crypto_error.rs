// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// L'appelant reçoit une Err(...) et peut répondre proprement sans crasher
// le thread. Toutes les erreurs sont détectées et remontées au point de
// détection ; seule la recherche interne de candidats premiers réessaie,
// dans la limite de son budget.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Erreurs de paramètres d'entrée ---
    /// Le message m est >= n (hors domaine plaintext Paillier)
    MessageOutOfRange,
    /// Le chiffré c est >= n² (hors domaine ciphertext Paillier)
    CiphertextOutOfRange,
    /// Chiffré malformé : la division exacte de l'étape L laisse un reste
    /// non nul (chiffré non produit sous cette clé, ou non inversible mod n²)
    InvalidCiphertext,
    /// La taille de premier demandée est trop petite (< MIN_PRIME_BITS)
    KeySizeTooSmall { requested: u64, minimum: u64 },

    // --- Erreurs de génération de clés ---
    /// Aucun premier trouvé dans le budget d'essais de generate_prime
    PrimalityTestExhausted { attempts: u64 },
    /// gcd(lambda, n) != 1 : tirage de premiers dégénéré, mu n'existe pas.
    /// L'appelant doit régénérer la paire de clés.
    KeyDerivation,

    // --- Erreurs mathématiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1)
    NoModularInverse,
    /// Conversion BigInt -> BigUint échouée (résultat négatif — invariant interne)
    NegativeConversion,

    // --- Erreurs de stockage / parsing des clés ---
    /// Parsing hexadécimal invalide dans un champ de clé JSON
    HexParseError,
    /// Champ hex trop long : vecteur DoS potentiel (conversion BigUint coûteuse)
    HexFieldTooLong { actual: usize, maximum: usize },
    /// g != n+1 au chargement : fichier corrompu ou falsifié
    KeyCoherenceError,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::MessageOutOfRange =>
                write!(f, "Le message doit être dans [0, n)"),
            CryptoError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [0, n²)"),
            CryptoError::InvalidCiphertext =>
                write!(f, "Chiffré invalide : division non exacte dans la fonction L"),
            CryptoError::KeySizeTooSmall { requested, minimum } =>
                write!(f, "Taille de premier {requested} bits insuffisante, minimum requis : {minimum} bits"),
            CryptoError::PrimalityTestExhausted { attempts } =>
                write!(f, "Aucun premier trouvé après {attempts} essais — source d'aléa suspecte"),
            CryptoError::KeyDerivation =>
                write!(f, "Dérivation de clé impossible : gcd(lambda, n) != 1, régénérer la paire"),
            CryptoError::NoModularInverse =>
                write!(f, "Impossible de calculer l'inverse modulaire (gcd != 1)"),
            CryptoError::NegativeConversion =>
                write!(f, "Conversion interne BigInt -> BigUint : résultat négatif inattendu"),
            CryptoError::HexParseError =>
                write!(f, "Parsing hexadécimal invalide dans le fichier de clés"),
            CryptoError::HexFieldTooLong { actual, maximum } =>
                write!(f, "Champ hexadécimal trop long : {actual} caractères (maximum autorisé : {maximum})"),
            CryptoError::KeyCoherenceError =>
                write!(f, "Fichier de clés incohérent : g != n+1 (corrompu ou falsifié)"),
        }
    }
}

impl std::error::Error for CryptoError {}
