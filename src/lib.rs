// Déclaration des modules
pub mod crypto_error;
pub mod paillier;
pub mod key_management;

pub use crate::paillier::math;

// Fonctions mathématiques principales
pub use crate::paillier::math::{
    l_function, gcd, lcm, generate_prime, is_probably_prime, mod_inverse,
};

// Opérations du cryptosystème
pub use crate::paillier::p_keygen::{p_keygen, p_keygen_with_rounds};
pub use crate::paillier::p_encrypt::p_encrypt;
pub use crate::paillier::p_decrypt::p_decrypt;
pub use crate::paillier::p_add::p_add;

// Types depuis keygen
pub use crate::paillier::p_keygen::{PublicKey, SecretKey, KeyPair};

// Erreur centralisée
pub use crypto_error::CryptoError;

// Registre de clés thread-safe — point d'entrée pour les serveurs multi-threadés
pub use key_management::{KeyRegistry, RegistryError};
