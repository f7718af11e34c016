use num_bigint::BigUint;
use num_traits::One;
use zeroize::Zeroize;
use crate::paillier::math::{gcd, lcm, mod_inverse, generate_prime, DEFAULT_MR_ROUNDS};
use crate::crypto_error::CryptoError;

// ============================================================================
// Clé publique Paillier — pas de données secrètes, pas de zeroize nécessaire
//
// Invariants maintenus par la génération :
//   n = p·q avec p ≠ q premiers de nbits bits
//   g = n + 1 (générateur canonique, toujours valide pour g = n+1 :
//              (n+1)^m mod n² = 1 + m·n par le binôme de Newton)
//   n_squared = n² (jamais fourni de l'extérieur sans re-vérification)
// ============================================================================
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey {
    pub n:         BigUint,
    pub g:         BigUint,
    pub n_squared: BigUint,
}

// ============================================================================
// Helper : efface les octets internes d'un BigUint
// ============================================================================
fn zeroize_biguint(n: &mut BigUint) {
    let bits = n.bits() as usize;
    if bits > 0 {
        *n = BigUint::from_bytes_be(&vec![0u8; (bits + 7) / 8]);
    }
    *n = BigUint::default();
}

// ============================================================================
// Clé secrète Paillier — ZEROISÉE À LA DESTRUCTION
//   lambda = lcm(p-1, q-1)
//   mu     = lambda⁻¹ mod n
// ============================================================================
#[derive(Clone, Debug, PartialEq)]
pub struct SecretKey {
    pub lambda: BigUint,
    pub mu:     BigUint,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.lambda);
        zeroize_biguint(&mut self.mu);
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Paire de clés — immuable après génération, partageable en lecture seule
// entre threads de chiffrement/déchiffrement sans verrou
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

// ============================================================================
// Génération de clés Paillier
//
// Deux premiers probables p, q de `nbits` bits chacun, tirés indépendamment.
// p = q est retiré silencieusement (retirage de q) : un n = p² casse toute
// la sécurité et l'algèbre du schéma.
//
// Avec g = n+1 : L(g^lambda mod n²) = lambda mod n, donc mu = lambda⁻¹ mod n
// directement — aucun modpow sur n² n'est nécessaire au keygen.
// mu n'existe que si gcd(lambda, n) = 1 ; un tirage dégénéré qui viole cette
// condition fait échouer la génération avec Err(KeyDerivation) : aucun
// matériel de clé partiel ne sort de cette fonction.
// ============================================================================
pub fn p_keygen(nbits: u64) -> Result<KeyPair, CryptoError> {
    p_keygen_with_rounds(nbits, DEFAULT_MR_ROUNDS)
}

// Variante exposant le nombre de rounds Miller-Rabin (défaut : 5)
pub fn p_keygen_with_rounds(nbits: u64, rounds: u32) -> Result<KeyPair, CryptoError> {
    let p = generate_prime(nbits, rounds)?;
    let mut q = generate_prime(nbits, rounds)?;
    while p == q {
        q = generate_prime(nbits, rounds)?;
    }

    keypair_from_primes(&p, &q)
}

// Dérivation du matériel de clé à partir de deux premiers distincts.
// Séparée de p_keygen pour pouvoir construire des paires de test à partir
// de premiers connus.
pub(crate) fn keypair_from_primes(p: &BigUint, q: &BigUint) -> Result<KeyPair, CryptoError> {
    let n         = p * q;
    let n_squared = &n * &n;
    let g         = &n + BigUint::one();

    let p_minus_1 = p - BigUint::one();
    let q_minus_1 = q - BigUint::one();
    let lambda    = lcm(&p_minus_1, &q_minus_1);

    if gcd(&lambda, &n) != BigUint::one() {
        return Err(CryptoError::KeyDerivation);
    }

    let mu = mod_inverse(&lambda, &n)?;

    Ok(KeyPair {
        public_key: PublicKey { n, g, n_squared },
        secret_key: SecretKey { lambda, mu },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keygen_invariants_structurels() {
        let kp = p_keygen(64).unwrap();
        let pk = &kp.public_key;

        assert_eq!(pk.g, &pk.n + BigUint::one());
        assert_eq!(pk.n_squared, &pk.n * &pk.n);
        // deux premiers de 64 bits → n a 127 ou 128 bits
        assert!(pk.n.bits() == 127 || pk.n.bits() == 128);

        // mu est bien l'inverse de lambda mod n
        let sk = &kp.secret_key;
        assert_eq!((&sk.lambda * &sk.mu) % &pk.n, BigUint::one());
    }

    #[test]
    fn test_keygen_depuis_premiers_connus() {
        // p = 17, q = 19 → n = 323, lambda = lcm(16, 18) = 144
        let kp = keypair_from_primes(&BigUint::from(17u32), &BigUint::from(19u32)).unwrap();
        assert_eq!(kp.public_key.n, BigUint::from(323u32));
        assert_eq!(kp.public_key.g, BigUint::from(324u32));
        assert_eq!(kp.secret_key.lambda, BigUint::from(144u32));
        assert_eq!(
            (&kp.secret_key.lambda * &kp.secret_key.mu) % &kp.public_key.n,
            BigUint::one()
        );
    }

    #[test]
    fn test_keygen_lambda_non_inversible() {
        // p = 7, q = 43 : lambda = lcm(6, 42) = 42, gcd(42, 301) = 7 ≠ 1
        let res = keypair_from_primes(&BigUint::from(7u32), &BigUint::from(43u32));
        assert_eq!(res.err(), Some(CryptoError::KeyDerivation));
    }

    #[test]
    fn test_keygen_taille_trop_petite() {
        assert!(matches!(
            p_keygen(8),
            Err(CryptoError::KeySizeTooSmall { .. })
        ));
    }

    #[test]
    fn test_zeroize_efface_les_champs() {
        let mut sk = SecretKey {
            lambda: BigUint::from(144u32),
            mu:     BigUint::from(291u32),
        };
        sk.zeroize();
        assert_eq!(sk.lambda, BigUint::default());
        assert_eq!(sk.mu, BigUint::default());
    }
}
