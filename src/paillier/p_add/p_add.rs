use num_bigint::BigUint;
use crate::paillier::p_keygen::PublicKey;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Addition homomorphe : c3 = c1 · c2  mod n²
//
// Dec(c3) = (m1 + m2) mod n — la somme des clairs s'obtient sans jamais
// déchiffrer ni toucher à la clé secrète. Seule validation possible côté
// public : l'appartenance de chaque opérande à [0, n²).
// ---------------------------------------------------------------------------
pub fn p_add(c1: &BigUint, c2: &BigUint, pk: &PublicKey) -> Result<BigUint, CryptoError> {
    if c1 >= &pk.n_squared || c2 >= &pk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    Ok((c1 * c2) % &pk.n_squared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use crate::paillier::p_keygen::p_keygen::{keypair_from_primes, p_keygen};
    use crate::paillier::p_encrypt::p_encrypt;
    use crate::paillier::p_decrypt::p_decrypt;

    #[test]
    fn test_addition_homomorphe_7_plus_35() {
        let kp = p_keygen(64).unwrap();
        let pk = &kp.public_key;

        let c1 = p_encrypt(&BigUint::from(7u32), pk).unwrap();
        let c2 = p_encrypt(&BigUint::from(35u32), pk).unwrap();
        let c3 = p_add(&c1, &c2, pk).unwrap();

        assert_eq!(
            p_decrypt(&c3, pk, &kp.secret_key).unwrap(),
            BigUint::from(42u32)
        );
    }

    #[test]
    fn test_addition_reduit_modulo_n() {
        // m1 = n-1, m2 = 2 → (n+1) mod n = 1
        let kp = keypair_from_primes(&BigUint::from(17u32), &BigUint::from(19u32)).unwrap();
        let pk = &kp.public_key;

        let c1 = p_encrypt(&(&pk.n - BigUint::one()), pk).unwrap();
        let c2 = p_encrypt(&BigUint::from(2u32), pk).unwrap();
        let c3 = p_add(&c1, &c2, pk).unwrap();

        assert_eq!(p_decrypt(&c3, pk, &kp.secret_key).unwrap(), BigUint::one());
    }

    #[test]
    fn test_addition_operande_hors_domaine() {
        let kp = keypair_from_primes(&BigUint::from(17u32), &BigUint::from(19u32)).unwrap();
        let pk = &kp.public_key;

        let c_ok = p_encrypt(&BigUint::from(3u32), pk).unwrap();
        assert_eq!(
            p_add(&pk.n_squared, &c_ok, pk),
            Err(CryptoError::CiphertextOutOfRange)
        );
        assert_eq!(
            p_add(&c_ok, &pk.n_squared, pk),
            Err(CryptoError::CiphertextOutOfRange)
        );
    }
}
