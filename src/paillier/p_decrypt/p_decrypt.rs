use num_bigint::BigUint;
use crate::paillier::math::l_function;
use crate::paillier::p_keygen::{PublicKey, SecretKey};
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Déchiffrement Paillier : m = L(c^lambda mod n²) · mu  mod n
//
// Précondition : c ∈ [0, n²). c >= n² → Err(CiphertextOutOfRange).
// L exige une division exacte par n ; un reste non nul signale un chiffré
// qui n'a pas été produit sous cette clé → Err(InvalidCiphertext), propagé
// tel quel (jamais corrigé ni deviné).
//
// Le résultat est indépendant du r utilisé au chiffrement : r^(n·lambda)
// ≡ 1 mod n², seul g^(m·lambda) survit à l'exponentiation.
// ---------------------------------------------------------------------------
pub fn p_decrypt(c: &BigUint, pk: &PublicKey, sk: &SecretKey) -> Result<BigUint, CryptoError> {
    if c >= &pk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    let c_lambda = c.modpow(&sk.lambda, &pk.n_squared);
    let l_c_lambda = l_function(&c_lambda, &pk.n)?;
    let m = (&l_c_lambda * &sk.mu) % &pk.n;

    Ok(m)
}
