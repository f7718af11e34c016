use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::OsRng;
use crate::paillier::p_keygen::PublicKey;
use crate::paillier::math::gcd;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Chiffrement Paillier : c = g^m * r^n  mod n²
//
// Précondition : m ∈ [0, n). m >= n → Err(MessageOutOfRange), jamais de
// réduction silencieuse (BigUint rend m < 0 irreprésentable par construction).
//
// L'aléa r vient d'OsRng (entropie système) — le masquage r^n est ce qui
// rend le chiffrement probabiliste : deux appels sur le même m produisent
// des chiffrés différents sauf collision de r, négligeable pour n grand.
// r est retiré tant que gcd(r, n) ≠ 1 pour rester dans Z*_n.
// ---------------------------------------------------------------------------
pub fn p_encrypt(m: &BigUint, pk: &PublicKey) -> Result<BigUint, CryptoError> {
    if m >= &pk.n {
        return Err(CryptoError::MessageOutOfRange);
    }

    let mut rng = OsRng;

    let r = loop {
        let candidate = rng.gen_biguint_range(&One::one(), &pk.n);
        if gcd(&candidate, &pk.n) == BigUint::one() {
            break candidate;
        }
    };

    // Jamais de puissance matérialisée : modpow sur n² de bout en bout
    let g_m = pk.g.modpow(m, &pk.n_squared);
    let r_n = r.modpow(&pk.n, &pk.n_squared);
    let c = (&g_m * &r_n) % &pk.n_squared;

    Ok(c)
}
